//! Release version parsing and classification.

pub mod release;

pub use release::{ReleaseKind, ReleaseVersion};
