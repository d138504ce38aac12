//! Known projects and their per-project release settings.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ValidationError;

/// Release settings for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectProfile {
    /// Repository and project name, e.g. `citus-enterprise`.
    pub name: String,
    /// Package name written into `AC_INIT`, e.g. `Citus Enterprise`.
    pub display_name: String,
    /// Postgres extension name used in control and migration files.
    pub extension: String,
    /// Branch that receives the upcoming-version pull request.
    pub default_branch: String,
    /// GitHub organisation that owns the repository.
    pub owner: String,
}

impl ProjectProfile {
    pub fn new(name: &str, display_name: &str, extension: &str, default_branch: &str, owner: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            extension: extension.to_string(),
            default_branch: default_branch.to_string(),
            owner: owner.to_string(),
        }
    }
}

/// Lookup table of project profiles, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ProjectCatalog {
    profiles: BTreeMap<String, ProjectProfile>,
}

impl ProjectCatalog {
    pub fn new(profiles: impl IntoIterator<Item = ProjectProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }

    /// The Citus community and enterprise projects.
    pub fn builtin() -> Self {
        Self::new([
            ProjectProfile::new("citus", "Citus", "citus", "master", "citusdata"),
            ProjectProfile::new(
                "citus-enterprise",
                "Citus Enterprise",
                "citus",
                "enterprise-master",
                "citusdata",
            ),
        ])
    }

    pub fn get(&self, name: &str) -> Result<&ProjectProfile, ValidationError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ValidationError::UnknownProject {
                name: name.to_string(),
                known: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }
}
