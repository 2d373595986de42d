//! Project lifecycle statuses and their classification for worker statistics.
//!
//! Status labels arrive from the backend as free text. The labels the dashboard uses are parsed
//! into named [`ProjectStatus`] members; anything else is kept verbatim as
//! [`ProjectStatus::Unrecognized`] and counts toward neither the active nor the completed total.
//!
//! "Abnahme" and "In Abnahme" are kept as two distinct members. Both labels occur in the
//! dashboard data and it is not settled whether they describe the same stage; only
//! "In Abnahme" counts as active.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Active,
    InAbnahme,
    Abnahme,
    Finished,
    Completed,
    Archived,
    Cancelled,
    /// Any other label, exactly as stored
    Unrecognized(String),
}

/// Statuses that count towards a worker's completed projects.
pub const COMPLETED_STATUSES: &[ProjectStatus] = &[ProjectStatus::Finished, ProjectStatus::Archived, ProjectStatus::Completed];

/// Statuses that count towards a worker's active projects.
pub const ACTIVE_STATUSES: &[ProjectStatus] = &[ProjectStatus::InProgress, ProjectStatus::Active, ProjectStatus::InAbnahme];

impl ProjectStatus {
    /// Every named status.
    pub const KNOWN: [ProjectStatus; 9] = [
        ProjectStatus::Planned,
        ProjectStatus::InProgress,
        ProjectStatus::Active,
        ProjectStatus::InAbnahme,
        ProjectStatus::Abnahme,
        ProjectStatus::Finished,
        ProjectStatus::Completed,
        ProjectStatus::Archived,
        ProjectStatus::Cancelled,
    ];

    /// Exact match only: no trimming, no case folding.
    pub fn from_label(label: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|status| status.as_str() == label)
            .unwrap_or_else(|| ProjectStatus::Unrecognized(label.to_string()))
    }

    /// The label stored by the backend.
    pub fn as_str(&self) -> &str {
        match self {
            ProjectStatus::Planned => "Planned",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Active => "Active",
            ProjectStatus::InAbnahme => "In Abnahme",
            ProjectStatus::Abnahme => "Abnahme",
            ProjectStatus::Finished => "Finished",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Archived => "Archived",
            ProjectStatus::Cancelled => "Cancelled",
            ProjectStatus::Unrecognized(label) => label,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ProjectStatus::Unrecognized(_))
    }

    pub fn is_active(&self) -> bool {
        ACTIVE_STATUSES.contains(self)
    }

    pub fn is_completed(&self) -> bool {
        COMPLETED_STATUSES.contains(self)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ProjectStatus {
    fn from(label: String) -> Self {
        match ProjectStatus::from_label(&label) {
            ProjectStatus::Unrecognized(_) => ProjectStatus::Unrecognized(label),
            known => known,
        }
    }
}

impl From<ProjectStatus> for String {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Unrecognized(label) => label,
            known => known.as_str().to_string(),
        }
    }
}
