use crate::models::ProjectId;
use serde::{Deserialize, Serialize};

/// Project and file lifecycle notifications, as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProjectEvent {
    Opened { project: ProjectId },
    Closed { project: ProjectId },
    Deleted { project: ProjectId },
    /// Project description or configuration changed (e.g. its natures).
    DescriptionChanged { project: ProjectId },
    FileRemoved { project: ProjectId, path: String },
    FileMoved {
        project: ProjectId,
        from: String,
        to: String,
    },
}

impl ProjectEvent {
    pub fn project(&self) -> &ProjectId {
        match self {
            ProjectEvent::Opened { project }
            | ProjectEvent::Closed { project }
            | ProjectEvent::Deleted { project }
            | ProjectEvent::DescriptionChanged { project }
            | ProjectEvent::FileRemoved { project, .. }
            | ProjectEvent::FileMoved { project, .. } => project,
        }
    }
}
