use crate::core::{WindowIdentity, WorkspaceRef};

/// Workspace lifecycle events, published in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    WindowAdded {
        workspace: WorkspaceRef,
        window: WindowIdentity,
    },
    WindowRemoved {
        workspace: WorkspaceRef,
        window: WindowIdentity,
    },
    WorkspaceActivated {
        workspace: WorkspaceRef,
    },
    WorkspaceDeactivated {
        workspace: WorkspaceRef,
    },
    LayoutChanged {
        workspace: WorkspaceRef,
        previous_layout: String,
    },
}

impl LifecycleEvent {
    pub fn workspace(&self) -> &WorkspaceRef {
        match self {
            LifecycleEvent::WindowAdded { workspace, .. }
            | LifecycleEvent::WindowRemoved { workspace, .. }
            | LifecycleEvent::WorkspaceActivated { workspace }
            | LifecycleEvent::WorkspaceDeactivated { workspace }
            | LifecycleEvent::LayoutChanged { workspace, .. } => workspace,
        }
    }
}
