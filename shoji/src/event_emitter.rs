use std::sync::mpsc as std_mpsc;

use crate::core::{WindowIdentity, WorkspaceRef};
use crate::event::LifecycleEvent;

/// Publishes workspace lifecycle events onto a channel.
/// The receiving side hands them to the subclassing coordinator one at a time.
pub struct EventEmitter {
    tx: std_mpsc::Sender<LifecycleEvent>,
}

impl EventEmitter {
    pub fn new(tx: std_mpsc::Sender<LifecycleEvent>) -> Self {
        Self { tx }
    }

    fn emit(&self, event: LifecycleEvent) {
        tracing::trace!("Emitting {:?}", event);
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("Failed to emit event (no receivers?): {}", e);
        }
    }

    /// Emit when a window joins a workspace.
    pub fn emit_window_added(&self, workspace: WorkspaceRef, window: WindowIdentity) {
        self.emit(LifecycleEvent::WindowAdded { workspace, window });
    }

    /// Emit when a window leaves a workspace.
    pub fn emit_window_removed(&self, workspace: WorkspaceRef, window: WindowIdentity) {
        self.emit(LifecycleEvent::WindowRemoved { workspace, window });
    }

    /// Emit when a workspace becomes the displayed one.
    pub fn emit_workspace_activated(&self, workspace: WorkspaceRef) {
        self.emit(LifecycleEvent::WorkspaceActivated { workspace });
    }

    /// Emit when a workspace stops being displayed.
    pub fn emit_workspace_deactivated(&self, workspace: WorkspaceRef) {
        self.emit(LifecycleEvent::WorkspaceDeactivated { workspace });
    }

    /// Emit after a workspace switched layouts.
    pub fn emit_layout_changed(&self, workspace: WorkspaceRef, previous_layout: String) {
        self.emit(LifecycleEvent::LayoutChanged {
            workspace,
            previous_layout,
        });
    }
}
