use std::collections::HashMap;

use super::{Config, WindowHandle, WindowIdentity, Workspace, WorkspaceId};
use crate::event_emitter::EventEmitter;

/// Workspace host model: which windows live in which workspaces, which
/// workspace is displayed, and which layout each one uses.
///
/// Every change is published through the [`EventEmitter`], in the order the
/// changes happen.
pub struct State {
    pub workspaces: Vec<Workspace>,
    pub windows: HashMap<WindowHandle, WindowIdentity>,
    current: WorkspaceId,
    previous: WorkspaceId,
    emitter: EventEmitter,
}

impl State {
    pub fn new(config: &Config, emitter: EventEmitter) -> Self {
        let mut workspaces: Vec<Workspace> = config
            .workspaces
            .iter()
            .enumerate()
            .map(|(i, ws)| Workspace::from_config(i as WorkspaceId + 1, ws))
            .collect();

        // Callers validate the config: at least one workspace, starting one in range
        let count = workspaces.len().max(1) as WorkspaceId;
        let current = config.starting_workspace.clamp(1, count);
        if let Some(ws) = workspaces.get_mut(current as usize - 1) {
            ws.is_current = true;
        }

        Self {
            workspaces,
            windows: HashMap::new(),
            current,
            previous: current,
            emitter,
        }
    }

    pub fn current_workspace_id(&self) -> WorkspaceId {
        self.current
    }

    pub fn current_workspace(&self) -> &Workspace {
        &self.workspaces[self.current as usize - 1]
    }

    /// Number of workspaces the window is a member of.
    pub fn workspace_count(&self, handle: WindowHandle) -> usize {
        self.workspaces.iter().filter(|w| w.contains(handle)).count()
    }

    fn index_of(&self, id: WorkspaceId) -> Option<usize> {
        if id == 0 || id as usize > self.workspaces.len() {
            return None;
        }
        Some(id as usize - 1)
    }

    pub fn window_created(&mut self, window: WindowIdentity, workspace: Option<WorkspaceId>) -> bool {
        let target = workspace.unwrap_or(self.current);
        let Some(idx) = self.index_of(target) else {
            tracing::warn!(
                "Window {} created on unknown workspace {}",
                window.handle,
                target
            );
            return false;
        };
        if self.workspaces[idx].contains(window.handle) {
            tracing::debug!(
                "Window {} already in workspace {}",
                window.handle,
                target
            );
            return false;
        }

        tracing::info!(
            "Window {} ({} - {:?}) added to workspace {}",
            window.handle,
            window.class_name,
            window.caption,
            target
        );
        self.windows.insert(window.handle, window.clone());
        let ws = &mut self.workspaces[idx];
        ws.windows.insert(0, window.handle);
        self.emitter.emit_window_added(ws.snapshot(), window);
        true
    }

    pub fn window_destroyed(&mut self, handle: WindowHandle) -> bool {
        let Some(window) = self.windows.remove(&handle) else {
            tracing::debug!("Destroyed window {} is not managed", handle);
            return false;
        };

        tracing::info!("Window {} destroyed", handle);
        for ws in self.workspaces.iter_mut().filter(|w| w.contains(handle)) {
            ws.windows.retain(|h| *h != handle);
            self.emitter.emit_window_removed(ws.snapshot(), window.clone());
        }
        true
    }

    pub fn switch_to_workspace(&mut self, id: WorkspaceId) -> bool {
        if id == self.current {
            return false;
        }
        let Some(new_idx) = self.index_of(id) else {
            tracing::warn!("Cannot switch to unknown workspace {}", id);
            return false;
        };
        let old_idx = self.current as usize - 1;

        tracing::info!("Switch workspace: {} -> {}", self.current, id);

        let old = &mut self.workspaces[old_idx];
        old.is_current = false;
        self.emitter.emit_workspace_deactivated(old.snapshot());

        self.previous = self.current;
        self.current = id;

        let new = &mut self.workspaces[new_idx];
        new.is_current = true;
        self.emitter.emit_workspace_activated(new.snapshot());
        true
    }

    pub fn switch_to_previous_workspace(&mut self) -> bool {
        self.switch_to_workspace(self.previous)
    }

    /// Move a window of the current workspace to another workspace and follow it.
    pub fn move_window_to_workspace(&mut self, handle: WindowHandle, id: WorkspaceId) -> bool {
        let Some((window, target_idx)) = self.transfer_source(handle, id) else {
            return false;
        };

        tracing::info!("Move window {}: workspace {} -> {}", handle, self.current, id);

        let current = &mut self.workspaces[self.current as usize - 1];
        current.windows.retain(|h| *h != handle);
        self.emitter
            .emit_window_removed(current.snapshot(), window.clone());

        let target = &mut self.workspaces[target_idx];
        target.windows.insert(0, handle);
        self.emitter.emit_window_added(target.snapshot(), window);

        self.switch_to_workspace(id);
        true
    }

    /// Share a window of the current workspace with another workspace and follow it.
    pub fn add_window_to_workspace(&mut self, handle: WindowHandle, id: WorkspaceId) -> bool {
        let Some((window, target_idx)) = self.transfer_source(handle, id) else {
            return false;
        };

        tracing::info!("Share window {} with workspace {}", handle, id);

        let target = &mut self.workspaces[target_idx];
        target.windows.insert(0, handle);
        self.emitter.emit_window_added(target.snapshot(), window);

        self.switch_to_workspace(id);
        true
    }

    /// Common checks for move/share: the window must be in the current
    /// workspace and not yet in the target one.
    fn transfer_source(
        &self,
        handle: WindowHandle,
        id: WorkspaceId,
    ) -> Option<(WindowIdentity, usize)> {
        if id == self.current {
            return None;
        }
        let Some(target_idx) = self.index_of(id) else {
            tracing::warn!("Unknown workspace {}", id);
            return None;
        };
        if !self.current_workspace().contains(handle) {
            tracing::debug!(
                "Window {} is not in the current workspace {}",
                handle,
                self.current
            );
            return None;
        }
        if self.workspaces[target_idx].contains(handle) {
            tracing::debug!("Window {} already in workspace {}", handle, id);
            return None;
        }
        let window = self.windows.get(&handle)?.clone();
        Some((window, target_idx))
    }

    /// Take a shared window out of the current workspace.
    /// A window that lives only here stays where it is.
    pub fn remove_window_from_current_workspace(&mut self, handle: WindowHandle) -> bool {
        if !self.current_workspace().contains(handle) {
            tracing::debug!(
                "Window {} is not in the current workspace {}",
                handle,
                self.current
            );
            return false;
        }
        if self.workspace_count(handle) == 1 {
            tracing::info!(
                "Window {} only lives in workspace {}, not removing",
                handle,
                self.current
            );
            return false;
        }
        let Some(window) = self.windows.get(&handle).cloned() else {
            return false;
        };

        tracing::info!(
            "Remove window {} from workspace {}",
            handle,
            self.current
        );
        let current = &mut self.workspaces[self.current as usize - 1];
        current.windows.retain(|h| *h != handle);
        self.emitter.emit_window_removed(current.snapshot(), window);
        true
    }

    pub fn change_layout(&mut self, workspace: Option<WorkspaceId>, layout: &str) -> bool {
        let id = workspace.unwrap_or(self.current);
        let Some(idx) = self.index_of(id) else {
            tracing::warn!("Cannot change layout of unknown workspace {}", id);
            return false;
        };
        let ws = &mut self.workspaces[idx];
        if ws.layout == layout {
            return false;
        }

        tracing::info!("Workspace {} layout: {} -> {}", id, ws.layout, layout);
        let previous = std::mem::replace(&mut ws.layout, layout.to_string());
        self.emitter.emit_layout_changed(ws.snapshot(), previous);
        true
    }
}
