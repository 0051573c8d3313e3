//! Reference counting of native window subclassing.
//!
//! A window is subclassed while at least one workspace with a tiling layout
//! holds it. Each workspace keeps a multiset of the windows it subclassed;
//! `memberships` counts how many of those sets contain each window, so a window
//! shared between workspaces is hooked once and unhooked when its last
//! workspace lets go of it. Windows that belong to more than one workspace,
//! tiling or not, are paused ("stop window proc") and resumed ("start window
//! proc") as their subclassing workspaces are hidden and shown.

mod bitness;

pub use bitness::{HookEligibility, SystemBitness};

use std::fmt;

use crate::core::{
    layout_needs_subclassing, AddResult, HashMultiSet, IgnoreList, RemoveResult, WindowHandle,
    WindowIdentity, WorkspaceId, WorkspaceRef,
};
use crate::event::LifecycleEvent;
use crate::platform::{HookError, HookService, MessageId};

pub const START_WINDOW_PROC: &str = "START_WINDOW_PROC";
pub const STOP_WINDOW_PROC: &str = "STOP_WINDOW_PROC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOp {
    Subclass,
    Unsubclass,
}

impl fmt::Display for HookOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookOp::Subclass => write!(f, "subclass"),
            HookOp::Unsubclass => write!(f, "unsubclass"),
        }
    }
}

/// A platform hook call that failed. The coordinator's counts still reflect the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    pub window: WindowHandle,
    pub op: HookOp,
    pub error: HookError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Running,
    ShutDown,
}

#[derive(Debug, Clone, Copy)]
enum WindowProcMessage {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy)]
struct RegisteredMessages {
    start: MessageId,
    stop: MessageId,
}

pub struct SubclassingCoordinator<P: HookService> {
    platform: P,
    ignore_list: IgnoreList,
    bitness: SystemBitness,
    manager: WindowHandle,
    phase: Phase,
    messages: Option<RegisteredMessages>,
    /// Indexed by workspace ordinal - 1.
    subclassed: Vec<HashMultiSet<WindowIdentity>>,
    /// Number of workspace sets containing each window.
    memberships: HashMultiSet<WindowIdentity>,
    /// Workspace references of every window, eligible or not.
    references: HashMultiSet<WindowIdentity>,
}

impl<P: HookService> SubclassingCoordinator<P> {
    pub fn new(
        platform: P,
        ignore_list: IgnoreList,
        bitness: SystemBitness,
        manager: WindowHandle,
    ) -> Self {
        Self {
            platform,
            ignore_list,
            bitness,
            manager,
            phase: Phase::Uninitialized,
            messages: None,
            subclassed: Vec::new(),
            memberships: HashMultiSet::new(),
            references: HashMultiSet::new(),
        }
    }

    pub fn initialize(&mut self, workspace_count: usize) {
        if self.phase != Phase::Uninitialized {
            tracing::debug!("Subclassing coordinator already initialized");
            return;
        }

        self.subclassed = (0..workspace_count).map(|_| HashMultiSet::new()).collect();
        self.messages = self.register_messages();
        self.phase = Phase::Running;
        tracing::info!(
            "Subclassing coordinator initialized for {} workspace(s)",
            workspace_count
        );
        if !self.ignore_list.is_empty() {
            tracing::info!("Never subclassing windows matching {} rule(s)", self.ignore_list.len());
        }
    }

    fn register_messages(&self) -> Option<RegisteredMessages> {
        let register = |name: &str| match self.platform.register_message(name) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!("Failed to register {}: {}", name, e);
                None
            }
        };
        Some(RegisteredMessages {
            start: register(START_WINDOW_PROC)?,
            stop: register(STOP_WINDOW_PROC)?,
        })
    }

    /// Unsubclass every window still held by any workspace. No messages are sent.
    pub fn shutdown(&mut self) -> Vec<HookFailure> {
        if self.phase != Phase::Running {
            tracing::debug!("Subclassing coordinator not running, nothing to shut down");
            return Vec::new();
        }

        let windows: Vec<WindowHandle> = self.memberships.iter().map(|w| w.handle).collect();
        let mut failures = Vec::new();
        for handle in &windows {
            tracing::debug!("Unsubclassing window {} at shutdown", handle);
            if let Err(error) = self.platform.unsubclass(*handle) {
                failures.push(self.failure(*handle, HookOp::Unsubclass, error));
            }
        }

        self.subclassed.clear();
        self.memberships.clear();
        self.references.clear();
        self.phase = Phase::ShutDown;
        tracing::info!(
            "Subclassing coordinator shut down, released {} window(s)",
            windows.len()
        );
        failures
    }

    pub fn handle_event(&mut self, event: &LifecycleEvent) -> Vec<HookFailure> {
        if self.phase != Phase::Running {
            tracing::debug!("Ignoring {:?} while coordinator is not running", event);
            return Vec::new();
        }

        match event {
            LifecycleEvent::WindowAdded { workspace, window } => {
                self.on_window_added(workspace, window)
            }
            LifecycleEvent::WindowRemoved { workspace, window } => {
                self.on_window_removed(workspace, window)
            }
            LifecycleEvent::WorkspaceActivated { workspace } => {
                self.on_workspace_activated(workspace);
                Vec::new()
            }
            LifecycleEvent::WorkspaceDeactivated { workspace } => {
                self.on_workspace_deactivated(workspace);
                Vec::new()
            }
            LifecycleEvent::LayoutChanged {
                workspace,
                previous_layout,
            } => self.on_layout_changed(workspace, previous_layout),
        }
    }

    pub fn on_window_added(
        &mut self,
        workspace: &WorkspaceRef,
        window: &WindowIdentity,
    ) -> Vec<HookFailure> {
        let Some(index) = self.set_index(workspace) else {
            return Vec::new();
        };
        self.references.add(window.clone());
        let Some(use_64bit_path) = self.eligibility(workspace, window).use_64bit_path() else {
            tracing::trace!(
                "Window {} on workspace {} is not eligible for subclassing",
                window.handle,
                workspace.ordinal_id()
            );
            return Vec::new();
        };

        let mut failures = Vec::new();
        if self.subclassed[index].add(window.clone()) == AddResult::AddedFirst
            && self.memberships.add(window.clone()) == AddResult::AddedFirst
        {
            tracing::debug!(
                "Subclassing window {} ({}) with the {}-bit hook",
                window.handle,
                window.class_name,
                if use_64bit_path { 64 } else { 32 }
            );
            if let Err(error) = self
                .platform
                .subclass(self.manager, window.handle, use_64bit_path)
            {
                failures.push(self.failure(window.handle, HookOp::Subclass, error));
            }
        }

        if workspace.is_currently_displayed() {
            self.notify(window.handle, WindowProcMessage::Start);
        }
        failures
    }

    pub fn on_window_removed(
        &mut self,
        workspace: &WorkspaceRef,
        window: &WindowIdentity,
    ) -> Vec<HookFailure> {
        let Some(index) = self.set_index(workspace) else {
            return Vec::new();
        };
        self.references.remove(window);

        let mut failures = Vec::new();
        match self.subclassed[index].remove(window) {
            RemoveResult::NotFound => {
                tracing::trace!(
                    "Window {} was not subclassed by workspace {}",
                    window.handle,
                    workspace.ordinal_id()
                );
            }
            RemoveResult::RemovedButPresent => self.notify(window.handle, WindowProcMessage::Stop),
            RemoveResult::RemovedLast => self.release(window, &mut failures),
        }
        failures
    }

    pub fn on_workspace_activated(&mut self, workspace: &WorkspaceRef) {
        self.notify_shared(workspace, WindowProcMessage::Start);
    }

    pub fn on_workspace_deactivated(&mut self, workspace: &WorkspaceRef) {
        self.notify_shared(workspace, WindowProcMessage::Stop);
    }

    pub fn on_layout_changed(
        &mut self,
        workspace: &WorkspaceRef,
        previous_layout: &str,
    ) -> Vec<HookFailure> {
        let Some(index) = self.set_index(workspace) else {
            return Vec::new();
        };
        if layout_needs_subclassing(workspace.layout_name()) || self.subclassed[index].is_empty() {
            tracing::debug!(
                "Workspace {} layout {} -> {}, subclassing unchanged",
                workspace.ordinal_id(),
                previous_layout,
                workspace.layout_name()
            );
            return Vec::new();
        }

        let windows: Vec<WindowIdentity> = self.subclassed[index].iter().cloned().collect();
        tracing::info!(
            "Workspace {} layout {} -> {}, releasing {} window(s)",
            workspace.ordinal_id(),
            previous_layout,
            workspace.layout_name(),
            windows.len()
        );

        let mut failures = Vec::new();
        for window in &windows {
            self.subclassed[index].take(window);
            self.release(window, &mut failures);
        }
        failures
    }

    /// The window left a workspace set entirely.
    fn release(&mut self, window: &WindowIdentity, failures: &mut Vec<HookFailure>) {
        match self.memberships.remove(window) {
            RemoveResult::RemovedLast => {
                tracing::debug!("Unsubclassing window {}", window.handle);
                if let Err(error) = self.platform.unsubclass(window.handle) {
                    failures.push(self.failure(window.handle, HookOp::Unsubclass, error));
                }
            }
            RemoveResult::RemovedButPresent => self.notify(window.handle, WindowProcMessage::Stop),
            RemoveResult::NotFound => {
                tracing::warn!("Window {} had no subclass membership", window.handle);
            }
        }
    }

    fn notify_shared(&self, workspace: &WorkspaceRef, message: WindowProcMessage) {
        let Some(index) = self.set_index(workspace) else {
            return;
        };
        let shared: Vec<WindowHandle> = self.subclassed[index]
            .iter()
            .filter(|w| self.references.count(w) > 1)
            .map(|w| w.handle)
            .collect();
        for handle in shared {
            self.notify(handle, message);
        }
    }

    fn eligibility(&self, workspace: &WorkspaceRef, window: &WindowIdentity) -> HookEligibility {
        if !layout_needs_subclassing(workspace.layout_name()) {
            return HookEligibility::Ineligible;
        }
        if self.ignore_list.is_ignored(window) {
            tracing::debug!(
                "Window {} ({}, {:?}) is ignored",
                window.handle,
                window.class_name,
                window.caption
            );
            return HookEligibility::Ineligible;
        }
        self.bitness.eligibility(window.is_64bit_process)
    }

    fn set_index(&self, workspace: &WorkspaceRef) -> Option<usize> {
        let id = workspace.ordinal_id() as usize;
        if id == 0 || id > self.subclassed.len() {
            tracing::debug!("Ignoring stale workspace reference {}", id);
            return None;
        }
        Some(id - 1)
    }

    fn notify(&self, window: WindowHandle, message: WindowProcMessage) {
        let Some(messages) = self.messages else {
            tracing::debug!("Window proc messages not registered, skipping {:?}", message);
            return;
        };
        let (id, name) = match message {
            WindowProcMessage::Start => (messages.start, START_WINDOW_PROC),
            WindowProcMessage::Stop => (messages.stop, STOP_WINDOW_PROC),
        };
        tracing::debug!("Sending {} to window {}", name, window);
        if let Err(e) = self.platform.send_notify_message(window, id) {
            tracing::debug!("{}", e);
        }
    }

    fn failure(&self, window: WindowHandle, op: HookOp, error: HookError) -> HookFailure {
        tracing::warn!("Failed to {} window {}: {}", op, window, error);
        HookFailure { window, op, error }
    }

    #[cfg(test)]
    pub fn workspace_count(&self) -> usize {
        self.subclassed.len()
    }

    /// Occurrences of `window` in the set of workspace `id`.
    pub fn occurrence_count(&self, id: WorkspaceId, window: &WindowIdentity) -> usize {
        (id as usize)
            .checked_sub(1)
            .and_then(|index| self.subclassed.get(index))
            .map_or(0, |set| set.count(window))
    }

    /// Number of workspace sets that contain `window`.
    #[cfg(test)]
    pub fn membership(&self, window: &WindowIdentity) -> usize {
        self.memberships.count(window)
    }

    /// Number of workspaces holding `window`, whatever their layout.
    #[cfg(test)]
    pub fn references(&self, window: &WindowIdentity) -> usize {
        self.references.count(window)
    }

    pub fn is_subclassed(&self, window: &WindowIdentity) -> bool {
        self.memberships.contains(window)
    }

    pub fn subclassed_count(&self) -> usize {
        self.memberships.len()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }
}

impl<P: HookService> Drop for SubclassingCoordinator<P> {
    fn drop(&mut self) {
        if self.phase == Phase::Running {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IgnoreRuleConfig;
    use crate::platform::mock::MockHookService;

    const W: WindowHandle = WindowHandle(0x100);

    fn coordinator_with(
        platform: MockHookService,
        bitness: SystemBitness,
        workspaces: usize,
    ) -> SubclassingCoordinator<MockHookService> {
        let mut coordinator =
            SubclassingCoordinator::new(platform, IgnoreList::default(), bitness, WindowHandle(1));
        coordinator.initialize(workspaces);
        coordinator
    }

    fn setup_coordinator(workspaces: usize) -> SubclassingCoordinator<MockHookService> {
        coordinator_with(MockHookService::new(), SystemBitness::new(false, false), workspaces)
    }

    fn window(handle: WindowHandle) -> WindowIdentity {
        WindowIdentity::new(handle.0, "Notepad", "notes.txt", false)
    }

    fn tile(id: WorkspaceId, displayed: bool) -> WorkspaceRef {
        WorkspaceRef::new(id, "Tile", displayed)
    }

    fn starts(c: &SubclassingCoordinator<MockHookService>, handle: WindowHandle) -> usize {
        c.platform().notifications(handle, START_WINDOW_PROC)
    }

    fn stops(c: &SubclassingCoordinator<MockHookService>, handle: WindowHandle) -> usize {
        c.platform().notifications(handle, STOP_WINDOW_PROC)
    }

    #[test]
    fn test_shared_window_scenario() {
        let mut c = setup_coordinator(2);
        let w = window(W);

        c.on_window_added(&tile(1, true), &w);
        assert_eq!(c.occurrence_count(1, &w), 1);
        assert_eq!(c.platform().subclass_calls(W), 1);
        assert_eq!(starts(&c, W), 1);

        c.on_window_added(&tile(2, false), &w);
        assert_eq!(c.occurrence_count(2, &w), 1);
        assert_eq!(c.platform().subclass_calls(W), 1);
        assert_eq!(starts(&c, W), 1);

        c.on_window_removed(&tile(1, true), &w);
        assert_eq!(c.occurrence_count(1, &w), 0);
        assert_eq!(c.platform().unsubclass_calls(W), 0);
        assert_eq!(stops(&c, W), 1);
        assert!(c.is_subclassed(&w));
    }

    #[test]
    fn test_add_twice_then_remove_twice() {
        let mut c = setup_coordinator(1);
        let w = window(W);
        let ws = tile(1, false);

        c.on_window_added(&ws, &w);
        c.on_window_added(&ws, &w);
        assert_eq!(c.occurrence_count(1, &w), 2);
        assert_eq!(c.platform().subclass_calls(W), 1);

        c.on_window_removed(&ws, &w);
        assert_eq!(c.occurrence_count(1, &w), 1);
        assert_eq!(c.platform().unsubclass_calls(W), 0);

        c.on_window_removed(&ws, &w);
        assert_eq!(c.occurrence_count(1, &w), 0);
        assert_eq!(c.platform().unsubclass_calls(W), 1);
        assert!(!c.is_subclassed(&w));
        assert_eq!(c.subclassed_count(), 0);
    }

    #[test]
    fn test_counts_never_go_negative() {
        let mut c = setup_coordinator(1);
        let w = window(W);
        let ws = tile(1, true);

        c.on_window_removed(&ws, &w);
        c.on_window_added(&ws, &w);
        c.on_window_removed(&ws, &w);
        c.on_window_removed(&ws, &w);
        c.on_window_removed(&ws, &w);

        assert_eq!(c.occurrence_count(1, &w), 0);
        assert_eq!(c.membership(&w), 0);
        assert_eq!(c.platform().unsubclass_calls(W), 1);

        c.on_window_added(&ws, &w);
        assert_eq!(c.occurrence_count(1, &w), 1);
        assert_eq!(c.platform().subclass_calls(W), 2);
    }

    #[test]
    fn test_remove_from_one_of_two_workspaces_sends_stop() {
        let mut c = setup_coordinator(3);
        let w = window(W);

        c.on_window_added(&tile(1, true), &w);
        c.on_window_added(&tile(3, false), &w);
        assert_eq!(c.membership(&w), 2);

        c.on_window_removed(&tile(3, false), &w);
        assert_eq!(c.membership(&w), 1);
        assert_eq!(c.platform().unsubclass_calls(W), 0);
        assert_eq!(stops(&c, W), 1);

        c.on_window_removed(&tile(1, true), &w);
        assert_eq!(c.platform().unsubclass_calls(W), 1);
        assert_eq!(stops(&c, W), 1);
    }

    #[test]
    fn test_switch_notifies_only_shared_windows() {
        let mut c = setup_coordinator(2);
        let shared = window(WindowHandle(0x10));
        let only_a = window(WindowHandle(0x20));
        let only_b = window(WindowHandle(0x30));

        c.on_window_added(&tile(1, true), &shared);
        c.on_window_added(&tile(1, true), &only_a);
        c.on_window_added(&tile(2, false), &shared);
        c.on_window_added(&tile(2, false), &only_b);
        c.platform().clear();

        c.on_workspace_deactivated(&tile(1, false));
        c.on_workspace_activated(&tile(2, true));

        assert_eq!(stops(&c, shared.handle), 1);
        assert_eq!(starts(&c, shared.handle), 1);
        assert_eq!(c.platform().calls().len(), 2);
    }

    #[test]
    fn test_window_shared_with_floating_workspace_is_stopped_on_switch() {
        let mut c = setup_coordinator(2);
        let w = window(W);
        let floating = |displayed| WorkspaceRef::new(2, "Floating", displayed);

        c.on_window_added(&tile(1, true), &w);
        c.on_window_added(&floating(false), &w);
        assert_eq!(c.membership(&w), 1);
        assert_eq!(c.references(&w), 2);
        c.platform().clear();

        c.on_workspace_deactivated(&tile(1, false));
        c.on_workspace_activated(&floating(true));
        assert_eq!(stops(&c, W), 1);
        assert_eq!(starts(&c, W), 0);

        c.on_workspace_deactivated(&floating(false));
        c.on_workspace_activated(&tile(1, true));
        assert_eq!(starts(&c, W), 1);

        // Back to a single workspace: switches leave it alone
        c.on_window_removed(&floating(false), &w);
        assert_eq!(c.references(&w), 1);
        c.platform().clear();
        c.on_workspace_deactivated(&tile(1, false));
        c.on_workspace_activated(&tile(1, true));
        assert!(c.platform().calls().is_empty());
        assert!(c.is_subclassed(&w));
    }

    #[test]
    fn test_layout_change_to_floating_empties_set() {
        let mut c = setup_coordinator(2);
        let shared = window(WindowHandle(0x10));
        let unique = window(WindowHandle(0x20));

        c.on_window_added(&tile(1, true), &shared);
        c.on_window_added(&tile(1, true), &unique);
        c.on_window_added(&tile(1, true), &unique);
        c.on_window_added(&tile(2, false), &shared);
        c.platform().clear();

        let failures = c.on_layout_changed(&WorkspaceRef::new(1, "Floating", true), "Tile");
        assert!(failures.is_empty());

        assert_eq!(c.occurrence_count(1, &shared), 0);
        assert_eq!(c.occurrence_count(1, &unique), 0);
        assert_eq!(c.platform().unsubclass_calls(unique.handle), 1);
        assert_eq!(stops(&c, unique.handle), 0);
        assert_eq!(c.platform().unsubclass_calls(shared.handle), 0);
        assert_eq!(stops(&c, shared.handle), 1);
        assert_eq!(c.occurrence_count(2, &shared), 1);
    }

    #[test]
    fn test_layout_change_between_tiling_layouts_keeps_windows() {
        let mut c = setup_coordinator(1);
        let w = window(W);

        c.on_window_added(&tile(1, true), &w);
        c.on_layout_changed(&WorkspaceRef::new(1, "Full Screen", true), "Tile");

        assert_eq!(c.occurrence_count(1, &w), 1);
        assert_eq!(c.platform().unsubclass_calls(W), 0);
    }

    #[test]
    fn test_floating_workspace_is_not_eligible() {
        let mut c = setup_coordinator(1);
        let w = window(W);

        c.on_window_added(&WorkspaceRef::new(1, "Floating", true), &w);
        assert_eq!(c.occurrence_count(1, &w), 0);
        assert!(c.platform().calls().is_empty());
    }

    #[test]
    fn test_ignored_windows_never_enter_a_set() {
        let ignore = IgnoreList::from_config(&[IgnoreRuleConfig {
            class_name: "^Notepad$".to_string(),
            caption: "secret".to_string(),
        }])
        .unwrap();
        let mut c = SubclassingCoordinator::new(
            MockHookService::new(),
            ignore,
            SystemBitness::new(false, false),
            WindowHandle(1),
        );
        c.initialize(2);

        let secret = WindowIdentity::new(0x10, "Notepad", "secret.txt", false);
        c.on_window_added(&tile(1, true), &secret);
        c.on_window_added(&tile(2, false), &secret);
        c.on_window_removed(&tile(1, true), &secret);

        assert_eq!(c.membership(&secret), 0);
        assert!(c.platform().calls().is_empty());
    }

    #[test]
    fn test_cross_bitness_window_is_never_subclassed() {
        let mut c = coordinator_with(MockHookService::new(), SystemBitness::new(false, true), 1);
        let w = WindowIdentity::new(W.0, "Chrome_WidgetWin_1", "Chrome", true);

        c.on_window_added(&tile(1, true), &w);
        assert!(!c.is_subclassed(&w));
        assert!(c.platform().calls().is_empty());
    }

    #[test]
    fn test_selects_64bit_hook_path() {
        let mut c = coordinator_with(MockHookService::new(), SystemBitness::new(true, true), 1);
        let w = WindowIdentity::new(W.0, "Notepad", "a.txt", true);

        c.on_window_added(&tile(1, false), &w);
        assert_eq!(
            c.platform().calls(),
            vec![crate::platform::HookCall::Subclass {
                window: W,
                use_64bit_path: true
            }]
        );
    }

    #[test]
    fn test_subclass_failure_is_reported_and_counted() {
        let platform = MockHookService::new().with_failing(W);
        let mut c = coordinator_with(platform, SystemBitness::new(false, false), 1);
        let w = window(W);

        let failures = c.on_window_added(&tile(1, true), &w);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].window, W);
        assert_eq!(failures[0].op, HookOp::Subclass);
        assert_eq!(failures[0].error, HookError::SubclassFailed(W));
        assert_eq!(c.occurrence_count(1, &w), 1);
        assert_eq!(starts(&c, W), 1);

        let failures = c.on_window_removed(&tile(1, true), &w);
        assert_eq!(failures[0].op, HookOp::Unsubclass);
        assert_eq!(c.occurrence_count(1, &w), 0);
        assert_eq!(c.platform().subclass_calls(W), 1);
    }

    #[test]
    fn test_stale_workspace_references_are_absorbed() {
        let mut c = setup_coordinator(2);
        let w = window(W);

        c.on_window_added(&tile(0, true), &w);
        c.on_window_added(&tile(3, true), &w);
        c.on_window_removed(&tile(7, false), &w);
        c.on_workspace_activated(&tile(9, true));
        c.on_layout_changed(&WorkspaceRef::new(5, "Floating", true), "Tile");

        assert_eq!(c.membership(&w), 0);
        assert_eq!(c.occurrence_count(0, &w), 0);
        assert!(c.platform().calls().is_empty());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut c = setup_coordinator(2);
        let w = window(W);
        c.on_window_added(&tile(2, false), &w);

        c.initialize(5);
        assert_eq!(c.workspace_count(), 2);
        assert_eq!(*c.platform().registrations.borrow(), 2);
        assert_eq!(c.occurrence_count(2, &w), 1);
    }

    #[test]
    fn test_shutdown_unsubclasses_each_window_once() {
        let mut c = setup_coordinator(3);
        let shared = window(WindowHandle(0x10));
        let unique = window(WindowHandle(0x20));

        c.on_window_added(&tile(1, true), &shared);
        c.on_window_added(&tile(2, false), &shared);
        c.on_window_added(&tile(3, false), &unique);
        c.on_window_added(&tile(3, false), &unique);
        c.platform().clear();

        assert!(c.shutdown().is_empty());
        assert_eq!(c.platform().unsubclass_calls(shared.handle), 1);
        assert_eq!(c.platform().unsubclass_calls(unique.handle), 1);
        assert_eq!(c.platform().calls().len(), 2);
        assert_eq!(c.subclassed_count(), 0);

        assert!(c.shutdown().is_empty());
        assert_eq!(c.platform().calls().len(), 2);
    }

    #[test]
    fn test_events_outside_running_phase_are_ignored() {
        let mut c = SubclassingCoordinator::new(
            MockHookService::new(),
            IgnoreList::default(),
            SystemBitness::new(false, false),
            WindowHandle(1),
        );
        let event = LifecycleEvent::WindowAdded {
            workspace: tile(1, true),
            window: window(W),
        };

        assert!(c.handle_event(&event).is_empty());
        assert!(c.platform().calls().is_empty());

        c.initialize(1);
        c.handle_event(&event);
        assert_eq!(c.platform().subclass_calls(W), 1);

        c.shutdown();
        c.platform().clear();
        c.handle_event(&event);
        c.initialize(1);
        c.handle_event(&event);
        assert!(c.platform().calls().is_empty());
    }

    #[test]
    fn test_handle_event_dispatches_layout_change() {
        let mut c = setup_coordinator(1);
        let w = window(W);
        c.handle_event(&LifecycleEvent::WindowAdded {
            workspace: tile(1, true),
            window: w.clone(),
        });
        c.handle_event(&LifecycleEvent::LayoutChanged {
            workspace: WorkspaceRef::new(1, "Floating", true),
            previous_layout: "Tile".to_string(),
        });

        assert!(!c.is_subclassed(&w));
        assert_eq!(c.platform().unsubclass_calls(W), 1);
    }
}
