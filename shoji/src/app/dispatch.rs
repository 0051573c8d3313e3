use shoji_proto::Command;

use crate::core::{State, WindowHandle, WindowIdentity};

/// Apply a host command to the workspace model.
/// Returns whether the model changed; the resulting lifecycle events are
/// already queued on the state's emitter.
pub fn dispatch_command(state: &mut State, cmd: &Command) -> bool {
    match cmd {
        Command::WindowCreated { window, workspace } => {
            state.window_created(WindowIdentity::from(window.clone()), *workspace)
        }
        Command::WindowDestroyed { handle } => state.window_destroyed(WindowHandle(*handle)),
        Command::SwitchToWorkspace { workspace } => state.switch_to_workspace(*workspace),
        Command::SwitchToPreviousWorkspace => state.switch_to_previous_workspace(),
        Command::MoveWindowToWorkspace { handle, workspace } => {
            state.move_window_to_workspace(WindowHandle(*handle), *workspace)
        }
        Command::AddWindowToWorkspace { handle, workspace } => {
            state.add_window_to_workspace(WindowHandle(*handle), *workspace)
        }
        Command::RemoveWindowFromCurrentWorkspace { handle } => {
            state.remove_window_from_current_workspace(WindowHandle(*handle))
        }
        Command::ChangeLayout { workspace, layout } => state.change_layout(*workspace, layout),
        Command::Quit => {
            tracing::info!("Quit command received");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::event::LifecycleEvent;
    use crate::event_emitter::EventEmitter;
    use shoji_proto::WindowInfo;
    use std::sync::mpsc as std_mpsc;

    fn setup_state() -> (State, std_mpsc::Receiver<LifecycleEvent>) {
        let (tx, rx) = std_mpsc::channel();
        (State::new(&Config::default(), EventEmitter::new(tx)), rx)
    }

    fn created(handle: isize, workspace: Option<u32>) -> Command {
        Command::WindowCreated {
            window: WindowInfo::new(handle, "Notepad", "a.txt", true),
            workspace,
        }
    }

    #[test]
    fn test_dispatch_window_commands() {
        let (mut state, rx) = setup_state();

        assert!(dispatch_command(&mut state, &created(0x10, None)));
        assert!(dispatch_command(&mut state, &created(0x10, Some(4))));
        assert_eq!(state.workspace_count(WindowHandle(0x10)), 2);

        assert!(dispatch_command(
            &mut state,
            &Command::WindowDestroyed { handle: 0x10 }
        ));
        assert_eq!(state.workspace_count(WindowHandle(0x10)), 0);
        assert!(!dispatch_command(
            &mut state,
            &Command::WindowDestroyed { handle: 0x10 }
        ));
        assert_eq!(rx.try_iter().count(), 4);
    }

    #[test]
    fn test_dispatch_workspace_commands() {
        let (mut state, _rx) = setup_state();
        dispatch_command(&mut state, &created(0x10, None));

        assert!(dispatch_command(
            &mut state,
            &Command::AddWindowToWorkspace {
                handle: 0x10,
                workspace: 2
            }
        ));
        assert_eq!(state.current_workspace_id(), 2);

        assert!(dispatch_command(
            &mut state,
            &Command::RemoveWindowFromCurrentWorkspace { handle: 0x10 }
        ));
        assert!(!state.workspaces[1].contains(WindowHandle(0x10)));

        assert!(dispatch_command(&mut state, &Command::SwitchToPreviousWorkspace));
        assert_eq!(state.current_workspace_id(), 1);

        assert!(dispatch_command(
            &mut state,
            &Command::MoveWindowToWorkspace {
                handle: 0x10,
                workspace: 3
            }
        ));
        assert_eq!(state.current_workspace_id(), 3);
        assert!(state.workspaces[2].contains(WindowHandle(0x10)));

        assert!(dispatch_command(
            &mut state,
            &Command::ChangeLayout {
                workspace: None,
                layout: "Floating".to_string()
            }
        ));
        assert_eq!(state.workspaces[2].layout, "Floating");

        assert!(dispatch_command(
            &mut state,
            &Command::SwitchToWorkspace { workspace: 1 }
        ));
        assert!(!dispatch_command(&mut state, &Command::Quit));
    }
}
