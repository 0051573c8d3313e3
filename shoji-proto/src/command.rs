use serde::{Deserialize, Serialize};

use crate::WindowInfo;

/// Commands accepted by the workspace host.
/// Workspace numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // Window lifecycle
    WindowCreated {
        window: WindowInfo,
        /// Defaults to the current workspace.
        #[serde(default)]
        workspace: Option<u32>,
    },
    WindowDestroyed { handle: isize },

    // Workspace operations
    SwitchToWorkspace { workspace: u32 },
    SwitchToPreviousWorkspace,
    MoveWindowToWorkspace { handle: isize, workspace: u32 },
    AddWindowToWorkspace { handle: isize, workspace: u32 },
    RemoveWindowFromCurrentWorkspace { handle: isize },

    // Layout operations
    ChangeLayout {
        /// Defaults to the current workspace.
        #[serde(default)]
        workspace: Option<u32>,
        layout: String,
    },

    // Control
    Quit,
}

impl Command {
    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_switch_to_workspace_serialization() {
        let cmd = Command::SwitchToWorkspace { workspace: 2 };
        let json = cmd.to_json().unwrap();
        assert!(json.contains("\"type\":\"switch_to_workspace\""));
        assert!(json.contains("\"workspace\":2"));

        match Command::from_json(&json).unwrap() {
            Command::SwitchToWorkspace { workspace } => assert_eq!(workspace, 2),
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_command_window_created_defaults_workspace() {
        let json = r#"{"type":"window_created","window":{"handle":10,"class_name":"Notepad","caption":"x","is_64bit_process":false}}"#;
        match Command::from_json(json).unwrap() {
            Command::WindowCreated { window, workspace } => {
                assert_eq!(window.handle, 10);
                assert_eq!(window.class_name, "Notepad");
                assert!(!window.is_64bit_process);
                assert_eq!(workspace, None);
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_command_change_layout_with_workspace() {
        let json = r#"{"type":"change_layout","workspace":3,"layout":"Full Screen"}"#;
        let cmd = Command::from_json(json).unwrap();
        assert_eq!(
            cmd,
            Command::ChangeLayout {
                workspace: Some(3),
                layout: "Full Screen".to_string(),
            }
        );
    }

    #[test]
    fn test_command_unit_variants() {
        assert_eq!(Command::Quit.to_json().unwrap(), "{\"type\":\"quit\"}");
        assert_eq!(
            Command::from_json("{\"type\":\"switch_to_previous_workspace\"}").unwrap(),
            Command::SwitchToPreviousWorkspace
        );
    }

    #[test]
    fn test_command_unknown_type_is_rejected() {
        assert!(Command::from_json("{\"type\":\"fly_away\"}").is_err());
        assert!(Command::from_json("{\"type\":\"window_destroyed\"}").is_err());
    }
}
