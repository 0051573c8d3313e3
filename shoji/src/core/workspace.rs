use super::{WindowHandle, WorkspaceConfig};

pub const TILE_LAYOUT: &str = "Tile";
pub const FULL_SCREEN_LAYOUT: &str = "Full Screen";

/// Only these layouts need the window message pipeline intercepted.
pub fn layout_needs_subclassing(layout_name: &str) -> bool {
    layout_name == TILE_LAYOUT || layout_name == FULL_SCREEN_LAYOUT
}

pub type WorkspaceId = u32;

#[derive(Debug, Clone)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: Option<String>,
    pub layout: String,
    pub is_current: bool,
    /// Member windows, most recently added first.
    pub windows: Vec<WindowHandle>,
}

impl Workspace {
    pub fn from_config(id: WorkspaceId, config: &WorkspaceConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            layout: config.layout.clone(),
            is_current: false,
            windows: Vec::new(),
        }
    }

    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.windows.contains(&handle)
    }

    pub fn snapshot(&self) -> WorkspaceRef {
        WorkspaceRef::new(self.id, self.layout.clone(), self.is_current)
    }
}

/// Workspace state as it was when a lifecycle event was published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRef {
    pub id: WorkspaceId,
    pub layout: String,
    pub is_current: bool,
}

impl WorkspaceRef {
    pub fn new(id: WorkspaceId, layout: impl Into<String>, is_current: bool) -> Self {
        Self {
            id,
            layout: layout.into(),
            is_current,
        }
    }

    pub fn ordinal_id(&self) -> WorkspaceId {
        self.id
    }

    pub fn layout_name(&self) -> &str {
        &self.layout
    }

    pub fn is_currently_displayed(&self) -> bool {
        self.is_current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_needs_subclassing() {
        assert!(layout_needs_subclassing("Tile"));
        assert!(layout_needs_subclassing("Full Screen"));
        assert!(!layout_needs_subclassing("Floating"));
        assert!(!layout_needs_subclassing("tile"));
        assert!(!layout_needs_subclassing(""));
    }

    #[test]
    fn test_snapshot_copies_layout_and_visibility() {
        let mut ws = Workspace::from_config(
            3,
            &WorkspaceConfig {
                name: Some("chat".to_string()),
                layout: "Floating".to_string(),
            },
        );
        ws.is_current = true;

        let snapshot = ws.snapshot();
        assert_eq!(snapshot.ordinal_id(), 3);
        assert_eq!(snapshot.layout_name(), "Floating");
        assert!(snapshot.is_currently_displayed());

        ws.layout = TILE_LAYOUT.to_string();
        assert_eq!(snapshot.layout_name(), "Floating");
    }
}
