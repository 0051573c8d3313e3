use std::fmt;
use std::hash::{Hash, Hasher};

use shoji_proto::WindowInfo;

/// Opaque native window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub isize);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A window as seen by the workspaces.
///
/// Identity is the handle alone: class name and caption may change over the
/// window's life, so two snapshots of the same window always compare equal.
#[derive(Debug, Clone)]
pub struct WindowIdentity {
    pub handle: WindowHandle,
    pub class_name: String,
    pub caption: String,
    pub is_64bit_process: bool,
}

impl WindowIdentity {
    pub fn new(
        handle: isize,
        class_name: impl Into<String>,
        caption: impl Into<String>,
        is_64bit_process: bool,
    ) -> Self {
        Self {
            handle: WindowHandle(handle),
            class_name: class_name.into(),
            caption: caption.into(),
            is_64bit_process,
        }
    }
}

impl From<WindowInfo> for WindowIdentity {
    fn from(info: WindowInfo) -> Self {
        Self::new(
            info.handle,
            info.class_name,
            info.caption,
            info.is_64bit_process,
        )
    }
}

impl PartialEq for WindowIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for WindowIdentity {}

impl Hash for WindowIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}
