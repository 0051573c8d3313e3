use serde::{Deserialize, Serialize};

/// A native window as reported by the window enumeration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub handle: isize,
    pub class_name: String,
    pub caption: String,
    /// Whether the owning process is a 64-bit process.
    pub is_64bit_process: bool,
}

impl WindowInfo {
    pub fn new(
        handle: isize,
        class_name: impl Into<String>,
        caption: impl Into<String>,
        is_64bit_process: bool,
    ) -> Self {
        Self {
            handle,
            class_name: class_name.into(),
            caption: caption.into(),
            is_64bit_process,
        }
    }
}
