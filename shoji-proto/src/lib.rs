pub mod command;
pub mod window;

pub use command::Command;
pub use window::WindowInfo;
