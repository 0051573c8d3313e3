mod config;
mod ignore;
mod multiset;
mod state;
mod window;
mod workspace;

pub use config::*;
pub use ignore::*;
pub use multiset::*;
pub use state::*;
pub use window::*;
pub use workspace::*;
