//! CLI command handlers. Each command is in its own file.

mod status;
mod submit;
mod wait;

pub use status::run_status;
pub use submit::run_submit;
pub use wait::run_wait;
