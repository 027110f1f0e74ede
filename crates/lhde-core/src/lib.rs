pub mod config;
pub mod logging;

pub mod deal_engine;
pub mod wait;

pub use deal_engine::{DealEngine, DealError, DealStatus, SubmitReply};
