//! Countdown - A state-managed countdown timer with a light/dark theme flag
//! 
//! This library provides the countdown state machine, the background task
//! that ticks it once per second, and an HTTP surface through which a host
//! UI forwards user intents and reads back the timer.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
