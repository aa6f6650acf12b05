//! External process management module
//! 
//! This module contains functions that reach outside the process, such as
//! running the user's finish hook.

pub mod hooks;

// Re-export main functions
pub use hooks::*;
