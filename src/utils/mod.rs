//! Utility functions and helpers for gemsight.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and API key scrubbing.
//! - `html`: Minimal escaping for server-rendered markup.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod html;
pub mod logging;
