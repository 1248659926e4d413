//! Core application primitives (HTTP surface, scheduler)

pub mod http;
pub mod scheduler;

pub use http::*;
pub use scheduler::*;
