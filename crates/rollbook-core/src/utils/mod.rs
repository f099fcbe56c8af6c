//! Utility functions for string formatting and manipulation.

pub mod format;

pub use format::{or_placeholder, truncate_body};
