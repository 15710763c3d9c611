//! State module for tracking crawl progress
//!
//! Each configured category page moves through a small state machine while it
//! is fetched, expanded, extracted and written.

mod target_state;

// Re-export main types
pub use target_state::TargetState;
