//! State module for tracking pagination progress
//!
//! # Components
//!
//! - `PaginationState`: the fetching/done state machine that drives a run
//! - `StopReason`: why a run reached its terminal state

mod pagination_state;

// Re-export main types
pub use pagination_state::{PaginationState, StopReason};
