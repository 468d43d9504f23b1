//! Run/terminate state machine and ownership of GPU resources.

mod release;
mod state;

pub use release::Release;
pub use state::{Lifecycle, LifecycleState, TerminationSignals};
