//! Infrastructure layer - The synchronous-over-asynchronous bridge.
//!
//! - **`CompletionLatch`**: single-slot cell the driver's completion event writes
//! - **`Watchdog`**: liveness hook fed on every busy-wait iteration
//! - **`SyncBridge`**: busy-wait loops turning driver requests into blocking calls

mod latch;
mod sync_bridge;
mod watchdog;

pub use latch::{Completion, CompletionLatch};
pub use sync_bridge::SyncBridge;
pub use watchdog::Watchdog;
