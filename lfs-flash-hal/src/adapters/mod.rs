//! Adapter layer - Connects the filesystem ports to a flash driver.
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer                │
//!     │  - FsConfig                      │
//!     │  - BlockOps (port)               │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ implements
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │  ◄── This module
//!     │  - FlashAdapter                  │
//!     │  - NorFlashDriver                │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ blocks through SyncBridge
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │  Asynchronous flash driver       │
//!     └──────────────────────────────────┘
//! ```
//!
//! # Available Adapters
//!
//! - **`FlashAdapter`**: Implements `BlockOps` over any `FlashDriver`
//! - **`NorFlashDriver`**: A `FlashDriver` over a blocking `NorFlash` (requires `embedded-storage`)
//!
//! With `embedded-storage` enabled, `FlashAdapter` also implements `NorFlash`
//! for its region.

mod flash_adapter;

#[cfg(feature = "embedded-storage")]
mod nor_flash_driver;

#[cfg(feature = "embedded-storage")]
mod nor_flash_view;

pub use flash_adapter::FlashAdapter;

#[cfg(feature = "embedded-storage")]
pub use nor_flash_driver::NorFlashDriver;

#[cfg(feature = "embedded-storage")]
pub use nor_flash_view::NorFlashBridgeError;
