//! littlefs block device adapter for asynchronous NOR flash drivers.
//!
//! littlefs expects four blocking primitives: read, program, erase and sync.
//! Flash drivers on most microcontrollers are asynchronous instead: a request
//! returns immediately and completion is reported later through an event.
//! This crate sits in between.
//!
//! # Architecture
//!
//! ## Domain Layer (`domain`)
//! Filesystem-facing types:
//! - **`FsConfig`**: geometry plus the slot holding the block operations
//! - **`BlockOps`**: the port the filesystem drives
//! - **`FlashRegion`** and `translate_address`: block/offset to physical address
//! - **`LfsError`**: littlefs status codes and driver status translation
//!
//! ## Adapter Layer (`adapters`)
//! - **`FlashAdapter`**: implements `BlockOps` over a `FlashDriver`
//! - **`NorFlashDriver`**: event-driven driver over an `embedded-storage` flash
//!
//! ## Infrastructure Layer (`infrastructure`)
//! - **`CompletionLatch`**: receives the driver's completion events
//! - **`SyncBridge`**: busy-waits on the driver and the latch, feeding the watchdog
//!
//! # Quick Start
//!
//! ```ignore
//! use lfs_flash_hal::{CompletionLatch, FlashAdapter, FsConfig, DEFAULT_REGION};
//!
//! static LATCH: CompletionLatch = CompletionLatch::new();
//!
//! let adapter = FlashAdapter::new(driver, &LATCH);
//! let mut config = FsConfig::for_region(&DEFAULT_REGION, 4096);
//! adapter.init(Some(&mut config), Some(&|| watchdog.feed()))?;
//! config.validate()?;
//! ```
//!
//! # Region
//!
//! The default region is `[0x3e000, 0x3ffff]`. Override it at build time with
//! the `LFS_FLASH_START_ADDR` and `LFS_FLASH_END_ADDR` environment variables
//! (decimal or `0x` hexadecimal).
//!
//! # Features
//!
//! - `embedded-storage` (default): `NorFlashDriver` and the `NorFlash` view of `FlashAdapter`
//! - `log` (default): trace, debug and warning output through `log`
//! - `defmt`: the same output through `defmt`

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod domain;
pub mod adapters;
pub mod infrastructure;

pub use domain::{
    crc, status, translate, translate_address, BlockOps, ConfigError, FlashRegion, FsConfig,
    LfsError, DEFAULT_REGION, END_ADDR, LFS_ERR_OK, PAGES_PER_BLOCK, START_ADDR,
};

pub use adapters::FlashAdapter;

#[cfg(feature = "embedded-storage")]
pub use adapters::{NorFlashBridgeError, NorFlashDriver};

pub use infrastructure::{Completion, CompletionLatch, SyncBridge, Watchdog};

// Re-export the driver contract so users only need this crate.
pub use flash_storage_driver::{
    DriverError, EventHandler, EventKind, FlashDriver, FlashEvent,
};

#[cfg(feature = "embedded-storage")]
pub use embedded_storage;
