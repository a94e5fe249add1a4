//! Domain layer - Filesystem-facing types with zero driver dependencies
//! beyond the status and region vocabulary.
//!
//! The domain layer contains:
//! - **Value Objects**: `FlashRegion` and block address translation
//! - **Configuration**: `FsConfig`, the geometry plus the operation slot
//! - **Ports**: `BlockOps`, the four primitives the filesystem drives
//! - **Errors**: `LfsError` and the driver status translation
//! - **Checksum**: the littlefs CRC
//!
//! # Hexagonal Architecture
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer (Core)         │
//!     │                                  │
//!     │  ┌────────────────────────────┐  │
//!     │  │  Value Objects             │  │
//!     │  │  - FlashRegion, addresses  │  │
//!     │  └────────────────────────────┘  │
//!     │              ▲                   │
//!     │              │                   │
//!     │  ┌────────────────────────────┐  │
//!     │  │  FsConfig                  │  │
//!     │  └────────────────────────────┘  │
//!     │              │                   │
//!     │              ▼                   │
//!     │  ┌────────────────────────────┐  │
//!     │  │    Ports (Interfaces)      │  │
//!     │  │    - BlockOps              │  │
//!     │  └────────────────────────────┘  │
//!     └──────────────────────────────────┘
//!                    ▲
//!                    │ implemented by
//!                    │
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │
//!     │  - FlashAdapter                  │
//!     └──────────────────────────────────┘
//! ```

pub mod error;
pub mod ports;
pub mod value_objects;

mod checksum;
mod fs_config;

pub use checksum::crc;
pub use error::{status, translate, ConfigError, LfsError, LFS_ERR_OK};
pub use fs_config::FsConfig;
pub use ports::BlockOps;
pub use value_objects::{
    translate_address, FlashRegion, DEFAULT_REGION, END_ADDR, PAGES_PER_BLOCK, START_ADDR,
};
