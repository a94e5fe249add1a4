//! BlockOps port - the four storage primitives the filesystem core drives.

use crate::domain::error::LfsError;
use crate::domain::fs_config::FsConfig;

/// Port for block-level storage primitives.
///
/// This is the **primary (driving) port** of the adapter: the filesystem
/// core calls it through the operation slot of its [`FsConfig`]. Every call
/// returns only after the operation has fully completed.
///
/// # Hexagonal Architecture
///
/// ```text
/// ┌─────────────────────┐
/// │  Filesystem core    │
/// └──────────┬──────────┘
///            │ calls through FsConfig
///            ▼
/// ┌─────────────────────┐
/// │   BlockOps Port     │  ◄── This trait
/// └──────────┬──────────┘
///            │ implemented by
///            ▼
/// ┌─────────────────────┐
/// │  FlashAdapter       │
/// └─────────────────────┘
/// ```
///
/// Implementations take `&self`: the filesystem holds the port through a
/// shared reference and never issues overlapping calls.
pub trait BlockOps {
    /// Read `buffer.len()` bytes from `block` starting at byte `off`.
    fn read(&self, config: &FsConfig<'_>, block: u32, off: u32, buffer: &mut [u8])
        -> Result<(), LfsError>;

    /// Program `buffer` into `block` starting at byte `off`.
    ///
    /// The target range must have been erased.
    fn prog(&self, config: &FsConfig<'_>, block: u32, off: u32, buffer: &[u8])
        -> Result<(), LfsError>;

    /// Erase `block`, leaving it in the erased state.
    fn erase(&self, config: &FsConfig<'_>, block: u32) -> Result<(), LfsError>;

    /// Make all previous programs durable.
    fn sync(&self, config: &FsConfig<'_>) -> Result<(), LfsError>;
}
