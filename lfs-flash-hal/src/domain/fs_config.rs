//! Filesystem configuration with its block operation slot.

use core::fmt;

use super::error::{ConfigError, LfsError};
use super::ports::BlockOps;
use super::value_objects::FlashRegion;

/// Geometry and storage hooks the filesystem core runs against.
///
/// Mirrors the littlefs `lfs_config`: the size fields are read by the
/// filesystem and by block operations, while the `ops` slot is populated by a
/// storage adapter during its initialisation.
pub struct FsConfig<'a> {
    /// Minimum read size in bytes.
    pub read_size: u32,
    /// Minimum program size in bytes.
    pub prog_size: u32,
    /// Size of an erasable block in bytes.
    pub block_size: u32,
    /// Number of erasable blocks.
    pub block_count: u32,
    /// Size of the read/program caches in bytes.
    pub cache_size: u32,
    /// Size of the block allocator lookahead buffer in bytes.
    pub lookahead_size: u32,
    /// Erase cycles before metadata is relocated; `-1` disables wear-leveling.
    pub block_cycles: i32,
    ops: Option<&'a dyn BlockOps>,
}

impl<'a> FsConfig<'a> {
    /// Word-sized reads and programs, as required by NOR flash controllers.
    pub const DEFAULT_IO_SIZE: u32 = 4;
    /// Default cache size.
    pub const DEFAULT_CACHE_SIZE: u32 = 64;
    /// Default lookahead size.
    pub const DEFAULT_LOOKAHEAD_SIZE: u32 = 16;
    /// Default erase cycles per metadata block.
    pub const DEFAULT_BLOCK_CYCLES: i32 = 500;

    /// Configuration with `block_count` blocks of `block_size` bytes and
    /// default I/O, cache and lookahead sizes. No operations are installed.
    pub const fn new(block_size: u32, block_count: u32) -> Self {
        Self {
            read_size: Self::DEFAULT_IO_SIZE,
            prog_size: Self::DEFAULT_IO_SIZE,
            block_size,
            block_count,
            cache_size: Self::DEFAULT_CACHE_SIZE,
            lookahead_size: Self::DEFAULT_LOOKAHEAD_SIZE,
            block_cycles: Self::DEFAULT_BLOCK_CYCLES,
            ops: None,
        }
    }

    /// Configuration covering as many whole blocks as fit in `region`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lfs_flash_hal::domain::{FlashRegion, FsConfig};
    ///
    /// let config = FsConfig::for_region(&FlashRegion::new(0x3e000, 0x3ffff), 4096);
    /// assert_eq!(config.block_count, 2);
    /// ```
    pub const fn for_region(region: &FlashRegion, block_size: u32) -> Self {
        let block_count = if block_size == 0 {
            0
        } else {
            region.size() / block_size
        };
        Self::new(block_size, block_count)
    }

    /// Check the geometry rules littlefs asserts at mount time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("read_size", self.read_size),
            ("prog_size", self.prog_size),
            ("block_size", self.block_size),
            ("block_count", self.block_count),
            ("cache_size", self.cache_size),
            ("lookahead_size", self.lookahead_size),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }

        for unit in [self.read_size, self.prog_size] {
            if self.cache_size % unit != 0 {
                return Err(ConfigError::CacheNotMultiple {
                    cache_size: self.cache_size,
                    unit,
                });
            }
        }
        if self.block_size % self.cache_size != 0 {
            return Err(ConfigError::BlockNotMultiple {
                block_size: self.block_size,
                cache_size: self.cache_size,
            });
        }
        if self.lookahead_size % 8 != 0 {
            return Err(ConfigError::LookaheadNotMultiple(self.lookahead_size));
        }
        Ok(())
    }

    /// Install the block operations the filesystem will call.
    pub fn set_ops(&mut self, ops: &'a dyn BlockOps) {
        self.ops = Some(ops);
    }

    /// Whether block operations have been installed.
    pub fn has_ops(&self) -> bool {
        self.ops.is_some()
    }

    fn ops(&self) -> Result<&'a dyn BlockOps, LfsError> {
        self.ops.ok_or(LfsError::INVAL)
    }

    /// Read `buffer.len()` bytes from `block` at `off`.
    pub fn read(&self, block: u32, off: u32, buffer: &mut [u8]) -> Result<(), LfsError> {
        self.ops()?.read(self, block, off, buffer)
    }

    /// Program `buffer` into `block` at `off`. The block must be erased.
    pub fn prog(&self, block: u32, off: u32, buffer: &[u8]) -> Result<(), LfsError> {
        self.ops()?.prog(self, block, off, buffer)
    }

    /// Erase `block`.
    pub fn erase(&self, block: u32) -> Result<(), LfsError> {
        self.ops()?.erase(self, block)
    }

    /// Flush pending writes.
    pub fn sync(&self) -> Result<(), LfsError> {
        self.ops()?.sync(self)
    }
}

impl fmt::Debug for FsConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsConfig")
            .field("read_size", &self.read_size)
            .field("prog_size", &self.prog_size)
            .field("block_size", &self.block_size)
            .field("block_count", &self.block_count)
            .field("cache_size", &self.cache_size)
            .field("lookahead_size", &self.lookahead_size)
            .field("block_cycles", &self.block_cycles)
            .field("ops", &self.ops.is_some())
            .finish()
    }
}
