//! Filesystem-side errors and the driver status translation.
//!
//! littlefs reports failures as negative `int`s and success as `0`. The
//! flash driver reports failures as positive status codes. Translation is a
//! plain negation, so a driver code stays recognisable after it crosses into
//! the filesystem error domain.

use core::fmt;
use core::num::NonZeroI32;

use flash_storage_driver::DriverError;

/// Status code littlefs uses for success.
pub const LFS_ERR_OK: i32 = 0;

/// Non-zero littlefs error code.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LfsError(NonZeroI32);

impl LfsError {
    /// Error during device operation.
    pub const IO: Self = Self::from_const(-5);
    /// Corrupted.
    pub const CORRUPT: Self = Self::from_const(-84);
    /// No directory entry.
    pub const NOENT: Self = Self::from_const(-2);
    /// Entry already exists.
    pub const EXIST: Self = Self::from_const(-17);
    /// Entry is not a dir.
    pub const NOTDIR: Self = Self::from_const(-20);
    /// Entry is a dir.
    pub const ISDIR: Self = Self::from_const(-21);
    /// Dir is not empty.
    pub const NOTEMPTY: Self = Self::from_const(-39);
    /// Bad file number.
    pub const BADF: Self = Self::from_const(-9);
    /// File too large.
    pub const FBIG: Self = Self::from_const(-27);
    /// Invalid parameter.
    pub const INVAL: Self = Self::from_const(-22);
    /// No space left on device.
    pub const NOSPC: Self = Self::from_const(-28);
    /// No more memory available.
    pub const NOMEM: Self = Self::from_const(-12);
    /// No data/attr available.
    pub const NOATTR: Self = Self::from_const(-61);
    /// File name too long.
    pub const NAMETOOLONG: Self = Self::from_const(-36);

    const fn from_const(code: i32) -> Self {
        match NonZeroI32::new(code) {
            Some(code) => Self(code),
            None => panic!("littlefs error code must be non-zero"),
        }
    }

    /// Wrap a raw littlefs status. Returns `None` for [`LFS_ERR_OK`].
    #[inline]
    pub const fn new(code: i32) -> Option<Self> {
        match NonZeroI32::new(code) {
            Some(code) => Some(Self(code)),
            None => None,
        }
    }

    /// The raw (normally negative) status code.
    #[inline]
    pub const fn code(self) -> i32 {
        self.0.get()
    }

    /// Translate a driver failure: code `E` becomes `-E`.
    ///
    /// The driver code is reinterpreted as `i32` and negated with wrapping,
    /// so every input has a defined output.
    pub const fn from_driver(err: DriverError) -> Self {
        let negated = (err.code() as i32).wrapping_neg();
        // A non-zero code negates to a non-zero code.
        match NonZeroI32::new(negated) {
            Some(code) => Self(code),
            None => Self(NonZeroI32::MIN),
        }
    }
}

impl From<DriverError> for LfsError {
    fn from(err: DriverError) -> Self {
        Self::from_driver(err)
    }
}

impl fmt::Display for LfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code() {
            -5 => "I/O error",
            -84 => "corrupted",
            -2 => "no such entry",
            -17 => "entry exists",
            -20 => "not a directory",
            -21 => "is a directory",
            -39 => "directory not empty",
            -9 => "bad file number",
            -27 => "file too large",
            -22 => "invalid parameter",
            -28 => "no space left",
            -12 => "out of memory",
            -61 => "no attribute",
            -36 => "name too long",
            code => return write!(f, "littlefs error {}", code),
        };
        write!(f, "littlefs error {} ({})", self.code(), name)
    }
}

impl core::error::Error for LfsError {}

/// Map a driver result into the littlefs error domain.
#[inline]
pub fn translate(result: Result<(), DriverError>) -> Result<(), LfsError> {
    result.map_err(LfsError::from_driver)
}

/// Collapse a littlefs result into the C status convention (`0` or negative).
#[inline]
pub fn status(result: Result<(), LfsError>) -> i32 {
    match result {
        Ok(()) => LFS_ERR_OK,
        Err(err) => err.code(),
    }
}

/// Violations of the littlefs geometry rules, see [`FsConfig::validate`].
///
/// [`FsConfig::validate`]: crate::domain::FsConfig::validate
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A size or count that must be positive is zero.
    Zero(&'static str),
    /// `cache_size` is not a multiple of `read_size` or `prog_size`.
    CacheNotMultiple {
        /// The configured cache size.
        cache_size: u32,
        /// The read or program size it must be a multiple of.
        unit: u32,
    },
    /// `block_size` is not a multiple of `cache_size`.
    BlockNotMultiple {
        /// The configured block size.
        block_size: u32,
        /// The configured cache size.
        cache_size: u32,
    },
    /// `lookahead_size` is not a multiple of 8.
    LookaheadNotMultiple(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero(field) => write!(f, "{} must be non-zero", field),
            Self::CacheNotMultiple { cache_size, unit } => write!(
                f,
                "cache_size {} is not a multiple of {}",
                cache_size, unit
            ),
            Self::BlockNotMultiple {
                block_size,
                cache_size,
            } => write!(
                f,
                "block_size {} is not a multiple of cache_size {}",
                block_size, cache_size
            ),
            Self::LookaheadNotMultiple(size) => {
                write!(f, "lookahead_size {} is not a multiple of 8", size)
            }
        }
    }
}

impl core::error::Error for ConfigError {}
