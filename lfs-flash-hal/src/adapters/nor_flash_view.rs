//! `embedded-storage` view of the bridged flash region.
//!
//! Lets crates written against [`NorFlash`] use the region through the same
//! blocking bridge as the filesystem. Offsets are relative to the region
//! start.

use core::fmt;

use embedded_storage::nor_flash::{
    check_erase, check_read, check_write, ErrorType, NorFlash, NorFlashError, NorFlashErrorKind,
    ReadNorFlash,
};
use flash_storage_driver::FlashDriver;

use super::flash_adapter::FlashAdapter;
use crate::domain::LfsError;

/// Error returned by the [`NorFlash`] view of a [`FlashAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NorFlashBridgeError {
    /// The request failed the `embedded-storage` argument checks.
    Request(NorFlashErrorKind),
    /// The driver reported a failure.
    Flash(LfsError),
}

impl fmt::Display for NorFlashBridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(kind) => write!(f, "Invalid request: {:?}", kind),
            Self::Flash(err) => write!(f, "Flash error: {}", err),
        }
    }
}

impl core::error::Error for NorFlashBridgeError {}

impl NorFlashError for NorFlashBridgeError {
    fn kind(&self) -> NorFlashErrorKind {
        match self {
            Self::Request(kind) => *kind,
            Self::Flash(_) => NorFlashErrorKind::Other,
        }
    }
}

impl From<NorFlashErrorKind> for NorFlashBridgeError {
    fn from(kind: NorFlashErrorKind) -> Self {
        Self::Request(kind)
    }
}

impl From<LfsError> for NorFlashBridgeError {
    fn from(err: LfsError) -> Self {
        Self::Flash(err)
    }
}

impl<'d, D: FlashDriver<'d>> ErrorType for FlashAdapter<'d, D> {
    type Error = NorFlashBridgeError;
}

impl<'d, D: FlashDriver<'d>> ReadNorFlash for FlashAdapter<'d, D> {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        check_read(&*self, offset, bytes.len())?;
        if bytes.is_empty() {
            return Ok(());
        }
        Ok(self.read_at(self.region().start() + offset, bytes)?)
    }

    fn capacity(&self) -> usize {
        self.region().size() as usize
    }
}

impl<'d, D: FlashDriver<'d>> NorFlash for FlashAdapter<'d, D> {
    const WRITE_SIZE: usize = D::PROGRAM_UNIT as usize;
    const ERASE_SIZE: usize = D::ERASE_UNIT as usize;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        check_erase(&*self, from, to)?;
        let pages = (to - from) / D::ERASE_UNIT;
        if pages == 0 {
            return Ok(());
        }
        Ok(self.erase_at(self.region().start() + from, pages)?)
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        check_write(&*self, offset, bytes.len())?;
        if bytes.is_empty() {
            return Ok(());
        }
        Ok(self.program_at(self.region().start() + offset, bytes)?)
    }
}
