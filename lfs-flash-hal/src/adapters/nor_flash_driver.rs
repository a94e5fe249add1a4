//! Asynchronous flash driver backed by an `embedded-storage` NOR flash.
//!
//! Gives any blocking [`NorFlash`] implementation the event-driven contract
//! of [`FlashDriver`]: reads complete in place, while writes and erases are
//! applied immediately but reported through a completion event once the
//! simulated busy period has elapsed. Useful for host simulation and for
//! exercising the adapter against real flash semantics (erase-before-write,
//! alignment) without hardware.
//!
//! # Example
//!
//! ```ignore
//! use lfs_flash_hal::{CompletionLatch, FlashAdapter, NorFlashDriver};
//!
//! let latch = CompletionLatch::new();
//! let driver = NorFlashDriver::with_latency(flash, 3);
//! let adapter = FlashAdapter::new(driver, &latch);
//! ```

use core::cell::Cell;

use embedded_storage::nor_flash::{NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash};
use flash_storage_driver::{
    DriverError, EventHandler, EventKind, FlashDriver, FlashEvent, FlashRegion,
};

#[derive(Debug, Clone, Copy)]
struct InFlight {
    event: FlashEvent,
    busy_polls: u32,
}

/// [`FlashDriver`] over a blocking NOR flash.
///
/// Addresses are passed to the flash unchanged, so `F` must cover the whole
/// physical address space the region lives in.
pub struct NorFlashDriver<'d, F> {
    flash: F,
    latency: u32,
    region: Option<FlashRegion>,
    handler: Option<&'d dyn EventHandler>,
    in_flight: Cell<Option<InFlight>>,
}

impl<'d, F: NorFlash> NorFlashDriver<'d, F> {
    /// Driver whose writes and erases report completion on the first busy poll.
    pub fn new(flash: F) -> Self {
        Self::with_latency(flash, 0)
    }

    /// Driver that stays busy for `latency` polls after each write or erase.
    pub fn with_latency(flash: F, latency: u32) -> Self {
        Self {
            flash,
            latency,
            region: None,
            handler: None,
            in_flight: Cell::new(None),
        }
    }

    /// The wrapped flash.
    pub fn flash(&self) -> &F {
        &self.flash
    }

    /// Consume the driver and return the wrapped flash.
    pub fn into_inner(self) -> F {
        self.flash
    }

    fn check_request(&self, addr: u32, len: usize) -> Result<(), DriverError> {
        let region = self.region.ok_or(DriverError::INVALID_STATE)?;
        let len = u32::try_from(len).map_err(|_| DriverError::INVALID_LENGTH)?;
        if len == 0 {
            return Err(DriverError::INVALID_LENGTH);
        }
        if !region.contains_range(addr, len) {
            return Err(DriverError::INVALID_ADDR);
        }
        Ok(())
    }

    fn start(&self, kind: EventKind, addr: u32, result: Result<(), DriverError>) {
        self.in_flight.set(Some(InFlight {
            event: FlashEvent { kind, addr, result },
            busy_polls: self.latency,
        }));
    }

    fn ensure_idle(&self) -> Result<(), DriverError> {
        match self.in_flight.get() {
            Some(_) => Err(DriverError::BUSY),
            None => Ok(()),
        }
    }
}

fn driver_error<E: NorFlashError>(err: E) -> DriverError {
    match err.kind() {
        NorFlashErrorKind::NotAligned | NorFlashErrorKind::OutOfBounds => DriverError::INVALID_ADDR,
        _ => DriverError::INTERNAL,
    }
}

impl<'d, F: NorFlash> FlashDriver<'d> for NorFlashDriver<'d, F> {
    const ERASE_UNIT: u32 = F::ERASE_SIZE as u32;
    const PROGRAM_UNIT: u32 = F::WRITE_SIZE as u32;

    fn init(&mut self, region: FlashRegion, handler: &'d dyn EventHandler) -> Result<(), DriverError> {
        if self.region.is_some() {
            return Err(DriverError::INVALID_STATE);
        }
        self.region = Some(region);
        self.handler = Some(handler);
        Ok(())
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), DriverError> {
        self.check_request(addr, buf.len())?;
        self.flash.read(addr, buf).map_err(driver_error)
    }

    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), DriverError> {
        self.check_request(addr, data.len())?;
        self.ensure_idle()?;
        let result = self.flash.write(addr, data).map_err(driver_error);
        self.start(EventKind::Write, addr, result);
        Ok(())
    }

    fn erase(&mut self, addr: u32, page_count: u32) -> Result<(), DriverError> {
        let len = page_count
            .checked_mul(Self::ERASE_UNIT)
            .ok_or(DriverError::INVALID_LENGTH)?;
        self.check_request(addr, len as usize)?;
        let to = addr.checked_add(len).ok_or(DriverError::INVALID_ADDR)?;
        self.ensure_idle()?;
        let result = self.flash.erase(addr, to).map_err(driver_error);
        self.start(EventKind::Erase, addr, result);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        let Some(op) = self.in_flight.get() else {
            return false;
        };
        if op.busy_polls > 0 {
            self.in_flight.set(Some(InFlight {
                busy_polls: op.busy_polls - 1,
                ..op
            }));
            return true;
        }
        // Busy period over: the peripheral interrupt delivers the event.
        self.in_flight.set(None);
        if let Some(handler) = self.handler {
            handler.on_event(&op.event);
        }
        false
    }
}
