//! littlefs block operations on top of an asynchronous flash driver.
//!
//! # Example
//!
//! ```ignore
//! use lfs_flash_hal::{CompletionLatch, FlashAdapter, FsConfig, DEFAULT_REGION};
//!
//! static LATCH: CompletionLatch = CompletionLatch::new();
//!
//! let adapter = FlashAdapter::new(fstorage, &LATCH);
//! let mut config = FsConfig::for_region(&DEFAULT_REGION, 4096);
//! let feed = || wdt.feed();
//! adapter.init(Some(&mut config), Some(&feed))?;
//!
//! // The filesystem core now drives the flash through `config`.
//! config.prog(1, 10, &data)?;
//! ```

use core::cell::{RefCell, RefMut};

use flash_storage_driver::{DriverError, FlashDriver};

use crate::domain::{
    translate, translate_address, BlockOps, FlashRegion, FsConfig, LfsError, DEFAULT_REGION,
    PAGES_PER_BLOCK,
};
use crate::infrastructure::{CompletionLatch, SyncBridge, Watchdog};

/// Exposes a flash driver as littlefs block operations.
///
/// Every operation blocks until the driver has fully completed it. Writes
/// and erases wait for the driver's completion event through the
/// [`CompletionLatch`] passed at construction; the latch must not be shared
/// with another adapter.
///
/// Operations must not overlap. The driver is borrowed for the whole
/// request-and-wait sequence, and an operation started while another is in
/// flight (for example from the watchdog hook) panics.
pub struct FlashAdapter<'d, D> {
    driver: RefCell<D>,
    region: FlashRegion,
    bridge: SyncBridge<'d>,
}

impl<'d, D: FlashDriver<'d>> FlashAdapter<'d, D> {
    /// Adapter over the build-time [`DEFAULT_REGION`].
    pub fn new(driver: D, latch: &'d CompletionLatch) -> Self {
        Self::with_region(driver, DEFAULT_REGION, latch)
    }

    /// Adapter over `region`.
    pub fn with_region(driver: D, region: FlashRegion, latch: &'d CompletionLatch) -> Self {
        Self {
            driver: RefCell::new(driver),
            region,
            bridge: SyncBridge::new(latch),
        }
    }

    /// Initialise the driver and install this adapter's operations in `config`.
    ///
    /// `feed` is invoked on every busy-wait iteration from now on.
    ///
    /// # Errors
    ///
    /// - [`DriverError::INVALID_PARAM`] if `config` is `None`; the driver is
    ///   not touched.
    /// - The driver's own status, untranslated, if its initialisation fails.
    pub fn init<'a>(
        &'a self,
        config: Option<&mut FsConfig<'a>>,
        feed: Option<&'d dyn Fn()>,
    ) -> Result<(), DriverError>
    where
        'd: 'a,
        D: 'a,
    {
        let Some(config) = config else {
            return Err(DriverError::INVALID_PARAM);
        };

        self.bridge.set_watchdog(Watchdog::from(feed));
        self.lock_driver().init(self.region, self.bridge.latch())?;
        config.set_ops(self);

        debug!(
            "flash adapter ready: region {:#x}..={:#x}, watchdog {}",
            self.region.start(),
            self.region.end(),
            feed.is_some()
        );
        Ok(())
    }

    /// The physical region the adapter addresses.
    pub fn region(&self) -> FlashRegion {
        self.region
    }

    /// The latch the driver signals on completion.
    pub fn latch(&self) -> &'d CompletionLatch {
        self.bridge.latch()
    }

    /// Consume the adapter and return the underlying driver.
    pub fn into_inner(self) -> D {
        self.driver.into_inner()
    }

    /// Blocking read at an absolute address.
    pub fn read_at(&self, addr: u32, buf: &mut [u8]) -> Result<(), LfsError> {
        trace!("read {} bytes at {:#x}", buf.len(), addr);
        let mut driver = self.lock_driver();
        let result = self.bridge.read(&mut *driver, addr, buf);
        Self::translated(result, "read", addr)
    }

    /// Blocking program at an absolute address.
    pub fn program_at(&self, addr: u32, data: &[u8]) -> Result<(), LfsError> {
        trace!("program {} bytes at {:#x}", data.len(), addr);
        let mut driver = self.lock_driver();
        let result = self.bridge.write(&mut *driver, addr, data);
        Self::translated(result, "program", addr)
    }

    /// Blocking erase of `page_count` physical pages at an absolute address.
    pub fn erase_at(&self, addr: u32, page_count: u32) -> Result<(), LfsError> {
        trace!("erase {} pages at {:#x}", page_count, addr);
        let mut driver = self.lock_driver();
        let result = self.bridge.erase(&mut *driver, addr, page_count);
        Self::translated(result, "erase", addr)
    }

    fn lock_driver(&self) -> RefMut<'_, D> {
        match self.driver.try_borrow_mut() {
            Ok(driver) => driver,
            Err(_) => panic!("flash operation started while another one is still in flight"),
        }
    }

    fn translated(result: Result<(), DriverError>, op: &'static str, addr: u32) -> Result<(), LfsError> {
        if let Err(err) = result {
            debug!("{} at {:#x} failed with driver status {}", op, addr, err.code());
        }
        translate(result)
    }
}

impl<'d, D: FlashDriver<'d>> BlockOps for FlashAdapter<'d, D> {
    fn read(&self, config: &FsConfig<'_>, block: u32, off: u32, buffer: &mut [u8]) -> Result<(), LfsError> {
        let addr = translate_address(&self.region, block, config.block_size, off);
        self.read_at(addr, buffer)
    }

    fn prog(&self, config: &FsConfig<'_>, block: u32, off: u32, buffer: &[u8]) -> Result<(), LfsError> {
        let addr = translate_address(&self.region, block, config.block_size, off);
        self.program_at(addr, buffer)
    }

    fn erase(&self, config: &FsConfig<'_>, block: u32) -> Result<(), LfsError> {
        let addr = translate_address(&self.region, block, config.block_size, 0);
        self.erase_at(addr, PAGES_PER_BLOCK)
    }

    fn sync(&self, _config: &FsConfig<'_>) -> Result<(), LfsError> {
        // Programs and erases are durable once their completion event arrives.
        Ok(())
    }
}
