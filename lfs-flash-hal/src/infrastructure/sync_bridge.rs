//! Blocking execution of asynchronous flash requests.
//!
//! A write or erase completes in two steps: the driver first clears its busy
//! flag, then (possibly later) raises the completion event. The bridge waits
//! for both, in that order. A read only ever needs the first step.
//!
//! ```text
//!   arm latch ──► driver.write() ──► spin while busy ──► spin until latched ──► result
//!                     │ Err                (feed)              (feed)
//!                     └──────────────────────────────────────────────────────► result
//! ```

use core::cell::Cell;
use core::hint::spin_loop;

use flash_storage_driver::{DriverError, FlashDriver};

use super::latch::CompletionLatch;
use super::watchdog::Watchdog;

/// Turns driver requests into blocking calls.
///
/// Holds the completion latch the driver signals and the watchdog hook fed
/// while spinning. One bridge serves one driver; requests through it must not
/// overlap.
#[derive(Debug)]
pub struct SyncBridge<'d> {
    latch: &'d CompletionLatch,
    watchdog: Cell<Watchdog<'d>>,
}

impl<'d> SyncBridge<'d> {
    /// Bridge signalled through `latch`, with no watchdog installed.
    pub const fn new(latch: &'d CompletionLatch) -> Self {
        Self {
            latch,
            watchdog: Cell::new(Watchdog::none()),
        }
    }

    /// The latch the driver must signal.
    pub fn latch(&self) -> &'d CompletionLatch {
        self.latch
    }

    /// Replace the watchdog hook.
    pub fn set_watchdog(&self, watchdog: Watchdog<'d>) {
        self.watchdog.set(watchdog);
    }

    /// The currently installed watchdog hook.
    pub fn watchdog(&self) -> Watchdog<'d> {
        self.watchdog.get()
    }

    /// Spin until `driver` reports idle, feeding the watchdog once per busy
    /// poll. Returns the number of busy polls.
    pub fn wait_idle<D: FlashDriver<'d>>(&self, driver: &D) -> u32 {
        let watchdog = self.watchdog.get();
        let mut polls = 0u32;
        while driver.is_busy() {
            watchdog.feed();
            polls = polls.wrapping_add(1);
            spin_loop();
        }
        polls
    }

    /// Blocking read. The completion latch is not involved.
    pub fn read<D: FlashDriver<'d>>(
        &self,
        driver: &mut D,
        addr: u32,
        buf: &mut [u8],
    ) -> Result<(), DriverError> {
        driver.read(addr, buf)?;
        self.wait_idle(driver);
        Ok(())
    }

    /// Blocking write. Returns the result carried by the completion event.
    pub fn write<D: FlashDriver<'d>>(
        &self,
        driver: &mut D,
        addr: u32,
        data: &[u8],
    ) -> Result<(), DriverError> {
        let completion = self.latch.arm();
        driver.write(addr, data)?;
        self.wait_idle(driver);
        self.finish(completion.wait(&self.watchdog.get()), addr)
    }

    /// Blocking erase of `page_count` pages at `addr`.
    pub fn erase<D: FlashDriver<'d>>(
        &self,
        driver: &mut D,
        addr: u32,
        page_count: u32,
    ) -> Result<(), DriverError> {
        let completion = self.latch.arm();
        driver.erase(addr, page_count)?;
        self.wait_idle(driver);
        self.finish(completion.wait(&self.watchdog.get()), addr)
    }

    fn finish(&self, result: Result<(), DriverError>, addr: u32) -> Result<(), DriverError> {
        if self.latch.take_overrun() {
            warn!("completion overrun at {:#x}: an earlier result was overwritten", addr);
        }
        result
    }
}
