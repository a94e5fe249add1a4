//! Single-slot completion latch.
//!
//! The flash driver raises one completion event per write/erase, possibly
//! from interrupt context, while the adapter polls for it from thread
//! context. The latch is the hand-over cell between the two.
//!
//! Only atomic loads and stores are used, so the latch works on cores
//! without compare-and-swap.

use core::fmt;
use core::hint::spin_loop;
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use flash_storage_driver::{DriverError, EventHandler, FlashEvent};

use super::watchdog::Watchdog;

const PENDING: u8 = 0;
const READY: u8 = 1;

/// Holds the outcome of the most recent asynchronous flash request.
///
/// Lifecycle: [`arm`](Self::arm) sets it to pending before a request is
/// issued, the driver's completion event writes it once, and the waiting side
/// consumes the result, which resets it to pending.
pub struct CompletionLatch {
    state: AtomicU8,
    code: AtomicU32,
    overrun: AtomicBool,
}

impl CompletionLatch {
    /// A pending latch.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(PENDING),
            code: AtomicU32::new(0),
            overrun: AtomicBool::new(false),
        }
    }

    /// Reset to pending and hand out the one-shot receiver for the next
    /// completion. Call before issuing the request.
    pub fn arm(&self) -> Completion<'_> {
        self.state.store(PENDING, Ordering::Release);
        Completion { latch: self }
    }

    /// Publish a completion result.
    ///
    /// If the previous result was never consumed it is overwritten and the
    /// overrun flag is raised.
    pub fn signal(&self, result: Result<(), DriverError>) {
        if self.state.load(Ordering::Acquire) == READY {
            self.overrun.store(true, Ordering::Relaxed);
        }
        let code = match result {
            Ok(()) => 0,
            Err(err) => err.code(),
        };
        self.code.store(code, Ordering::Relaxed);
        self.state.store(READY, Ordering::Release);
    }

    /// Consume the result if one has been published, resetting to pending.
    pub fn try_take(&self) -> Option<Result<(), DriverError>> {
        if self.state.load(Ordering::Acquire) != READY {
            return None;
        }
        let code = self.code.load(Ordering::Relaxed);
        self.state.store(PENDING, Ordering::Release);
        Some(DriverError::check(code))
    }

    /// Inspect the published result without consuming it.
    pub fn peek(&self) -> Option<Result<(), DriverError>> {
        if self.state.load(Ordering::Acquire) != READY {
            return None;
        }
        Some(DriverError::check(self.code.load(Ordering::Relaxed)))
    }

    /// Whether no result is waiting to be consumed.
    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) == PENDING
    }

    /// Return and clear the overrun flag.
    pub fn take_overrun(&self) -> bool {
        let overrun = self.overrun.load(Ordering::Relaxed);
        if overrun {
            self.overrun.store(false, Ordering::Relaxed);
        }
        overrun
    }
}

impl Default for CompletionLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CompletionLatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionLatch")
            .field("result", &self.peek())
            .finish()
    }
}

impl EventHandler for CompletionLatch {
    fn on_event(&self, event: &FlashEvent) {
        self.signal(event.result);
    }
}

/// One-shot receiver returned by [`CompletionLatch::arm`].
#[must_use = "a completion must be waited on to reset the latch"]
#[derive(Debug)]
pub struct Completion<'l> {
    latch: &'l CompletionLatch,
}

impl Completion<'_> {
    /// Non-blocking check; consumes the result if it has arrived.
    pub fn poll(&self) -> Option<Result<(), DriverError>> {
        self.latch.try_take()
    }

    /// Spin until the result arrives, feeding `watchdog` once per empty poll.
    ///
    /// There is no timeout: a completion that never arrives hangs the caller
    /// until the external watchdog resets the system.
    pub fn wait(self, watchdog: &Watchdog<'_>) -> Result<(), DriverError> {
        loop {
            if let Some(result) = self.latch.try_take() {
                return result;
            }
            watchdog.feed();
            spin_loop();
        }
    }
}
