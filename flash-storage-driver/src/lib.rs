//! Asynchronous flash storage driver trait.
//!
//! This crate describes the contract of an interrupt-driven flash driver in
//! the style of the nRF5 SDK `fstorage` module:
//!
//! - `read` completes synchronously (or leaves the driver transiently busy)
//!   and never raises a completion event.
//! - `write` and `erase` are always asynchronous. The driver accepts the
//!   request, stays busy while the peripheral works, and reports the outcome
//!   exactly once through the [`EventHandler`] registered at [`FlashDriver::init`].
//!
//! Status codes follow the nRF SDK numbering so that codes surfaced to higher
//! layers stay recognisable.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

use core::fmt;
use core::num::NonZeroU32;

/// Non-success status returned by a flash driver.
///
/// Success is represented by `Ok(())`, so the wrapped code is never zero.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverError(NonZeroU32);

impl DriverError {
    /// Internal driver error.
    pub const INTERNAL: Self = Self::from_const(3);
    /// Not enough resources (e.g. the operation queue is full).
    pub const NO_MEM: Self = Self::from_const(4);
    /// Invalid parameter.
    pub const INVALID_PARAM: Self = Self::from_const(7);
    /// The driver is in the wrong state for the request (e.g. not initialised).
    pub const INVALID_STATE: Self = Self::from_const(8);
    /// Invalid length.
    pub const INVALID_LENGTH: Self = Self::from_const(9);
    /// A required pointer or handle was missing.
    pub const NULL: Self = Self::from_const(14);
    /// Address outside the configured region, or misaligned.
    pub const INVALID_ADDR: Self = Self::from_const(16);
    /// Another operation is still in progress.
    pub const BUSY: Self = Self::from_const(17);

    const fn from_const(code: u32) -> Self {
        match NonZeroU32::new(code) {
            Some(code) => Self(code),
            None => panic!("driver error code must be non-zero"),
        }
    }

    /// Wrap a raw status code. Returns `None` for the success code (0).
    #[inline]
    pub const fn new(code: u32) -> Option<Self> {
        match NonZeroU32::new(code) {
            Some(code) => Some(Self(code)),
            None => None,
        }
    }

    /// The raw status code.
    #[inline]
    pub const fn code(self) -> u32 {
        self.0.get()
    }

    /// Convert a raw status code into a driver result (0 is success).
    #[inline]
    pub const fn check(code: u32) -> Result<(), Self> {
        match Self::new(code) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code() {
            3 => "internal error",
            4 => "no memory",
            7 => "invalid parameter",
            8 => "invalid state",
            9 => "invalid length",
            14 => "null handle",
            16 => "invalid address",
            17 => "busy",
            code => return write!(f, "driver error {}", code),
        };
        write!(f, "driver error {} ({})", self.code(), name)
    }
}

impl core::error::Error for DriverError {}

/// Contiguous physical address range `[start, end]` (inclusive) owned by a
/// driver instance.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlashRegion {
    start: u32,
    end: u32,
}

impl FlashRegion {
    /// Create a region from its first and last byte address.
    ///
    /// # Panics
    /// Panics if `end < start`. In a `const` context this is a compile error.
    pub const fn new(start: u32, end: u32) -> Self {
        assert!(start <= end, "flash region end must not precede its start");
        Self { start, end }
    }

    /// First byte address of the region.
    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Last byte address of the region (inclusive).
    #[inline]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// `end - start`, the largest valid offset into the region.
    #[inline]
    pub const fn span(&self) -> u32 {
        self.end - self.start
    }

    /// Size of the region in bytes, saturating at `u32::MAX`.
    #[inline]
    pub const fn size(&self) -> u32 {
        self.span().saturating_add(1)
    }

    /// Whether `addr` lies inside the region.
    #[inline]
    pub const fn contains(&self, addr: u32) -> bool {
        addr >= self.start && addr <= self.end
    }

    /// Whether the `len` bytes starting at `addr` all lie inside the region.
    pub const fn contains_range(&self, addr: u32, len: u32) -> bool {
        if len == 0 {
            return self.contains(addr);
        }
        match addr.checked_add(len - 1) {
            Some(last) => self.contains(addr) && last <= self.end,
            None => false,
        }
    }
}

impl fmt::Display for FlashRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {:#x}]", self.start, self.end)
    }
}

/// The asynchronous operation a completion event refers to.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A `write` request finished.
    Write,
    /// An `erase` request finished.
    Erase,
}

/// Completion event raised once per accepted `write` or `erase` request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashEvent {
    /// Which request completed.
    pub kind: EventKind,
    /// Physical address the request targeted.
    pub addr: u32,
    /// Outcome of the request.
    pub result: Result<(), DriverError>,
}

/// Receiver of completion events.
///
/// Drivers may call [`EventHandler::on_event`] from interrupt context, so
/// implementations must be `Sync` and must not block.
pub trait EventHandler: Sync {
    /// Called exactly once per accepted asynchronous request.
    fn on_event(&self, event: &FlashEvent);
}

/// Interrupt-driven flash driver.
///
/// `'d` is the lifetime of the event handler registered at [`init`](Self::init).
pub trait FlashDriver<'d> {
    /// Erase granularity in bytes (one physical page).
    const ERASE_UNIT: u32;
    /// Program granularity in bytes.
    const PROGRAM_UNIT: u32;

    /// Bind the driver to `region` and register the completion handler.
    ///
    /// Fails with the driver's own status, e.g. when called twice.
    fn init(&mut self, region: FlashRegion, handler: &'d dyn EventHandler)
        -> Result<(), DriverError>;

    /// Read `buf.len()` bytes starting at `addr`.
    ///
    /// Never raises a completion event; the driver may stay busy until the
    /// copy is done.
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), DriverError>;

    /// Queue a program of `data` at `addr`.
    ///
    /// `Ok` means the request was accepted; the outcome arrives later as a
    /// [`FlashEvent`] of kind [`EventKind::Write`].
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), DriverError>;

    /// Queue an erase of `page_count` pages starting at `addr`.
    fn erase(&mut self, addr: u32, page_count: u32) -> Result<(), DriverError>;

    /// Whether the peripheral is still working on a request.
    fn is_busy(&self) -> bool;
}
