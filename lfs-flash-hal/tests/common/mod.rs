//! Shared test driver for the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lfs_flash_hal::{DriverError, EventHandler, EventKind, FlashDriver, FlashEvent, FlashRegion};

/// The region used throughout the scenarios.
pub const REGION: FlashRegion = FlashRegion::new(0x3e000, 0x3ffff);

/// littlefs block size used throughout the scenarios.
pub const BLOCK_SIZE: u32 = 4096;

/// A request as the driver saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Read { addr: u32, len: usize },
    Write { addr: u32, len: usize },
    Erase { addr: u32, pages: u32 },
}

/// When the driver raises the completion event for a write or erase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// On the first idle poll after the busy period.
    OnIdle,
    /// Never; the test signals the latch itself.
    Never,
}

/// What the driver observed, readable after the driver moved into an adapter.
#[derive(Debug, Default)]
pub struct Probe {
    pub calls: RefCell<Vec<Call>>,
    pub init_calls: Cell<u32>,
    pub busy_polls: Cell<u32>,
}

impl Probe {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

/// Flash driver whose every answer is set by the test.
pub struct ScriptedDriver<'d> {
    probe: Rc<Probe>,
    handler: Option<&'d dyn EventHandler>,
    pub init_result: Result<(), DriverError>,
    pub issue_result: Result<(), DriverError>,
    pub completion: Result<(), DriverError>,
    pub busy_polls: u32,
    pub delivery: Delivery,
    busy_left: Cell<u32>,
    pending: Cell<Option<FlashEvent>>,
}

impl<'d> ScriptedDriver<'d> {
    /// Driver that accepts and successfully completes everything immediately.
    pub fn new() -> (Self, Rc<Probe>) {
        let probe = Rc::new(Probe::default());
        let driver = Self {
            probe: Rc::clone(&probe),
            handler: None,
            init_result: Ok(()),
            issue_result: Ok(()),
            completion: Ok(()),
            busy_polls: 0,
            delivery: Delivery::OnIdle,
            busy_left: Cell::new(0),
            pending: Cell::new(None),
        };
        (driver, probe)
    }

    fn record(&self, call: Call) {
        self.probe.calls.borrow_mut().push(call);
    }

    fn start(&self, kind: EventKind, addr: u32) -> Result<(), DriverError> {
        self.issue_result?;
        self.busy_left.set(self.busy_polls);
        if self.delivery == Delivery::OnIdle {
            self.pending.set(Some(FlashEvent {
                kind,
                addr,
                result: self.completion,
            }));
        }
        Ok(())
    }
}

impl<'d> FlashDriver<'d> for ScriptedDriver<'d> {
    const ERASE_UNIT: u32 = 4096;
    const PROGRAM_UNIT: u32 = 4;

    fn init(&mut self, _region: FlashRegion, handler: &'d dyn EventHandler) -> Result<(), DriverError> {
        self.probe.init_calls.set(self.probe.init_calls.get() + 1);
        self.init_result?;
        self.handler = Some(handler);
        Ok(())
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), DriverError> {
        self.record(Call::Read { addr, len: buf.len() });
        self.issue_result?;
        buf.fill(0x5A);
        self.busy_left.set(self.busy_polls);
        Ok(())
    }

    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), DriverError> {
        self.record(Call::Write { addr, len: data.len() });
        self.start(EventKind::Write, addr)
    }

    fn erase(&mut self, addr: u32, page_count: u32) -> Result<(), DriverError> {
        self.record(Call::Erase { addr, pages: page_count });
        self.start(EventKind::Erase, addr)
    }

    fn is_busy(&self) -> bool {
        let left = self.busy_left.get();
        if left > 0 {
            self.busy_left.set(left - 1);
            self.probe.busy_polls.set(self.probe.busy_polls.get() + 1);
            return true;
        }
        if let (Some(event), Some(handler)) = (self.pending.take(), self.handler) {
            handler.on_event(&event);
        }
        false
    }
}

/// Route adapter diagnostics to the test output. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
