//! End-to-end behaviour of the adapter through the filesystem configuration.
//!
//! These tests cover:
//! - Address translation of block/offset requests
//! - Status translation of issue and completion failures
//! - Initialisation failures and their side effects
//! - Watchdog feeding while waiting on the driver

mod common;

use std::cell::Cell;

use anyhow::Result;
use common::{init_logging, Call, Delivery, ScriptedDriver, BLOCK_SIZE, REGION};
use lfs_flash_hal::{
    status, CompletionLatch, DriverError, FlashAdapter, FsConfig, LfsError, LFS_ERR_OK,
    PAGES_PER_BLOCK,
};

#[test]
fn prog_lands_at_translated_address() -> Result<()> {
    init_logging();
    let latch = CompletionLatch::new();
    let (driver, probe) = ScriptedDriver::new();
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);
    let mut config = FsConfig::for_region(&REGION, BLOCK_SIZE);
    adapter.init(Some(&mut config), None)?;
    config.validate()?;

    assert_eq!(status(config.prog(1, 10, &[0xAB; 20])), LFS_ERR_OK);
    assert_eq!(probe.calls(), vec![Call::Write { addr: 0x3f00a, len: 20 }]);
    Ok(())
}

#[test]
fn completion_failure_is_negated() -> Result<()> {
    init_logging();
    let latch = CompletionLatch::new();
    let (mut driver, _probe) = ScriptedDriver::new();
    driver.completion = Err(DriverError::new(5).unwrap());
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);
    let mut config = FsConfig::for_region(&REGION, BLOCK_SIZE);
    adapter.init(Some(&mut config), None)?;

    assert_eq!(status(config.prog(1, 10, &[0; 20])), -5);
    assert_eq!(config.erase(1), Err(LfsError::IO));
    Ok(())
}

#[test]
fn rejected_request_is_negated_without_waiting() -> Result<()> {
    init_logging();
    let latch = CompletionLatch::new();
    let feeds = Cell::new(0u32);
    let feed = || feeds.set(feeds.get() + 1);
    let (mut driver, _probe) = ScriptedDriver::new();
    driver.issue_result = Err(DriverError::INVALID_ADDR);
    driver.busy_polls = 10;
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);
    let mut config = FsConfig::for_region(&REGION, BLOCK_SIZE);
    adapter.init(Some(&mut config), Some(&feed))?;

    assert_eq!(status(config.prog(0, 0, &[0; 4])), -16);
    assert_eq!(status(config.read(0, 0, &mut [0; 4])), -16);
    assert_eq!(feeds.get(), 0);
    Ok(())
}

#[test]
fn erase_targets_block_start_with_one_page() -> Result<()> {
    let latch = CompletionLatch::new();
    let (driver, probe) = ScriptedDriver::new();
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);
    let mut config = FsConfig::for_region(&REGION, BLOCK_SIZE);
    adapter.init(Some(&mut config), None)?;

    config.erase(0)?;
    config.erase(1)?;
    assert_eq!(
        probe.calls(),
        vec![
            Call::Erase { addr: 0x3e000, pages: PAGES_PER_BLOCK },
            Call::Erase { addr: 0x3f000, pages: PAGES_PER_BLOCK },
        ]
    );
    Ok(())
}

#[test]
fn init_without_config_leaves_driver_untouched() {
    let latch = CompletionLatch::new();
    let (driver, probe) = ScriptedDriver::new();
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);

    assert_eq!(adapter.init(None, None), Err(DriverError::INVALID_PARAM));
    assert_eq!(probe.init_calls.get(), 0);
}

#[test]
fn driver_init_failure_is_returned_verbatim() {
    let latch = CompletionLatch::new();
    let (mut driver, probe) = ScriptedDriver::new();
    driver.init_result = Err(DriverError::INVALID_STATE);
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);
    let mut config = FsConfig::for_region(&REGION, BLOCK_SIZE);

    assert_eq!(adapter.init(Some(&mut config), None), Err(DriverError::INVALID_STATE));
    assert_eq!(probe.init_calls.get(), 1);
    assert!(!config.has_ops());
    assert_eq!(config.sync(), Err(LfsError::INVAL));
}

#[test]
fn sync_never_reaches_the_driver() -> Result<()> {
    let latch = CompletionLatch::new();
    let (driver, probe) = ScriptedDriver::new();
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);
    let mut config = FsConfig::for_region(&REGION, BLOCK_SIZE);
    adapter.init(Some(&mut config), None)?;

    assert_eq!(status(config.sync()), LFS_ERR_OK);
    assert!(probe.calls().is_empty());
    assert_eq!(probe.busy_polls.get(), 0);
    Ok(())
}

#[test]
fn read_ignores_pending_completion() -> Result<()> {
    let latch = CompletionLatch::new();
    let (mut driver, probe) = ScriptedDriver::new();
    driver.busy_polls = 3;
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);
    let mut config = FsConfig::for_region(&REGION, BLOCK_SIZE);
    adapter.init(Some(&mut config), None)?;

    latch.signal(Err(DriverError::BUSY));
    let mut buf = [0u8; 16];
    config.read(1, 4, &mut buf)?;

    assert_eq!(buf, [0x5A; 16]);
    assert_eq!(probe.calls(), vec![Call::Read { addr: 0x3f004, len: 16 }]);
    assert_eq!(probe.busy_polls.get(), 3);
    assert_eq!(latch.peek(), Some(Err(DriverError::BUSY)));
    Ok(())
}

#[test]
fn sequential_operations_see_their_own_results() -> Result<()> {
    let latch = CompletionLatch::new();
    let (mut driver, _probe) = ScriptedDriver::new();
    driver.busy_polls = 2;
    driver.completion = Err(DriverError::INTERNAL);
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);
    let mut config = FsConfig::for_region(&REGION, BLOCK_SIZE);
    adapter.init(Some(&mut config), None)?;

    assert_eq!(status(config.erase(0)), -3);
    // A stale success left in the latch must not satisfy the next request.
    latch.signal(Ok(()));
    assert_eq!(status(config.prog(0, 0, &[0; 4])), -3);
    assert!(latch.is_pending());
    Ok(())
}

#[test]
fn watchdog_fed_once_per_busy_poll() -> Result<()> {
    let latch = CompletionLatch::new();
    let feeds = Cell::new(0u32);
    let feed = || feeds.set(feeds.get() + 1);
    let (mut driver, probe) = ScriptedDriver::new();
    driver.busy_polls = 4;
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);
    let mut config = FsConfig::for_region(&REGION, BLOCK_SIZE);
    adapter.init(Some(&mut config), Some(&feed))?;

    config.prog(0, 0, &[0; 8])?;
    assert_eq!(probe.busy_polls.get(), 4);
    assert_eq!(feeds.get(), 4);
    Ok(())
}

#[test]
fn watchdog_fed_while_waiting_for_late_event() -> Result<()> {
    const SIGNAL_AFTER: u32 = 7;

    let latch = CompletionLatch::new();
    let feeds = Cell::new(0u32);
    // The event arrives during the fourth empty latch poll.
    let feed = || {
        feeds.set(feeds.get() + 1);
        if feeds.get() == SIGNAL_AFTER {
            latch.signal(Err(DriverError::new(5).unwrap()));
        }
    };
    let (mut driver, probe) = ScriptedDriver::new();
    driver.busy_polls = 3;
    driver.delivery = Delivery::Never;
    let adapter = FlashAdapter::with_region(driver, REGION, &latch);
    let mut config = FsConfig::for_region(&REGION, BLOCK_SIZE);
    adapter.init(Some(&mut config), Some(&feed))?;

    assert_eq!(status(config.erase(1)), -5);
    assert_eq!(probe.busy_polls.get(), 3);
    assert_eq!(feeds.get(), SIGNAL_AFTER);
    Ok(())
}
