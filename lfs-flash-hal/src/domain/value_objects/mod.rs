//! Value objects - Immutable addressing data.

mod flash_region;

pub use flash_region::{
    translate_address, FlashRegion, DEFAULT_END_ADDR, DEFAULT_REGION, DEFAULT_START_ADDR,
    END_ADDR, PAGES_PER_BLOCK, START_ADDR,
};
