//! Reserved flash region defaults and block address translation.

pub use flash_storage_driver::FlashRegion;

/// Built-in first byte of the reserved region.
pub const DEFAULT_START_ADDR: u32 = 0x3e000;

/// Built-in last byte of the reserved region (inclusive).
pub const DEFAULT_END_ADDR: u32 = 0x3ffff;

/// Region start, overridable at build time with `LFS_FLASH_START_ADDR`.
pub const START_ADDR: u32 = env_addr(option_env!("LFS_FLASH_START_ADDR"), DEFAULT_START_ADDR);

/// Region end, overridable at build time with `LFS_FLASH_END_ADDR`.
pub const END_ADDR: u32 = env_addr(option_env!("LFS_FLASH_END_ADDR"), DEFAULT_END_ADDR);

/// Region the adapter uses unless told otherwise.
pub const DEFAULT_REGION: FlashRegion = FlashRegion::new(START_ADDR, END_ADDR);

/// Physical pages erased per logical block.
pub const PAGES_PER_BLOCK: u32 = 1;

/// Absolute address of `offset` within `block`.
///
/// Computes `region.start() + block * block_size + offset` with wrapping
/// arithmetic. Bounds are the caller's responsibility; an address past the
/// region is passed through and rejected by the driver.
///
/// # Examples
///
/// ```
/// use lfs_flash_hal::domain::{translate_address, FlashRegion};
///
/// let region = FlashRegion::new(0x3e000, 0x3ffff);
/// assert_eq!(translate_address(&region, 1, 4096, 10), 0x3f00a);
/// ```
#[inline]
pub const fn translate_address(region: &FlashRegion, block: u32, block_size: u32, offset: u32) -> u32 {
    region
        .start()
        .wrapping_add(block.wrapping_mul(block_size))
        .wrapping_add(offset)
}

const fn env_addr(value: Option<&'static str>, default: u32) -> u32 {
    match value {
        Some(text) => parse_addr(text),
        None => default,
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal address at compile time.
const fn parse_addr(text: &str) -> u32 {
    let bytes = text.as_bytes();
    let (radix, mut i) = if bytes.len() > 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
        (16u32, 2)
    } else {
        (10u32, 0)
    };
    assert!(i < bytes.len(), "empty flash address");

    let mut value: u32 = 0;
    while i < bytes.len() {
        let digit = match bytes[i] {
            b'_' => {
                i += 1;
                continue;
            }
            b @ b'0'..=b'9' => (b - b'0') as u32,
            b @ b'a'..=b'f' if radix == 16 => (b - b'a' + 10) as u32,
            b @ b'A'..=b'F' if radix == 16 => (b - b'A' + 10) as u32,
            _ => panic!("invalid digit in flash address"),
        };
        value = match value.checked_mul(radix) {
            Some(v) => v,
            None => panic!("flash address does not fit in u32"),
        };
        value = match value.checked_add(digit) {
            Some(v) => v,
            None => panic!("flash address does not fit in u32"),
        };
        i += 1;
    }
    value
}
