//! littlefs checksum.

use crc::{Crc, CRC_32_JAMCRC};

/// CRC-32, reflected polynomial 0xedb88320, no final xor.
static LFS_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_JAMCRC);

/// Continue the littlefs CRC `crc` over `data`.
///
/// The running value is the raw register, so calls chain:
/// `crc(crc(init, a), b) == crc(init, a ++ b)`. littlefs seeds with
/// `0xffffffff`.
pub fn crc(crc: u32, data: &[u8]) -> u32 {
    // The crc crate reflects the initial value for reflected algorithms.
    let mut digest = LFS_CRC.digest_with_initial(crc.reverse_bits());
    digest.update(data);
    digest.finalize()
}
