use crc::Crc;

/// CRC-32 as computed by the reference stacks: reflected polynomial 0xEDB88320, initial
///  value 0xFFFFFFFF, and *no* final xor - the catalog calls this variant JAMCRC. The
///  usual CRC-32 (with final xor) never matches.
pub fn crc32(buf: &[u8]) -> u32 {
    let hasher = Crc::<u32>::new(&crc::CRC_32_JAMCRC);
    let mut digest = hasher.digest();
    digest.update(buf);
    digest.finalize()
}

/// Checksum of a whole datagram with the 4-byte checksum field fed in as zeroes.
///
/// Senders compute the checksum before embedding it, so the embedded field must not
///  contribute to validation. `field_offset + 4` must lie within `buf`.
pub fn crc32_with_field_zeroed(buf: &[u8], field_offset: usize) -> u32 {
    let hasher = Crc::<u32>::new(&crc::CRC_32_JAMCRC);
    let mut digest = hasher.digest();
    digest.update(&buf[..field_offset]);
    digest.update(&[0u8; 4]);
    digest.update(&buf[field_offset + 4..]);
    digest.finalize()
}
