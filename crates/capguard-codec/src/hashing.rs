/// 32-bit command-name hash: the first four bytes of the BLAKE3 digest,
/// read big-endian.
pub fn name_hash(name: &str) -> u32 {
    let digest = blake3::hash(name.as_bytes());
    let bytes = digest.as_bytes();
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// 8-bit hash carried by a delta record: the top byte of [`name_hash`].
pub fn subcommand_hash(subcommand: &str) -> u8 {
    name_hash(subcommand).to_be_bytes()[0]
}
