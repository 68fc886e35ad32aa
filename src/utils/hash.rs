//! Content hashing with blake3.

/// 64-bit digest for cheap change detection.
pub fn compute(data: &[u8]) -> u64 {
    let digest = blake3::hash(data);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

/// Short hex fingerprint used in cache-busting file names.
pub fn fingerprint(data: &[u8]) -> String {
    hex::encode(&blake3::hash(data).as_bytes()[..4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_is_stable() {
        assert_eq!(compute(b"folio"), compute(b"folio"));
        assert_ne!(compute(b"folio"), compute(b"folio!"));
    }

    #[test]
    fn test_fingerprint_format() {
        let fp = fingerprint(b"body { color: red }");
        assert_eq!(fp.len(), 8);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, fingerprint(b"body { color: red }"));
    }
}
