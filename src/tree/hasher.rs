//! Hash computation for leaves and internal nodes using BLAKE3

use crate::types::Digest;
use blake3::Hasher;
use std::io::Read;

/// Compute the digest of a byte sequence
///
/// Total over all inputs; the empty slice hashes to BLAKE3's empty digest.
pub fn digest_bytes(data: &[u8]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(data);
    Digest::from_bytes(*hasher.finalize().as_bytes())
}

/// Compute the digest of a stream in a single pass
pub fn digest_reader<R: Read>(mut reader: R) -> std::io::Result<Digest> {
    let mut hasher = Hasher::new();
    std::io::copy(&mut reader, &mut hasher)?;
    Ok(Digest::from_bytes(*hasher.finalize().as_bytes()))
}

/// Combine two child digests into their parent digest
///
/// parent = hash(left || right). Order matters: `combine(a, b) != combine(b, a)`
/// unless `a == b`.
pub fn combine(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Digest::from_bytes(*hasher.finalize().as_bytes())
}
