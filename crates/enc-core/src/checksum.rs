use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Hash algorithm recorded in debug metadata for a compiled source file.
///
/// The compiled binary decides which algorithm a document was checksummed
/// with; the sync engine must re-hash on-disk content with the *recorded*
/// algorithm rather than a fixed default, since different toolchains (and
/// different compilations within one session) emit different algorithms.
///
/// # Examples
///
/// ```
/// use enc_core::ChecksumAlgorithm;
///
/// let digest = ChecksumAlgorithm::Sha256.digest(b"fn main() {}");
/// assert_eq!(digest.len(), ChecksumAlgorithm::Sha256.digest_len());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ChecksumAlgorithm {
    /// MD5, emitted by older toolchains.
    Md5,
    /// SHA-1, the long-time default for native debug formats.
    Sha1,
    /// SHA-256, the default for portable debug metadata.
    Sha256,
}

impl ChecksumAlgorithm {
    /// Hashes `bytes` with this algorithm.
    ///
    /// Checksums are always computed over raw file bytes, not decoded text,
    /// to match what the compiler hashed at build time.
    #[must_use]
    pub fn digest(&self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Self::Md5 => Md5::digest(bytes).to_vec(),
            Self::Sha1 => Sha1::digest(bytes).to_vec(),
            Self::Sha256 => Sha256::digest(bytes).to_vec(),
        }
    }

    /// Digest length in bytes.
    #[must_use]
    pub const fn digest_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
        };
        f.write_str(name)
    }
}
