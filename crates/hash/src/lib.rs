#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! BLAKE3 content fingerprints for SCORM packages
//!
//! A package's fingerprint is computed over the raw archive bytes and is
//! used as the storage key for everything extracted from it.

use blake3::Hasher;
use scorm_errors::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Size of chunks for streaming hash computation
pub const CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// A BLAKE3 hash value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash {
    bytes: [u8; 32],
}

impl Hash {
    /// Lowercase hex form, the package's content hash
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Compute the hash of everything a reader yields, in `CHUNK_SIZE` pieces.
    ///
    /// Returns the digest together with the number of bytes consumed.
    ///
    /// # Errors
    /// Returns an error if reading fails.
    pub async fn hash_reader<R>(mut reader: R) -> Result<(Self, u64), Error>
    where
        R: AsyncRead + Unpin,
    {
        let mut hasher = Hasher::new();
        let mut buffer = vec![0; CHUNK_SIZE];
        let mut total_bytes = 0u64;

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
            total_bytes += n as u64;
        }

        let bytes = *hasher.finalize().as_bytes();
        Ok((Self { bytes }, total_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_known_digest() {
        let (hash, size) = Hash::hash_reader(Cursor::new(b"hello world")).await.unwrap();

        // Known BLAKE3 hash of "hello world"
        let expected = "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24";
        assert_eq!(hash.to_hex(), expected);
        assert_eq!(size, 11);
    }

    #[tokio::test]
    async fn test_hash_reader_spans_chunks() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 17))
            .map(|i| u8::try_from(i % 251).unwrap())
            .collect();
        let (hash, size) = Hash::hash_reader(Cursor::new(&data)).await.unwrap();
        assert_eq!(size, data.len() as u64);
        assert_eq!(hash.to_hex(), blake3::hash(&data).to_hex().as_str());
    }
}
