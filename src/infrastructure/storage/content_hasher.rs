use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};

use crate::application::ports::StorageError;
use crate::domain::value_objects::ContentDigest;

/// Buffer size for I/O operations. 256KB balances throughput and memory
/// for sequential streaming.
const BUFFER_SIZE: usize = 256 * 1024;

/// Streaming SHA-256 hashing fused with file I/O.
///
/// The digest format matches [`ContentDigest::of`]: hashing a byte sequence
/// in memory and streaming the same bytes through these helpers always
/// produces the same identity.
pub struct ContentHasher;

impl ContentHasher {
    /// Write a stream to a file and compute its SHA-256 hash in one pass.
    ///
    /// Returns the content digest and the total number of bytes written.
    pub async fn write_and_hash(
        dest_path: &Path,
        mut reader: impl AsyncRead + Unpin,
        durable: bool,
    ) -> Result<(ContentDigest, u64), StorageError> {
        let mut file =
            tokio::io::BufWriter::with_capacity(BUFFER_SIZE * 2, File::create(dest_path).await?);

        let mut hasher = Sha256::new();
        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }

            hasher.update(&buffer[..n]);
            file.write_all(&buffer[..n]).await?;

            total_bytes += n as u64;
        }

        file.flush().await?;

        // fsync is expensive but required for the durability guarantee
        if durable {
            file.get_mut().sync_all().await?;
        }

        let digest = ContentDigest::from_hex(hex::encode(hasher.finalize()))
            .map_err(|e| StorageError::Internal(e.to_string()))?;

        Ok((digest, total_bytes))
    }

    /// Compute the SHA-256 digest of an existing file
    pub async fn hash_file(path: &Path) -> Result<ContentDigest, StorageError> {
        let file = File::open(path).await?;
        let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        ContentDigest::from_hex(hex::encode(hasher.finalize()))
            .map_err(|e| StorageError::Internal(e.to_string()))
    }
}
