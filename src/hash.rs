//! Whole-file digests.
use std::path::Path;

use md5::Md5;
use sha2::Digest;
use sha2::Sha256;
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::errors::Error;

pub(crate) trait DigestBuilder {
    async fn digest_build<D: Digest>(&self, op: &str) -> Result<D, Error>;
}

pub(crate) trait DigestString {
    fn digest_string(self) -> String;
}

impl<D: Digest> DigestString for D {
    fn digest_string(self) -> String {
        hex::encode(self.finalize())
    }
}

impl DigestBuilder for &Path {
    async fn digest_build<D: Digest>(&self, op: &str) -> Result<D, Error> {
        let mut file = fs::File::open(&self)
            .await
            .map_err(|e| Error::io(op, "open", self, e))?;
        let mut context = D::new();
        let mut buffer = vec![0; 4096]; // Read in chunks

        loop {
            let bytes_read = file
                .read(&mut buffer)
                .await
                .map_err(|e| Error::io(op, "read", self, e))?;

            if bytes_read == 0 {
                break; // End of file
            }
            context.update(&buffer[..bytes_read]);
        }
        Ok(context)
    }
}

/// Lowercase hex MD5 digest of the file's full contents.
pub async fn md5_digest<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let path = path.as_ref();
    Ok(path.digest_build::<Md5>("md5_digest").await?.digest_string())
}

/// Lowercase hex SHA-256 digest of the file's full contents.
pub async fn sha256_digest<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let path = path.as_ref();
    Ok(path
        .digest_build::<Sha256>("sha256_digest")
        .await?
        .digest_string())
}

/// Lowercase hex SHA-256 digest of an in-memory buffer.
pub fn sha256_bytes(data: &[u8]) -> String {
    Sha256::new_with_prefix(data).digest_string()
}
