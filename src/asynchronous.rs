//! Async offload at the boundary (§5). The core stays synchronous and
//! single-threaded; this module just hands the synchronous call to a
//! blocking-friendly worker via [`tokio::task::spawn_blocking`] so an async
//! caller doesn't stall its executor on a large file.
//!
//! Gated behind the `async` feature — the core's public surface works
//! without it, matching "implementations may omit it and expose only the
//! synchronous surface."

use tokio::task::JoinError;

use crate::errors::DexError;
use crate::mutf8;
use crate::pool::Dex;

/// Errors an async wrapper can surface beyond [`DexError`]: the blocking
/// task itself can be cancelled or panic.
#[derive(Debug, thiserror::Error)]
pub enum AsyncDexError {
    #[error(transparent)]
    Dex(#[from] DexError),
    #[error("the blocking worker task failed: {0}")]
    Join(#[from] JoinError),
}

/// Construct a [`Dex`] view and fully parse it on a blocking worker thread.
pub async fn parse_dex(data: Vec<u8>, no_lazy_load: bool) -> Result<Dex, AsyncDexError> {
    tokio::task::spawn_blocking(move || {
        let mut dex = Dex::new(data)?;
        dex.parse_dex(no_lazy_load)?;
        Ok(dex)
    })
    .await?
}

/// Decode a MUTF-8 buffer off the calling task.
pub async fn decode_mutf8(bytes: Vec<u8>) -> Result<String, AsyncDexError> {
    tokio::task::spawn_blocking(move || mutf8::decode(&bytes).map_err(AsyncDexError::from))
        .await?
}

/// Encode a string to MUTF-8 off the calling task.
pub async fn encode_mutf8(s: String) -> Vec<u8> {
    tokio::task::spawn_blocking(move || mutf8::encode(&s))
        .await
        .expect("encode_mutf8 is infallible and never panics")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DexBuilder;

    #[tokio::test]
    async fn parses_a_minimal_dex_off_thread() {
        let bytes = DexBuilder::new().build();
        let dex = parse_dex(bytes, false).await.unwrap();
        assert!(dex.strings().is_empty());
    }

    #[tokio::test]
    async fn decodes_mutf8_off_thread() {
        let decoded = decode_mutf8(b"hello".to_vec()).await.unwrap();
        assert_eq!(decoded, "hello");
    }

    #[tokio::test]
    async fn encodes_mutf8_off_thread() {
        let encoded = encode_mutf8("hi".to_string()).await;
        assert_eq!(encoded, b"hi");
    }
}
