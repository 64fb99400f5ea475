use async_trait::async_trait;
use txtcore::CodecError;

/// Turns document text into a shareable token and back.
///
/// Implementations may do the work inline or hand it to another thread; the
/// session only awaits the result.
#[async_trait]
pub trait Codec: Send + Sync {
    async fn encode(&self, text: &str) -> Result<String, CodecError>;
    async fn decode(&self, token: &str) -> Result<String, CodecError>;
}

/// Raw-deflate + base64 codec. Work runs on tokio's blocking pool so a large
/// document does not stall the editing task.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeflateCodec;

#[async_trait]
impl Codec for DeflateCodec {
    async fn encode(&self, text: &str) -> Result<String, CodecError> {
        let text = text.to_owned();
        run_blocking(move || txtcore::codec::encode(&text)).await
    }

    async fn decode(&self, token: &str) -> Result<String, CodecError> {
        let token = token.to_owned();
        run_blocking(move || txtcore::codec::decode(&token)).await
    }
}

async fn run_blocking<F>(work: F) -> Result<String, CodecError>
where
    F: FnOnce() -> Result<String, CodecError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(join_err) => {
            log::error!("Codec task failed: {}", join_err);
            Err(CodecError::Compress(std::io::Error::other(join_err)))
        }
    }
}
