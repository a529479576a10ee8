//! Response actions provided by the hosting server.

use async_trait::async_trait;

use crate::error::FallbackForwardFailure;

/// Side-effecting response primitives the dispatcher drives.
#[async_trait]
pub trait ResponseSink: Send {
    /// Answer the client with an HTTP redirect to `location`.
    async fn send_redirect(&mut self, location: &str);

    /// Render `page` internally as the response to the original request.
    async fn forward(&mut self, page: &str) -> Result<(), FallbackForwardFailure>;
}
