//! The seam between the client facade and whatever delivers commands.

use async_trait::async_trait;

use crate::error::Result;
use crate::operation::Command;
use crate::options::CallOptions;

/// Result document of one operation, as produced by a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutput {
    pub request_id: Option<String>,
    /// The `<Action>Result` object.
    pub result: serde_json::Value,
}

impl RawOutput {
    pub fn new(result: serde_json::Value) -> Self {
        Self {
            request_id: None,
            result,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Delivers commands to STS (or anything that speaks for it).
///
/// Implementations own signing, HTTP and any retry policy. Errors are handed
/// back to the caller unchanged.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, command: Command, options: CallOptions) -> Result<RawOutput>;

    /// Releases resources held by the transport. Called by
    /// [`StsClient::shutdown`](crate::StsClient::shutdown).
    fn close(&self) {}
}
