//! Bundled reqwest-based transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{Result, StsError};
use crate::exec::handle_response;
use crate::operation::Command;
use crate::options::CallOptions;
use crate::query::form_body;
use crate::transport::{RawOutput, Transport};

/// Authenticates outgoing requests.
///
/// Only invoked for operations where
/// [`Operation::requires_signing`](crate::Operation::requires_signing) is true.
/// Plug an AWS SigV4 implementation in here.
pub trait RequestSigner: Send + Sync + 'static {
    fn sign(&self, request: &mut reqwest::Request) -> Result<()>;
}

/// Sends commands as Query-protocol form posts and reads JSON responses.
pub struct HttpTransport {
    http: reqwest::Client,
    config: ClientConfig,
    signer: Option<Arc<dyn RequestSigner>>,
    closed: AtomicBool,
}

impl HttpTransport {
    /// Creates a transport without a signer; only unsigned operations succeed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| StsError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            config,
            signer: None,
            closed: AtomicBool::new(false),
        })
    }

    pub fn with_signer(mut self, signer: impl RequestSigner) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_request(&self, command: &Command, options: &CallOptions) -> Result<reqwest::Request> {
        let action = command.operation().action();
        let common = [("Action", action), ("Version", self.config.api_version)];
        let body = form_body(
            common.into_iter().chain(
                command
                    .params()
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            ),
        );

        let mut builder = self
            .http
            .post(&self.config.endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", "application/json")
            .body(body);
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let mut request = builder.build()?;

        if command.operation().requires_signing() {
            match &self.signer {
                Some(signer) => signer.sign(&mut request)?,
                None => {
                    return Err(StsError::Credential(format!(
                        "{} must be signed but no request signer is configured",
                        action
                    )));
                }
            }
        }
        Ok(request)
    }

    async fn execute(&self, command: Command, options: &CallOptions) -> Result<RawOutput> {
        let operation = command.operation();
        let request = self.build_request(&command, options)?;

        let response = self.http.execute(request).await?;
        let status = response.status();
        let text = response.text().await?;

        let result = handle_response(operation, status, &text);
        match &result {
            Ok(raw) => debug!(
                %operation,
                status = status.as_u16(),
                request_id = raw.request_id.as_deref().unwrap_or("-"),
                "sts response"
            ),
            Err(err) => warn!(%operation, status = status.as_u16(), error = %err, "sts request failed"),
        }
        result
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, command: Command, options: CallOptions) -> Result<RawOutput> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StsError::Transport("transport is closed".to_string()));
        }
        match options.abort.clone() {
            Some(signal) => {
                if signal.is_aborted() {
                    return Err(StsError::Aborted);
                }
                tokio::select! {
                    result = self.execute(command, &options) => result,
                    _ = signal.aborted() => Err(StsError::Aborted),
                }
            }
            None => self.execute(command, &options).await,
        }
    }

    /// Rejects every later `send`. Requests already in flight run to completion.
    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
