use std::sync::Arc;

use serde_json::Value;
use tokio::runtime::Handle;
use tracing::debug;

use crate::config::ClientConfig;
use crate::dispatch::{Arg, Deferred, Delivery, Dispatched, Invocation};
use crate::error::{Result, StsError};
use crate::http::HttpTransport;
use crate::operation::{Command, OperationInput};
use crate::options::CallOptions;
use crate::request::{
    AssumeRoleRequest, AssumeRoleWithSamlRequest, AssumeRoleWithWebIdentityRequest,
    DecodeAuthorizationMessageRequest, GetAccessKeyInfoRequest, GetCallerIdentityRequest,
    GetFederationTokenRequest, GetSessionTokenRequest,
};
use crate::response::{
    AssumeRoleResponse, AssumeRoleWithSamlResponse, AssumeRoleWithWebIdentityResponse,
    DecodeAuthorizationMessageResponse, GetAccessKeyInfoResponse, GetCallerIdentityResponse,
    GetFederationTokenResponse, GetSessionTokenResponse,
};
use crate::transport::{RawOutput, Transport};

/// Client for the AWS STS API.
///
/// Holds the transport and the runtime that callback-mode calls run on.
/// Clones share both.
#[derive(Clone)]
pub struct StsClient {
    transport: Arc<dyn Transport>,
    runtime: Handle,
}

impl StsClient {
    /// Creates a client over `transport`, bound to the current tokio runtime.
    pub fn new(transport: impl Transport) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| StsError::Config(format!("no tokio runtime available: {}", e)))?;
        Ok(Self::with_runtime(Arc::new(transport), runtime))
    }

    /// Creates a client with an explicit runtime handle for callback mode.
    pub fn with_runtime(transport: Arc<dyn Transport>, runtime: Handle) -> Self {
        Self { transport, runtime }
    }

    /// Creates a client over an unsigned [`HttpTransport`].
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::new(HttpTransport::new(config)?)
    }

    /// Creates a client configured from the standard AWS environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env())
    }

    /// Dispatches `input` in the mode selected by `invocation`.
    ///
    /// Request validation failures and transport errors arrive through the
    /// selected mode: as the future's error, or as the callback's `Err`.
    pub fn send<I: OperationInput>(
        &self,
        input: I,
        invocation: Invocation<I::Output>,
    ) -> Dispatched<I::Output> {
        let command = Command::build(&input);
        let (options, callback) = invocation.into_parts();
        let transport = Arc::clone(&self.transport);

        match callback {
            None => {
                debug!(operation = %I::OPERATION, mode = "deferred", "dispatching");
                Dispatched::Deferred(Deferred::new(execute::<I>(transport, command, options)))
            }
            Some(callback) => {
                debug!(operation = %I::OPERATION, mode = "callback", "dispatching");
                let delivery = Delivery::new(callback);
                self.runtime.spawn(async move {
                    let result = execute::<I>(transport, command, options).await;
                    delivery.deliver(result);
                });
                Dispatched::Callback
            }
        }
    }

    /// Dispatches `input` with loosely-typed trailing arguments.
    ///
    /// See [`Invocation::resolve`]. A malformed options argument is rejected
    /// here, before anything is sent and without invoking any callback.
    pub fn invoke<I: OperationInput>(
        &self,
        input: I,
        second: Option<Arg<I::Output>>,
        third: Option<Arg<I::Output>>,
    ) -> Result<Dispatched<I::Output>> {
        let invocation = Invocation::resolve(second, third)?;
        Ok(self.send(input, invocation))
    }

    async fn call<I: OperationInput>(&self, input: I) -> Result<I::Output> {
        execute::<I>(
            Arc::clone(&self.transport),
            Command::build(&input),
            CallOptions::default(),
        )
        .await
    }

    /// Returns temporary credentials for a role.
    pub async fn assume_role(&self, request: AssumeRoleRequest) -> Result<AssumeRoleResponse> {
        self.call(request).await
    }

    /// Returns temporary credentials for a SAML-authenticated user.
    pub async fn assume_role_with_saml(
        &self,
        request: AssumeRoleWithSamlRequest,
    ) -> Result<AssumeRoleWithSamlResponse> {
        self.call(request).await
    }

    /// Returns temporary credentials for a user authenticated by an OIDC or
    /// OAuth 2.0 identity provider.
    pub async fn assume_role_with_web_identity(
        &self,
        request: AssumeRoleWithWebIdentityRequest,
    ) -> Result<AssumeRoleWithWebIdentityResponse> {
        self.call(request).await
    }

    /// Decodes the encoded message attached to an access-denied error.
    pub async fn decode_authorization_message(
        &self,
        request: DecodeAuthorizationMessageRequest,
    ) -> Result<DecodeAuthorizationMessageResponse> {
        self.call(request).await
    }

    /// Returns the account that owns an access key.
    pub async fn get_access_key_info(
        &self,
        request: GetAccessKeyInfoRequest,
    ) -> Result<GetAccessKeyInfoResponse> {
        self.call(request).await
    }

    /// Queries the identity of the current caller.
    pub async fn get_caller_identity(&self) -> Result<GetCallerIdentityResponse> {
        self.call(GetCallerIdentityRequest).await
    }

    /// Returns temporary credentials for a federated user.
    pub async fn get_federation_token(
        &self,
        request: GetFederationTokenRequest,
    ) -> Result<GetFederationTokenResponse> {
        self.call(request).await
    }

    /// Returns temporary credentials for the calling IAM user or root account.
    pub async fn get_session_token(
        &self,
        request: GetSessionTokenRequest,
    ) -> Result<GetSessionTokenResponse> {
        self.call(request).await
    }

    /// Closes the transport. Calls already in flight still complete; for
    /// [`HttpTransport`] every later call fails with [`StsError::Transport`].
    pub fn shutdown(self) {
        self.transport.close();
    }
}

async fn execute<I: OperationInput>(
    transport: Arc<dyn Transport>,
    command: Result<Command>,
    options: CallOptions,
) -> Result<I::Output> {
    let raw = transport.send(command?, options).await?;
    decode(raw)
}

fn decode<T: serde::de::DeserializeOwned>(raw: RawOutput) -> Result<T> {
    let RawOutput {
        request_id,
        mut result,
    } = raw;
    if let (Some(id), Value::Object(map)) = (request_id, &mut result) {
        map.entry("RequestId").or_insert(Value::String(id));
    }
    serde_json::from_value(result).map_err(StsError::from)
}
