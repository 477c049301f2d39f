//! AWS STS (Security Token Service) client for Rust.
//!
//! Covers all 8 STS operations:
//!
//! - [`StsClient::assume_role`]: Assume an IAM role
//! - [`StsClient::assume_role_with_saml`]: SAML-based role assumption
//! - [`StsClient::assume_role_with_web_identity`]: OIDC / OAuth 2.0 role assumption
//! - [`StsClient::decode_authorization_message`]: Decode an access-denied message
//! - [`StsClient::get_access_key_info`]: Look up the account behind an access key
//! - [`StsClient::get_caller_identity`]: Query current caller identity
//! - [`StsClient::get_federation_token`]: Credentials for a federated user
//! - [`StsClient::get_session_token`]: Credentials for the calling user
//!
//! Each operation can return a future or deliver to a callback, with or
//! without per-call [`CallOptions`]. See [`dispatch`].
//!
//! The client never signs requests itself. The bundled [`HttpTransport`] takes
//! a [`RequestSigner`] for operations that need one; any other delivery
//! mechanism can be plugged in through [`Transport`].
//!
//! # Quick Start
//!
//! ```no_run
//! use rs_aws_sts::{AssumeRoleWithWebIdentityRequest, StsClient};
//!
//! # async fn example() -> rs_aws_sts::Result<()> {
//! let client = StsClient::from_env()?;
//!
//! let resp = client
//!     .assume_role_with_web_identity(AssumeRoleWithWebIdentityRequest {
//!         role_arn: "arn:aws:iam::123456789012:role/app".into(),
//!         role_session_name: "app-session".into(),
//!         web_identity_token: std::fs::read_to_string("/var/run/secrets/token")
//!             .unwrap_or_default(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! println!("Temporary AK: {}", resp.credentials.access_key_id);
//! # Ok(())
//! # }
//! ```
//!
//! # Callback mode
//!
//! ```no_run
//! use rs_aws_sts::{
//!     CallOptions, GetCallerIdentityRequest, GetCallerIdentityResponse, Invocation, StsClient,
//! };
//! use std::time::Duration;
//!
//! # fn example(client: &StsClient) {
//! let options = CallOptions::new().with_request_timeout(Duration::from_secs(5));
//! let dispatched = client.send(
//!     GetCallerIdentityRequest,
//!     Invocation::with_options_and_callback(options, |result: rs_aws_sts::Result<GetCallerIdentityResponse>| {
//!         match result {
//!             Ok(identity) => println!("account {}", identity.account),
//!             Err(err) => eprintln!("failed: {}", err),
//!         }
//!     }),
//! );
//! assert!(dispatched.is_callback());
//! # }
//! ```
//!
//! # Options and positional arguments
//!
//! The typed methods above use default options. Per-call options with a
//! returned future go through [`StsClient::send`]; loosely-typed trailing
//! arguments go through [`StsClient::invoke`].
//!
//! ```no_run
//! use rs_aws_sts::{
//!     AbortSignal, Arg, AssumeRoleRequest, CallOptions, GetSessionTokenRequest, Invocation,
//!     StsClient,
//! };
//! use std::time::Duration;
//!
//! # async fn example(client: &StsClient) -> rs_aws_sts::Result<()> {
//! let signal = AbortSignal::new();
//! let options = CallOptions::new()
//!     .with_request_timeout(Duration::from_secs(5))
//!     .with_abort_signal(signal.clone());
//!
//! // request + options: a future
//! let resp = client
//!     .send(
//!         AssumeRoleRequest::new("arn:aws:iam::123456789012:role/demo", "session"),
//!         Invocation::WithOptions(options),
//!     )
//!     .into_deferred()
//!     .expect("no callback given")
//!     .await?;
//! println!("role user {}", resp.assumed_role_user.arn);
//!
//! // request + callback, resolved from positional arguments
//! let _ = client.invoke(
//!     GetSessionTokenRequest::default(),
//!     Some(Arg::callback(|result| {
//!         if let Err(err) = result {
//!             eprintln!("failed: {}", err);
//!         }
//!     })),
//!     None,
//! )?;
//!
//! // a scalar where options belong is rejected before anything is sent
//! let err = client
//!     .invoke(
//!         GetSessionTokenRequest::default(),
//!         Some(Arg::Value(serde_json::json!(42))),
//!         None,
//!     )
//!     .unwrap_err();
//! assert!(matches!(err, rs_aws_sts::StsError::InvalidArgument(_)));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod operation;
pub mod options;
pub mod request;
pub mod response;
pub mod transport;

mod exec;
mod query;

pub use client::StsClient;
pub use config::ClientConfig;
pub use dispatch::{Arg, Callback, Deferred, Dispatched, Invocation};
pub use error::{Result, StsError};
pub use http::{HttpTransport, RequestSigner};
pub use operation::{Command, Operation, OperationInput};
pub use options::{AbortSignal, CallOptions};
pub use query::QueryWriter;
pub use request::{
    AssumeRoleRequest, AssumeRoleWithSamlRequest, AssumeRoleWithWebIdentityRequest,
    DecodeAuthorizationMessageRequest, GetAccessKeyInfoRequest, GetCallerIdentityRequest,
    GetFederationTokenRequest, GetSessionTokenRequest, PolicyDescriptor, Tag,
};
pub use response::{
    AssumeRoleResponse, AssumeRoleWithSamlResponse, AssumeRoleWithWebIdentityResponse,
    AssumedRoleUser, Credentials, DecodeAuthorizationMessageResponse, FederatedUser,
    GetAccessKeyInfoResponse, GetCallerIdentityResponse, GetFederationTokenResponse,
    GetSessionTokenResponse,
};
pub use transport::{RawOutput, Transport};

/// Re-exported for [`RequestSigner`] implementations.
pub use reqwest;

// Compile-time assertions: key types must be Send + Sync for use across threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<StsClient>;
    let _ = assert_send_sync::<StsError>;
    let _ = assert_send_sync::<CallOptions>;
    let _ = assert_send_sync::<HttpTransport>;
};
