//! Operation identities and the commands built from requests.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::query::QueryWriter;

/// The STS operations exposed by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AssumeRole,
    AssumeRoleWithSaml,
    AssumeRoleWithWebIdentity,
    DecodeAuthorizationMessage,
    GetAccessKeyInfo,
    GetCallerIdentity,
    GetFederationToken,
    GetSessionToken,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::AssumeRole,
        Operation::AssumeRoleWithSaml,
        Operation::AssumeRoleWithWebIdentity,
        Operation::DecodeAuthorizationMessage,
        Operation::GetAccessKeyInfo,
        Operation::GetCallerIdentity,
        Operation::GetFederationToken,
        Operation::GetSessionToken,
    ];

    /// Wire name sent as the `Action` parameter.
    pub fn action(&self) -> &'static str {
        match self {
            Operation::AssumeRole => "AssumeRole",
            Operation::AssumeRoleWithSaml => "AssumeRoleWithSAML",
            Operation::AssumeRoleWithWebIdentity => "AssumeRoleWithWebIdentity",
            Operation::DecodeAuthorizationMessage => "DecodeAuthorizationMessage",
            Operation::GetAccessKeyInfo => "GetAccessKeyInfo",
            Operation::GetCallerIdentity => "GetCallerIdentity",
            Operation::GetFederationToken => "GetFederationToken",
            Operation::GetSessionToken => "GetSessionToken",
        }
    }

    /// Whether STS requires the request to be signed with caller credentials.
    ///
    /// The SAML and web identity flows authenticate through the assertion or
    /// token they carry instead.
    pub fn requires_signing(&self) -> bool {
        !matches!(
            self,
            Operation::AssumeRoleWithSaml | Operation::AssumeRoleWithWebIdentity
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// A request type that maps to exactly one [`Operation`].
///
/// Implementations pair a validator with a parameter writer; [`Command::build`]
/// runs both.
pub trait OperationInput: Send + 'static {
    /// Operation this request invokes.
    const OPERATION: Operation;

    /// Typed result decoded from the operation's result document.
    type Output: DeserializeOwned + Send + 'static;

    /// Checks service-side constraints locally.
    fn validate(&self) -> Result<()>;

    /// Writes the request's Query parameters.
    fn write_params(&self, w: &mut QueryWriter);
}

/// An operation plus its serialized parameters, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    operation: Operation,
    params: Vec<(String, String)>,
}

impl Command {
    /// Validates `input` and serializes it.
    pub fn build<I: OperationInput>(input: &I) -> Result<Self> {
        input.validate()?;
        let mut w = QueryWriter::new();
        input.write_params(&mut w);
        Ok(Self {
            operation: I::OPERATION,
            params: w.finish(),
        })
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Looks up a parameter by its flattened name.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
