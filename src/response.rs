use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Temporary security credentials returned by STS.
///
/// The `Debug` implementation redacts `secret_access_key` and `session_token`
/// to prevent accidental credential leakage in logs.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub expiration: DateTime<Utc>,
}

impl Credentials {
    /// Checks if the credentials have expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expiration
    }

    /// Returns the remaining time until expiration.
    ///
    /// Returns `None` if the credentials are already expired.
    pub fn time_to_expiry(&self) -> Option<std::time::Duration> {
        (self.expiration - Utc::now()).to_std().ok()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"****")
            .field("session_token", &"****")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// STS emits RFC 3339 strings in XML and epoch seconds in JSON.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Epoch(f64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom),
        Raw::Epoch(secs) => {
            let whole = secs.trunc() as i64;
            let nanos = (secs.fract() * 1e9).round() as u32;
            Utc.timestamp_opt(whole, nanos)
                .single()
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", secs)))
        }
    }
}

/// Identifiers of the assumed role session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssumedRoleUser {
    pub assumed_role_id: String,
    pub arn: String,
}

/// Identifiers of a federated user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FederatedUser {
    pub federated_user_id: String,
    pub arn: String,
}

/// Response from the AssumeRole API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssumeRoleResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub credentials: Credentials,
    pub assumed_role_user: AssumedRoleUser,
    pub packed_policy_size: Option<u32>,
    pub source_identity: Option<String>,
}

/// Response from the AssumeRoleWithSAML API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssumeRoleWithSamlResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub credentials: Credentials,
    pub assumed_role_user: AssumedRoleUser,
    pub packed_policy_size: Option<u32>,
    pub subject: Option<String>,
    pub subject_type: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub name_qualifier: Option<String>,
    pub source_identity: Option<String>,
}

/// Response from the AssumeRoleWithWebIdentity API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssumeRoleWithWebIdentityResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub credentials: Credentials,
    pub subject_from_web_identity_token: Option<String>,
    pub assumed_role_user: AssumedRoleUser,
    pub packed_policy_size: Option<u32>,
    pub provider: Option<String>,
    pub audience: Option<String>,
    pub source_identity: Option<String>,
}

/// Response from the DecodeAuthorizationMessage API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DecodeAuthorizationMessageResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    /// JSON document describing the denied request.
    pub decoded_message: String,
}

/// Response from the GetAccessKeyInfo API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetAccessKeyInfoResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub account: String,
}

/// Response from the GetCallerIdentity API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCallerIdentityResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub user_id: String,
    pub account: String,
    pub arn: String,
}

/// Response from the GetFederationToken API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetFederationTokenResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub credentials: Credentials,
    pub federated_user: FederatedUser,
    pub packed_policy_size: Option<u32>,
}

/// Response from the GetSessionToken API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSessionTokenResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub credentials: Credentials,
}

/// STS error envelope returned in JSON mode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorDetail,
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ApiErrorDetail {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials_json(expiration: &str) -> String {
        format!(
            r#"{{
                "AccessKeyId": "ASIAEXAMPLE",
                "SecretAccessKey": "super-secret-key",
                "SessionToken": "super-secret-token",
                "Expiration": {}
            }}"#,
            expiration
        )
    }

    #[test]
    fn credentials_debug_redacts_secrets() {
        let creds: Credentials =
            serde_json::from_str(&credentials_json(r#""2024-01-01T01:00:00Z""#)).unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("ASIAEXAMPLE"));
        assert!(debug.contains("****"));
        assert!(!debug.contains("super-secret-key"));
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn expiration_accepts_rfc3339() {
        let creds: Credentials =
            serde_json::from_str(&credentials_json(r#""2011-07-15T23:28:33.359Z""#)).unwrap();
        assert_eq!(creds.expiration.timestamp(), 1_310_772_513);
        assert!(creds.is_expired());
        assert!(creds.time_to_expiry().is_none());
    }

    #[test]
    fn expiration_accepts_epoch_seconds() {
        let creds: Credentials = serde_json::from_str(&credentials_json("1310772513.0")).unwrap();
        assert_eq!(creds.expiration.timestamp(), 1_310_772_513);
    }

    #[test]
    fn future_expiration_is_not_expired() {
        let future = (Utc::now() + chrono::Duration::hours(1)).timestamp();
        let creds: Credentials =
            serde_json::from_str(&credentials_json(&future.to_string())).unwrap();
        assert!(!creds.is_expired());
        let remaining = creds.time_to_expiry().unwrap();
        assert!(remaining.as_secs() > 3500);
    }

    #[test]
    fn expiration_rejects_garbage() {
        let result = serde_json::from_str::<Credentials>(&credentials_json(r#""tomorrow""#));
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_assume_role_response() {
        let json = format!(
            r#"{{
                "Credentials": {},
                "AssumedRoleUser": {{
                    "AssumedRoleId": "AROA3XFRBF535PLBIFPI4:s3-access-example",
                    "Arn": "arn:aws:sts::123456789012:assumed-role/demo/s3-access-example"
                }},
                "PackedPolicySize": 6,
                "SourceIdentity": null
            }}"#,
            credentials_json(r#""2024-01-01T01:00:00Z""#)
        );
        let resp: AssumeRoleResponse = serde_json::from_str(&json).unwrap();
        assert!(resp.request_id.is_none());
        assert_eq!(resp.credentials.access_key_id, "ASIAEXAMPLE");
        assert_eq!(
            resp.assumed_role_user.assumed_role_id,
            "AROA3XFRBF535PLBIFPI4:s3-access-example"
        );
        assert_eq!(resp.packed_policy_size, Some(6));
        assert!(resp.source_identity.is_none());
    }

    #[test]
    fn deserialize_get_caller_identity_response() {
        let json = r#"{
            "RequestId": "01234567-89ab-cdef-0123-456789abcdef",
            "UserId": "AIDASAMPLEUSERID",
            "Account": "123456789012",
            "Arn": "arn:aws:iam::123456789012:user/DevAdmin"
        }"#;
        let resp: GetCallerIdentityResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.account, "123456789012");
        assert_eq!(resp.arn, "arn:aws:iam::123456789012:user/DevAdmin");
        assert_eq!(
            resp.request_id.as_deref(),
            Some("01234567-89ab-cdef-0123-456789abcdef")
        );
    }

    #[test]
    fn deserialize_federation_token_response() {
        let json = format!(
            r#"{{
                "Credentials": {},
                "FederatedUser": {{
                    "FederatedUserId": "123456789012:Bob",
                    "Arn": "arn:aws:sts::123456789012:federated-user/Bob"
                }},
                "PackedPolicySize": 8
            }}"#,
            credentials_json("1310772513")
        );
        let resp: GetFederationTokenResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(resp.federated_user.federated_user_id, "123456789012:Bob");
        assert_eq!(resp.packed_policy_size, Some(8));
    }

    #[test]
    fn deserialize_api_error_response() {
        let json = r#"{
            "Error": {
                "Code": "AccessDenied",
                "Message": "User is not authorized to perform: sts:AssumeRole",
                "Type": "Sender"
            },
            "RequestId": "err-req-001"
        }"#;
        let resp: ApiErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.error.code, "AccessDenied");
        assert_eq!(resp.error.kind.as_deref(), Some("Sender"));
        assert_eq!(resp.request_id.as_deref(), Some("err-req-001"));
    }
}
