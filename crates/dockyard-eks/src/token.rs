//! Short-lived bearer tokens for EKS API servers.
//!
//! The token is a presigned STS `GetCallerIdentity` URL. The API server
//! replays it against STS to learn the caller's identity, and the signed
//! `x-k8s-aws-id` header binds it to one cluster.

use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SignatureLocation, SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use dockyard_core::{BackendError, BackendResult};
use secrecy::SecretString;
use tracing::debug;

/// Prefix the EKS authenticator expects on presigned tokens
pub const TOKEN_PREFIX: &str = "k8s-aws-v1.";

/// Header that binds the token to a cluster
pub const CLUSTER_ID_HEADER: &str = "x-k8s-aws-id";

/// Presigned URL lifetime
const TOKEN_EXPIRY: Duration = Duration::from_secs(60);

/// Produces a bearer token for one cluster
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Generate a fresh token. Failures are `AuthDerivation` errors.
    async fn token_for(&self, cluster: &str) -> BackendResult<SecretString>;
}

/// [`TokenSource`] that presigns STS requests with the session credentials
pub struct StsTokenSource {
    credentials: Option<SharedCredentialsProvider>,
    region: Option<String>,
}

impl StsTokenSource {
    pub fn new(credentials: SharedCredentialsProvider, region: impl Into<String>) -> Self {
        Self {
            credentials: Some(credentials),
            region: Some(region.into()),
        }
    }

    /// Use the credential chain and region of a resolved session.
    ///
    /// Missing pieces are reported per cluster when a token is requested.
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self {
            credentials: config.credentials_provider(),
            region: config.region().map(|r| r.to_string()),
        }
    }
}

#[async_trait]
impl TokenSource for StsTokenSource {
    async fn token_for(&self, cluster: &str) -> BackendResult<SecretString> {
        let provider = self
            .credentials
            .as_ref()
            .ok_or_else(|| BackendError::auth(cluster, "no AWS credentials provider configured"))?;
        let region = self
            .region
            .as_deref()
            .ok_or_else(|| BackendError::auth(cluster, "no AWS region configured"))?;

        let credentials = provider
            .provide_credentials()
            .await
            .map_err(|e| BackendError::auth(cluster, format!("failed to load credentials: {}", e)))?;

        let url = presign_url(credentials, region, cluster, SystemTime::now())?;
        debug!(cluster = %cluster, region = %region, "Generated EKS bearer token");
        Ok(SecretString::from(encode_token(&url)))
    }
}

fn sts_url(region: &str) -> String {
    format!(
        "https://sts.{}.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15",
        region
    )
}

/// Presign an STS `GetCallerIdentity` GET for `cluster` and return the URL
pub fn presign_url(
    credentials: Credentials,
    region: &str,
    cluster: &str,
    time: SystemTime,
) -> BackendResult<String> {
    let auth = |msg: String| BackendError::auth(cluster, msg);

    let identity: Identity = credentials.into();
    let mut settings = SigningSettings::default();
    settings.signature_location = SignatureLocation::QueryParams;
    settings.expires_in = Some(TOKEN_EXPIRY);

    let params: SigningParams<'_> = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name("sts")
        .time(time)
        .settings(settings)
        .build()
        .map_err(|e| auth(format!("invalid signing parameters: {}", e)))?
        .into();

    let url = sts_url(region);
    let signable = SignableRequest::new(
        "GET",
        url.as_str(),
        std::iter::once((CLUSTER_ID_HEADER, cluster)),
        SignableBody::Bytes(&[]),
    )
    .map_err(|e| auth(format!("unsignable token request: {}", e)))?;

    let (instructions, _signature) = sign(signable, &params)
        .map_err(|e| auth(format!("token signing failed: {}", e)))?
        .into_parts();

    let mut request = http::Request::builder()
        .method("GET")
        .uri(url.as_str())
        .header(CLUSTER_ID_HEADER, cluster)
        .body(())
        .map_err(|e| auth(format!("invalid token request: {}", e)))?;
    instructions.apply_to_request_http1x(&mut request);

    Ok(request.uri().to_string())
}

/// Wrap a presigned URL in the token envelope
///
/// ```
/// # use dockyard_eks::token::encode_token;
/// assert_eq!(encode_token("https://sts"), "k8s-aws-v1.aHR0cHM6Ly9zdHM");
/// ```
pub fn encode_token(presigned_url: &str) -> String {
    format!("{}{}", TOKEN_PREFIX, URL_SAFE_NO_PAD.encode(presigned_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn credentials() -> Credentials {
        Credentials::new("AKIDEXAMPLE", "secret", None, None, "static")
    }

    #[test]
    fn test_presigned_url_shape() {
        let url = presign_url(credentials(), "us-west-2", "blue", SystemTime::now()).unwrap();

        assert!(url.starts_with("https://sts.us-west-2.amazonaws.com/?"));
        assert!(url.contains("Action=GetCallerIdentity"));
        assert!(url.contains("X-Amz-Expires=60"));
        assert!(url.contains("X-Amz-Signature="));
        assert!(url.contains("x-k8s-aws-id"));
        assert!(url.contains("AKIDEXAMPLE"));
    }

    #[tokio::test]
    async fn test_token_envelope_decodes_to_presigned_url() {
        let source = StsTokenSource::new(SharedCredentialsProvider::new(credentials()), "us-east-1");
        let token = source.token_for("blue").await.unwrap();
        let token = token.expose_secret();

        let body = token.strip_prefix(TOKEN_PREFIX).unwrap();
        assert!(!body.contains('='));
        let url = String::from_utf8(URL_SAFE_NO_PAD.decode(body).unwrap()).unwrap();
        assert!(url.starts_with("https://sts.us-east-1.amazonaws.com/"));
        assert!(url.contains("X-Amz-Expires=60"));
    }

    #[tokio::test]
    async fn test_missing_session_is_auth_failure() {
        let source = StsTokenSource {
            credentials: None,
            region: Some("us-east-1".to_string()),
        };
        let err = source.token_for("blue").await.unwrap_err();
        assert!(matches!(err, BackendError::AuthDerivation { ref cluster, .. } if cluster == "blue"));

        let source = StsTokenSource {
            credentials: Some(SharedCredentialsProvider::new(credentials())),
            region: None,
        };
        assert!(matches!(
            source.token_for("blue").await,
            Err(BackendError::AuthDerivation { .. })
        ));
    }
}
