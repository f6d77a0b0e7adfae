//! Mock identity provider for JWKS tests
//!
//! Provides `MockIdentityProvider`, a wiremock server that answers OIDC
//! discovery and serves a configurable JWKS document.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the discovery document is served from.
pub const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

/// Path the key set is served from.
pub const JWKS_PATH: &str = "/keys";

/// Wiremock-backed identity provider.
///
/// The issuer is the server's base URI and the JWKS document lives at
/// `{issuer}/keys`.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_lookup() {
///     let idp = MockIdentityProvider::start().await;
///     let keypair = test_keypair(1)?;
///     idp.mount_key_set(vec![keypair.jwk_json()]).await;
///
///     let client = JwksClient::new(idp.issuer(), CacheConfig::default()).await?;
///     let key = client.get_public_key(keypair.kid()).await?;
/// }
/// ```
pub struct MockIdentityProvider {
    server: MockServer,
    issuer: String,
    jwks_uri: String,
}

impl MockIdentityProvider {
    /// Start a provider with discovery already mounted.
    pub async fn start() -> Self {
        let idp = Self::start_without_discovery().await;
        Mock::given(method("GET"))
            .and(path(DISCOVERY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(idp.discovery_document()))
            .mount(&idp.server)
            .await;
        idp
    }

    /// Start a provider with nothing mounted.
    pub async fn start_without_discovery() -> Self {
        let server = MockServer::start().await;
        let issuer = server.uri();
        let jwks_uri = format!("{issuer}{JWKS_PATH}");
        Self {
            server,
            issuer,
            jwks_uri,
        }
    }

    /// Issuer URL (the server's base URI, no trailing slash).
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// URI advertised as `jwks_uri` in the discovery document.
    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }

    /// Underlying wiremock server, for tests that mount their own mocks.
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Discovery document this provider serves.
    pub fn discovery_document(&self) -> Value {
        json!({
            "issuer": self.issuer,
            "jwks_uri": self.jwks_uri,
            "id_token_signing_alg_values_supported": ["RS256"],
        })
    }

    /// Answer discovery with `status` and an empty body.
    pub async fn mount_discovery_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(DISCOVERY_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Serve discovery and require exactly `count` discovery requests.
    ///
    /// Verified when the provider is dropped.
    pub async fn expect_discovery_requests(&self, count: u64) {
        Mock::given(method("GET"))
            .and(path(DISCOVERY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(self.discovery_document()))
            .expect(count)
            .mount(&self.server)
            .await;
    }

    /// Serve `{"keys": keys}` at the JWKS path.
    pub async fn mount_key_set(&self, keys: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": keys })))
            .mount(&self.server)
            .await;
    }

    /// Serve `{"keys": keys}` and require exactly `count` JWKS requests.
    ///
    /// Verified when the provider is dropped.
    pub async fn mount_key_set_expecting(&self, keys: Vec<Value>, count: u64) {
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": keys })))
            .expect(count)
            .mount(&self.server)
            .await;
    }

    /// Answer the JWKS path with `status` and `body`.
    pub async fn mount_key_set_response(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the JWKS path has received so far.
    pub async fn jwks_request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == JWKS_PATH)
            .count()
    }
}
