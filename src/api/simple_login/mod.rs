//! SimpleLogin implementation of [`ContactApi`].
//!
//! Endpoints used:
//! - `GET {base}/v2/aliases?page_id=N`
//! - `GET {base}/aliases/{alias_id}/contacts?page_id=N`
//! - `DELETE {base}/contacts/{contact_id}`
//!
//! See <https://github.com/simple-login/app/blob/master/docs/api.md>.

mod types;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
pub use types::{AliasesPage, ContactsPage, IdRecord};
use url::Url;

use super::{ApiError, ContactApi};
use crate::{
    config::ApiConfig,
    ids::{AliasId, ContactId, PageId},
};

/// SimpleLogin authenticates with this header, not `Authorization`.
pub const AUTH_HEADER: &str = "Authentication";

/// HTTP client for the SimpleLogin API.
#[derive(Clone)]
pub struct SimpleLoginClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for SimpleLoginClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleLoginClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SimpleLoginClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from the `[api]` section and an already resolved key.
    pub fn from_config(config: &ApiConfig, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let http = config.build_client()?;
        Ok(Self::new(http, &config.base_url, api_key))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, page: Option<PageId>) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if let Some(page) = page {
            url.query_pairs_mut()
                .append_pair("page_id", &page.0.to_string());
        }
        Ok(url)
    }

    /// Send an authenticated request and reject non-2xx responses.
    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        let response = request.header(AUTH_HEADER, &self.api_key).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| unreadable_body(&e));
            tracing::debug!(url = %url, %status, "SimpleLogin request rejected");
            return Err(ApiError::Status {
                status,
                url: url.to_string(),
                body,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.send(self.http.get(url.clone()), &url).await?;
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Stand-in for an error body that could not be read.
fn unreadable_body(err: &reqwest::Error) -> String {
    format!("<unreadable body: {err}>")
}

#[async_trait]
impl ContactApi for SimpleLoginClient {
    async fn list_aliases(&self, page: PageId) -> Result<Vec<AliasId>, ApiError> {
        let url = self.endpoint("/v2/aliases", Some(page))?;
        let body: AliasesPage = self.get_json(url).await?;
        Ok(body.into_ids())
    }

    async fn list_contacts(
        &self,
        alias: AliasId,
        page: PageId,
    ) -> Result<Vec<ContactId>, ApiError> {
        let url = self.endpoint(&format!("/aliases/{alias}/contacts"), Some(page))?;
        let body: ContactsPage = self.get_json(url).await?;
        Ok(body.into_ids())
    }

    async fn delete_contact(&self, contact: ContactId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/contacts/{contact}"), None)?;
        self.send(self.http.delete(url.clone()), &url).await?;
        tracing::trace!(%contact, "Contact deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    use super::*;

    const TEST_KEY: &str = "sl-test-key";

    fn client_for(server: &MockServer) -> SimpleLoginClient {
        SimpleLoginClient::new(Client::new(), format!("{}/api", server.uri()), TEST_KEY)
    }

    #[tokio::test]
    async fn test_list_aliases_sends_page_and_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/aliases"))
            .and(query_param("page_id", "3"))
            .and(header(AUTH_HEADER, TEST_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "aliases": [{"id": 5, "email": "a@sl.local"}, {"id": 9}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids = client_for(&server).list_aliases(PageId(3)).await.unwrap();
        assert_eq!(ids, vec![AliasId(5), AliasId(9)]);
    }

    #[tokio::test]
    async fn test_list_contacts_scopes_path_by_alias() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/aliases/77/contacts"))
            .and(query_param("page_id", "0"))
            .and(header(AUTH_HEADER, TEST_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "contacts": [{"id": 100, "contact": "x@example.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids = client_for(&server)
            .list_contacts(AliasId(77), PageId::FIRST)
            .await
            .unwrap();
        assert_eq!(ids, vec![ContactId(100)]);
    }

    #[tokio::test]
    async fn test_delete_contact_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/contacts/101"))
            .and(header(AUTH_HEADER, TEST_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_string("not even json"))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .delete_contact(ContactId(101))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported_before_decoding() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/aliases"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Wrong api key"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_aliases(PageId::FIRST)
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, body, url } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert!(body.contains("Wrong api key"));
                assert!(url.ends_with("/api/v2/aliases?page_id=0"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_delete_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/contacts/5"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .delete_contact(ContactId(5))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_missing_list_key_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/aliases/1/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_contacts(AliasId(1), PageId::FIRST)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_request_error() {
        // Nothing listens on port 1.
        let client = SimpleLoginClient::new(Client::new(), "http://127.0.0.1:1/api", TEST_KEY);

        let err = client.list_aliases(PageId::FIRST).await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreadable_body_is_marked_not_blank() {
        let err = Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .unwrap_err();

        let body = unreadable_body(&err);
        assert!(body.starts_with("<unreadable body: "), "{body}");
        assert!(body.len() > "<unreadable body: >".len());
    }

    #[test]
    fn test_trailing_slash_trimmed_from_base_url() {
        let client = SimpleLoginClient::new(Client::new(), "https://sl.local/api/", TEST_KEY);
        assert_eq!(client.base_url(), "https://sl.local/api");

        let url = client.endpoint("/contacts/9", None).unwrap();
        assert_eq!(url.as_str(), "https://sl.local/api/contacts/9");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = SimpleLoginClient::new(Client::new(), "https://sl.local/api", TEST_KEY);
        let debug = format!("{client:?}");
        assert!(!debug.contains(TEST_KEY));
        assert!(debug.contains("<redacted>"));
    }
}
