//! HTTP client for the BGG XML API v2.
//!
//! BGG answers collection queries with HTTP 202 while it builds the result
//! server-side, so every request runs through a poll loop: wait a fixed
//! interval and reissue the identical request until a final response
//! arrives or the attempt budget runs out.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{BggError, Error};
use crate::util::chunk::chunk;

use super::model::{BoardGame, CollectionGame, ItemType};
use super::response;

/// Default public BGG API base URL.
pub const DEFAULT_API_URL: &str = "https://boardgamegeek.com/xmlapi2";

/// Maximum ids per `thing` request. BGG starts rejecting or truncating
/// requests past this point.
pub const THING_REQUEST_LIMIT: usize = 20;

/// Poll-until-ready policy for BGG requests.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Fixed wait between attempts while BGG reports "processing".
    pub wait: Duration,
    /// Total attempt budget, including the first request.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            wait: Duration::from_secs(5),
            max_attempts: 10,
        }
    }
}

/// Client for the BGG XML API.
///
/// Holds its configuration explicitly; construct once and pass it to
/// whatever needs catalog access.
pub struct BggClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl BggClient {
    /// Creates a new client for the API at `base_url`.
    ///
    /// When `token` is set it is attached as a bearer credential on every
    /// request attempt.
    pub fn new(base_url: &str, token: Option<String>, retry: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            retry,
        }
    }

    /// Fetches a user's collection, optionally scoped by item subtype.
    ///
    /// Only entries the user marked as owned are requested (`own=1`), but
    /// the `owned` flag is still read from each entry's status since BGG
    /// includes previously-owned entries in some responses.
    pub async fn fetch_collection(
        &self,
        username: &str,
        include: Option<ItemType>,
        exclude: Option<ItemType>,
    ) -> Result<Vec<CollectionGame>, Error> {
        let mut query = format!("collection?username={username}&own=1");
        if let Some(include) = include {
            query.push_str(&format!("&subtype={}", include.as_query_value()));
        }
        if let Some(exclude) = exclude {
            query.push_str(&format!("&excludesubtype={}", exclude.as_query_value()));
        }

        let body = self.request(&query).await?;
        let games = response::parse_collection(&body).map_err(|err| BggError::MalformedResponse {
            endpoint: endpoint_path(&query),
            reason: err.to_string(),
        })?;

        debug!(
            username,
            entries = games.len(),
            "Fetched collection from BGG"
        );

        Ok(games)
    }

    /// Fetches full records for `ids`, batching requests through
    /// [`THING_REQUEST_LIMIT`].
    ///
    /// Results are concatenated in batch order. The first failing batch
    /// aborts the whole call; no partial results are returned.
    pub async fn fetch_items(
        &self,
        ids: &[u64],
        item_type: ItemType,
    ) -> Result<Vec<BoardGame>, Error> {
        let mut items = Vec::with_capacity(ids.len());

        for batch in chunk(ids.to_vec(), THING_REQUEST_LIMIT)? {
            let csv = batch
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let query = format!("thing?id={csv}&type={}", item_type.as_query_value());

            let body = self.request(&query).await?;
            let mut parsed =
                response::parse_things(&body).map_err(|err| BggError::MalformedResponse {
                    endpoint: endpoint_path(&query),
                    reason: err.to_string(),
                })?;
            items.append(&mut parsed);
        }

        debug!(
            requested = ids.len(),
            returned = items.len(),
            "Fetched item records from BGG"
        );

        Ok(items)
    }

    /// Issues a GET request, polling while BGG reports "processing".
    ///
    /// HTTP 202 and empty-body responses are treated as non-final; any
    /// other response is final even on a non-200 status, and its body is
    /// returned for parsing.
    async fn request(&self, path_and_query: &str) -> Result<String, Error> {
        let url = format!("{}/{}", self.base_url, path_and_query);
        let endpoint = endpoint_path(path_and_query);

        for attempt in 1..=self.retry.max_attempts {
            let mut request = self.http.get(&url);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await.map_err(BggError::Transport)?;
            let status = response.status();
            let body = response.text().await.map_err(BggError::Transport)?;

            if status == reqwest::StatusCode::ACCEPTED || body.is_empty() {
                debug!(
                    endpoint = %endpoint,
                    attempt,
                    max_attempts = self.retry.max_attempts,
                    "BGG still processing, waiting before retry"
                );
                if attempt < self.retry.max_attempts {
                    tokio::time::sleep(self.retry.wait).await;
                }
                continue;
            }

            if attempt > 1 {
                debug!(endpoint = %endpoint, attempt, "BGG request succeeded after retries");
            }
            return Ok(body);
        }

        warn!(
            endpoint = %endpoint,
            attempts = self.retry.max_attempts,
            "Retry budget exhausted waiting for BGG"
        );
        Err(BggError::UpstreamUnavailable {
            endpoint,
            attempts: self.retry.max_attempts,
        }
        .into())
    }
}

/// The endpoint path without its query string, for error messages and logs.
fn endpoint_path(path_and_query: &str) -> String {
    let path = path_and_query
        .split('?')
        .next()
        .unwrap_or(path_and_query);
    format!("/{path}")
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const PROCESSING_BODY: &str =
        r#"<message>Your request for this collection has been accepted and will be processed.</message>"#;

    fn test_client(server: &MockServer) -> BggClient {
        BggClient::new(
            &server.uri(),
            None,
            RetryPolicy {
                wait: Duration::ZERO,
                max_attempts: 4,
            },
        )
    }

    fn collection_body() -> &'static str {
        r#"<items totalitems="1">
            <item objecttype="thing" objectid="13" subtype="boardgame" collid="1">
                <name sortindex="1">Catan</name>
                <yearpublished>1995</yearpublished>
                <status own="1"/>
            </item>
        </items>"#
    }

    #[tokio::test]
    async fn test_fetch_collection_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collection"))
            .and(query_param("username", "alice"))
            .and(query_param("own", "1"))
            .and(query_param("subtype", "boardgame"))
            .and(query_param("excludesubtype", "boardgameexpansion"))
            .respond_with(ResponseTemplate::new(200).set_body_string(collection_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let games = client
            .fetch_collection(
                "alice",
                Some(ItemType::BoardGame),
                Some(ItemType::Expansion),
            )
            .await
            .unwrap();

        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "Catan");
        assert!(games[0].owned);
    }

    #[tokio::test]
    async fn test_fetch_collection_retries_on_processing() {
        let server = MockServer::start().await;

        // Two "processing" answers, then the real payload.
        Mock::given(method("GET"))
            .and(path("/collection"))
            .respond_with(ResponseTemplate::new(202).set_body_string(PROCESSING_BODY))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/collection"))
            .respond_with(ResponseTemplate::new(200).set_body_string(collection_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let games = client.fetch_collection("alice", None, None).await.unwrap();

        assert_eq!(games.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_collection_retry_budget_exhausted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collection"))
            .respond_with(ResponseTemplate::new(202).set_body_string(PROCESSING_BODY))
            .expect(4)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.fetch_collection("alice", None, None).await;

        match result {
            Err(Error::BggError(BggError::UpstreamUnavailable { endpoint, attempts })) => {
                assert_eq!(endpoint, "/collection");
                assert_eq!(attempts, 4);
            }
            other => panic!("Expected UpstreamUnavailable, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_body_treated_as_processing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collection"))
            .respond_with(ResponseTemplate::new(200))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/collection"))
            .respond_with(ResponseTemplate::new(200).set_body_string(collection_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let games = client.fetch_collection("alice", None, None).await.unwrap();

        assert_eq!(games.len(), 1);
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collection"))
            .and(header("authorization", "Bearer sekrit"))
            .respond_with(ResponseTemplate::new(200).set_body_string(collection_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = BggClient::new(
            &server.uri(),
            Some("sekrit".to_string()),
            RetryPolicy {
                wait: Duration::ZERO,
                max_attempts: 2,
            },
        );
        let games = client.fetch_collection("alice", None, None).await.unwrap();

        assert_eq!(games.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_items_batches_ids() {
        let server = MockServer::start().await;

        let first_batch: Vec<String> = (1..=20).map(|id| id.to_string()).collect();
        let second_batch: Vec<String> = (21..=25).map(|id| id.to_string()).collect();

        Mock::given(method("GET"))
            .and(path("/thing"))
            .and(query_param("id", first_batch.join(",")))
            .and(query_param("type", "boardgame"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<items>
                    <item type="boardgame" id="1">
                        <name type="primary" sortindex="1" value="First"/>
                        <yearpublished value="2001"/>
                    </item>
                </items>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .and(query_param("id", second_batch.join(",")))
            .and(query_param("type", "boardgame"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<items>
                    <item type="boardgame" id="21">
                        <name type="primary" sortindex="1" value="Second"/>
                        <yearpublished value="2002"/>
                    </item>
                </items>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let ids: Vec<u64> = (1..=25).collect();
        let client = test_client(&server);
        let items = client.fetch_items(&ids, ItemType::BoardGame).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "First");
        assert_eq!(items[1].name, "Second");
    }

    #[tokio::test]
    async fn test_fetch_items_no_ids_makes_no_requests() {
        let server = MockServer::start().await;

        let client = test_client(&server);
        let items = client.fetch_items(&[], ItemType::Expansion).await.unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/thing"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not xml <<<"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.fetch_items(&[1], ItemType::BoardGame).await;

        match result {
            Err(Error::BggError(BggError::MalformedResponse { endpoint, .. })) => {
                assert_eq!(endpoint, "/thing");
            }
            other => panic!("Expected MalformedResponse, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_final_non_200_body_is_parsed() {
        let server = MockServer::start().await;

        // A non-200 final status with a parseable body is still accepted.
        Mock::given(method("GET"))
            .and(path("/collection"))
            .respond_with(ResponseTemplate::new(429).set_body_string(collection_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let games = client.fetch_collection("alice", None, None).await.unwrap();

        assert_eq!(games.len(), 1);
    }
}
