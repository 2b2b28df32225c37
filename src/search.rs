//! Client for the external book-search API (Google Books volumes endpoint).

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// Default search endpoint.
pub const DEFAULT_BOOK_SEARCH_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Default upstream request timeout in seconds.
pub const DEFAULT_SEARCH_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookSearchConfig {
    /// Volumes endpoint; the query is appended as `?q=`
    pub base_url: String,
    /// Optional API key, sent as `key=`
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for BookSearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BOOK_SEARCH_URL.to_string(),
            api_key: None,
            timeout_seconds: DEFAULT_SEARCH_TIMEOUT_SECONDS,
        }
    }
}

impl BookSearchConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("invalid book_search.base_url '{}': {}", self.base_url, e))?;
        if self.timeout_seconds == 0 {
            anyhow::bail!("book_search.timeout_seconds must be positive");
        }
        Ok(())
    }
}

/// One simplified search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    /// First listed author, empty when the volume has none.
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Blank query
    EmptyQuery,
    /// Network failure or non-success status
    FetchError(String),
    /// Response body was not the expected JSON
    ParseError(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyQuery => write!(f, "query parameter 'q' is required"),
            Self::FetchError(msg) => write!(f, "book search request failed: {}", msg),
            Self::ParseError(msg) => write!(f, "book search response invalid: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<String>,
}

/// Reduce a raw volumes response to `{title, author}` pairs.
pub fn parse_volumes(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let response: VolumesResponse =
        serde_json::from_str(body).map_err(|e| SearchError::ParseError(e.to_string()))?;

    Ok(response
        .items
        .into_iter()
        .map(|v| SearchResult {
            title: v.volume_info.title,
            author: v
                .volume_info
                .authors
                .into_iter()
                .next()
                .unwrap_or_default(),
        })
        .collect())
}

/// HTTP client forwarding free-text queries to the search API.
#[derive(Clone)]
pub struct BookSearchClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BookSearchClient {
    pub fn new(config: &BookSearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SearchError::FetchError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the request URL for `query`.
    pub fn search_url(&self, query: &str) -> Result<Url, SearchError> {
        let mut params = vec![("q", query)];
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }
        Url::parse_with_params(&self.base_url, &params)
            .map_err(|e| SearchError::FetchError(e.to_string()))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let url = self.search_url(query)?;
        debug!("Searching books: q={}", query);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Book search returned HTTP {}", response.status());
            return Err(SearchError::FetchError(format!(
                "HTTP {} from search endpoint",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::FetchError(e.to_string()))?;

        parse_volumes(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_volumes_takes_first_author() {
        let body = r#"{
            "kind": "books#volumes",
            "items": [
                {"volumeInfo": {"title": "Dune", "authors": ["Frank Herbert", "Someone Else"]}},
                {"volumeInfo": {"title": "Anonymous Work"}}
            ]
        }"#;

        let results = parse_volumes(body).unwrap();
        assert_eq!(
            results,
            vec![
                SearchResult {
                    title: "Dune".to_string(),
                    author: "Frank Herbert".to_string(),
                },
                SearchResult {
                    title: "Anonymous Work".to_string(),
                    author: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_volumes_without_items() {
        let results = parse_volumes(r#"{"kind": "books#volumes", "totalItems": 0}"#).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_volumes_rejects_garbage() {
        assert!(matches!(
            parse_volumes("<html>"),
            Err(SearchError::ParseError(_))
        ));
    }

    #[test]
    fn test_search_url_encodes_query_and_key() {
        let config = BookSearchConfig {
            api_key: Some("k3y".to_string()),
            ..Default::default()
        };
        let client = BookSearchClient::new(&config).unwrap();

        let url = client.search_url("dune & herbert").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "dune & herbert".to_string()),
                ("key".to_string(), "k3y".to_string()),
            ]
        );
        assert!(url.as_str().starts_with(DEFAULT_BOOK_SEARCH_URL));
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_before_network() {
        let client = BookSearchClient::new(&BookSearchConfig::default()).unwrap();
        assert_eq!(client.search("   ").await, Err(SearchError::EmptyQuery));
    }

    #[test]
    fn test_config_validation() {
        assert!(BookSearchConfig::default().validate().is_ok());

        let bad_url = BookSearchConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(bad_url.validate().is_err());

        let zero_timeout = BookSearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());
    }
}
