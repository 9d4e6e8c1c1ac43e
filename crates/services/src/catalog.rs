use std::env;

use async_trait::async_trait;
use quiz_core::model::MovieRecord;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{CatalogError, ImageFetchError};

/// Asynchronous source of movie records.
///
/// The quiz only depends on this shape; production uses the HTTP
/// implementation below, tests substitute doubles.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Load the full movie list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the list cannot be retrieved.
    async fn load_movies(&self) -> Result<Vec<MovieRecord>, CatalogError>;
}

/// Fetches poster payloads for questions.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download the raw bytes behind `url`.
    ///
    /// # Errors
    ///
    /// Returns `ImageFetchError` when the download fails.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, ImageFetchError>;
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
}

impl CatalogConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("MOVIE_QUIZ_API_BASE_URL")
            .unwrap_or_else(|_| "https://tv-api.com/en/API".into());
        let api_key = env::var("MOVIE_QUIZ_API_KEY").unwrap_or_else(|_| "k_zcuw1ytf".into());
        Self { base_url, api_key }
    }
}

/// Movie catalog backed by the top-250 HTTP endpoint.
#[derive(Clone)]
pub struct ImdbCatalog {
    client: Client,
    config: CatalogConfig,
}

impl ImdbCatalog {
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(CatalogConfig::from_env())
    }
}

#[async_trait]
impl MovieCatalog for ImdbCatalog {
    async fn load_movies(&self) -> Result<Vec<MovieRecord>, CatalogError> {
        let url = format!(
            "{}/Top250Movies/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_key
        );

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus(response.status()));
        }

        let body: TopMoviesResponse = response.json().await?;
        if !body.error_message.is_empty() {
            return Err(CatalogError::Service(body.error_message));
        }

        Ok(body
            .items
            .into_iter()
            .filter_map(TopMovieItem::into_record)
            .collect())
    }
}

/// Poster fetcher backed by a plain HTTP GET.
#[derive(Clone, Default)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, ImageFetchError> {
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(ImageFetchError::HttpStatus(response.status()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct TopMoviesResponse {
    #[serde(default, rename = "errorMessage")]
    error_message: String,
    #[serde(default)]
    items: Vec<TopMovieItem>,
}

#[derive(Debug, Deserialize)]
struct TopMovieItem {
    title: String,
    #[serde(rename = "imDbRating")]
    rating: String,
    #[serde(rename = "image")]
    image_url: String,
}

impl TopMovieItem {
    fn into_record(self) -> Option<MovieRecord> {
        match Url::parse(&self.image_url) {
            Ok(image_url) => Some(MovieRecord::new(self.title, self.rating, image_url)),
            Err(err) => {
                tracing::debug!(title = %self.title, error = %err, "skipping movie with malformed poster url");
                None
            }
        }
    }
}
