use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::trace;

use crate::errors::{ProviderError, ProviderResult};
use crate::model::{ImageRequest, ImageSource};
use crate::provider::{ensure_success, ImageProvider};
use crate::query::build_query;

const PEXELS: &str = "Pexels";
const UNSPLASH: &str = "Unsplash";

pub struct PexelsPhotos {
    http: Client,
    api_key: Option<SecretString>,
    search_url: String,
}

#[derive(Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Deserialize)]
struct PexelsPhoto {
    src: PexelsSources,
}

#[derive(Deserialize)]
struct PexelsSources {
    medium: String,
}

impl PexelsPhotos {
    pub fn new(http: Client, api_key: Option<SecretString>, search_url: String) -> Self {
        Self {
            http,
            api_key,
            search_url,
        }
    }
}

#[async_trait]
impl ImageProvider for PexelsPhotos {
    fn source(&self) -> ImageSource {
        ImageSource::Pexels
    }

    async fn fetch_url(&self, request: &ImageRequest) -> ProviderResult<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ProviderError::Configuration { provider: PEXELS })?;

        let query = build_query(request.place_name(), request.category());
        trace!(%query, "pexels search");
        let response = self
            .http
            .get(&self.search_url)
            .query(&[
                ("query", query.as_str()),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .header("Authorization", api_key.expose_secret())
            .send()
            .await?;
        let response = ensure_success(PEXELS, response).await?;

        let parsed: PexelsResponse = response.json().await?;
        parsed
            .photos
            .into_iter()
            .next()
            .map(|photo| photo.src.medium)
            .filter(|url| !url.is_empty())
            .ok_or(ProviderError::NoResult { provider: PEXELS })
    }
}

pub struct UnsplashPhotos {
    http: Client,
    access_key: Option<SecretString>,
    search_url: String,
}

#[derive(Deserialize)]
struct UnsplashResponse {
    #[serde(default)]
    results: Vec<UnsplashPhoto>,
}

#[derive(Deserialize)]
struct UnsplashPhoto {
    urls: UnsplashUrls,
}

#[derive(Deserialize)]
struct UnsplashUrls {
    regular: String,
}

impl UnsplashPhotos {
    pub fn new(http: Client, access_key: Option<SecretString>, search_url: String) -> Self {
        Self {
            http,
            access_key,
            search_url,
        }
    }
}

/// Unsplash serves through imgix, which resizes from `w`/`h` query params.
fn sized_unsplash_url(raw: &str, width: u32, height: u32) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !matches!(key.as_ref(), "w" | "h" | "fit"))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("w", &width.to_string())
        .append_pair("h", &height.to_string())
        .append_pair("fit", "crop");
    url.into()
}

#[async_trait]
impl ImageProvider for UnsplashPhotos {
    fn source(&self) -> ImageSource {
        ImageSource::Unsplash
    }

    async fn fetch_url(&self, request: &ImageRequest) -> ProviderResult<String> {
        let access_key = self
            .access_key
            .as_ref()
            .ok_or(ProviderError::Configuration { provider: UNSPLASH })?;

        let query = build_query(request.place_name(), request.category());
        trace!(%query, "unsplash search");
        let response = self
            .http
            .get(&self.search_url)
            .query(&[
                ("query", query.as_str()),
                ("per_page", "1"),
                ("orientation", "landscape"),
                ("client_id", access_key.expose_secret()),
            ])
            .send()
            .await?;
        let response = ensure_success(UNSPLASH, response).await?;

        let parsed: UnsplashResponse = response.json().await?;
        parsed
            .results
            .into_iter()
            .next()
            .map(|photo| photo.urls.regular)
            .filter(|url| !url.is_empty())
            .map(|url| sized_unsplash_url(&url, request.width(), request.height()))
            .ok_or(ProviderError::NoResult { provider: UNSPLASH })
    }
}
