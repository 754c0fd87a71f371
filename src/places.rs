use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::{ProviderError, ProviderResult};
use crate::model::{ImageRequest, ImageSource};
use crate::provider::{ensure_success, ImageProvider};
use crate::query::build_place_query;

const PROVIDER: &str = "Google Places";
const FIELD_MASK: &str = "places.photos.name";

/// Text search against the Places API, exchanging the first photo reference
/// for a sized media url.
pub struct GooglePlacesPhotos {
    http: Client,
    api_key: Option<SecretString>,
    search_url: String,
    media_base: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextBody<'a> {
    text_query: &'a str,
    max_result_count: u8,
}

#[derive(Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<ResponsePlace>,
}

#[derive(Deserialize)]
struct ResponsePlace {
    #[serde(default)]
    photos: Vec<ResponsePhoto>,
}

#[derive(Deserialize)]
struct ResponsePhoto {
    name: String,
}

impl GooglePlacesPhotos {
    pub fn new(
        http: Client,
        api_key: Option<SecretString>,
        search_url: String,
        media_base: String,
    ) -> Self {
        Self {
            http,
            api_key,
            search_url,
            media_base,
        }
    }

    fn media_url(&self, photo_name: &str, key: &str, request: &ImageRequest) -> String {
        let raw = format!(
            "{}/{}/media",
            self.media_base.trim_end_matches('/'),
            photo_name.trim_start_matches('/')
        );
        match Url::parse(&raw) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("key", key)
                    .append_pair("maxHeightPx", &request.height().to_string())
                    .append_pair("maxWidthPx", &request.width().to_string());
                url.into()
            }
            Err(_) => format!(
                "{raw}?key={key}&maxHeightPx={}&maxWidthPx={}",
                request.height(),
                request.width()
            ),
        }
    }
}

#[async_trait]
impl ImageProvider for GooglePlacesPhotos {
    fn source(&self) -> ImageSource {
        ImageSource::Google
    }

    async fn fetch_url(&self, request: &ImageRequest) -> ProviderResult<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ProviderError::Configuration { provider: PROVIDER })?;

        let text_query = build_place_query(request.place_name(), request.address());
        trace!(query = %text_query, "google places photo search");
        let body = SearchTextBody {
            text_query: &text_query,
            max_result_count: 1,
        };

        let response = self
            .http
            .post(&self.search_url)
            .header("X-Goog-Api-Key", api_key.expose_secret())
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(PROVIDER, response).await?;

        let parsed: SearchTextResponse = response.json().await?;
        let photo_name = parsed
            .places
            .into_iter()
            .next()
            .and_then(|place| place.photos.into_iter().next())
            .map(|photo| photo.name)
            .filter(|name| !name.trim().is_empty())
            .ok_or(ProviderError::NoResult { provider: PROVIDER })?;

        Ok(self.media_url(&photo_name, api_key.expose_secret(), request))
    }
}
