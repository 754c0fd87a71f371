use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::config::AppConfig;
use crate::errors::{AppResult, ProviderError, ProviderResult};
use crate::model::{ImageRequest, ImageSource};
use crate::places::GooglePlacesPhotos;
use crate::stock::{PexelsPhotos, UnsplashPhotos};

const USER_AGENT: &str = concat!("trip-imagery/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT_SECS: u64 = 10;

/// One external image source taking part in the cascade.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn source(&self) -> ImageSource;

    /// Issues at most one outbound request and returns a renderable url.
    async fn fetch_url(&self, request: &ImageRequest) -> ProviderResult<String>;
}

pub fn http_client() -> AppResult<Client> {
    let http = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?;
    Ok(http)
}

/// Builds the network providers in the configured priority order. Providers
/// without a key are still included and fail fast when asked.
pub fn providers_from_config(config: &AppConfig, http: Client) -> Vec<Arc<dyn ImageProvider>> {
    config
        .provider_order
        .iter()
        .filter_map(|source| -> Option<Arc<dyn ImageProvider>> {
            match source {
                ImageSource::Google => Some(Arc::new(GooglePlacesPhotos::new(
                    http.clone(),
                    config.google_places_api_key.clone(),
                    config.google_places_search_url.clone(),
                    config.google_places_media_base.clone(),
                ))),
                ImageSource::Pexels => Some(Arc::new(PexelsPhotos::new(
                    http.clone(),
                    config.pexels_api_key.clone(),
                    config.pexels_search_url.clone(),
                ))),
                ImageSource::Unsplash => Some(Arc::new(UnsplashPhotos::new(
                    http.clone(),
                    config.unsplash_access_key.clone(),
                    config.unsplash_search_url.clone(),
                ))),
                ImageSource::Placeholder => None,
            }
        })
        .collect()
}

/// Turns a non-2xx response into `ProviderError::Status` carrying the body.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: Response,
) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        provider,
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn builds_providers_in_configured_order() {
        let mut config = AppConfig::unconfigured();
        config.provider_order = vec![ImageSource::Unsplash, ImageSource::Google];
        config.unsplash_access_key = Some(SecretString::from("key".to_string()));

        let providers = providers_from_config(&config, http_client().unwrap());
        let sources: Vec<_> = providers.iter().map(|p| p.source()).collect();
        assert_eq!(sources, vec![ImageSource::Unsplash, ImageSource::Google]);
    }

    #[tokio::test]
    async fn missing_keys_fail_without_network() {
        let config = AppConfig::unconfigured();
        let providers = providers_from_config(&config, http_client().unwrap());
        let request = ImageRequest::new("Grand Hotel", crate::model::ImageCategory::Hotel);
        for provider in providers {
            let err = provider.fetch_url(&request).await.unwrap_err();
            assert!(matches!(err, ProviderError::Configuration { .. }), "{err}");
        }
    }
}
