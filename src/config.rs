use std::time::Duration;
use std::{env, io};

use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, warn};

use crate::model::ImageSource;

const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 8_000;
const DEFAULT_GOOGLE_PLACES_SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchText";
const DEFAULT_GOOGLE_PLACES_MEDIA_BASE: &str = "https://places.googleapis.com/v1";
const DEFAULT_PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";
const DEFAULT_UNSPLASH_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";
const DEFAULT_PICSUM_BASE_URL: &str = "https://picsum.photos";
const DEFAULT_STYLED_PLACEHOLDER_BASE_URL: &str = "https://via.placeholder.com";

pub const DEFAULT_PROVIDER_ORDER: &[ImageSource] =
    &[ImageSource::Pexels, ImageSource::Google, ImageSource::Unsplash];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    Seeded,
    Styled,
}

impl PlaceholderStyle {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "styled" => PlaceholderStyle::Styled,
            _ => PlaceholderStyle::Seeded,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub google_places_api_key: Option<SecretString>,
    pub pexels_api_key: Option<SecretString>,
    pub unsplash_access_key: Option<SecretString>,
    pub google_places_search_url: String,
    pub google_places_media_base: String,
    pub pexels_search_url: String,
    pub unsplash_search_url: String,
    pub picsum_base_url: String,
    pub styled_placeholder_base_url: String,
    pub provider_order: Vec<ImageSource>,
    pub provider_timeout_ms: u64,
    pub placeholder_style: PlaceholderStyle,
}

#[derive(Clone, Debug, Serialize)]
pub struct PublicAppConfig {
    pub google_places_search_url: String,
    pub pexels_search_url: String,
    pub unsplash_search_url: String,
    pub picsum_base_url: String,
    pub styled_placeholder_base_url: String,
    pub provider_order: Vec<ImageSource>,
    pub provider_timeout_ms: u64,
    pub placeholder_style: PlaceholderStyle,
    pub has_google_places_key: bool,
    pub has_pexels_key: bool,
    pub has_unsplash_key: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        load_dotenv_if_applicable();
        Self {
            google_places_api_key: read_secret("GOOGLE_PLACES_API_KEY")
                .or_else(|| read_secret("GOOGLE_MAPS_API_KEY")),
            pexels_api_key: read_secret("PEXELS_API_KEY"),
            unsplash_access_key: read_secret("UNSPLASH_ACCESS_KEY"),
            google_places_search_url: read_url(
                "GOOGLE_PLACES_SEARCH_URL",
                DEFAULT_GOOGLE_PLACES_SEARCH_URL,
            ),
            google_places_media_base: read_url(
                "GOOGLE_PLACES_MEDIA_BASE",
                DEFAULT_GOOGLE_PLACES_MEDIA_BASE,
            ),
            pexels_search_url: read_url("PEXELS_SEARCH_URL", DEFAULT_PEXELS_SEARCH_URL),
            unsplash_search_url: read_url("UNSPLASH_SEARCH_URL", DEFAULT_UNSPLASH_SEARCH_URL),
            picsum_base_url: read_url("PICSUM_BASE_URL", DEFAULT_PICSUM_BASE_URL),
            styled_placeholder_base_url: read_url(
                "STYLED_PLACEHOLDER_BASE_URL",
                DEFAULT_STYLED_PLACEHOLDER_BASE_URL,
            ),
            provider_order: env::var("IMAGE_PROVIDER_ORDER")
                .map(|v| parse_provider_order(&v))
                .unwrap_or_else(|_| DEFAULT_PROVIDER_ORDER.to_vec()),
            provider_timeout_ms: parse_u64("IMAGE_PROVIDER_TIMEOUT_MS", DEFAULT_PROVIDER_TIMEOUT_MS)
                .max(1),
            placeholder_style: env::var("PLACEHOLDER_STYLE")
                .map(|v| PlaceholderStyle::parse(&v))
                .unwrap_or(PlaceholderStyle::Seeded),
        }
    }

    /// Defaults with every provider key unset. Callers fill in what they need.
    pub fn unconfigured() -> Self {
        Self {
            google_places_api_key: None,
            pexels_api_key: None,
            unsplash_access_key: None,
            google_places_search_url: DEFAULT_GOOGLE_PLACES_SEARCH_URL.into(),
            google_places_media_base: DEFAULT_GOOGLE_PLACES_MEDIA_BASE.into(),
            pexels_search_url: DEFAULT_PEXELS_SEARCH_URL.into(),
            unsplash_search_url: DEFAULT_UNSPLASH_SEARCH_URL.into(),
            picsum_base_url: DEFAULT_PICSUM_BASE_URL.into(),
            styled_placeholder_base_url: DEFAULT_STYLED_PLACEHOLDER_BASE_URL.into(),
            provider_order: DEFAULT_PROVIDER_ORDER.to_vec(),
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            placeholder_style: PlaceholderStyle::Seeded,
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn public_profile(&self) -> PublicAppConfig {
        PublicAppConfig {
            google_places_search_url: self.google_places_search_url.clone(),
            pexels_search_url: self.pexels_search_url.clone(),
            unsplash_search_url: self.unsplash_search_url.clone(),
            picsum_base_url: self.picsum_base_url.clone(),
            styled_placeholder_base_url: self.styled_placeholder_base_url.clone(),
            provider_order: self.provider_order.clone(),
            provider_timeout_ms: self.provider_timeout_ms,
            placeholder_style: self.placeholder_style,
            has_google_places_key: self.google_places_api_key.is_some(),
            has_pexels_key: self.pexels_api_key.is_some(),
            has_unsplash_key: self.unsplash_access_key.is_some(),
        }
    }
}

/// Parses a comma separated provider list. Unknown and placeholder tags are
/// skipped, duplicates keep their first position, and an empty result falls
/// back to the default order.
pub fn parse_provider_order(value: &str) -> Vec<ImageSource> {
    let mut order = Vec::new();
    for tag in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match ImageSource::parse(tag) {
            Some(ImageSource::Placeholder) | None => {
                warn!(tag, "ignoring unknown image provider in IMAGE_PROVIDER_ORDER");
            }
            Some(source) if !order.contains(&source) => order.push(source),
            Some(_) => {}
        }
    }
    if order.is_empty() {
        DEFAULT_PROVIDER_ORDER.to_vec()
    } else {
        order
    }
}

fn load_dotenv_if_applicable() {
    if !should_load_dotenv() {
        debug!("skipping .env load outside dev mode");
        return;
    }

    if let Err(err) = dotenvy::dotenv() {
        match &err {
            dotenvy::Error::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {}
            _ => debug!(?err, "unable to load .env file"),
        }
    }
}

fn should_load_dotenv() -> bool {
    cfg!(debug_assertions) || parse_bool("ALLOW_DOTENV", false)
}

fn read_secret(key: &str) -> Option<SecretString> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

fn read_url(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string()
}

fn parse_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(default)
}

fn parse_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_public_profile_without_secrets() {
        env::set_var("PEXELS_API_KEY", "secret");
        env::set_var("UNSPLASH_ACCESS_KEY", "   ");
        env::set_var("IMAGE_PROVIDER_ORDER", "unsplash, google");
        env::set_var("IMAGE_PROVIDER_TIMEOUT_MS", "2500");
        env::set_var("PLACEHOLDER_STYLE", "styled");
        env::set_var("PICSUM_BASE_URL", "http://localhost:9000/");

        let config = AppConfig::from_env();
        let public = config.public_profile();

        assert!(public.has_pexels_key);
        assert!(!public.has_unsplash_key);
        assert_eq!(
            public.provider_order,
            vec![ImageSource::Unsplash, ImageSource::Google]
        );
        assert_eq!(config.provider_timeout(), Duration::from_millis(2500));
        assert_eq!(public.placeholder_style, PlaceholderStyle::Styled);
        assert_eq!(public.picsum_base_url, "http://localhost:9000");
        let serialized = serde_json::to_string(&public).unwrap();
        assert!(!serialized.contains("secret"));
    }

    #[test]
    fn provider_order_skips_unknown_and_duplicates() {
        assert_eq!(
            parse_provider_order("google,flickr,google,pexels,placeholder"),
            vec![ImageSource::Google, ImageSource::Pexels]
        );
        assert_eq!(parse_provider_order("flickr"), DEFAULT_PROVIDER_ORDER.to_vec());
        assert_eq!(parse_provider_order(""), DEFAULT_PROVIDER_ORDER.to_vec());
    }

    #[test]
    fn unconfigured_has_no_keys() {
        let public = AppConfig::unconfigured().public_profile();
        assert!(!public.has_google_places_key);
        assert!(!public.has_pexels_key);
        assert!(!public.has_unsplash_key);
        assert_eq!(public.provider_timeout_ms, DEFAULT_PROVIDER_TIMEOUT_MS);
    }
}
