use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    Hotel,
    Restaurant,
    Attraction,
    Food,
    General,
}

impl ImageCategory {
    pub fn as_tag(&self) -> &'static str {
        match self {
            ImageCategory::Hotel => "hotel",
            ImageCategory::Restaurant => "restaurant",
            ImageCategory::Attraction => "attraction",
            ImageCategory::Food => "food",
            ImageCategory::General => "general",
        }
    }

    /// Unknown tags resolve to `General`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "hotel" => ImageCategory::Hotel,
            "restaurant" => ImageCategory::Restaurant,
            "attraction" => ImageCategory::Attraction,
            "food" => ImageCategory::Food,
            _ => ImageCategory::General,
        }
    }
}

impl Default for ImageCategory {
    fn default() -> Self {
        ImageCategory::General
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    Google,
    Pexels,
    Unsplash,
    Placeholder,
}

impl ImageSource {
    pub fn as_tag(&self) -> &'static str {
        match self {
            ImageSource::Google => "google",
            ImageSource::Pexels => "pexels",
            ImageSource::Unsplash => "unsplash",
            ImageSource::Placeholder => "placeholder",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ImageSource::Google => "Google Places",
            ImageSource::Pexels => "Pexels",
            ImageSource::Unsplash => "Unsplash",
            ImageSource::Placeholder => "Placeholder",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" | "google_places" | "places" => Some(ImageSource::Google),
            "pexels" => Some(ImageSource::Pexels),
            "unsplash" => Some(ImageSource::Unsplash),
            "placeholder" => Some(ImageSource::Placeholder),
            _ => None,
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    place_name: String,
    address: String,
    category: ImageCategory,
    width: u32,
    height: u32,
}

impl ImageRequest {
    pub fn new(place_name: impl Into<String>, category: ImageCategory) -> Self {
        Self {
            place_name: place_name.into(),
            address: String::new(),
            category,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn place_name(&self) -> &str {
        &self.place_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn category(&self) -> ImageCategory {
        self.category
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_place_name(&self) -> bool {
        !self.place_name.trim().is_empty()
    }

    pub fn fingerprint(&self, retry: u32) -> Fingerprint {
        Fingerprint {
            place_name: self.place_name.clone(),
            address: self.address.clone(),
            category: self.category,
            width: self.width,
            height: self.height,
            retry,
        }
    }
}

/// Cache key for one resolution attempt. Equality and hashing work on the
/// fields, so hyphens inside names or addresses cannot make keys collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    place_name: String,
    address: String,
    category: ImageCategory,
    width: u32,
    height: u32,
    retry: u32,
}

impl Fingerprint {
    pub fn retry(&self) -> u32 {
        self.retry
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}x{}-retry{}",
            self.place_name,
            self.address,
            self.category.as_tag(),
            self.width,
            self.height,
            self.retry
        )
    }
}

/// Resolved image. `is_default` is derived from the source, so a result is a
/// synthetic fallback exactly when it came from the placeholder generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ResultRecord", try_from = "ResultRecord")]
pub struct ImageResult {
    url: String,
    source: ImageSource,
    fallback_url: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultRecord {
    url: String,
    source: ImageSource,
    is_default: bool,
    fallback_url: String,
}

impl ImageResult {
    pub fn photo(url: String, source: ImageSource, fallback_url: String) -> Self {
        Self {
            url,
            source,
            fallback_url,
        }
    }

    pub fn placeholder(url: String, fallback_url: String) -> Self {
        Self {
            url,
            source: ImageSource::Placeholder,
            fallback_url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }

    pub fn is_default(&self) -> bool {
        self.source == ImageSource::Placeholder
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }
}

impl From<ImageResult> for ResultRecord {
    fn from(result: ImageResult) -> Self {
        Self {
            is_default: result.is_default(),
            url: result.url,
            source: result.source,
            fallback_url: result.fallback_url,
        }
    }
}

impl TryFrom<ResultRecord> for ImageResult {
    type Error = String;

    fn try_from(record: ResultRecord) -> Result<Self, Self::Error> {
        let from_placeholder = record.source == ImageSource::Placeholder;
        if record.is_default != from_placeholder {
            return Err(format!(
                "isDefault={} does not match source `{}`",
                record.is_default, record.source
            ));
        }
        Ok(Self {
            url: record.url,
            source: record.source,
            fallback_url: record.fallback_url,
        })
    }
}
