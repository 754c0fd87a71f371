use reqwest::Url;

use crate::config::{AppConfig, PlaceholderStyle};
use crate::hashing::placeholder_seed;
use crate::model::{ImageCategory, ImageRequest};

const LABEL_UTF16_UNITS: usize = 15;

struct CategoryStyle {
    background: &'static str,
    foreground: &'static str,
    icon: &'static str,
}

fn category_style(category: ImageCategory) -> CategoryStyle {
    let (background, icon) = match category {
        ImageCategory::Hotel => ("3b82f6", "🏨"),
        ImageCategory::Restaurant => ("ef4444", "🍽️"),
        ImageCategory::Attraction => ("10b981", "📍"),
        ImageCategory::Food => ("f59e0b", "🍽️"),
        ImageCategory::General => ("6b7280", "🌍"),
    };
    CategoryStyle {
        background,
        foreground: "ffffff",
        icon,
    }
}

/// Leading part of the name that fits in the label, measured in UTF-16 units
/// and left untrimmed. A surrogate pair crossing the limit is dropped whole.
fn label_prefix(name: &str) -> &str {
    let mut units = 0;
    for (index, ch) in name.char_indices() {
        units += ch.len_utf16();
        if units > LABEL_UTF16_UNITS {
            return &name[..index];
        }
    }
    name
}

/// Synthetic images for when no provider produced a photo. Never fails and
/// never touches the network.
#[derive(Debug, Clone)]
pub struct PlaceholderGenerator {
    style: PlaceholderStyle,
    seeded_base: String,
    styled_base: String,
}

impl PlaceholderGenerator {
    pub fn new(style: PlaceholderStyle, seeded_base: String, styled_base: String) -> Self {
        Self {
            style,
            seeded_base: seeded_base.trim_end_matches('/').to_string(),
            styled_base: styled_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.placeholder_style,
            config.picsum_base_url.clone(),
            config.styled_placeholder_base_url.clone(),
        )
    }

    /// Url used as the primary placeholder image.
    pub fn primary_url(&self, request: &ImageRequest) -> String {
        match self.style {
            PlaceholderStyle::Seeded => self.seeded_url(request),
            PlaceholderStyle::Styled => self.styled_url(request),
        }
    }

    /// Stable filler photo picked by the place name's seed.
    pub fn seeded_url(&self, request: &ImageRequest) -> String {
        format!(
            "{}/seed/{}/{}/{}",
            self.seeded_base,
            placeholder_seed(request.place_name()),
            request.width(),
            request.height()
        )
    }

    /// Flat colour card with an icon and the first characters of the name.
    pub fn styled_url(&self, request: &ImageRequest) -> String {
        let style = category_style(request.category());
        let label = format!("{} {}", style.icon, label_prefix(request.place_name()));
        let raw = format!(
            "{}/{}x{}/{}/{}",
            self.styled_base,
            request.width(),
            request.height(),
            style.background,
            style.foreground
        );
        match Url::parse(&raw) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("text", &label);
                url.into()
            }
            Err(_) => raw,
        }
    }
}
