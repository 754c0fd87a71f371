mod cache;
mod cascade;
mod categories;
mod config;
pub mod diagnostics;
mod errors;
mod hashing;
mod model;
mod placeholder;
mod places;
mod provider;
mod query;
mod stock;

use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use cache::ImageCache;
pub use cascade::ImageResolver;
pub use categories::{ATTRACTION_SIZE, DESTINATION_SIZE, FOOD_SIZE, HOTEL_SIZE, RESTAURANT_SIZE};
pub use config::{parse_provider_order, AppConfig, PlaceholderStyle, PublicAppConfig};
pub use errors::{AppError, AppResult, ProviderError, ProviderResult};
pub use hashing::{placeholder_seed, seed_hash};
pub use model::{Fingerprint, ImageCategory, ImageRequest, ImageResult, ImageSource};
pub use placeholder::PlaceholderGenerator;
pub use places::GooglePlacesPhotos;
pub use provider::{http_client, providers_from_config, ImageProvider};
pub use query::{build_place_query, build_query, category_keywords};
pub use stock::{PexelsPhotos, UnsplashPhotos};

pub fn init_tracing() {
    static INIT: OnceCell<()> = OnceCell::new();
    let _ = INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,trip_imagery=debug"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    });
}
