use crate::cascade::ImageResolver;
use crate::model::{ImageCategory, ImageRequest, ImageResult};

pub const HOTEL_SIZE: (u32, u32) = (400, 300);
pub const ATTRACTION_SIZE: (u32, u32) = (400, 200);
pub const FOOD_SIZE: (u32, u32) = (300, 200);
pub const RESTAURANT_SIZE: (u32, u32) = (400, 300);
pub const DESTINATION_SIZE: (u32, u32) = (800, 400);

fn sized_request(
    name: &str,
    address: Option<&str>,
    category: ImageCategory,
    (width, height): (u32, u32),
) -> ImageRequest {
    ImageRequest::new(name, category)
        .with_address(address.unwrap_or_default())
        .with_size(width, height)
}

impl ImageResolver {
    pub async fn hotel_image(&self, name: &str, address: Option<&str>, retry: u32) -> ImageResult {
        let request = sized_request(name, address, ImageCategory::Hotel, HOTEL_SIZE);
        self.resolve(&request, retry).await
    }

    pub async fn attraction_image(
        &self,
        name: &str,
        city: Option<&str>,
        retry: u32,
    ) -> ImageResult {
        let request = sized_request(name, city, ImageCategory::Attraction, ATTRACTION_SIZE);
        self.resolve(&request, retry).await
    }

    pub async fn food_image(&self, name: &str, location: Option<&str>, retry: u32) -> ImageResult {
        let request = sized_request(name, location, ImageCategory::Food, FOOD_SIZE);
        self.resolve(&request, retry).await
    }

    pub async fn restaurant_image(
        &self,
        name: &str,
        address: Option<&str>,
        retry: u32,
    ) -> ImageResult {
        let request = sized_request(name, address, ImageCategory::Restaurant, RESTAURANT_SIZE);
        self.resolve(&request, retry).await
    }

    /// Hero image for a whole destination; uses the general keyword set.
    pub async fn destination_image(&self, destination: &str, retry: u32) -> ImageResult {
        let request = sized_request(destination, None, ImageCategory::General, DESTINATION_SIZE);
        self.resolve(&request, retry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::tests::resolver_with;

    #[tokio::test]
    async fn wrappers_apply_default_dimensions() {
        let resolver = resolver_with(Vec::new());

        let hotel = resolver.hotel_image("Grand Hotel", Some("New York, NY"), 0).await;
        assert!(hotel.url().ends_with("/400/300"));
        assert!(hotel.fallback_url().contains("/400x300/3b82f6/"));

        let attraction = resolver.attraction_image("Louvre", None, 0).await;
        assert!(attraction.url().ends_with("/400/200"));

        let food = resolver.food_image("Pizza", Some("Naples"), 0).await;
        assert!(food.url().ends_with("/300/200"));
        assert!(food.fallback_url().contains("/f59e0b/"));

        let restaurant = resolver.restaurant_image("Noma", None, 0).await;
        assert!(restaurant.fallback_url().contains("/ef4444/"));

        let destination = resolver.destination_image("Paris, France", 0).await;
        assert_eq!(destination.url(), "https://picsum.photos/seed/822/800/400");
        assert!(destination.fallback_url().contains("/6b7280/"));
    }

    #[tokio::test]
    async fn wrappers_share_the_resolver_cache() {
        let resolver = resolver_with(Vec::new());
        resolver.food_image("Pizza", None, 0).await;
        resolver.food_image("Pizza", None, 0).await;
        resolver.food_image("Pizza", None, 1).await;
        assert_eq!(resolver.cache_size(), 2);
    }
}
