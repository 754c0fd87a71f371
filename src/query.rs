use crate::model::ImageCategory;

const HOTEL_KEYWORDS: &[&str] = &["hotel", "accommodation", "resort", "luxury hotel"];
const RESTAURANT_KEYWORDS: &[&str] = &["restaurant", "dining", "food", "cuisine"];
const ATTRACTION_KEYWORDS: &[&str] = &[
    "landmark",
    "tourist attraction",
    "monument",
    "sightseeing",
];
const FOOD_KEYWORDS: &[&str] = &["food", "cuisine", "dish", "traditional food"];
const GENERAL_KEYWORDS: &[&str] = &["travel", "destination", "place", "city"];

pub fn category_keywords(category: ImageCategory) -> &'static [&'static str] {
    match category {
        ImageCategory::Hotel => HOTEL_KEYWORDS,
        ImageCategory::Restaurant => RESTAURANT_KEYWORDS,
        ImageCategory::Attraction => ATTRACTION_KEYWORDS,
        ImageCategory::Food => FOOD_KEYWORDS,
        ImageCategory::General => GENERAL_KEYWORDS,
    }
}

/// Keyword search text for the stock photo providers.
pub fn build_query(place_name: &str, category: ImageCategory) -> String {
    let keyword = category_keywords(category)[0];
    format!("{place_name} {keyword}")
}

/// Text query for the places search, which understands addresses.
pub fn build_place_query(place_name: &str, address: &str) -> String {
    format!("{place_name} {address}").trim().to_string()
}
