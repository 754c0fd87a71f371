use httptest::matchers::{all_of, contains, eq, json_decoded, request, url_decoded};
use httptest::responders::{json_encoded, status_code};
use httptest::{Expectation, Server};
use secrecy::SecretString;
use serde_json::json;

use trip_imagery::{
    http_client, AppConfig, ImageCategory, ImageProvider, ImageRequest, ImageResolver,
    ImageSource, PexelsPhotos, ProviderError, UnsplashPhotos,
};

fn secret(value: &str) -> Option<SecretString> {
    Some(SecretString::from(value.to_string()))
}

fn config_for(server: &Server) -> AppConfig {
    let mut config = AppConfig::unconfigured();
    config.google_places_search_url = server.url_str("/v1/places:searchText");
    config.google_places_media_base = server.url_str("/v1");
    config.pexels_search_url = server.url_str("/pexels/v1/search");
    config.unsplash_search_url = server.url_str("/unsplash/search/photos");
    config.provider_timeout_ms = 2_000;
    config
}

#[tokio::test]
async fn second_priority_places_provider_supplies_attraction_photo() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of!(
            request::method_path("POST", "/v1/places:searchText"),
            request::headers(contains(("x-goog-api-key", "g-key"))),
            request::headers(contains(("x-goog-fieldmask", "places.photos.name"))),
            request::body(json_decoded(eq(json!({
                "textQuery": "Eiffel Tower Paris",
                "maxResultCount": 1
            })))),
        ))
        .respond_with(json_encoded(json!({
            "places": [{
                "photos": [
                    { "name": "places/eiffel/photos/first" },
                    { "name": "places/eiffel/photos/second" }
                ]
            }]
        }))),
    );

    let mut config = config_for(&server);
    config.google_places_api_key = secret("g-key");
    let resolver = ImageResolver::from_config(&config).expect("resolver");

    let result = resolver
        .attraction_image("Eiffel Tower", Some("Paris"), 0)
        .await;

    assert_eq!(result.source(), ImageSource::Google);
    assert!(!result.is_default());
    assert_eq!(
        result.url(),
        format!(
            "{}/places/eiffel/photos/first/media?key=g-key&maxHeightPx=200&maxWidthPx=400",
            server.url_str("/v1")
        )
    );
}

#[tokio::test]
async fn repeated_food_lookup_hits_pexels_once() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of!(
            request::method_path("GET", "/pexels/v1/search"),
            request::headers(contains(("authorization", "px-key"))),
            request::query(url_decoded(contains(("query", "Pizza food")))),
            request::query(url_decoded(contains(("per_page", "1")))),
        ))
        .times(1)
        .respond_with(json_encoded(json!({
            "page": 1,
            "photos": [{
                "id": 1,
                "src": {
                    "original": "https://images.pexels.com/1.jpeg",
                    "medium": "https://images.pexels.com/1.jpeg?h=350"
                }
            }]
        }))),
    );

    let mut config = config_for(&server);
    config.pexels_api_key = secret("px-key");
    let resolver = ImageResolver::from_config(&config).expect("resolver");

    let first = resolver.food_image("Pizza", None, 0).await;
    let second = resolver.food_image("Pizza", None, 0).await;

    assert_eq!(first.source(), ImageSource::Pexels);
    assert_eq!(first.url(), "https://images.pexels.com/1.jpeg?h=350");
    assert_eq!(first, second);
    assert_eq!(resolver.cache_stats().get("pexels"), Some(&1));
}

#[tokio::test]
async fn first_success_stops_the_cascade() {
    let server = Server::run();
    // no expectation for the places endpoint: any call to it fails the test
    server.expect(
        Expectation::matching(request::method_path("GET", "/pexels/v1/search")).respond_with(
            json_encoded(json!({
                "photos": [{ "src": { "medium": "https://images.pexels.com/hotel.jpeg" } }]
            })),
        ),
    );

    let mut config = config_for(&server);
    config.pexels_api_key = secret("px-key");
    config.google_places_api_key = secret("g-key");
    let resolver = ImageResolver::from_config(&config).expect("resolver");

    let result = resolver.hotel_image("Grand Hotel", Some("New York, NY"), 0).await;
    assert_eq!(result.source(), ImageSource::Pexels);
}

#[tokio::test]
async fn failing_status_advances_to_unsplash() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/pexels/v1/search"))
            .respond_with(status_code(503).body("upstream unavailable")),
    );
    server.expect(
        Expectation::matching(all_of!(
            request::method_path("GET", "/unsplash/search/photos"),
            request::query(url_decoded(contains(("client_id", "us-key")))),
            request::query(url_decoded(contains(("query", "Kyoto travel")))),
        ))
        .respond_with(json_encoded(json!({
            "total": 1,
            "results": [{
                "urls": { "regular": "https://images.unsplash.com/photo-9?ixid=abc&w=1080" }
            }]
        }))),
    );

    let mut config = config_for(&server);
    config.pexels_api_key = secret("px-key");
    config.unsplash_access_key = secret("us-key");
    let resolver = ImageResolver::from_config(&config).expect("resolver");

    let result = resolver.destination_image("Kyoto", 0).await;

    assert_eq!(result.source(), ImageSource::Unsplash);
    assert_eq!(
        result.url(),
        "https://images.unsplash.com/photo-9?ixid=abc&w=800&h=400&fit=crop"
    );
}

#[tokio::test]
async fn adapters_report_status_and_empty_results() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/pexels/v1/search"))
            .respond_with(status_code(401).body("bad key")),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/unsplash/search/photos"))
            .respond_with(json_encoded(json!({ "total": 0, "results": [] }))),
    );

    let http = http_client().expect("http client");
    let request = ImageRequest::new("Nowhere", ImageCategory::General);

    let pexels = PexelsPhotos::new(
        http.clone(),
        secret("px-key"),
        server.url_str("/pexels/v1/search"),
    );
    match pexels.fetch_url(&request).await {
        Err(ProviderError::Status { status, body, .. }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad key");
        }
        other => panic!("unexpected pexels outcome: {other:?}"),
    }

    let unsplash = UnsplashPhotos::new(
        http,
        secret("us-key"),
        server.url_str("/unsplash/search/photos"),
    );
    let err = unsplash.fetch_url(&request).await.unwrap_err();
    assert!(matches!(err, ProviderError::NoResult { .. }), "{err}");
}

#[tokio::test]
async fn place_without_photos_falls_back_to_placeholder() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/v1/places:searchText"))
            .respond_with(json_encoded(json!({ "places": [{ "photos": [] }] }))),
    );

    let mut config = config_for(&server);
    config.google_places_api_key = secret("g-key");
    let resolver = ImageResolver::from_config(&config).expect("resolver");

    let result = resolver.hotel_image("Grand Hotel", None, 0).await;
    assert!(result.is_default());
    assert_eq!(result.source(), ImageSource::Placeholder);
}

#[tokio::test]
async fn no_keys_yields_seeded_placeholder() {
    let resolver = ImageResolver::from_config(&AppConfig::unconfigured()).expect("resolver");

    let result = resolver.hotel_image("Grand Hotel", None, 0).await;

    assert!(result.is_default());
    assert_eq!(result.source(), ImageSource::Placeholder);
    assert_eq!(result.url(), "https://picsum.photos/seed/200/400/300");
    assert!(result
        .fallback_url()
        .starts_with("https://via.placeholder.com/400x300/3b82f6/ffffff?text="));

    let retried = resolver.hotel_image("Grand Hotel", None, 1).await;
    assert_eq!(retried.url(), result.url());
    assert_eq!(resolver.cache_size(), 2);
}
