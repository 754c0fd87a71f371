use std::env;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use trip_imagery::diagnostics::{key_statuses, probe, probe_samples, time_samples};
use trip_imagery::{init_tracing, AppConfig, ImageCategory, ImageRequest, ImageResolver};

const USAGE: &str = "usage: trip-imagery-probe <keys|samples|resolve <category> <name> [address]|bench [iterations]>";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = AppConfig::from_env();
    let resolver = ImageResolver::from_config(&config).context("failed to build image resolver")?;

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("keys") => print_json(&key_statuses(&config)),
        Some("samples") | None => print_json(&probe_samples(&resolver).await),
        Some("resolve") => {
            let (Some(category), Some(name)) = (args.get(1), args.get(2)) else {
                bail!(USAGE);
            };
            let request = request_for(category, name, args.get(3).map(String::as_str));
            print_json(&probe(&resolver, category, &request).await)
        }
        Some("bench") => {
            let iterations = match args.get(1) {
                Some(raw) => raw
                    .parse::<usize>()
                    .with_context(|| format!("invalid iteration count: {raw}"))?,
                None => 5,
            };
            print_json(&time_samples(&resolver, iterations.max(1)).await)
        }
        Some(other) => bail!("unknown command `{other}`\n{USAGE}"),
    }
}

fn request_for(category: &str, name: &str, address: Option<&str>) -> ImageRequest {
    let (category, size) = match category {
        "destination" => (ImageCategory::General, trip_imagery::DESTINATION_SIZE),
        other => {
            let category = ImageCategory::parse(other);
            let size = match category {
                ImageCategory::Hotel => trip_imagery::HOTEL_SIZE,
                ImageCategory::Attraction => trip_imagery::ATTRACTION_SIZE,
                ImageCategory::Food => trip_imagery::FOOD_SIZE,
                ImageCategory::Restaurant => trip_imagery::RESTAURANT_SIZE,
                ImageCategory::General => trip_imagery::DESTINATION_SIZE,
            };
            (category, size)
        }
    };
    ImageRequest::new(name, category)
        .with_address(address.unwrap_or_default())
        .with_size(size.0, size.1)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
