use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::cascade::ImageResolver;
use crate::config::AppConfig;
use crate::model::{ImageCategory, ImageRequest, ImageResult, ImageSource};

const KEY_PREVIEW_CHARS: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct ProviderKeyStatus {
    pub provider: ImageSource,
    pub configured: bool,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub size: usize,
    pub by_source: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub label: String,
    pub result: ImageResult,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimingSummary {
    pub label: String,
    pub runs: usize,
    pub min_ms: u128,
    pub max_ms: u128,
    pub avg_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeRun {
    pub generated_at: DateTime<Utc>,
    pub reports: Vec<ProbeReport>,
    pub cache: CacheReport,
}

pub fn key_statuses(config: &AppConfig) -> Vec<ProviderKeyStatus> {
    vec![
        key_status(ImageSource::Google, config.google_places_api_key.as_ref()),
        key_status(ImageSource::Pexels, config.pexels_api_key.as_ref()),
        key_status(ImageSource::Unsplash, config.unsplash_access_key.as_ref()),
    ]
}

fn key_status(provider: ImageSource, key: Option<&SecretString>) -> ProviderKeyStatus {
    ProviderKeyStatus {
        provider,
        configured: key.is_some(),
        preview: key.map(|secret| {
            let head: String = secret
                .expose_secret()
                .chars()
                .take(KEY_PREVIEW_CHARS)
                .collect();
            format!("{head}…")
        }),
    }
}

pub fn cache_report(resolver: &ImageResolver) -> CacheReport {
    CacheReport {
        size: resolver.cache_size(),
        by_source: resolver.cache_stats(),
    }
}

/// The fixed sample set used to smoke test a configuration.
pub fn sample_requests() -> Vec<(&'static str, ImageRequest)> {
    vec![
        (
            "hotel",
            ImageRequest::new("Grand Hotel", ImageCategory::Hotel)
                .with_address("New York, NY")
                .with_size(400, 300),
        ),
        (
            "attraction",
            ImageRequest::new("Statue of Liberty", ImageCategory::Attraction)
                .with_address("New York")
                .with_size(400, 200),
        ),
        (
            "food",
            ImageRequest::new("Pizza Margherita", ImageCategory::Food)
                .with_address("Italy")
                .with_size(300, 200),
        ),
        (
            "destination",
            ImageRequest::new("Paris, France", ImageCategory::General).with_size(800, 400),
        ),
    ]
}

pub async fn probe(resolver: &ImageResolver, label: &str, request: &ImageRequest) -> ProbeReport {
    let started = Instant::now();
    let result = resolver.resolve(request, 0).await;
    ProbeReport {
        label: label.to_string(),
        result,
        elapsed_ms: started.elapsed().as_millis(),
    }
}

pub async fn probe_samples(resolver: &ImageResolver) -> ProbeRun {
    let mut reports = Vec::new();
    for (label, request) in sample_requests() {
        reports.push(probe(resolver, label, &request).await);
    }
    ProbeRun {
        generated_at: Utc::now(),
        reports,
        cache: cache_report(resolver),
    }
}

/// Times `iterations` resolutions of each sample. Every run after the first
/// is normally a cache hit, so the spread shows cold versus warm cost.
pub async fn time_samples(resolver: &ImageResolver, iterations: usize) -> Vec<TimingSummary> {
    let mut summaries = Vec::new();
    for (label, request) in sample_requests() {
        let mut timings = Vec::with_capacity(iterations);
        for _ in 0..iterations {
            timings.push(probe(resolver, label, &request).await.elapsed_ms);
        }
        if let Some(summary) = summarize(label, &timings) {
            summaries.push(summary);
        }
    }
    summaries
}

fn summarize(label: &str, timings: &[u128]) -> Option<TimingSummary> {
    let min_ms = *timings.iter().min()?;
    let max_ms = *timings.iter().max()?;
    let total: u128 = timings.iter().sum();
    Some(TimingSummary {
        label: label.to_string(),
        runs: timings.len(),
        min_ms,
        max_ms,
        avg_ms: total as f64 / timings.len() as f64,
    })
}
