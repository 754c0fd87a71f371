use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::cache::ImageCache;
use crate::config::AppConfig;
use crate::errors::{AppResult, ProviderError, ProviderResult};
use crate::model::{Fingerprint, ImageRequest, ImageResult, ImageSource};
use crate::placeholder::PlaceholderGenerator;
use crate::provider::{http_client, providers_from_config, ImageProvider};

type PendingResolution = Shared<BoxFuture<'static, ImageResult>>;

/// Resolves place images by walking the providers in priority order.
///
/// Cloning is cheap and clones share the cache. `resolve` must be awaited
/// inside a tokio runtime because each resolution runs on its own task; a
/// caller that stops waiting does not cancel the outbound request or the
/// cache write.
#[derive(Clone)]
pub struct ImageResolver {
    inner: Arc<ResolverInner>,
}

struct ResolverInner {
    providers: Vec<Arc<dyn ImageProvider>>,
    placeholder: PlaceholderGenerator,
    cache: ImageCache,
    provider_timeout: Duration,
    pending: Mutex<HashMap<Fingerprint, PendingResolution>>,
}

impl ImageResolver {
    pub fn new(
        providers: Vec<Arc<dyn ImageProvider>>,
        placeholder: PlaceholderGenerator,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                providers,
                placeholder,
                cache: ImageCache::new(),
                provider_timeout,
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let http = http_client()?;
        Ok(Self::new(
            providers_from_config(config, http),
            PlaceholderGenerator::from_config(config),
            config.provider_timeout(),
        ))
    }

    pub fn provider_order(&self) -> Vec<ImageSource> {
        self.inner.providers.iter().map(|p| p.source()).collect()
    }

    pub fn cache(&self) -> &ImageCache {
        &self.inner.cache
    }

    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.inner.cache.len()
    }

    pub fn cache_stats(&self) -> BTreeMap<String, usize> {
        self.inner.cache.stats_by_source()
    }

    /// Reports a url that failed to load. Cached results pointing at it are
    /// dropped and providers returning it again are skipped.
    pub fn mark_url_failed(&self, url: &str) -> usize {
        let evicted = self.inner.cache.mark_url_failed(url);
        debug!(url, evicted, "image url marked as failed");
        evicted
    }

    /// Always produces a result. `retry` above zero skips the cache read, so
    /// a caller can force a fresh attempt after a bad result.
    pub async fn resolve(&self, request: &ImageRequest, retry: u32) -> ImageResult {
        let fingerprint = request.fingerprint(retry);
        if retry == 0 {
            if let Some(hit) = self.inner.cache.get(&fingerprint) {
                debug!(%fingerprint, source = %hit.source(), "image cache hit");
                return hit;
            }
        }
        self.pending_resolution(request, fingerprint).await
    }

    fn pending_resolution(
        &self,
        request: &ImageRequest,
        fingerprint: Fingerprint,
    ) -> PendingResolution {
        let mut pending = self.inner.pending.lock();
        if let Some(existing) = pending.get(&fingerprint) {
            debug!(%fingerprint, "joining in-flight image resolution");
            return existing.clone();
        }

        let inner = Arc::clone(&self.inner);
        let task_request = request.clone();
        let key = fingerprint.clone();
        let task = tokio::spawn(async move {
            let result = inner.run_cascade(&task_request).await;
            inner.cache.set(key.clone(), result.clone());
            inner.pending.lock().remove(&key);
            result
        });

        let inner = Arc::clone(&self.inner);
        let fallback_request = request.clone();
        let key = fingerprint.clone();
        let resolution = async move {
            match task.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(?err, fingerprint = %key, "image resolution task aborted");
                    let result = inner.placeholder_result(&fallback_request);
                    inner.cache.set(key.clone(), result.clone());
                    inner.pending.lock().remove(&key);
                    result
                }
            }
        }
        .boxed()
        .shared();

        pending.insert(fingerprint, resolution.clone());
        resolution
    }
}

impl ResolverInner {
    async fn run_cascade(&self, request: &ImageRequest) -> ImageResult {
        if !request.has_place_name() {
            debug!("blank place name; skipping image providers");
            return self.placeholder_result(request);
        }

        for provider in &self.providers {
            let source = provider.source();
            debug!(
                provider = %source,
                place = request.place_name(),
                "trying image provider"
            );
            match self.attempt(provider.as_ref(), request).await {
                Ok(url) => {
                    info!(provider = %source, place = request.place_name(), "image resolved");
                    let fallback_url = self.placeholder.styled_url(request);
                    return ImageResult::photo(url, source, fallback_url);
                }
                Err(err @ ProviderError::Configuration { .. }) => {
                    debug!(%err, "image provider skipped");
                }
                Err(err) => {
                    warn!(
                        ?err,
                        kind = err.kind(),
                        provider = %source,
                        place = request.place_name(),
                        "image provider failed"
                    );
                }
            }
        }

        info!(place = request.place_name(), "using placeholder image");
        self.placeholder_result(request)
    }

    async fn attempt(
        &self,
        provider: &dyn ImageProvider,
        request: &ImageRequest,
    ) -> ProviderResult<String> {
        let name = provider.source().display_name();
        let url = timeout(self.provider_timeout, provider.fetch_url(request))
            .await
            .map_err(|_| ProviderError::Timeout {
                provider: name,
                after: self.provider_timeout,
            })??;

        if url.trim().is_empty() {
            return Err(ProviderError::NoResult { provider: name });
        }
        if self.cache.is_url_failed(&url) {
            return Err(ProviderError::RejectedUrl {
                provider: name,
                url,
            });
        }
        Ok(url)
    }

    fn placeholder_result(&self, request: &ImageRequest) -> ImageResult {
        ImageResult::placeholder(
            self.placeholder.primary_url(request),
            self.placeholder.styled_url(request),
        )
    }
}
