use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::de::IgnoredAny;
use shared_kernel::http_client::HttpClient;
use std::sync::Arc;
use url::Url;

/// Where raw schedule feeds come from.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScheduleDocumentSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> anyhow::Result<String>;
}

/// Synchronous storage for fetched feeds, keyed by request url.
#[cfg_attr(test, automock)]
pub trait ScheduleDocumentCache: Send + Sync {
    fn get(&self, key: &Url) -> Option<String>;
    fn set(&self, key: &Url, payload: String);
}

pub struct HttpScheduleSource;

#[async_trait]
impl ScheduleDocumentSource for HttpScheduleSource {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn fetch(&self, url: &Url) -> anyhow::Result<String> {
        let body = HttpClient::get_text(url.clone()).await?;
        Ok(body)
    }
}

pub struct CachedScheduleSource {
    source: Arc<dyn ScheduleDocumentSource>,
    cache: Arc<dyn ScheduleDocumentCache>,
}

impl CachedScheduleSource {
    pub fn new(
        source: Arc<dyn ScheduleDocumentSource>,
        cache: Arc<dyn ScheduleDocumentCache>,
    ) -> Self {
        CachedScheduleSource { source, cache }
    }

    /// Bodies that are not JSON at all (proxy error pages) are never cached.
    fn is_cacheable(body: &str) -> bool {
        serde_json::from_str::<IgnoredAny>(body).is_ok()
    }
}

#[async_trait]
impl ScheduleDocumentSource for CachedScheduleSource {
    async fn fetch(&self, url: &Url) -> anyhow::Result<String> {
        if let Some(body) = self.cache.get(url) {
            tracing::debug!("Using cached schedule feed for {url}");
            return Ok(body);
        }

        let body = self.source.fetch(url).await?;
        if Self::is_cacheable(&body) {
            self.cache.set(url, body.clone());
        } else {
            tracing::warn!("Not caching a non-JSON response from {url}");
        }
        Ok(body)
    }
}
