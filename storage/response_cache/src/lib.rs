use chrono::{DateTime, Duration, Utc};
use outage_schedule::source::ScheduleDocumentCache;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use url::Url;

const DEFAULT_TTL_IN_SECONDS: i64 = 300;

#[derive(Debug, Clone)]
struct CachedResponse<V> {
    payload: V,
    fetched_at: DateTime<Utc>,
}

/// In-memory responses keyed by request url. Entries are only ever overwritten;
/// an entry older than the ttl reads as a miss.
pub struct ResponseCache<V = String> {
    ttl: Duration,
    entries: RwLock<HashMap<Url, CachedResponse<V>>>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        ResponseCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &Url) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&self, key: &Url, now: DateTime<Utc>) -> Option<V> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let cached = entries.get(key)?;
        if now - cached.fetched_at < self.ttl {
            Some(cached.payload.clone())
        } else {
            tracing::debug!("Cached response for {key} expired");
            None
        }
    }

    pub fn put(&self, key: &Url, payload: V) {
        self.put_at(key, payload, Utc::now())
    }

    pub fn put_at(&self, key: &Url, payload: V, fetched_at: DateTime<Utc>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.clone(),
            CachedResponse {
                payload,
                fetched_at,
            },
        );
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        ResponseCache::new(Duration::seconds(DEFAULT_TTL_IN_SECONDS))
    }
}

impl ScheduleDocumentCache for ResponseCache<String> {
    fn get(&self, key: &Url) -> Option<String> {
        ResponseCache::get(self, key)
    }

    fn set(&self, key: &Url, payload: String) {
        self.put(key, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseCache;
    use chrono::{Duration, TimeZone, Utc};
    use outage_schedule::source::ScheduleDocumentCache;
    use rstest::rstest;
    use url::Url;

    fn feed_url() -> Url {
        Url::parse("https://api.loe.lviv.ua/api/menus?page=1&type=photo-grafic").unwrap()
    }

    #[rstest]
    #[case(Duration::seconds(0), true)]
    #[case(Duration::seconds(299), true)]
    #[case(Duration::seconds(300), false)]
    #[case(Duration::seconds(301), false)]
    fn test_entries_expire_after_the_ttl(#[case] age: Duration, #[case] is_hit: bool) {
        let cache = ResponseCache::default();
        let fetched_at = Utc.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap();
        cache.put_at(&feed_url(), "body".to_owned(), fetched_at);

        let result = cache.get_at(&feed_url(), fetched_at + age);

        assert_eq!(result.is_some(), is_hit);
    }

    #[test]
    fn test_put_overwrites_and_refreshes_the_entry() {
        let cache = ResponseCache::new(Duration::minutes(5));
        let first = Utc.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap();
        let second = first + Duration::minutes(4);
        cache.put_at(&feed_url(), "old".to_owned(), first);
        cache.put_at(&feed_url(), "new".to_owned(), second);

        let result = cache.get_at(&feed_url(), first + Duration::minutes(6));

        assert_eq!(result.as_deref(), Some("new"));
    }

    #[test]
    fn test_keys_include_the_query() {
        let cache = ResponseCache::default();
        cache.put(&feed_url(), "today".to_owned());

        let other = Url::parse("https://api.loe.lviv.ua/api/menus?page=2&type=photo-grafic").unwrap();

        assert_eq!(ScheduleDocumentCache::get(&cache, &other), None);
        assert_eq!(
            ScheduleDocumentCache::get(&cache, &feed_url()).as_deref(),
            Some("today")
        );
    }
}
