use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use log::debug;

use crate::config::SigningSettings;
use crate::error::SignError;

use super::UrlSigner;

#[derive(Debug, Clone)]
struct CachedUrl {
    url: String,
    expires_at: SystemTime,
}

/// Caches signed URLs per `bucket/key` until they get close to expiring.
pub struct PresignedUrlCache<S> {
    signer: S,
    lifetime: Duration,
    margin: Duration,
    entries: HashMap<String, CachedUrl>,
}

impl<S: UrlSigner> PresignedUrlCache<S> {
    pub fn new(signer: S, settings: &SigningSettings) -> Self {
        Self {
            signer,
            lifetime: settings.url_lifetime(),
            margin: settings.refresh_margin(),
            entries: HashMap::new(),
        }
    }

    pub fn url(&mut self, bucket: &str, key: &str) -> Result<String, SignError> {
        self.url_at(bucket, key, SystemTime::now())
    }

    /// A URL for `bucket/key` valid for at least the refresh margin past `now`.
    ///
    /// Failed signing leaves any previous entry untouched. Entries that have
    /// expired by `now` are dropped whenever a new URL is stored.
    pub fn url_at(&mut self, bucket: &str, key: &str, now: SystemTime) -> Result<String, SignError> {
        if bucket.is_empty() || key.is_empty() {
            return Err(SignError::MissingObject);
        }

        let Some(expires_at) = now.checked_add(self.lifetime) else {
            return Err(SignError::LifetimeOutOfRange {
                secs: self.lifetime.as_secs(),
            });
        };

        let cache_key = format!("{bucket}/{key}");
        if let Some(cached) = self.entries.get(&cache_key) {
            // An unrepresentable margin makes every cached entry stale.
            let fresh_until = now.checked_add(self.margin).unwrap_or(expires_at);
            if cached.expires_at > fresh_until {
                return Ok(cached.url.clone());
            }
            debug!("signed url for '{cache_key}' is about to expire, refreshing");
        }

        let url = self.signer.sign(bucket, key, self.lifetime)?;
        self.entries.retain(|_, cached| cached.expires_at > now);
        self.entries.insert(
            cache_key,
            CachedUrl {
                url: url.clone(),
                expires_at,
            },
        );
        Ok(url)
    }

    /// Forget the cached URL for `bucket/key`. Returns whether one was cached.
    pub fn invalidate(&mut self, bucket: &str, key: &str) -> bool {
        self.entries.remove(&format!("{bucket}/{key}")).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
