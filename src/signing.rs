//! Time-limited access URLs for stored track objects.

mod cache;

pub use cache::PresignedUrlCache;

use std::time::Duration;

use crate::error::SignError;

/// Produces an access URL for `bucket/key` that stays valid for `lifetime`.
pub trait UrlSigner {
    fn sign(&self, bucket: &str, key: &str, lifetime: Duration) -> Result<String, SignError>;
}

impl<S: UrlSigner + ?Sized> UrlSigner for &S {
    fn sign(&self, bucket: &str, key: &str, lifetime: Duration) -> Result<String, SignError> {
        (**self).sign(bucket, key, lifetime)
    }
}
