//! Storage for issued verification codes.

use crate::types::{PhoneNumber, VerificationCode};
use moka::future::Cache;
use std::future::Future;
use std::time::Duration;

/// Default lifetime of a cached verification code (10 minutes).
pub const DEFAULT_CODE_TTL: Duration = Duration::from_secs(600);

/// Default maximum number of cached codes.
pub const DEFAULT_CODE_CAPACITY: u64 = 10_000;

/// Key-value store holding the last code issued per number.
///
/// Expiry is owned by the implementation. Implementations must be safe to
/// share between concurrent callers; providers do no locking of their own.
pub trait VerificationCodeCache: Send + Sync + Clone {
    /// Get the code stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Option<VerificationCode>> + Send;

    /// Store `code` under `key`, replacing any previous value.
    fn set(&self, key: &str, code: VerificationCode) -> impl Future<Output = ()> + Send;
}

/// In-memory [`VerificationCodeCache`] with a per-entry time-to-live.
///
/// Clones share the same underlying storage.
#[derive(Debug, Clone)]
pub struct InMemoryCodeCache {
    inner: Cache<String, VerificationCode>,
}

impl Default for InMemoryCodeCache {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_CODE_TTL)
    }
}

impl InMemoryCodeCache {
    /// Create a cache with the default TTL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache whose entries expire `ttl` after being written.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(DEFAULT_CODE_CAPACITY)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl VerificationCodeCache for InMemoryCodeCache {
    async fn get(&self, key: &str) -> Option<VerificationCode> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, code: VerificationCode) {
        self.inner.insert(key.to_string(), code).await;
    }
}

/// Cache key under which the code issued to `number` is stored.
pub fn verification_cache_key(prefix: &str, number: &PhoneNumber) -> String {
    format!("{}{}", prefix, number)
}
