//! JWKS key cache for bearer-token validation
//!
//! Keys are fetched from the configured URL and cached process-wide. A
//! background task refreshes on a one-minute tick; actual fetches are
//! spaced at least five minutes apart, including the on-demand refresh
//! triggered by an unknown `kid`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

/// Minimum spacing between JWKS fetches
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(300);
/// Background refresh tick
const REFRESH_TICK: Duration = Duration::from_secs(60);

/// Concurrent-read cache of RS256 decoding keys, keyed by `kid`
pub struct JwksCache {
    url: String,
    http: reqwest::Client,
    keys: RwLock<HashMap<String, DecodingKey>>,
    last_fetch: Mutex<Option<Instant>>,
}

impl JwksCache {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
            keys: RwLock::new(HashMap::new()),
            last_fetch: Mutex::new(None),
        }
    }

    /// Refresh the key set if the minimum interval has elapsed
    pub async fn refresh(&self) {
        {
            let last = self.last_fetch.lock().unwrap();
            if let Some(at) = *last
                && at.elapsed() < MIN_REFRESH_INTERVAL
            {
                return;
            }
        }
        self.force_refresh().await;
    }

    async fn force_refresh(&self) {
        *self.last_fetch.lock().unwrap() = Some(Instant::now());

        let jwks: JwkSet = match self.fetch().await {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "JWKS fetch failed");
                return;
            }
        };

        let mut fresh = HashMap::new();
        for jwk in &jwks.keys {
            if !matches!(jwk.algorithm, AlgorithmParameters::RSA(_)) {
                continue;
            }
            let Some(kid) = jwk.common.key_id.clone() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    fresh.insert(kid, key);
                }
                Err(e) => {
                    tracing::warn!(kid = %kid, error = %e, "unusable JWK skipped")
                }
            }
        }

        tracing::debug!(keys = fresh.len(), "JWKS cache refreshed");
        *self.keys.write().unwrap() = fresh;
    }

    async fn fetch(&self) -> reqwest::Result<JwkSet> {
        self.http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Validate an RS256 bearer token against the cached key set
    ///
    /// An unknown `kid` triggers one rate-limited refresh before the
    /// token is rejected.
    pub async fn verify(&self, token: &str) -> bool {
        let Ok(header) = decode_header(token) else {
            return false;
        };
        let Some(kid) = header.kid else {
            return false;
        };

        let mut key = self.key_for(&kid);
        if key.is_none() {
            self.refresh().await;
            key = self.key_for(&kid);
        }
        let Some(key) = key else {
            return false;
        };

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;
        decode::<serde_json::Value>(token, &key, &validation).is_ok()
    }

    fn key_for(&self, kid: &str) -> Option<DecodingKey> {
        self.keys.read().unwrap().get(kid).cloned()
    }

    /// Spawn the background refresh loop for this cache
    pub fn spawn_background_refresh(self: &Arc<Self>) {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(REFRESH_TICK);
            loop {
                tick.tick().await;
                cache.refresh().await;
            }
        });
    }
}
