use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Claim time plus an insertion counter, so equal instants stay distinct.
type ClaimKey = (Instant, u64);

#[derive(Default)]
struct Claims {
    by_client: HashMap<String, ClaimKey>,
    /// Oldest claim first.
    by_age: BTreeMap<ClaimKey, String>,
    seq: u64,
}

impl Claims {
    fn remove(&mut self, client: &str) -> bool {
        match self.by_client.remove(client) {
            Some(key) => {
                self.by_age.remove(&key);
                true
            }
            None => false,
        }
    }

    fn insert(&mut self, client: &str, now: Instant) {
        self.seq += 1;
        let key = (now, self.seq);
        self.by_client.insert(client.to_string(), key);
        self.by_age.insert(key, client.to_string());
    }

    fn pop_oldest(&mut self) -> Option<(ClaimKey, String)> {
        let (key, client) = self.by_age.pop_first()?;
        self.by_client.remove(&client);
        Some((key, client))
    }

    fn oldest(&self) -> Option<Instant> {
        self.by_age.first_key_value().map(|((at, _), _)| *at)
    }
}

/// Tracks which clients have used their free query.
///
/// Claims expire after `ttl`. The store never holds more than `capacity`
/// entries: expired claims are purged first, then the oldest claim is evicted.
/// Claims are indexed by age, so purging and eviction touch only the entries
/// they remove. Check-and-insert happens under one lock, so concurrent first
/// requests from the same client get exactly one free query.
pub struct FreeTierTracker {
    claims: Mutex<Claims>,
    ttl: Duration,
    capacity: usize,
}

impl FreeTierTracker {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            claims: Mutex::new(Claims::default()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Claim the free query for `client`. Returns `true` if it was granted.
    pub async fn try_claim(&self, client: &str) -> bool {
        self.try_claim_at(client, Instant::now()).await
    }

    pub async fn try_claim_at(&self, client: &str, now: Instant) -> bool {
        let mut claims = self.claims.lock().await;

        if let Some((claimed_at, _)) = claims.by_client.get(client) {
            if now.saturating_duration_since(*claimed_at) < self.ttl {
                return false;
            }
        }
        claims.remove(client);

        while claims
            .oldest()
            .is_some_and(|at| now.saturating_duration_since(at) >= self.ttl)
        {
            claims.pop_oldest();
        }
        if claims.by_client.len() >= self.capacity {
            if let Some((_, evicted)) = claims.pop_oldest() {
                debug!(client = %evicted, "Evicting oldest free-tier claim");
            }
        }

        claims.insert(client, now);
        true
    }

    /// Give a claimed free query back, e.g. when the upstream fetch failed.
    pub async fn release(&self, client: &str) {
        self.claims.lock().await.remove(client);
    }

    pub async fn len(&self) -> usize {
        self.claims.lock().await.by_client.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
