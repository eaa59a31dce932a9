use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STATE_TOKEN_LEN: usize = 16;
const NONCE_LEN: usize = 32;

/// How long an issued state token stays redeemable
pub const STATE_TTL: Duration = Duration::from_secs(600);

/// A login attempt that has been initiated but not yet called back.
///
/// The nonce is minted together with the state token and must reappear
/// inside the identity token returned for this attempt.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub nonce: String,
    pub issued_at: Instant,
}

/// State and nonce handed to the client when a login is initiated
#[derive(Debug, Clone)]
pub struct IssuedLogin {
    pub state: String,
    pub nonce: String,
}

/// Live set of unredeemed state tokens.
///
/// Injected into the tracker so tests (or a multi-instance deployment) can
/// substitute their own store. `take` must remove and return in one atomic
/// step; two callers racing on the same token must see exactly one `Some`.
pub trait StateStore: Send + Sync {
    fn insert(&self, token: String, pending: PendingLogin);

    /// Atomic find-and-remove.
    fn take(&self, token: &str) -> Option<PendingLogin>;

    /// Drop entries that fail the predicate.
    fn retain(&self, keep: &dyn Fn(&PendingLogin) -> bool);
}

/// Process-local state store over a reader/writer lock
#[derive(Default)]
pub struct InMemoryStateStore {
    entries: RwLock<HashMap<String, PendingLogin>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for InMemoryStateStore {
    fn insert(&self, token: String, pending: PendingLogin) {
        let mut entries = self.entries.write().expect("state store lock poisoned");
        entries.insert(token, pending);
    }

    fn take(&self, token: &str) -> Option<PendingLogin> {
        // remove() under a single write-lock acquisition is the whole
        // find-and-remove critical section
        let mut entries = self.entries.write().expect("state store lock poisoned");
        entries.remove(token)
    }

    fn retain(&self, keep: &dyn Fn(&PendingLogin) -> bool) {
        let mut entries = self.entries.write().expect("state store lock poisoned");
        entries.retain(|_, pending| keep(pending));
    }
}

/// Random token source: a fast generator seeded once from OS entropy.
/// Tokens are single-use and short-lived, so request-scoped draws do not
/// need a CSPRNG of their own.
struct StateTokenGenerator {
    rng: Mutex<StdRng>,
}

impl StateTokenGenerator {
    fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    fn alphanumeric(&self, len: usize) -> String {
        let mut rng = self.rng.lock().expect("state rng lock poisoned");
        (&mut *rng)
            .sample_iter(Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

/// Issues, tracks, and redeems anti-forgery state tokens for the
/// redirect-based login flow.
///
/// Redemption is terminal: once a token has been taken (or has expired)
/// the attempt cannot be retried; the client must re-initiate.
pub struct AuthStateTracker {
    store: Arc<dyn StateStore>,
    tokens: StateTokenGenerator,
    ttl: Duration,
}

impl AuthStateTracker {
    pub fn new(store: Arc<dyn StateStore>, ttl: Duration) -> Self {
        Self {
            store,
            tokens: StateTokenGenerator::new(),
            ttl,
        }
    }

    /// Mint a state token and a per-attempt nonce and record them.
    ///
    /// Expired entries are pruned here rather than by a background task;
    /// issuance is the only path that grows the set, so growth stays
    /// bounded by the issue rate within one TTL window.
    pub fn issue(&self) -> IssuedLogin {
        let ttl = self.ttl;
        self.store
            .retain(&move |pending| pending.issued_at.elapsed() < ttl);

        let state = self.tokens.alphanumeric(STATE_TOKEN_LEN);
        let nonce = self.tokens.alphanumeric(NONCE_LEN);

        self.store.insert(
            state.clone(),
            PendingLogin {
                nonce: nonce.clone(),
                issued_at: Instant::now(),
            },
        );

        IssuedLogin { state, nonce }
    }

    /// Atomically find and remove a state token presented on callback.
    ///
    /// Returns the pending attempt exactly once per issued token; expired
    /// entries are treated as never issued.
    pub fn redeem(&self, state: &str) -> Option<PendingLogin> {
        let pending = self.store.take(state)?;
        if pending.issued_at.elapsed() >= self.ttl {
            return None;
        }
        Some(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> AuthStateTracker {
        AuthStateTracker::new(Arc::new(InMemoryStateStore::new()), STATE_TTL)
    }

    #[test]
    fn test_issue_returns_distinct_state_and_nonce() {
        let tracker = tracker();

        let first = tracker.issue();
        let second = tracker.issue();

        assert_eq!(first.state.len(), 16);
        assert_eq!(first.nonce.len(), 32);
        assert_ne!(first.state, second.state);
        assert_ne!(first.nonce, second.nonce);
    }

    #[test]
    fn test_redeem_returns_the_nonce_bound_to_the_state() {
        let tracker = tracker();

        let issued = tracker.issue();
        let pending = tracker.redeem(&issued.state).expect("state should redeem");

        assert_eq!(pending.nonce, issued.nonce);
    }

    #[test]
    fn test_state_is_single_use() {
        let tracker = tracker();

        let issued = tracker.issue();
        assert!(tracker.redeem(&issued.state).is_some());
        assert!(tracker.redeem(&issued.state).is_none());
    }

    #[test]
    fn test_redeem_unknown_state_fails() {
        let tracker = tracker();
        tracker.issue();

        assert!(tracker.redeem("never-issued").is_none());
    }

    #[test]
    fn test_single_use_survives_later_issuance() {
        let tracker = tracker();

        let issued = tracker.issue();
        assert!(tracker.redeem(&issued.state).is_some());

        // Issuing more tokens must not resurrect a redeemed one
        for _ in 0..10 {
            tracker.issue();
        }
        assert!(tracker.redeem(&issued.state).is_none());
    }

    #[test]
    fn test_expired_state_cannot_be_redeemed() {
        let tracker = AuthStateTracker::new(Arc::new(InMemoryStateStore::new()), Duration::ZERO);

        let issued = tracker.issue();
        assert!(tracker.redeem(&issued.state).is_none());
    }

    #[test]
    fn test_issuance_prunes_expired_entries() {
        let store = Arc::new(InMemoryStateStore::new());
        let tracker = AuthStateTracker::new(store.clone(), Duration::ZERO);

        tracker.issue();
        tracker.issue();

        // Everything issued so far is already expired under a zero TTL,
        // so the next issue leaves exactly one live entry behind
        tracker.issue();
        let remaining = store.entries.read().unwrap().len();
        assert_eq!(remaining, 1);
    }

    #[test]
    fn test_concurrent_redeems_yield_exactly_one_winner() {
        let tracker = Arc::new(tracker());
        let issued = tracker.issue();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let tracker = Arc::clone(&tracker);
            let state = issued.state.clone();
            handles.push(std::thread::spawn(move || {
                tracker.redeem(&state).is_some()
            }));
        }

        let wins: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_concurrent_issue_and_redeem_do_not_interfere() {
        let tracker = Arc::new(tracker());

        let mut handles = Vec::new();
        for _ in 0..4 {
            let tracker = Arc::clone(&tracker);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    let issued = tracker.issue();
                    assert!(tracker.redeem(&issued.state).is_some());
                    assert!(tracker.redeem(&issued.state).is_none());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
