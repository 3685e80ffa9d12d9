//! Save/load plumbing. Storage backends are collaborators behind [`LocalStore`] and
//! [`RemoteStore`]; this module owns the format, sealing and reconciliation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::{ready, Future};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub mod browser;
pub mod cipher;
pub mod reconcile;
pub mod snapshot;

pub use browser::BrowserStorage;
pub use cipher::SaveCipher;
pub use reconcile::{load_game, offline_earnings, pick_latest, save_local, sync_remote, LoadOutcome, LoadSource};
pub use snapshot::{CardRecord, GameSnapshot};

/// Client-side key/value storage (localStorage in the browser).
pub trait LocalStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&self, key: &str, blob: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub name: String,
    pub score: f64,
}

/// Cloud document store keyed by player id.
pub trait RemoteStore {
    fn remote_load(&self, player_id: &str) -> impl Future<Output = Result<Option<String>, StoreError>>;
    fn remote_save(&self, player_id: &str, player_name: &str, blob: &str) -> impl Future<Output = Result<(), StoreError>>;
    fn query_top_scores(&self, n: usize) -> impl Future<Output = Result<Vec<LeaderboardEntry>, StoreError>>;
}

/// Top-`n` by score, highest first, regardless of what order the store returned.
pub async fn leaderboard<R: RemoteStore>(remote: &R, n: usize) -> Vec<LeaderboardEntry> {
    match remote.query_top_scores(n).await {
        Ok(mut rows) => {
            rows.retain(|r| r.score.is_finite());
            rows.sort_by(|a, b| b.score.total_cmp(&a.score));
            rows.truncate(n);
            rows
        }
        Err(e) => {
            tracing::warn!(error = %e, "leaderboard_query_failed");
            Vec::new()
        }
    }
}

/// Used when no cloud backend is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRemote;

impl RemoteStore for NoRemote {
    fn remote_load(&self, _player_id: &str) -> impl Future<Output = Result<Option<String>, StoreError>> {
        ready(Ok(None))
    }

    fn remote_save(&self, _player_id: &str, _player_name: &str, _blob: &str) -> impl Future<Output = Result<(), StoreError>> {
        ready(Ok(()))
    }

    fn query_top_scores(&self, _n: usize) -> impl Future<Output = Result<Vec<LeaderboardEntry>, StoreError>> {
        ready(Ok(Vec::new()))
    }
}

/// In-memory store for both roles. Backs tests and sessions without localStorage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    names: RefCell<HashMap<String, String>>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails, for exercising the error paths.
    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, blob: &str) {
        self.entries.borrow_mut().insert(key.to_string(), blob.to_string());
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing { Err(StoreError::Backend("memory store set to fail".into())) } else { Ok(()) }
    }
}

impl LocalStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.get(key))
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.check()?;
        self.insert(key, blob);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    fn remote_load(&self, player_id: &str) -> impl Future<Output = Result<Option<String>, StoreError>> {
        ready(self.load(player_id))
    }

    fn remote_save(&self, player_id: &str, player_name: &str, blob: &str) -> impl Future<Output = Result<(), StoreError>> {
        let res = self.save(player_id, blob).map(|()| {
            self.names.borrow_mut().insert(player_id.to_string(), player_name.to_string());
        });
        ready(res)
    }

    /// Entries are scored by the `highScore` of their plaintext JSON; sealed blobs are skipped.
    fn query_top_scores(&self, n: usize) -> impl Future<Output = Result<Vec<LeaderboardEntry>, StoreError>> {
        let res = self.check().map(|()| {
            let names = self.names.borrow();
            let mut rows: Vec<LeaderboardEntry> = self
                .entries
                .borrow()
                .iter()
                .filter_map(|(id, blob)| {
                    let v: serde_json::Value = serde_json::from_str(blob).ok()?;
                    Some(LeaderboardEntry {
                        player_id: id.clone(),
                        name: names.get(id).cloned().unwrap_or_default(),
                        score: v.get("highScore")?.as_f64()?,
                    })
                })
                .collect();
            rows.sort_by(|a, b| b.score.total_cmp(&a.score));
            rows.truncate(n);
            rows
        });
        ready(res)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    /// Polls a future that is expected to be ready immediately.
    pub fn now_or_never<F: Future>(fut: F) -> F::Output {
        let mut fut = pin!(fut);
        let mut cx = Context::from_waker(Waker::noop());
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(v) => v,
            Poll::Pending => panic!("future was not ready"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::now_or_never;
    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let s = MemoryStore::new();
        assert_eq!(s.load("k").unwrap(), None);
        s.save("k", "v").unwrap();
        assert_eq!(s.load("k").unwrap().as_deref(), Some("v"));
        s.remove("k").unwrap();
        assert_eq!(s.load("k").unwrap(), None);
        assert!(MemoryStore::failing().load("k").is_err());
    }

    #[test]
    fn leaderboard_sorts_and_truncates() {
        let s = MemoryStore::new();
        for (id, score) in [("a", 10.0), ("b", 30.0), ("c", 20.0)] {
            now_or_never(s.remote_save(id, &id.to_uppercase(), &format!(r#"{{"highScore":{score}}}"#))).unwrap();
        }
        s.insert("sealed", "opaque-blob");
        let top = now_or_never(leaderboard(&s, 2));
        let ids: Vec<&str> = top.iter().map(|r| r.player_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(top[0].name, "B");
        assert!(now_or_never(leaderboard(&MemoryStore::failing(), 5)).is_empty());
    }
}
