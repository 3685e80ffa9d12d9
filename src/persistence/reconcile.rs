//! Load pipeline: local save, optional remote save, last-write-wins, offline catch-up.

use std::rc::Rc;

use tracing::{info, warn};

use crate::config::{GameConfig, SAVE_KEY};
use crate::error::SnapshotError;
use crate::model::game::GameState;
use crate::persistence::cipher::{nonce_from, SaveCipher};
use crate::persistence::snapshot::GameSnapshot;
use crate::persistence::{LocalStore, RemoteStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    Fresh,
    Local,
    Remote,
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub state: GameState,
    pub source: LoadSource,
    /// Set when a stored save existed but could not be used.
    pub discarded: Option<String>,
    /// Earnings computed for this load; also held as pending on `state` until collected.
    pub offline_earnings: f64,
    /// Time since the restored snapshot was written. Zero for a fresh game.
    pub away_ms: u64,
}

/// `floor(rate * min(elapsed, cap) / 1000)`; zero for non-positive elapsed time.
pub fn offline_earnings(score_per_second: f64, elapsed_ms: i64, max_offline_ms: u64) -> f64 {
    if elapsed_ms <= 0 || !score_per_second.is_finite() || score_per_second <= 0.0 {
        return 0.0;
    }
    let capped = (elapsed_ms as u64).min(max_offline_ms) as f64;
    (score_per_second * capped / 1000.0).floor()
}

/// Whole-snapshot last-write-wins. Ties keep the local copy.
pub fn pick_latest(
    local: Option<GameSnapshot>,
    remote: Option<GameSnapshot>,
) -> Option<(GameSnapshot, LoadSource)> {
    match (local, remote) {
        (Some(l), Some(r)) if r.timestamp > l.timestamp => Some((r, LoadSource::Remote)),
        (Some(l), _) => Some((l, LoadSource::Local)),
        (None, Some(r)) => Some((r, LoadSource::Remote)),
        (None, None) => None,
    }
}

fn unseal(cipher: &SaveCipher, blob: &str) -> Result<GameSnapshot, SnapshotError> {
    let json = cipher.open(blob)?;
    GameSnapshot::parse(&json)
}

pub async fn load_game<L: LocalStore, R: RemoteStore>(
    local: &L,
    remote: &R,
    cipher: &SaveCipher,
    config: Rc<GameConfig>,
    canvas: (f64, f64),
    seed: u64,
    now_ms: u64,
) -> LoadOutcome {
    let mut discarded = None;
    let stored = local.load(SAVE_KEY).unwrap_or_else(|e| {
        warn!(error = %e, "local_load_failed");
        None
    });
    let local_snap = match stored.map(|blob| unseal(cipher, &blob)) {
        None => None,
        Some(Ok(snap)) => Some(snap),
        Some(Err(e)) => {
            warn!(error = %e, "local_save_discarded");
            if let Err(e) = local.remove(SAVE_KEY) {
                warn!(error = %e, "local_remove_failed");
            }
            discarded = Some(e.to_string());
            None
        }
    };

    let remote_snap = match &local_snap {
        Some(snap) => match remote.remote_load(&snap.player.id).await {
            Ok(Some(blob)) => unseal(cipher, &blob)
                .inspect_err(|e| warn!(error = %e, "remote_save_ignored"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "remote_load_failed");
                None
            }
        },
        None => None,
    };

    let Some((snap, source)) = pick_latest(local_snap, remote_snap) else {
        return LoadOutcome {
            state: GameState::new_game(config, canvas, seed),
            source: LoadSource::Fresh,
            discarded,
            offline_earnings: 0.0,
            away_ms: 0,
        };
    };

    let timestamp = snap.timestamp;
    let max_offline_ms = config.max_offline_ms;
    let mut state = snap.restore(config, canvas, seed);
    let elapsed = now_ms as i64 - timestamp as i64;
    let rate = state.progression().score_per_second();
    // Uncollected earnings from earlier visits share one offline cap with this one
    let ceiling = offline_earnings(rate, max_offline_ms as i64, max_offline_ms);
    let carried = state.pending_offline_earnings();
    let pending = (carried + offline_earnings(rate, elapsed, max_offline_ms)).min(ceiling);
    let earned = (pending - carried).max(0.0);
    state.set_pending_offline_earnings(pending);
    info!(?source, elapsed_ms = elapsed, earned, cards = state.board().len(), "game_loaded");
    LoadOutcome { state, source, discarded, offline_earnings: earned, away_ms: elapsed.max(0) as u64 }
}

/// Seals and writes the current state locally. Returns the sealed blob for a remote push.
pub fn save_local<L: LocalStore>(
    store: &L,
    cipher: &SaveCipher,
    state: &GameState,
    now_ms: u64,
    nonce_seed: u64,
) -> Option<String> {
    let json = match GameSnapshot::capture(state, now_ms).to_json() {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "snapshot_encode_failed");
            return None;
        }
    };
    let sealed = match cipher.seal(&json, nonce_from(nonce_seed, now_ms)) {
        Ok(sealed) => sealed,
        Err(e) => {
            warn!(error = %e, "snapshot_seal_failed");
            return None;
        }
    };
    match store.save(SAVE_KEY, &sealed) {
        Ok(()) => Some(sealed),
        Err(e) => {
            warn!(error = %e, "local_save_failed");
            None
        }
    }
}

/// Pushes an already sealed blob to the remote store. Failures are logged and skipped.
pub async fn sync_remote<R: RemoteStore>(remote: &R, player_id: &str, player_name: &str, sealed: &str) -> bool {
    match remote.remote_save(player_id, player_name, sealed).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "remote_save_failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::test_support::now_or_never;
    use crate::persistence::{MemoryStore, NoRemote};

    const HOUR: i64 = 3_600_000;

    #[test]
    fn offline_earnings_are_capped() {
        let cap = GameConfig::default().max_offline_ms;
        assert_eq!(offline_earnings(10.0, 3 * HOUR, cap), 10.0 * 2.0 * 3600.0);
        assert_eq!(offline_earnings(10.0, HOUR, cap), 36_000.0);
        assert_eq!(offline_earnings(2.25, 1_500, cap), 3.0);
        assert_eq!(offline_earnings(10.0, 0, cap), 0.0);
        assert_eq!(offline_earnings(10.0, -5_000, cap), 0.0);
    }

    fn snap(ts: u64) -> GameSnapshot {
        let state = GameState::new_game(Rc::new(GameConfig::default()), (400.0, 400.0), ts);
        GameSnapshot::capture(&state, ts)
    }

    #[test]
    fn newer_snapshot_wins_wholesale() {
        let (picked, src) = pick_latest(Some(snap(10)), Some(snap(20))).unwrap();
        assert_eq!((picked.timestamp, src), (20, LoadSource::Remote));
        let (picked, src) = pick_latest(Some(snap(30)), Some(snap(20))).unwrap();
        assert_eq!((picked.timestamp, src), (30, LoadSource::Local));
        let (_, src) = pick_latest(Some(snap(5)), Some(snap(5))).unwrap();
        assert_eq!(src, LoadSource::Local);
        assert!(pick_latest(None, None).is_none());
    }

    #[test]
    fn unreadable_local_save_starts_fresh_and_is_removed() {
        let store = MemoryStore::new();
        store.insert(SAVE_KEY, "garbage");
        let cipher = SaveCipher::new("k");
        let out = now_or_never(load_game(&store, &NoRemote, &cipher, Rc::new(GameConfig::default()), (400.0, 400.0), 1, 0));
        assert_eq!(out.source, LoadSource::Fresh);
        assert!(out.discarded.is_some());
        assert_eq!(store.get(SAVE_KEY), None);
    }

    #[test]
    fn failing_backends_are_not_fatal() {
        let cipher = SaveCipher::new("k");
        let failing = MemoryStore::failing();
        let out = now_or_never(load_game(&failing, &failing, &cipher, Rc::new(GameConfig::default()), (400.0, 400.0), 1, 0));
        assert_eq!(out.source, LoadSource::Fresh);
        assert_eq!(out.state.board().len(), 4);

        let state = out.state;
        assert!(save_local(&failing, &cipher, &state, 10, 1).is_none());
        assert!(!now_or_never(sync_remote(&failing, "p", "n", "blob")));
    }
}
