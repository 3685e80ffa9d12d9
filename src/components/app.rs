use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::platform::spawn_local;
use yew::prelude::*;

use merge_idle::config::{save_secret, GameConfig, SAVE_KEY};
use merge_idle::error::StoreError;
use merge_idle::persistence::{
    load_game, save_local, sync_remote, BrowserStorage, LoadSource, LocalStore, MemoryStore, NoRemote, SaveCipher,
};
use merge_idle::{GameAction, GameState};

use super::board_view::{initial_canvas_size, BoardView};
use super::card_detail_modal::CardDetailModal;
use super::offline_earnings_overlay::OfflineEarningsOverlay;
use super::player_modal::PlayerModal;
use super::score_panel::ScorePanel;
use super::shop_panel::ShopPanel;
use super::{now_ms, random_seed};

/// Optional JSON override for [`GameConfig`], read once at startup.
const CONFIG_OVERRIDE_KEY: &str = "merge_idle_config";

/// localStorage when the browser grants it, otherwise an in-memory session.
enum SessionStore {
    Browser(BrowserStorage),
    Memory(MemoryStore),
}

impl SessionStore {
    fn open() -> Self {
        match BrowserStorage::open() {
            Ok(s) => Self::Browser(s),
            Err(e) => {
                warn!(error = %e, "local_storage_unavailable");
                Self::Memory(MemoryStore::new())
            }
        }
    }
}

impl LocalStore for SessionStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::Browser(s) => s.load(key),
            Self::Memory(s) => s.load(key),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        match self {
            Self::Browser(s) => s.save(key, blob),
            Self::Memory(s) => s.save(key, blob),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Self::Browser(s) => s.remove(key),
            Self::Memory(s) => s.remove(key),
        }
    }
}

fn load_config(store: &SessionStore) -> GameConfig {
    match store.load(CONFIG_OVERRIDE_KEY) {
        Ok(Some(raw)) => GameConfig::from_json(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "config_override_rejected");
            GameConfig::default()
        }),
        _ => GameConfig::default(),
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let store = use_memo((), |_| SessionStore::open());
    let cipher = use_memo((), |_| SaveCipher::new(save_secret()));
    let game = {
        let store = store.clone();
        use_reducer(move || GameState::new_game(Rc::new(load_config(&store)), initial_canvas_size(), random_seed()))
    };
    let game_ref = use_mut_ref(|| game.clone());
    // Saving stays off until the stored game has been reconciled, so a fresh deal never overwrites it.
    let loaded = use_mut_ref(|| false);
    let away_ms = use_state(|| None::<u64>);
    let show_player = use_state(|| false);

    {
        let game_ref = game_ref.clone();
        let current = game.clone();
        use_effect_with(game.revision, move |_| {
            *game_ref.borrow_mut() = current;
            || ()
        });
    }

    // Load and reconcile the stored game
    {
        let game = game.clone();
        let game_ref = game_ref.clone();
        let store = store.clone();
        let cipher = cipher.clone();
        let loaded = loaded.clone();
        let away_ms = away_ms.clone();
        use_effect_with((), move |_| {
            let config = game.shared_config();
            let canvas = (game.grid().canvas_width, game.grid().canvas_height);
            spawn_local(async move {
                let outcome = load_game(&*store, &NoRemote, &cipher, config, canvas, random_seed(), now_ms()).await;
                if let Some(reason) = &outcome.discarded {
                    warn!(reason = %reason, "stored_game_discarded");
                }
                info!(source = ?outcome.source, earned = outcome.offline_earnings, "startup_load");
                if outcome.source != LoadSource::Fresh {
                    if outcome.offline_earnings > 0.0 {
                        away_ms.set(Some(outcome.away_ms));
                    }
                    game.dispatch(GameAction::Replace(Box::new(outcome.state)));
                    // The board may have been measured while loading
                    let latest = game_ref.borrow().clone();
                    game.dispatch(GameAction::Resize {
                        width: latest.grid().canvas_width,
                        height: latest.grid().canvas_height,
                    });
                }
                *loaded.borrow_mut() = true;
            });
            || ()
        });
    }

    // Autosave ticker, with a remote push every few saves, plus a final save on unload
    {
        let game_ref = game_ref.clone();
        let store = store.clone();
        let cipher = cipher.clone();
        let loaded = loaded.clone();
        let cfg = game.shared_config();
        use_effect_with((), move |_| -> Box<dyn FnOnce()> {
            let Some(window) = web_sys::window() else {
                return Box::new(|| ());
            };
            let save_now: Rc<dyn Fn() -> Option<(String, String, String)>> = Rc::new(move || {
                if !*loaded.borrow() {
                    return None;
                }
                let handle = game_ref.borrow().clone();
                let sealed = save_local(&*store, &cipher, &handle, now_ms(), random_seed())?;
                Some((handle.player().id.clone(), handle.player().name.clone(), sealed))
            });
            let saves = Rc::new(Cell::new(0u32));
            let sync_every = cfg.cloud_sync_every_saves.max(1);
            let save_tick = {
                let save_now = save_now.clone();
                Closure::wrap(Box::new(move || {
                    let Some((id, name, sealed)) = save_now() else {
                        return;
                    };
                    saves.set(saves.get().wrapping_add(1));
                    if saves.get() % sync_every == 0 {
                        spawn_local(async move {
                            if sync_remote(&NoRemote, &id, &name, &sealed).await {
                                debug!(player = %id, "remote_synced");
                            }
                        });
                    }
                }) as Box<dyn FnMut()>)
            };
            let save_tick_id = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    save_tick.as_ref().unchecked_ref(),
                    cfg.save_tick_ms as i32,
                )
                .ok();
            let unload_cb = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                save_now();
            }) as Box<dyn FnMut(_)>);
            let _ = window.add_event_listener_with_callback("beforeunload", unload_cb.as_ref().unchecked_ref());

            Box::new(move || {
                let _ = window.remove_event_listener_with_callback("beforeunload", unload_cb.as_ref().unchecked_ref());
                if let Some(id) = save_tick_id {
                    window.clear_interval_with_handle(id);
                }
                let _keep_alive = (&save_tick, &unload_cb);
            })
        });
    }

    let dispatch = |action: fn() -> GameAction| {
        let game = game.clone();
        Callback::from(move |_| game.dispatch(action()))
    };
    let on_add_card = dispatch(|| GameAction::AddCard);
    let on_add_slot_row = dispatch(|| GameAction::AddSlotRow);
    let on_close_card = dispatch(|| GameAction::CloseCardInfo);
    let on_collect = {
        let game = game.clone();
        let away_ms = away_ms.clone();
        Callback::from(move |_| {
            game.dispatch(GameAction::CollectOfflineEarnings);
            away_ms.set(None);
        })
    };
    let on_rename = {
        let game = game.clone();
        Callback::from(move |name: String| game.dispatch(GameAction::Rename(name)))
    };
    let open_player = {
        let show_player = show_player.clone();
        Callback::from(move |_| show_player.set(true))
    };
    let close_player = {
        let show_player = show_player.clone();
        Callback::from(move |_| show_player.set(false))
    };
    let on_hard_reset = {
        let game = game.clone();
        let store = store.clone();
        let show_player = show_player.clone();
        let away_ms = away_ms.clone();
        Callback::from(move |_| {
            if let Err(e) = store.remove(SAVE_KEY) {
                warn!(error = %e, "save_remove_failed");
            }
            game.dispatch(GameAction::HardReset { seed: random_seed() });
            away_ms.set(None);
            show_player.set(false);
        })
    };

    let progression = game.progression();
    let card_price = game.add_card_price();
    let slot_price = game.add_slot_price();
    let has_free_slot = game.grid().find_free_slot(game.board().cards()).is_some();

    html! {
        <div style="position:relative; min-height:100vh; background:#0e1116; color:#c9d1d9; font-family:system-ui, sans-serif;">
            <div id="top-bar" style="display:flex; gap:12px; padding:12px; flex-wrap:wrap; justify-content:center; align-items:flex-start;">
                <ScorePanel
                    score={progression.display_score()}
                    score_per_second={progression.score_per_second()}
                    high_score={progression.high_score()}
                    player_name={game.player().name.clone()}
                    on_open_player={open_player.clone()}
                />
                <ShopPanel
                    card_price={card_price}
                    slot_price={slot_price}
                    can_buy_card={has_free_slot && progression.score() >= card_price}
                    can_buy_slot={game.can_add_slot_row() && progression.score() >= slot_price}
                    slots_maxed={!game.can_add_slot_row()}
                    cards={game.board().len()}
                    capacity={game.capacity()}
                    on_add_card={on_add_card}
                    on_add_slot_row={on_add_slot_row}
                    on_open_settings={open_player}
                />
            </div>
            <div style="position:relative;">
                <BoardView game={game.clone()} />
                <OfflineEarningsOverlay
                    amount={game.pending_offline_earnings()}
                    away_ms={*away_ms}
                    on_collect={on_collect}
                />
            </div>
            <PlayerModal
                show={*show_player}
                player={game.player().clone()}
                on_close={close_player}
                on_rename={on_rename}
                on_hard_reset={on_hard_reset}
            />
            <CardDetailModal card={game.info_card().cloned()} on_close={on_close_card} />
        </div>
    }
}
