pub mod app;
pub mod board_view;
pub mod card_detail_modal;
pub mod offline_earnings_overlay;
pub mod player_modal;
pub mod score_panel;
pub mod shop_panel;

/// Wall clock in epoch milliseconds.
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed material for the game RNG and sealing nonces.
pub fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}
