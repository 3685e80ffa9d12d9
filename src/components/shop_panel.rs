use merge_idle::util::format_number;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ShopPanelProps {
    pub card_price: f64,
    pub slot_price: f64,
    pub can_buy_card: bool,
    pub can_buy_slot: bool,
    pub slots_maxed: bool,
    pub cards: usize,
    pub capacity: usize,
    pub on_add_card: Callback<()>,
    pub on_add_slot_row: Callback<()>,
    pub on_open_settings: Callback<()>,
}

#[function_component]
pub fn ShopPanel(props: &ShopPanelProps) -> Html {
    let add_card_cb = {
        let cb = props.on_add_card.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let add_slot_cb = {
        let cb = props.on_add_slot_row.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let settings_cb = {
        let cb = props.on_open_settings.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let slot_label = if props.slots_maxed {
        "Slots maxed".to_string()
    } else {
        format!("Add slot row ({})", format_number(props.slot_price))
    };
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:200px; display:flex; flex-direction:column; gap:6px;">
        <button onclick={add_card_cb} disabled={!props.can_buy_card}>{ format!("Add card ({})", format_number(props.card_price)) }</button>
        <button onclick={add_slot_cb} disabled={!props.can_buy_slot}>{ slot_label }</button>
        <button onclick={settings_cb}>{"Settings"}</button>
        <div style="font-size:11px; opacity:0.7;">{ format!("Slots used: {}/{}", props.cards, props.capacity) }</div>
        <div style="font-size:11px; opacity:0.7;">{"Drag a card onto a matching card to merge"}</div>
    </div>}
}
