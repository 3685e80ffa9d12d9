use merge_idle::model::Card;
use merge_idle::util::format_number;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CardDetailModalProps {
    pub card: Option<Card>,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn CardDetailModal(props: &CardDetailModalProps) -> Html {
    let Some(card) = &props.card else {
        return html! {};
    };
    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let row = |label: &str, value: String| {
        html! {
            <div style="display:flex; justify-content:space-between; gap:12px;">
                <span style="opacity:0.8;">{ label.to_string() }</span>
                <span style="font-variant-numeric:tabular-nums; font-weight:600;">{ value }</span>
            </div>
        }
    };
    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;" onclick={close_cb.clone()}>
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:260px; display:flex; flex-direction:column; gap:10px;"
            onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
            <h3 style="margin:0; font-size:18px;">{ format!("Card {} · Level {}", card.value(), card.level()) }</h3>
            { row("Value", card.value().to_string()) }
            { row("Level", card.level().to_string()) }
            { row("Points / second", format_number(card.point())) }
            { row("Slot", (card.place_order + 1).to_string()) }
            { row("Artwork", card.image_key()) }
            <button onclick={close_cb}>{"Close"}</button>
        </div>
    </div>}
}
