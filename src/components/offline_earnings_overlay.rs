use merge_idle::util::{format_duration, format_number};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct OfflineEarningsOverlayProps {
    pub amount: f64,
    /// Time the session was away, when known from this load.
    pub away_ms: Option<u64>,
    pub on_collect: Callback<()>,
}

#[function_component]
pub fn OfflineEarningsOverlay(props: &OfflineEarningsOverlayProps) -> Html {
    if props.amount <= 0.0 {
        return html! {};
    }
    let collect_cb = props.on_collect.clone();
    let collect_btn = Callback::from(move |_| collect_cb.emit(()));
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid #3fb950; padding:24px 32px; border-radius:12px; text-align:center; min-width:320px; z-index:40;">
            <h2 style="margin:0 0 12px 0; color:#3fb950;">{"Welcome Back"}</h2>
            { if let Some(ms) = props.away_ms { html!{ <p style="margin:4px 0;">{ format!("You were away for {}", format_duration(ms)) }</p> } } else { html!{} } }
            <p style="margin:4px 0;">{ format!("Your cards earned {} while you were gone.", format_number(props.amount)) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={collect_btn}>{"Collect"}</button>
            </div>
        </div>
    }
}
