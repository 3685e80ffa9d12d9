use merge_idle::util::format_number;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ScorePanelProps {
    pub score: f64,
    pub score_per_second: f64,
    pub high_score: f64,
    pub player_name: String,
    pub on_open_player: Callback<()>,
}

#[function_component]
pub fn ScorePanel(props: &ScorePanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // icon | label | value
    let icon_style = "width:20px; text-align:center; flex-shrink:0;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:70px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let player_cb = {
        let cb = props.on_open_player.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:10px; font-size:14px;">
            <div style={row_style}>
                <span style={format!("{} color:#d4af37;", icon_style)}>{"🪙"}</span>
                <span style={format!("{} color:#d4af37;", label_style)}>{"Score"}</span>
                <span style={format!("{} color:#d4af37;", value_style)}>{ format_number(props.score.floor()) }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#3fb950;", icon_style)}>{"⏱"}</span>
                <span style={format!("{} color:#3fb950;", label_style)}>{"Per second"}</span>
                <span style={format!("{} color:#3fb950;", value_style)}>{ format_number(props.score_per_second) }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#58a6ff;", icon_style)}>{"🏆"}</span>
                <span style={format!("{} color:#58a6ff;", label_style)}>{"High score"}</span>
                <span style={format!("{} color:#58a6ff;", value_style)}>{ format_number(props.high_score.floor()) }</span>
            </div>
            <button onclick={player_cb} style="text-align:left;">{ format!("👤 {}", props.player_name) }</button>
        </div>
    }
}
