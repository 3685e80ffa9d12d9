use merge_idle::model::Player;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerModalProps {
    pub show: bool,
    pub player: Player,
    pub on_close: Callback<()>,
    pub on_rename: Callback<String>,
    pub on_hard_reset: Callback<()>,
}

#[function_component]
pub fn PlayerModal(props: &PlayerModalProps) -> Html {
    let draft = use_state(|| props.player.name.clone());
    let error = use_state(|| None::<String>);

    // Reopening starts from the stored name
    {
        let draft = draft.clone();
        let error = error.clone();
        let name = props.player.name.clone();
        use_effect_with(props.show, move |_| {
            draft.set(name);
            error.set(None);
            || ()
        });
    }

    if !props.show {
        return html! {};
    }

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let input_cb = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(input.value());
        })
    };
    let save_cb = {
        let cb = props.on_rename.clone();
        let player = props.player.clone();
        let draft = draft.clone();
        let error = error.clone();
        Callback::from(move |_| {
            let mut probe = player.clone();
            match probe.rename(&draft) {
                Ok(()) => {
                    error.set(None);
                    cb.emit(probe.name);
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        })
    };
    let hard_reset_cb = {
        let cb = props.on_hard_reset.clone();
        Callback::from(move |_| {
            if let Some(win) = web_sys::window() {
                if win
                    .confirm_with_message(
                        "This will WIPE your cards, score and purchases and start fresh. Are you sure?",
                    )
                    .unwrap_or(false)
                {
                    cb.emit(());
                }
            } else {
                cb.emit(());
            }
        })
    };

    let editable = props.player.is_name_editable;
    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:480px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Player"}</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="display:flex; flex-direction:column; gap:8px;">
                <label style="font-size:12px; opacity:0.8;">{"Name"}</label>
                <input type="text" value={(*draft).clone()} oninput={input_cb} disabled={!editable} maxlength="20" />
                { if editable {
                    html!{ <button onclick={save_cb}>{"Save name"}</button> }
                } else {
                    html!{ <div style="font-size:11px; opacity:0.7;">{"Your name is set."}</div> }
                } }
                { if let Some(msg) = &*error { html!{ <div style="font-size:12px; color:#f85149;">{ msg.clone() }</div> } } else { html!{} } }
                <div style="font-size:11px; opacity:0.6; font-family:monospace;">{ format!("ID {}", props.player.id) }</div>
            </div>
            <div style="display:flex; gap:8px; flex-wrap:wrap;">
                <button onclick={hard_reset_cb} style="background:#f85149; border:1px solid #b62324; color:#fff; flex:1;">{"Hard Reset (Wipe Progress)"}</button>
                <button onclick={close_cb} style="flex:0 0 auto;">{"Done"}</button>
            </div>
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">{"Hard Reset removes your saved board and score. Your player ID is kept."}</div>
        </div>
    </div>}
}
