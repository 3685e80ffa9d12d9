use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent};
use yew::prelude::*;

use merge_idle::model::{render_board, Card, Rect, Renderer};
use merge_idle::{GameAction, GameState};

use super::now_ms;

const MAX_CANVAS_WIDTH: f64 = 800.0;
const CANVAS_HEIGHT_RATIO: f64 = 0.8;

/// Canvas size before the element is mounted: capped width, 80% of the viewport height.
pub fn initial_canvas_size() -> (f64, f64) {
    let Some(win) = web_sys::window() else {
        return (MAX_CANVAS_WIDTH, 600.0);
    };
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(MAX_CANVAS_WIDTH);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(750.0);
    (w.min(MAX_CANVAS_WIDTH).floor(), (h * CANVAS_HEIGHT_RATIO).floor())
}

fn fit_canvas(canvas: &HtmlCanvasElement) -> (f64, f64) {
    let (fallback_w, h) = initial_canvas_size();
    let w = canvas
        .parent_element()
        .map(|p| p.client_width() as f64)
        .filter(|w| *w > 0.0)
        .map_or(fallback_w, |w| w.min(MAX_CANVAS_WIDTH).floor());
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);
    (w, h)
}

/// Client coordinates to canvas pixels, accounting for CSS scaling.
fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 { canvas.width() as f64 / rect.width() } else { 1.0 };
    let sy = if rect.height() > 0.0 { canvas.height() as f64 / rect.height() } else { 1.0 };
    ((client_x as f64 - rect.left()) * sx, (client_y as f64 - rect.top()) * sy)
}

struct CanvasRenderer<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl CanvasRenderer<'_> {
    fn boxed(&self, r: Rect, fill: &str, stroke: &str, line_width: f64) {
        self.ctx.set_fill_style_str(fill);
        self.ctx.fill_rect(r.x, r.y, r.width, r.height);
        self.ctx.set_stroke_style_str(stroke);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(r.x, r.y, r.width, r.height);
    }

    fn tint(&self, r: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(r.x, r.y, r.width, r.height);
    }
}

impl Renderer for CanvasRenderer<'_> {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.set_fill_style_str("#f6f8fa");
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }

    fn draw_slot(&mut self, rect: Rect) {
        self.boxed(rect, "#e0e0e0", "#666666", 1.0);
    }

    fn draw_card(&mut self, card: &Card) {
        let ctx = self.ctx;
        let r = card.rect();
        if card.is_selected {
            self.boxed(r, "#ffffff", "#4CAF50", 2.0);
        } else {
            self.boxed(r, "#ffffff", "#000000", 1.0);
        }
        let (cx, cy) = (r.x + r.width / 2.0, r.y + r.height / 2.0);
        ctx.set_fill_style_str("#000000");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_font("20px Arial");
        let _ = ctx.fill_text(&card.value().to_string(), cx, cy);
        ctx.set_font("12px Arial");
        let _ = ctx.fill_text(&format!("Lv{}", card.level()), cx, cy + 20.0);

        if card.is_selected {
            self.tint(r, "rgba(76, 175, 80, 0.1)");
        } else if card.is_flipped && !card.is_matched {
            self.tint(r, "rgba(255, 215, 0, 0.3)");
        }
        if card.is_not_matched {
            self.tint(r, "rgba(255, 0, 0, 0.3)");
        }

        if let Some(b) = card.info_button() {
            let radius = b.width / 2.0;
            ctx.set_fill_style_str("#4CAF50");
            ctx.begin_path();
            let _ = ctx.arc(b.x + radius, b.y + radius, radius, 0.0, TAU);
            ctx.fill();
            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("bold 12px Arial");
            let _ = ctx.fill_text("i", b.x + radius, b.y + radius);
        }
    }
}

type Listener = (EventTarget, &'static str, Closure<dyn FnMut(Event)>);

fn listen(target: &EventTarget, event: &'static str, f: impl FnMut(Event) + 'static) -> Listener {
    let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
    if let Err(e) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        tracing::warn!(event_name = event, error = ?e, "listener_attach_failed");
    }
    (target.clone(), event, cb)
}

#[derive(Properties, PartialEq, Clone)]
pub struct BoardViewProps {
    pub game: UseReducerHandle<GameState>,
}

#[function_component(BoardView)]
pub fn board_view(props: &BoardViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let state_ref = use_mut_ref(|| props.game.clone());

    // Latest handle for the frame loop
    {
        let state_ref = state_ref.clone();
        let current = props.game.clone();
        use_effect_with(props.game.revision, move |_| {
            *state_ref.borrow_mut() = current;
            || ()
        });
    }

    // Reject pulse: one pending timeout per token, dropped (cancelled) when the token changes.
    {
        let game = props.game.clone();
        let pulse_ms = props.game.config().reject_pulse_ms;
        use_effect_with(props.game.interaction().pending_pulse(), move |token| {
            let timeout = (*token).map(|token| {
                Timeout::new(pulse_ms, move || game.dispatch(GameAction::PulseElapsed(token)))
            });
            move || drop(timeout)
        });
    }

    // Mount: sizing, frame loop, tickers and pointer listeners
    {
        let canvas_ref = canvas_ref.clone();
        let game = props.game.clone();
        let state_ref = state_ref.clone();
        use_effect_with((), move |_| -> Box<dyn FnOnce()> {
            let (Some(window), Some(canvas)) = (web_sys::window(), canvas_ref.cast::<HtmlCanvasElement>())
            else {
                tracing::warn!("board_canvas_unavailable");
                return Box::new(|| ());
            };
            let (width, height) = fit_canvas(&canvas);
            game.dispatch(GameAction::Resize { width, height });

            let draw = {
                let canvas = canvas.clone();
                move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let Some(ctx) = canvas
                        .get_context("2d")
                        .ok()
                        .flatten()
                        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                    else {
                        return;
                    };
                    let handle = state_ref.borrow().clone();
                    render_board(&handle, &mut CanvasRenderer { ctx: &ctx });
                }
            };

            // RAF loop
            let raf_id = Rc::new(Cell::new(None::<i32>));
            let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
            {
                let frame_loop = frame.clone();
                let raf_id = raf_id.clone();
                let window = window.clone();
                *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                    draw();
                    if let Some(cb) = frame_loop.borrow().as_ref() {
                        if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                            raf_id.set(Some(id));
                        }
                    }
                }) as Box<dyn FnMut()>));
            }
            if let Some(cb) = frame.borrow().as_ref() {
                if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    raf_id.set(Some(id));
                }
            }

            // Score tickers
            let cfg = game.shared_config();
            let display_tick = {
                let game = game.clone();
                Closure::wrap(Box::new(move || game.dispatch(GameAction::TickDisplay)) as Box<dyn FnMut()>)
            };
            let second_tick = {
                let game = game.clone();
                Closure::wrap(Box::new(move || game.dispatch(GameAction::TickSecond)) as Box<dyn FnMut()>)
            };
            let interval_ids: Vec<i32> = [
                (&display_tick, cfg.display_tick_ms),
                (&second_tick, cfg.score_tick_ms),
            ]
            .into_iter()
            .filter_map(|(cb, ms)| {
                window
                    .set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), ms as i32)
                    .ok()
            })
            .collect();

            let canvas_target: &EventTarget = canvas.as_ref();
            let window_target: &EventTarget = window.as_ref();
            let mut listeners = Vec::new();

            {
                let game = game.clone();
                let canvas = canvas.clone();
                listeners.push(listen(canvas_target, "mousedown", move |e| {
                    let e: MouseEvent = e.unchecked_into();
                    if e.button() != 0 {
                        return;
                    }
                    let (x, y) = canvas_point(&canvas, e.client_x(), e.client_y());
                    game.dispatch(GameAction::PointerDown { x, y, now_ms: now_ms() });
                }));
            }
            {
                let game = game.clone();
                let canvas = canvas.clone();
                listeners.push(listen(canvas_target, "mousemove", move |e| {
                    let e: MouseEvent = e.unchecked_into();
                    let (x, y) = canvas_point(&canvas, e.client_x(), e.client_y());
                    game.dispatch(GameAction::PointerMove { x, y });
                }));
            }
            // Release is caught on the window so a drag ending off-canvas still snaps back.
            {
                let game = game.clone();
                let canvas = canvas.clone();
                listeners.push(listen(window_target, "mouseup", move |e| {
                    let e: MouseEvent = e.unchecked_into();
                    let (x, y) = canvas_point(&canvas, e.client_x(), e.client_y());
                    game.dispatch(GameAction::PointerUp { x, y, now_ms: now_ms() });
                }));
            }
            {
                let game = game.clone();
                let canvas = canvas.clone();
                listeners.push(listen(canvas_target, "touchstart", move |e| {
                    e.prevent_default();
                    let e: TouchEvent = e.unchecked_into();
                    if let Some(t) = e.touches().item(0) {
                        let (x, y) = canvas_point(&canvas, t.client_x(), t.client_y());
                        game.dispatch(GameAction::PointerDown { x, y, now_ms: now_ms() });
                    }
                }));
            }
            {
                let game = game.clone();
                let canvas = canvas.clone();
                listeners.push(listen(canvas_target, "touchmove", move |e| {
                    e.prevent_default();
                    let e: TouchEvent = e.unchecked_into();
                    if let Some(t) = e.touches().item(0) {
                        let (x, y) = canvas_point(&canvas, t.client_x(), t.client_y());
                        game.dispatch(GameAction::PointerMove { x, y });
                    }
                }));
            }
            {
                let game = game.clone();
                let canvas = canvas.clone();
                listeners.push(listen(canvas_target, "touchend", move |e| {
                    e.prevent_default();
                    let e: TouchEvent = e.unchecked_into();
                    if let Some(t) = e.changed_touches().item(0) {
                        let (x, y) = canvas_point(&canvas, t.client_x(), t.client_y());
                        game.dispatch(GameAction::PointerUp { x, y, now_ms: now_ms() });
                    }
                }));
            }
            {
                let game = game.clone();
                listeners.push(listen(canvas_target, "touchcancel", move |_| {
                    game.dispatch(GameAction::PointerCancel);
                }));
            }
            {
                let game = game.clone();
                let canvas = canvas.clone();
                listeners.push(listen(window_target, "resize", move |_| {
                    let (width, height) = fit_canvas(&canvas);
                    game.dispatch(GameAction::Resize { width, height });
                }));
            }
            listeners.push(listen(canvas_target, "contextmenu", |e| e.prevent_default()));

            // Cleanup
            Box::new(move || {
                for (target, event, cb) in &listeners {
                    let _ = target.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
                }
                for id in interval_ids {
                    window.clear_interval_with_handle(id);
                }
                if let Some(id) = raf_id.get() {
                    let _ = window.cancel_animation_frame(id);
                }
                frame.borrow_mut().take();
                let _keep_alive = (&display_tick, &second_tick, listeners);
            })
        });
    }

    let cursor = match props.game.interaction().dragged_card() {
        Some(_) => "grabbing",
        None => "pointer",
    };
    html! {
        <div style="width:100%; max-width:800px; margin:0 auto;">
            <canvas ref={canvas_ref} style={format!("display:block; margin:0 auto; touch-action:none; cursor:{};", cursor)} />
        </div>
    }
}

