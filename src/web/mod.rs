//! Browser front end: canvas setup, keyboard routing, the animation loop and
//! sound cues. All game rules live in [`GameSession`]; this module only feeds it
//! time and keys and draws what it reports.

mod logger;
mod render;

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlAudioElement, HtmlCanvasElement, window};

use crate::config::{FRAME_MS, GameConfig, MAX_FRAME_DT_MS};
use crate::session::{GameSession, SoundCue};

const CANVAS_ID: &str = "gameCanvas";

struct Frontend {
    session: GameSession,
    ctx: CanvasRenderingContext2d,
    background: HtmlCanvasElement,
    last_ts: Option<f64>,
}

thread_local! {
    static FRONTEND: RefCell<Option<Frontend>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn start_game() -> Result<(), JsValue> {
    start_with_config(GameConfig::default())
}

/// Start (or restart) with a JSON override of the default [`GameConfig`].
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    start_with_config(config)
}

/// Current session state as JSON, or `None` before the game has started.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn session_snapshot_json() -> Option<String> {
    FRONTEND.with(|cell| {
        cell.borrow()
            .as_ref()
            .and_then(|f| serde_json::to_string(&f.session.snapshot()).ok())
    })
}

fn start_with_config(config: GameConfig) -> Result<(), JsValue> {
    logger::init(config.log_level_filter());

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_attribute(
            "style",
            "display:block; margin:0 auto; border:2px solid #55ffff; image-rendering:pixelated; background:#141428;",
        )
        .ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    canvas.set_width(config.field_width as u32);
    canvas.set_height(config.field_height as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.set_image_smoothing_enabled(false);
    let background = render::build_background(&doc, config.field_width, config.field_height)?;

    let seed = session_seed();
    info!(
        "starting session {}x{} seed={seed:#x}",
        config.field_width, config.field_height
    );
    let frontend = Frontend {
        session: GameSession::new(config, seed),
        ctx,
        background,
        last_ts: None,
    };

    // A restart swaps the session; listeners and the loop are installed once.
    let already_running = FRONTEND.with(|cell| cell.replace(Some(frontend)).is_some());
    if !already_running {
        install_keyboard(&doc)?;
        start_loop();
    }
    Ok(())
}

fn install_keyboard(doc: &Document) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        let key = evt.key();
        if matches!(key.as_str(), "Backspace" | "Enter" | "Escape") {
            evt.prevent_default();
        }
        FRONTEND.with(|cell| {
            if let Some(f) = cell.borrow_mut().as_mut() {
                if let Err(e) = f.session.handle_key(&key) {
                    debug!("key {key:?} ignored: {e}");
                }
                play_cues(&mut f.session);
            }
        });
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        FRONTEND.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                frame(state, ts);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(cb: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), cb.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn frame(state: &mut Frontend, ts: f64) {
    // first frame and background-tab resumes are clamped to something sane
    let dt = state
        .last_ts
        .map_or(FRAME_MS, |last| (ts - last).clamp(0.0, MAX_FRAME_DT_MS));
    state.last_ts = Some(ts);

    state.session.tick(dt);
    play_cues(&mut state.session);
    render::render(&state.ctx, &state.background, &state.session.snapshot());
}

fn play_cues(session: &mut GameSession) {
    let cues = session.drain_cues();
    if cues.is_empty() {
        return;
    }
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    for cue in cues {
        play_sound(&doc, cue);
    }
}

// Missing or blocked audio is not an error; the page may not ship sounds.
fn play_sound(doc: &Document, cue: SoundCue) {
    let Some(audio) = doc
        .get_element_by_id(cue.element_id())
        .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
    else {
        return;
    };
    audio.set_current_time(0.0);
    if audio.play().is_err() {
        debug!("could not play {}", cue.element_id());
    }
}

fn session_seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    performance_now().to_bits()
}

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
