// Browser tests, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> Option<HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id("gameCanvas")?
        .dyn_into()
        .ok()
}

#[wasm_bindgen_test]
fn start_game_creates_the_field() {
    retro_typer::start_game().expect("starts in a browser");
    let c = canvas().expect("canvas appended to body");
    assert_eq!((c.width(), c.height()), (640, 480));
}

#[wasm_bindgen_test]
fn restarting_reuses_the_canvas() {
    retro_typer::start_game().expect("first start");
    let first = canvas().expect("canvas");
    retro_typer::start_game().expect("restart");
    assert_eq!(canvas(), Some(first));
}
