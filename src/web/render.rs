//! Canvas drawing for a [`SessionSnapshot`]. Nothing here mutates the session.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::difficulty::Difficulty;
use crate::powerups::PowerUpKind;
use crate::session::GameState;
use crate::snapshot::{PowerUpView, SessionSnapshot, WordView};

const BG: &str = "#141428";
const GRID: &str = "#1a1a32";
const SCANLINE: &str = "#0f0f1f";
const SURFACE: &str = "#282850";
const WHITE: &str = "#ffffff";
const CYAN: &str = "#55ffff";
const GREEN: &str = "#55ff55";
const YELLOW: &str = "#ffff55";
const RED: &str = "#ff5555";
const MAGENTA: &str = "#ff55ff";

/// Pre-render the grid + scanline backdrop once; it is blitted every frame.
pub fn build_background(doc: &Document, width: f64, height: f64) -> Result<HtmlCanvasElement, JsValue> {
    let canvas: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    ctx.set_fill_style_str(BG);
    ctx.fill_rect(0.0, 0.0, width, height);

    ctx.set_stroke_style_str(GRID);
    ctx.set_line_width(1.0);
    let mut x = 0.0;
    while x < width {
        line(&ctx, x, 0.0, x, height);
        x += 20.0;
    }
    let mut y = 0.0;
    while y < height {
        line(&ctx, 0.0, y, width, y);
        y += 20.0;
    }
    ctx.set_stroke_style_str(SCANLINE);
    let mut y = 0.0;
    while y < height {
        line(&ctx, 0.0, y, width, y);
        y += 4.0;
    }
    Ok(canvas)
}

pub fn render(ctx: &CanvasRenderingContext2d, background: &HtmlCanvasElement, snap: &SessionSnapshot) {
    let (sx, sy) = snap.shake_offset;
    ctx.save();
    ctx.translate(sx, sy).ok();
    ctx.draw_image_with_html_canvas_element(background, 0.0, 0.0).ok();

    match snap.state {
        GameState::SelectingDifficulty => draw_difficulty_menu(ctx, snap),
        GameState::Playing => draw_game(ctx, snap),
        GameState::GameOver => draw_game_over(ctx, snap),
    }
    draw_effects(ctx, snap);
    ctx.restore();
}

fn draw_difficulty_menu(ctx: &CanvasRenderingContext2d, snap: &SessionSnapshot) {
    let cx = snap.field_width / 2.0;
    ctx.set_text_align("center");
    ctx.set_font("24px monospace");
    ctx.set_fill_style_str(WHITE);
    ctx.fill_text("SELECT DIFFICULTY", cx, 80.0).ok();
    ctx.set_stroke_style_str(CYAN);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(cx - 160.0, 55.0, 320.0, 35.0);

    for (i, d) in Difficulty::ALL.iter().enumerate() {
        let p = d.profile();
        let y = 150.0 + i as f64 * 50.0;
        ctx.set_font("16px monospace");
        ctx.set_fill_style_str(p.color);
        ctx.fill_text(&format!("{}. {}", d.menu_digit(), p.label), cx, y).ok();
        ctx.set_font("12px monospace");
        ctx.set_fill_style_str("#cccccc");
        ctx.fill_text(&format!("{}, {} LIVES", p.description, p.lives), cx, y + 20.0)
            .ok();
        ctx.set_stroke_style_str(p.color);
        ctx.set_line_width(1.0);
        ctx.stroke_rect(cx - 120.0, y - 20.0, 240.0, 35.0);
    }
}

fn draw_game(ctx: &CanvasRenderingContext2d, snap: &SessionSnapshot) {
    for w in &snap.words {
        draw_word(ctx, w);
    }
    for p in &snap.powerups {
        draw_powerup(ctx, p);
    }
    draw_hud(ctx, snap);
    draw_effect_panel(ctx, snap);
    draw_input(ctx, snap);

    if snap.is_effect_active(PowerUpKind::Freeze) {
        ctx.set_fill_style_str("rgba(85, 255, 255, 0.1)");
        ctx.fill_rect(0.0, 0.0, snap.field_width, snap.field_height);
    }
    if snap.is_effect_active(PowerUpKind::Shield) {
        ctx.set_fill_style_str(MAGENTA);
        for i in 0..3 {
            ctx.fill_rect(0.0, snap.field_height - 6.0 - i as f64 * 2.0, snap.field_width, 2.0);
        }
    }
}

fn draw_word(ctx: &CanvasRenderingContext2d, w: &WordView) {
    let color = w.tier.color();
    ctx.set_font("16px monospace");
    ctx.set_text_align("left");
    let width = ctx.measure_text(&w.text).map(|m| m.width()).unwrap_or(w.text.len() as f64 * 9.6);
    let pad = 4.0;
    let height = 16.0;
    ctx.set_fill_style_str(SURFACE);
    ctx.fill_rect(w.x - pad, w.y - height - pad, width + pad * 2.0, height + pad * 2.0);
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(w.x - pad, w.y - height - pad, width + pad * 2.0, height + pad * 2.0);
    ctx.set_fill_style_str(color);
    ctx.fill_text(&w.text, w.x, w.y).ok();
}

fn draw_powerup(ctx: &CanvasRenderingContext2d, p: &PowerUpView) {
    let s = p.size;
    ctx.set_fill_style_str(p.kind.color());
    ctx.set_stroke_style_str(WHITE);
    ctx.set_line_width(2.0);
    match p.kind {
        PowerUpKind::Freeze => {
            // diamond
            ctx.begin_path();
            ctx.move_to(p.x, p.y - s);
            ctx.line_to(p.x + s, p.y);
            ctx.line_to(p.x, p.y + s);
            ctx.line_to(p.x - s, p.y);
            ctx.close_path();
            ctx.fill();
            ctx.stroke();
        }
        PowerUpKind::Clear => {
            // plus
            ctx.fill_rect(p.x - s, p.y - 3.0, s * 2.0, 6.0);
            ctx.fill_rect(p.x - 3.0, p.y - s, 6.0, s * 2.0);
            ctx.stroke_rect(p.x - s, p.y - 3.0, s * 2.0, 6.0);
            ctx.stroke_rect(p.x - 3.0, p.y - s, 6.0, s * 2.0);
        }
        PowerUpKind::ExtraLife => {
            ctx.begin_path();
            ctx.arc(p.x, p.y, s, 0.0, std::f64::consts::TAU).ok();
            ctx.fill();
            ctx.stroke();
        }
        PowerUpKind::Shield => {
            ctx.fill_rect(p.x - s, p.y - s, s * 2.0, s * 2.0);
            ctx.stroke_rect(p.x - s, p.y - s, s * 2.0, s * 2.0);
        }
    }
}

fn draw_hud(ctx: &CanvasRenderingContext2d, snap: &SessionSnapshot) {
    ctx.set_fill_style_str(SURFACE);
    ctx.fill_rect(10.0, 10.0, 200.0, 120.0);
    ctx.set_stroke_style_str(CYAN);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(10.0, 10.0, 200.0, 120.0);

    ctx.set_font("12px monospace");
    ctx.set_text_align("left");
    let lives_color = if snap.lives <= 1 { RED } else { WHITE };
    let rows = [
        (format!("SCORE: {}", snap.score), WHITE),
        (format!("LIVES: {}", snap.lives), lives_color),
        (format!("LEVEL: {}", snap.level), CYAN),
        (format!("WPM: {}", snap.wpm), GREEN),
        (format!("ACC: {}%", snap.accuracy), YELLOW),
        (format!("MODE: {}", snap.difficulty), WHITE),
    ];
    for (i, (text, color)) in rows.iter().enumerate() {
        ctx.set_fill_style_str(color);
        ctx.fill_text(text, 20.0, 30.0 + i as f64 * 15.0).ok();
    }

    // level progress bar, top right
    let (bw, bh) = (100.0, 8.0);
    let bx = snap.field_width - bw - 10.0;
    let by = 20.0;
    ctx.set_fill_style_str(SURFACE);
    ctx.fill_rect(bx, by, bw, bh);
    ctx.set_stroke_style_str(WHITE);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(bx, by, bw, bh);
    let progress = snap.level_progress() as f64 / snap.words_per_level.max(1) as f64;
    if progress > 0.0 {
        ctx.set_fill_style_str(CYAN);
        ctx.fill_rect(bx, by, bw * progress, bh);
    }
    ctx.set_font("10px monospace");
    ctx.set_fill_style_str(WHITE);
    ctx.fill_text(
        &format!("PROGRESS: {}/{}", snap.level_progress(), snap.words_per_level),
        bx,
        by + 20.0,
    )
    .ok();
}

fn draw_effect_panel(ctx: &CanvasRenderingContext2d, snap: &SessionSnapshot) {
    if snap.effects.is_empty() {
        return;
    }
    let (pw, ph) = (150.0, 60.0);
    let px = snap.field_width - pw - 10.0;
    let py = 150.0;
    ctx.set_fill_style_str(SURFACE);
    ctx.fill_rect(px, py, pw, ph);
    ctx.set_stroke_style_str(WHITE);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(px, py, pw, ph);

    ctx.set_font("8px monospace");
    ctx.set_text_align("left");
    let mut y = py + 10.0;
    for e in &snap.effects {
        let color = e.kind.color();
        ctx.set_fill_style_str(color);
        ctx.fill_text(&format!("{}: {}S", e.kind.label(), e.seconds_left()), px + 5.0, y + 8.0)
            .ok();
        ctx.set_fill_style_str("#323232");
        ctx.fill_rect(px + 5.0, y + 15.0, 100.0, 4.0);
        ctx.set_fill_style_str(color);
        ctx.fill_rect(px + 5.0, y + 15.0, 100.0 * e.progress, 4.0);
        y += 25.0;
    }
}

fn draw_input(ctx: &CanvasRenderingContext2d, snap: &SessionSnapshot) {
    let (bw, bh) = (300.0, 30.0);
    let bx = (snap.field_width - bw) / 2.0;
    let by = snap.field_height - bh - 12.0;
    ctx.set_fill_style_str(SURFACE);
    ctx.fill_rect(bx, by, bw, bh);
    ctx.set_stroke_style_str(CYAN);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(bx, by, bw, bh);
    ctx.set_font("16px monospace");
    ctx.set_text_align("left");
    ctx.set_fill_style_str(WHITE);
    ctx.fill_text(&format!("{}_", snap.input), bx + 8.0, by + 21.0).ok();
}

fn draw_game_over(ctx: &CanvasRenderingContext2d, snap: &SessionSnapshot) {
    let cx = snap.field_width / 2.0;
    ctx.set_text_align("center");
    ctx.set_font("32px monospace");
    ctx.set_fill_style_str(RED);
    ctx.fill_text("GAME OVER", cx, 100.0).ok();
    ctx.set_stroke_style_str(RED);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(cx - 160.0, 70.0, 320.0, 40.0);

    ctx.set_font("16px monospace");
    ctx.set_fill_style_str(WHITE);
    let stats = [
        format!("FINAL SCORE: {}", snap.score),
        format!("TYPING SPEED: {} WPM", snap.wpm),
        format!("ACCURACY: {}%", snap.accuracy),
        format!("LEVEL REACHED: {}", snap.level),
    ];
    for (i, s) in stats.iter().enumerate() {
        ctx.fill_text(s, cx, 160.0 + i as f64 * 30.0).ok();
    }
    ctx.set_font("12px monospace");
    ctx.set_fill_style_str(CYAN);
    ctx.fill_text("PRESS ANY KEY TO PLAY AGAIN", cx, 320.0).ok();
}

fn draw_effects(ctx: &CanvasRenderingContext2d, snap: &SessionSnapshot) {
    for p in &snap.particles {
        ctx.set_global_alpha(p.alpha());
        ctx.set_fill_style_str(&p.color);
        let size = p.size as f64;
        ctx.fill_rect(p.x.floor(), p.y.floor(), size, size);
    }
    ctx.set_global_alpha(1.0);

    ctx.set_font("12px monospace");
    ctx.set_text_align("center");
    ctx.set_line_width(1.0);
    for popup in &snap.popups {
        ctx.set_stroke_style_str(WHITE);
        ctx.stroke_text(&popup.text, popup.x, popup.current_y).ok();
        ctx.set_fill_style_str(&popup.color);
        ctx.fill_text(&popup.text, popup.x, popup.current_y).ok();
    }
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}
