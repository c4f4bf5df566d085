use leptos::{ev, prelude::*};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{js_sys, CanvasRenderingContext2d, CssStyleDeclaration, HtmlCanvasElement};

use crate::components::scene::{Background, Cloud, Comet, NightSky, RandomSource, Scene, Star};
use crate::components::theme_toggle::Theme;

struct MathRandom;

impl RandomSource for MathRandom {
    fn next_f64(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

thread_local! {
    static SCENE: RefCell<Option<Background>> = const { RefCell::new(None) };
    static FRAME_CALLBACK: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
    static FRAME_ID: Cell<Option<i32>> = const { Cell::new(None) };
}

/// Replaces the alpha channel of an `rgba(...)` colour, widening `rgb(...)`.
/// Other colour syntaxes are returned unchanged.
pub fn with_alpha(color: &str, alpha: f64) -> String {
    let color = color.trim();
    let alpha = alpha.clamp(0.0, 1.0);
    if let Some(inner) = color.strip_prefix("rgba(").and_then(|c| c.strip_suffix(')')) {
        if let Some((rgb, _)) = inner.rsplit_once(',') {
            return format!("rgba({}, {alpha})", rgb.trim());
        }
    } else if let Some(inner) = color.strip_prefix("rgb(").and_then(|c| c.strip_suffix(')')) {
        return format!("rgba({}, {alpha})", inner.trim());
    }
    color.to_string()
}

/// Canvas colours, read from CSS custom properties on `<body>` so they follow the theme.
struct Palette {
    sky_start: String,
    sky_end: String,
    cloud: String,
    night_start: String,
    night_mid: String,
    night_end: String,
    star: String,
    comet_head: Option<String>,
    comet_tail_mid: Option<String>,
}

impl Palette {
    fn read() -> Self {
        let style = web_sys::window().and_then(|w| {
            let body = w.document()?.body()?;
            w.get_computed_style(&body).ok().flatten()
        });
        let var = |name: &str| -> Option<String> {
            style
                .as_ref()
                .and_then(|s: &CssStyleDeclaration| s.get_property_value(name).ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            sky_start: var("--canvas-sky-gradient-start").unwrap_or_else(|| "#87CEEB".into()),
            sky_end: var("--canvas-sky-gradient-end").unwrap_or_else(|| "#ADD8E6".into()),
            cloud: var("--canvas-cloud-color").unwrap_or_else(|| "rgba(255, 255, 255, 0.85)".into()),
            night_start: var("--canvas-night-sky-gradient-start").unwrap_or_else(|| "#000030".into()),
            night_mid: var("--canvas-night-sky-gradient-mid").unwrap_or_else(|| "#101045".into()),
            night_end: var("--canvas-night-sky-gradient-end").unwrap_or_else(|| "#202055".into()),
            star: var("--canvas-star-color").unwrap_or_else(|| "rgba(255, 255, 224, 0.9)".into()),
            comet_head: var("--canvas-comet-head-color"),
            comet_tail_mid: var("--canvas-comet-tail-mid-color"),
        }
    }
}

fn fill_gradient(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    stops: &[(f32, &str)],
) -> Result<(), JsValue> {
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
    for (offset, color) in stops {
        gradient.add_color_stop(*offset, color)?;
    }
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, width, height);
    Ok(())
}

fn paint_cloud(ctx: &CanvasRenderingContext2d, cloud: &Cloud, palette: &Palette) -> Result<(), JsValue> {
    ctx.set_fill_style_str(&with_alpha(&palette.cloud, cloud.opacity));
    ctx.begin_path();
    for puff in &cloud.puffs {
        let cx = cloud.x + puff.offset_x;
        let cy = cloud.y + puff.offset_y;
        ctx.move_to(cx + puff.radius, cy);
        ctx.arc(cx, cy, puff.radius, 0.0, PI * 2.0)?;
    }
    ctx.close_path();
    ctx.fill();
    Ok(())
}

fn paint_star(ctx: &CanvasRenderingContext2d, star: &Star, palette: &Palette) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(star.x, star.y, star.radius, 0.0, PI * 2.0)?;
    ctx.set_fill_style_str(&with_alpha(&palette.star, star.opacity));
    ctx.fill();
    Ok(())
}

fn paint_comet(
    ctx: &CanvasRenderingContext2d,
    comet: &Comet,
    palette: &Palette,
    rng: &mut impl RandomSource,
) -> Result<(), JsValue> {
    let head = palette
        .comet_head
        .clone()
        .unwrap_or_else(|| format!("rgba(255, 255, 224, {})", comet.brightness));
    let tail_mid = palette
        .comet_tail_mid
        .clone()
        .unwrap_or_else(|| format!("rgba(255, 255, 224, {})", comet.brightness * 0.5));
    let (tail_x, tail_y) = comet.tail();

    ctx.begin_path();
    let gradient = ctx.create_linear_gradient(comet.x, comet.y, tail_x, tail_y);
    gradient.add_color_stop(0.0, &head)?;
    gradient.add_color_stop(0.3, &tail_mid)?;
    gradient.add_color_stop(1.0, "rgba(255, 255, 224, 0)")?;
    ctx.set_stroke_style_canvas_gradient(&gradient);
    ctx.set_line_width(rng.range(0.5, 2.5));
    ctx.move_to(comet.x, comet.y);
    ctx.line_to(tail_x, tail_y);
    ctx.stroke();
    Ok(())
}

fn paint_night(
    ctx: &CanvasRenderingContext2d,
    bg: &Background,
    night: &NightSky,
    palette: &Palette,
) -> Result<(), JsValue> {
    fill_gradient(
        ctx,
        bg.width,
        bg.height,
        &[
            (0.0, palette.night_start.as_str()),
            (0.7, palette.night_mid.as_str()),
            (1.0, palette.night_end.as_str()),
        ],
    )?;
    for star in &night.stars {
        paint_star(ctx, star, palette)?;
    }
    let mut rng = MathRandom;
    for comet in &night.comets {
        paint_comet(ctx, comet, palette, &mut rng)?;
    }
    Ok(())
}

fn paint(ctx: &CanvasRenderingContext2d, bg: &Background) -> Result<(), JsValue> {
    let palette = Palette::read();
    ctx.clear_rect(0.0, 0.0, bg.width, bg.height);
    match &bg.scene {
        Scene::Sky { clouds } => {
            fill_gradient(
                ctx,
                bg.width,
                bg.height,
                &[(0.0, palette.sky_start.as_str()), (1.0, palette.sky_end.as_str())],
            )?;
            for cloud in clouds {
                paint_cloud(ctx, cloud, &palette)?;
            }
            Ok(())
        }
        Scene::Night(night) => paint_night(ctx, bg, night, &palette),
    }
}

fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_default()
}

fn viewport() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn request_frame() {
    FRAME_CALLBACK.with(|cb| {
        if let (Some(window), Some(cb)) = (web_sys::window(), cb.borrow().as_ref()) {
            match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => FRAME_ID.with(|f| f.set(Some(id))),
                Err(e) => warn!("requestAnimationFrame failed: {e:?}"),
            }
        }
    });
}

fn is_running() -> bool {
    FRAME_ID.with(Cell::get).is_some()
}

/// Size the loop can start at; an empty viewport has nothing to draw on.
pub fn drawable_size(viewport: Option<(f64, f64)>) -> Option<(f64, f64)> {
    viewport.filter(|&(width, height)| width > 0.0 && height > 0.0)
}

/// Starts the frame loop unless it is already running.
fn start_animation(canvas: HtmlCanvasElement, theme: Theme) {
    if is_running() {
        return;
    }
    let viewport = viewport();
    if let Some((width, height)) = viewport {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
    }
    let Some((width, height)) = drawable_size(viewport) else {
        debug!("Empty viewport, background waits for a resize or theme change");
        return;
    };
    let Some(ctx) = context_2d(&canvas) else {
        warn!("2d canvas context unavailable, background disabled");
        return;
    };

    SCENE.with(|s| {
        *s.borrow_mut() = Some(Background::new(theme, width, height, now(), &mut MathRandom));
    });

    let on_frame = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
        SCENE.with(|s| {
            if let Some(bg) = s.borrow_mut().as_mut() {
                bg.step(timestamp, &mut MathRandom);
                if let Err(e) = paint(&ctx, bg) {
                    warn!("Background paint failed: {e:?}");
                }
            }
        });
        request_frame();
    });
    FRAME_CALLBACK.with(|cb| *cb.borrow_mut() = Some(on_frame));
    debug!("Starting background animation ({width}x{height}, {})", theme.class_name());
    request_frame();
}

fn stop_animation() {
    if let (Some(window), Some(id)) = (web_sys::window(), FRAME_ID.with(Cell::take)) {
        let _ = window.cancel_animation_frame(id);
    }
    FRAME_CALLBACK.with(|cb| cb.borrow_mut().take());
    SCENE.with(|s| s.borrow_mut().take());
}

#[component]
pub fn AnimatedBackground(#[prop(into)] theme: Signal<Theme>) -> impl IntoView {
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    Effect::new(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            start_animation(canvas, theme.get_untracked());
        }
    });

    Effect::new(move |_| {
        let theme = theme.get();
        if !is_running() {
            if let Some(canvas) = canvas_ref.get_untracked() {
                start_animation(canvas, theme);
            }
            return;
        }
        SCENE.with(|s| {
            if let Some(bg) = s.borrow_mut().as_mut() {
                if bg.set_theme(theme, now(), &mut MathRandom) {
                    debug!("Background switched to {}", theme.class_name());
                }
            }
        });
    });

    let resize = window_event_listener(ev::resize, move |_| {
        let (Some(canvas), Some((width, height))) = (canvas_ref.get_untracked(), viewport()) else {
            return;
        };
        if !is_running() {
            start_animation(canvas, theme.get_untracked());
            return;
        }
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        SCENE.with(|s| {
            if let Some(bg) = s.borrow_mut().as_mut() {
                bg.resize(width, height, now(), &mut MathRandom);
            }
        });
    });

    on_cleanup(move || {
        resize.remove();
        stop_animation();
    });

    view! { <canvas id="dynamicBackgroundCanvas" node_ref=canvas_ref class="background-canvas"></canvas> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_alpha_replaced() {
        assert_eq!(
            with_alpha("rgba(255, 255, 224, 0.9)", 0.25),
            "rgba(255, 255, 224, 0.25)"
        );
        assert_eq!(with_alpha(" rgba(1,2,3,1) ", 0.5), "rgba(1,2,3, 0.5)");
    }

    #[test]
    fn test_empty_viewport_not_drawable() {
        assert_eq!(drawable_size(None), None);
        assert_eq!(drawable_size(Some((0.0, 768.0))), None);
        assert_eq!(drawable_size(Some((1024.0, 0.0))), None);
        assert_eq!(drawable_size(Some((1024.0, 768.0))), Some((1024.0, 768.0)));
    }

    #[test]
    fn test_rgb_widened_to_rgba() {
        assert_eq!(with_alpha("rgb(10, 20, 30)", 0.4), "rgba(10, 20, 30, 0.4)");
    }

    #[test]
    fn test_alpha_clamped_and_hex_untouched() {
        assert_eq!(with_alpha("rgba(0, 0, 0, 1)", 1.7), "rgba(0, 0, 0, 1)");
        assert_eq!(with_alpha("#ffffff", 0.3), "#ffffff");
    }
}
