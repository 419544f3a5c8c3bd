//! UI demo application
//!
//! Builds the same small menu under all three backends and drives it with a
//! scripted pointer path: hover, press and release the "Play" button, then
//! tab away. Pass a `.toml` or `.ron` file to override the UI settings.

use std::time::Duration;

use rust_ui::foundation::logging;
use rust_ui::prelude::*;
use rust_ui::ui::StyleRegistry;
use thiserror::Error;

const FRAMES: u64 = 90;

/// Errors that stop the demo
#[derive(Error, Debug)]
enum DemoError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("ui: {0}")]
    Ui(#[from] UiError),
}

/// Pointer position and button edges for `frame`
fn scripted_input(frame: u64) -> Vec<InputEvent> {
    match frame {
        10 => vec![InputEvent::pointer_move(400.0, 250.0)],
        30 => vec![InputEvent::pointer_down(400.0, 250.0)],
        40 => vec![InputEvent::pointer_up(400.0, 250.0)],
        60 => vec![InputEvent::pointer_move(50.0, 550.0), InputEvent::key_down(Key::Enter)],
        _ => Vec::new(),
    }
}

fn register_styles(styles: &mut StyleRegistry) {
    let button = ElementCategory::Named("Button".into());
    let base = Vec4::new(0.2, 0.3, 0.6, 1.0);
    styles.register("Menu", button.clone(), InteractionState::Normal, StyleValues::new().with_color(base));
    styles.register(
        "Menu",
        button.clone(),
        InteractionState::Hovered,
        StyleValues::new().with_color(Vec4::new(0.3, 0.45, 0.8, 1.0)),
    );
    styles.register(
        "Menu",
        button.clone(),
        InteractionState::Pressed,
        StyleValues::new().with_color(Vec4::new(0.1, 0.15, 0.35, 1.0)),
    );
    styles.register(
        "Menu",
        button,
        InteractionState::Selected,
        StyleValues::new().with_color(base).with_border(colors::white(), 2.0),
    );
}

/// Centered column of menu buttons with a title
fn build_menu<B: RenderBackend>(ui: &mut Dispatcher<B>) -> Result<NodeId, UiError> {
    let panel = ui.register(
        ElementNode::new(RenderPayload::panel(Vec4::new(0.05, 0.05, 0.1, 0.9)))
            .with_name("menu")
            .with_placement(Placement::anchored(Anchor::Center, Vec2::zeros(), Vec2::new(320.0, 260.0)))
            .with_layout_group(
                LayoutGroup::vertical()
                    .with_padding(Padding::uniform(16.0))
                    .with_spacing(12.0),
            ),
        None,
    )?;

    ui.register(
        ElementNode::new(RenderPayload::text("Rusteroids", 32.0))
            .with_name("title")
            .with_layout_element(LayoutElement::default().with_preferred(288.0, 48.0)),
        Some(panel),
    )?;

    let mut play = None;
    for label in ["Play", "Options", "Quit"] {
        let button = ui.register(
            ElementNode::new(RenderPayload::panel(colors::black()))
                .with_name(label)
                .with_category(ElementCategory::Named("Button".into()))
                .with_layout_element(LayoutElement::default().with_min(200.0, 32.0).with_preferred(288.0, 40.0))
                .with_interactive(Interactive::styled("Menu")),
            Some(panel),
        )?;
        ui.apply_style(button, "Menu", InteractionState::Normal)?;
        play.get_or_insert(button);
    }

    ui.trigger_effect(
        panel,
        EffectKind::Alpha { from: 0.0, to: 0.9 },
        EffectParams::once(0.5).with_curve(Curve::EaseOut),
    )?;
    play.ok_or(UiError::UnknownNode(panel))
}

fn run<B: RenderBackend>(name: &str, mut ui: Dispatcher<B>, summary: impl Fn(&B) -> String) -> Result<(), DemoError> {
    register_styles(ui.styles_mut());
    let play = build_menu(&mut ui)?;

    ui.events_mut().register_handler(
        EventType::Clicked,
        Box::new(move |event: &Event| {
            if event.get_node() == Some(play) {
                log::info!("Play clicked");
            }
            false
        }),
    );

    let mut timer = FrameTimer::new();
    for frame in 0..FRAMES {
        let delta_time = timer.tick();
        let report = ui.tick(delta_time, scripted_input(frame))?;
        if report.routed > 0 || report.effects_completed > 0 {
            log::debug!("{} frame {}: {:?}", name, frame, report);
        }
        std::thread::sleep(Duration::from_millis(8));
    }

    log::info!(
        "{} backend: {} frames, {} nodes, focus {:?}, {}",
        name,
        ui.frame_count(),
        ui.len(),
        ui.focused(),
        summary(ui.backend())
    );
    Ok(())
}

/// Immediate-mode HUD re-declared every frame; the bonus label comes and goes
fn run_hud(mut ui: ImmediateDispatcher) -> Result<(), DemoError> {
    let mut timer = FrameTimer::new();
    let mut swept = 0;
    for frame in 0..FRAMES {
        let delta_time = timer.tick();

        let mut hud = ui.begin_frame();
        let bar = hud.declare(
            "hud",
            None,
            ElementNode::new(RenderPayload::panel(Vec4::new(0.0, 0.0, 0.0, 0.5)))
                .with_placement(Placement::anchored(Anchor::TopCenter, Vec2::zeros(), Vec2::new(600.0, 40.0)))
                .with_layout_group(LayoutGroup::horizontal().with_padding(Padding::symmetric(12.0, 4.0))),
        )?;
        hud.declare(
            "score",
            Some(bar),
            ElementNode::new(RenderPayload::text(format!("Score {}", frame * 10), 20.0))
                .with_layout_element(LayoutElement::default().with_preferred(200.0, 32.0).with_flexible(1.0, 0.0)),
        )?;
        if frame % 30 < 15 {
            hud.declare(
                "bonus",
                Some(bar),
                ElementNode::new(RenderPayload::text("x2", 20.0))
                    .with_layout_element(LayoutElement::fixed(48.0, 32.0)),
            )?;
        }
        swept += hud.finish();

        ui.tick(delta_time, scripted_input(frame))?;
        std::thread::sleep(Duration::from_millis(8));
    }

    log::info!(
        "immediate HUD: {} frames, {} nodes, {} swept, {} draws",
        ui.frame_count(),
        ui.len(),
        swept,
        ui.backend().batch().draw_count()
    );
    Ok(())
}

fn main() -> Result<(), DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => UiConfig::load_from_file(&path)?,
        None => UiConfig::default(),
    };
    logging::init_with_filter(&config);
    log::info!("Starting UI demo");

    let [width, height] = config.default_viewport;

    run(
        "element",
        Dispatcher::with_config(ElementBackend::with_surface_size(width, height), config.clone())?,
        |backend| format!("{} cached nodes, {} draws", backend.cached_nodes(), backend.batch().draw_count()),
    )?;
    run(
        "immediate",
        Dispatcher::with_config(ImmediateBackend::with_surface_size(width, height), config.clone())?,
        |backend| format!("{} nodes redrawn last frame", backend.nodes_last_frame()),
    )?;
    run_hud(Dispatcher::with_config(ImmediateBackend::with_surface_size(width, height), config.clone())?)?;
    run(
        "sprite",
        Dispatcher::with_config(SpriteBackend::with_surface_size(width, height), config)?,
        |backend| format!("{} sprites, {} texts", backend.sprites().len(), backend.texts().len()),
    )?;

    log::info!("UI demo finished");
    Ok(())
}
