//! Effects and styles applied through the dispatcher

use approx::assert_relative_eq;

use super::{button_at, recording_dispatcher};
use crate::foundation::math::{colors, Vec2, Vec4};
use crate::ui::effect::{Curve, EffectKind, EffectParams};
use crate::ui::error::UiError;
use crate::ui::node::{ElementCategory, ElementNode, RenderPayload};
use crate::ui::placement::Placement;
use crate::ui::style::{InteractionState, StyleValues};

fn red() -> Vec4 {
    Vec4::new(1.0, 0.0, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_effect_ends_on_final_value() {
        let mut ui = recording_dispatcher();
        let panel = ui.register(button_at(0.0, 0.0, 50.0, 50.0), None).unwrap();
        let handle = ui
            .trigger_effect(
                panel,
                EffectKind::Color { from: colors::black(), to: red() },
                EffectParams::once(0.5).with_curve(Curve::EaseInOut),
            )
            .unwrap();

        let first = ui.tick(0.3, []).unwrap();
        assert_eq!(first.effects_completed, 0);
        assert!(ui.is_effect_active(handle));

        let second = ui.tick(0.3, []).unwrap();
        assert_eq!(second.effects_completed, 1);
        assert!(!ui.is_effect_active(handle));
        assert_eq!(ui.active_effects(), 0);
        assert_eq!(ui.node(panel).unwrap().payload().color(), Some(red()));
        assert_eq!(ui.backend().last_item(panel).unwrap().payload.color(), Some(red()));

        // Redundant cancellation is a no-op
        assert!(!ui.cancel_effect(handle));
    }

    #[test]
    fn test_looping_effect_stays_active() {
        let mut ui = recording_dispatcher();
        let panel = ui.register(button_at(0.0, 0.0, 50.0, 50.0), None).unwrap();
        let handle = ui
            .trigger_effect(panel, EffectKind::Alpha { from: 0.0, to: 1.0 }, EffectParams::looping(0.2))
            .unwrap();

        for _ in 0..10 {
            ui.tick(0.05, []).unwrap();
        }
        assert!(ui.is_effect_active(handle));
        assert!(ui.cancel_effect(handle));
        assert_eq!(ui.active_effects(), 0);
    }

    #[test]
    fn test_last_registered_effect_wins() {
        let mut ui = recording_dispatcher();
        let panel = ui.register(button_at(0.0, 0.0, 50.0, 50.0), None).unwrap();
        let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
        ui.trigger_effect(panel, EffectKind::Color { from: red(), to: red() }, EffectParams::once(1.0))
            .unwrap();
        ui.trigger_effect(panel, EffectKind::Color { from: blue, to: blue }, EffectParams::once(1.0))
            .unwrap();

        ui.tick(0.1, []).unwrap();

        assert_eq!(ui.node(panel).unwrap().payload().color(), Some(blue));
    }

    #[test]
    fn test_delayed_size_effect() {
        let mut ui = recording_dispatcher();
        let panel = ui
            .register(
                ElementNode::new(RenderPayload::panel(colors::white()))
                    .with_placement(Placement::absolute(10.0, 10.0, 20.0, 20.0)),
                None,
            )
            .unwrap();
        ui.trigger_effect(
            panel,
            EffectKind::Size { from: Vec2::new(20.0, 20.0), to: Vec2::new(60.0, 40.0) },
            EffectParams::once(0.5).with_delay(0.25),
        )
        .unwrap();

        ui.tick(0.2, []).unwrap();
        assert_relative_eq!(ui.world_rect(panel).unwrap().width(), 20.0);

        ui.tick(0.6, []).unwrap();
        let rect = ui.world_rect(panel).unwrap();
        assert_relative_eq!(rect.width(), 60.0);
        assert_relative_eq!(rect.height(), 40.0);
    }

    #[test]
    fn test_effect_on_unknown_node_fails() {
        let mut ui = recording_dispatcher();
        let panel = ui.register(button_at(0.0, 0.0, 50.0, 50.0), None).unwrap();
        ui.unregister(panel);

        assert_eq!(
            ui.trigger_effect(panel, EffectKind::Alpha { from: 0.0, to: 1.0 }, EffectParams::once(1.0)),
            Err(UiError::UnknownNode(panel))
        );
    }

    #[test]
    fn test_unknown_style_leaves_payload_unchanged() {
        let mut ui = recording_dispatcher();
        let button = ui
            .register(
                button_at(0.0, 0.0, 80.0, 30.0).with_category(ElementCategory::Named("Button".into())),
                None,
            )
            .unwrap();
        let before = ui.node(button).unwrap().payload().clone();

        let result = ui.apply_style(button, "Button", InteractionState::Hovered);

        assert_eq!(
            result,
            Err(UiError::UnknownStyle {
                name: "Button".into(),
                category: ElementCategory::Named("Button".into()),
                state: InteractionState::Hovered,
            })
        );
        assert_eq!(ui.node(button).unwrap().payload(), &before);
    }

    #[test]
    fn test_style_upsert_last_writer_wins() {
        let mut ui = recording_dispatcher();
        let panel = ui.register(button_at(0.0, 0.0, 80.0, 30.0), None).unwrap();
        ui.register_style("Card", ElementCategory::Panel, InteractionState::Normal, StyleValues::new().with_color(colors::black()));
        ui.register_style(
            "Card",
            ElementCategory::Panel,
            InteractionState::Normal,
            StyleValues::new().with_color(red()).with_border(colors::white(), 2.0),
        );

        ui.apply_style(panel, "Card", InteractionState::Normal).unwrap();

        match ui.node(panel).unwrap().payload() {
            RenderPayload::Panel { color, border_color, border_width, .. } => {
                assert_eq!(*color, red());
                assert_eq!(*border_color, colors::white());
                assert_relative_eq!(*border_width, 2.0);
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert_eq!(ui.styles().len(), 1);
    }

    #[test]
    fn test_cancel_effects_on_node() {
        let mut ui = recording_dispatcher();
        let panel = ui.register(button_at(0.0, 0.0, 50.0, 50.0), None).unwrap();
        let other = ui.register(button_at(60.0, 0.0, 50.0, 50.0), None).unwrap();
        let fade = ui
            .trigger_effect(panel, EffectKind::Alpha { from: 0.0, to: 1.0 }, EffectParams::looping(1.0))
            .unwrap();
        let tint = ui
            .trigger_effect(panel, EffectKind::Color { from: red(), to: colors::white() }, EffectParams::once(1.0))
            .unwrap();
        let kept = ui
            .trigger_effect(other, EffectKind::Alpha { from: 0.0, to: 1.0 }, EffectParams::looping(1.0))
            .unwrap();
        assert_eq!(ui.effects_on(panel), vec![fade, tint]);

        assert_eq!(ui.cancel_effects_on(panel), 2);
        assert_eq!(ui.cancel_effects_on(panel), 0);

        assert!(ui.effects_on(panel).is_empty());
        assert_eq!(ui.effects_on(other), vec![kept]);
        assert_eq!(ui.tick(0.1, []).unwrap().effects_advanced, 1);
    }
}
