//! Layout through the full tick pipeline

use approx::assert_relative_eq;

use super::recording_dispatcher;
use crate::foundation::math::{Vec2, Rect};
use crate::ui::layout::{LayoutElement, LayoutGroup, Padding};
use crate::ui::node::{ContentHandle, ElementNode, RenderPayload};
use crate::ui::placement::{Anchor, Placement};

fn leaf(preferred: f32, flexible: f32) -> ElementNode {
    ElementNode::container().with_layout_element(
        LayoutElement::default()
            .with_preferred(preferred, 40.0)
            .with_flexible(flexible, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slack_goes_to_flexible_leaf() {
        let mut ui = recording_dispatcher();
        let row = ui
            .register(ElementNode::container().with_layout_group(LayoutGroup::horizontal()), None)
            .unwrap();
        let a = ui.register(leaf(100.0, 1.0), Some(row)).unwrap();
        let b = ui.register(leaf(300.0, 0.0), Some(row)).unwrap();

        let report = ui.tick(0.016, []).unwrap();

        assert_eq!(report.overflowed_groups, 0);
        assert_relative_eq!(ui.node(a).unwrap().allocated_size().unwrap().x, 500.0);
        assert_relative_eq!(ui.node(b).unwrap().allocated_size().unwrap().x, 300.0);
        assert_eq!(ui.world_rect(b), Some(Rect::new(500.0, 0.0, 300.0, 600.0)));
    }

    #[test]
    fn test_world_rects_compose_after_tick() {
        let mut ui = recording_dispatcher();
        let panel = ui
            .register(
                ElementNode::container()
                    .with_placement(Placement::anchored(Anchor::Center, Vec2::new(20.0, -10.0), Vec2::new(400.0, 300.0))),
                None,
            )
            .unwrap();
        let column = ui
            .register(
                ElementNode::container()
                    .with_layout_group(LayoutGroup::vertical().with_padding(Padding::uniform(8.0)).with_spacing(4.0)),
                Some(panel),
            )
            .unwrap();
        for preferred in [50.0, 80.0, 120.0] {
            ui.register(leaf(preferred, 1.0), Some(column)).unwrap();
        }
        ui.register(
            ElementNode::container().with_placement(Placement::absolute(5.0, 5.0, 10.0, 10.0)),
            Some(panel),
        )
        .unwrap();

        ui.tick(0.016, []).unwrap();
        ui.set_placement(
            panel,
            Placement::anchored(Anchor::TopLeft, Vec2::new(30.0, 30.0), Vec2::new(400.0, 300.0)),
        )
        .unwrap();
        ui.tick(0.016, []).unwrap();

        for id in ui.tree().preorder(ui.root()) {
            let Some(parent) = ui.parent(id) else { continue };
            let parent_world = ui.world_rect(parent).unwrap();
            let local = ui.node(id).unwrap().placement().local_rect(parent_world.size);
            let world = ui.world_rect(id).unwrap();
            assert_relative_eq!(world.origin.x, parent_world.origin.x + local.origin.x, epsilon = 1e-4);
            assert_relative_eq!(world.origin.y, parent_world.origin.y + local.origin.y, epsilon = 1e-4);
            assert_relative_eq!(world.size.x, local.size.x, epsilon = 1e-4);
            assert_relative_eq!(world.size.y, local.size.y, epsilon = 1e-4);
        }
        assert_relative_eq!(ui.world_rect(panel).unwrap().origin.x, 30.0);
    }

    #[test]
    fn test_children_fill_group_without_overflow() {
        let mut ui = recording_dispatcher();
        let row = ui
            .register(ElementNode::container().with_layout_group(LayoutGroup::horizontal()), None)
            .unwrap();
        let children: Vec<_> = [(100.0, 2.0), (200.0, 1.0), (50.0, 0.0)]
            .into_iter()
            .map(|(preferred, flexible)| ui.register(leaf(preferred, flexible), Some(row)).unwrap())
            .collect();

        ui.tick(0.016, []).unwrap();

        let total: f32 = children
            .iter()
            .map(|id| ui.node(*id).unwrap().allocated_size().unwrap().x)
            .sum();
        assert_relative_eq!(total, 800.0, epsilon = 1e-3);
    }

    #[test]
    fn test_overflowing_group_packs_children_at_min() {
        let mut ui = recording_dispatcher();
        let row = ui
            .register(
                ElementNode::container()
                    .with_placement(Placement::absolute(0.0, 0.0, 100.0, 50.0))
                    .with_layout_group(LayoutGroup::horizontal()),
                None,
            )
            .unwrap();
        let element = LayoutElement::default().with_min(80.0, 10.0).with_preferred(120.0, 10.0);
        let a = ui.register(ElementNode::container().with_layout_element(element.clone()), Some(row)).unwrap();
        let b = ui.register(ElementNode::container().with_layout_element(element), Some(row)).unwrap();

        let report = ui.tick(0.016, []).unwrap();

        assert_eq!(report.overflowed_groups, 1);
        assert_relative_eq!(ui.node(a).unwrap().allocated_size().unwrap().x, 80.0);
        assert_relative_eq!(ui.node(b).unwrap().allocated_size().unwrap().x, 80.0);
        assert_relative_eq!(ui.world_rect(b).unwrap().origin.x, 80.0);
    }

    #[test]
    fn test_resize_rearranges_only_on_change() {
        let mut ui = recording_dispatcher();
        let row = ui
            .register(ElementNode::container().with_layout_group(LayoutGroup::horizontal()), None)
            .unwrap();
        let a = ui.register(leaf(100.0, 1.0), Some(row)).unwrap();

        assert!(ui.tick(0.016, []).unwrap().layout_passes > 0);
        assert_eq!(ui.tick(0.016, []).unwrap().layout_passes, 0);

        ui.backend_mut().set_viewport(400.0, 300.0);
        assert!(ui.tick(0.016, []).unwrap().layout_passes > 0);
        assert_relative_eq!(ui.node(a).unwrap().allocated_size().unwrap().x, 400.0);
    }

    #[test]
    fn test_changing_element_marks_layout_dirty() {
        let mut ui = recording_dispatcher();
        let row = ui
            .register(ElementNode::container().with_layout_group(LayoutGroup::horizontal()), None)
            .unwrap();
        let a = ui.register(leaf(100.0, 0.0), Some(row)).unwrap();
        ui.register(leaf(100.0, 1.0), Some(row)).unwrap();
        ui.tick(0.016, []).unwrap();
        assert_relative_eq!(ui.node(a).unwrap().allocated_size().unwrap().x, 100.0);

        ui.set_layout_element(a, Some(LayoutElement::default().with_preferred(250.0, 40.0)))
            .unwrap();
        ui.tick(0.016, []).unwrap();

        assert_relative_eq!(ui.node(a).unwrap().allocated_size().unwrap().x, 250.0);
        assert!(ui
            .set_layout_element(a, Some(LayoutElement::default().with_min(300.0, 0.0).with_preferred(250.0, 40.0)))
            .is_err());
    }

    #[test]
    fn test_content_swap_resizes_leaf() {
        let mut ui = recording_dispatcher().with_content_provider(Box::new(|handle: ContentHandle| match handle {
            ContentHandle(1) => Some(Vec2::new(64.0, 32.0)),
            ContentHandle(2) => Some(Vec2::new(200.0, 100.0)),
            _ => None,
        }));
        let column = ui
            .register(
                ElementNode::container().with_layout_group(LayoutGroup::vertical().with_stretch_cross_axis(false)),
                None,
            )
            .unwrap();
        let image = ui
            .register(ElementNode::new(RenderPayload::image(ContentHandle(1))), Some(column))
            .unwrap();
        ui.tick(0.016, []).unwrap();
        assert_eq!(ui.world_rect(image), Some(Rect::new(0.0, 0.0, 64.0, 32.0)));

        ui.update_payload(image, |payload| payload.set_content(ContentHandle(2))).unwrap();
        ui.tick(0.016, []).unwrap();

        assert_eq!(ui.world_rect(image), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
    }
}
