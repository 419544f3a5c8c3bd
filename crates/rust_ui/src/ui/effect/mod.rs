//! Visual effects
//!
//! Time-driven mutation of one visual property of one node. Effects are owned
//! by the dispatcher's [`EffectSet`], advanced once per frame in registration
//! order (so the last registered effect wins a shared property) and never
//! outlive their target.

mod curve;

pub use curve::Curve;

use std::collections::HashSet;

use log::{debug, trace};

use super::error::{UiError, UiResult};
use super::node::ContentHandle;
use super::tree::ElementTree;
use super::{EffectHandle, NodeId};
use crate::foundation::math::{Vec2, Vec4};

/// Property an effect animates and its end points
#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    /// Main payload color
    Color {
        /// Color at t = 0
        from: Vec4,
        /// Color at t = 1
        to: Vec4,
    },
    /// Alpha channel of the main payload color
    Alpha {
        /// Alpha at t = 0
        from: f32,
        /// Alpha at t = 1
        to: f32,
    },
    /// Placement size (`size_delta`)
    Size {
        /// Size at t = 0
        from: Vec2,
        /// Size at t = 1
        to: Vec2,
    },
    /// Placement offset (`anchored_position`)
    Offset {
        /// Offset at t = 0
        from: Vec2,
        /// Offset at t = 1
        to: Vec2,
    },
    /// Image or sprite content cycling through frames
    SpriteSwap {
        /// Frames in display order
        frames: Vec<ContentHandle>,
    },
}

/// What happens when the effect reaches its duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    /// Apply the final value and finish
    #[default]
    Once,
    /// Restart from the beginning
    Loop,
    /// Reverse direction at each end
    PingPong,
}

/// Timing parameters of an effect
#[derive(Debug, Clone, PartialEq)]
pub struct EffectParams {
    /// Seconds from t = 0 to t = 1
    pub duration: f32,
    /// Interpolation curve
    pub curve: Curve,
    /// Completion policy
    pub completion: Completion,
    /// Seconds to wait before the first value is applied
    pub delay: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self::once(0.25)
    }
}

impl EffectParams {
    /// One-shot effect
    pub fn once(duration: f32) -> Self {
        Self {
            duration,
            curve: Curve::Linear,
            completion: Completion::Once,
            delay: 0.0,
        }
    }

    /// Repeating effect
    pub fn looping(duration: f32) -> Self {
        Self { completion: Completion::Loop, ..Self::once(duration) }
    }

    /// Back-and-forth effect
    pub fn ping_pong(duration: f32) -> Self {
        Self { completion: Completion::PingPong, ..Self::once(duration) }
    }

    /// Builder pattern: interpolation curve
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Builder pattern: start delay in seconds
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Reduce `elapsed` to one period of a repeating effect; one-shots are unchanged
    pub fn wrap(&self, elapsed: f32) -> f32 {
        let period = match self.completion {
            Completion::Once => return elapsed,
            Completion::Loop => self.duration,
            Completion::PingPong => self.duration * 2.0,
        };
        if period > 0.0 {
            elapsed.rem_euclid(period)
        } else {
            0.0
        }
    }

    /// Normalized time for `elapsed` seconds and whether a one-shot is done
    pub fn sample(&self, elapsed: f32) -> (f32, bool) {
        let once = self.completion == Completion::Once;
        if self.duration <= 0.0 {
            return (1.0, once);
        }

        let progress = elapsed.max(0.0) / self.duration;
        match self.completion {
            Completion::Once => (progress.min(1.0), elapsed >= self.duration),
            Completion::Loop => (progress.fract(), false),
            Completion::PingPong => {
                let cycle = progress.floor();
                let frac = progress - cycle;
                if (cycle as u64) % 2 == 0 {
                    (frac, false)
                } else {
                    (1.0 - frac, false)
                }
            }
        }
    }
}

/// An active effect
#[derive(Debug, Clone)]
struct VisualEffect {
    handle: EffectHandle,
    target: NodeId,
    kind: EffectKind,
    params: EffectParams,
    delay_remaining: f32,
    elapsed: f32,
}

impl VisualEffect {
    fn apply(&self, tree: &mut ElementTree, value: f32) -> UiResult<()> {
        match &self.kind {
            EffectKind::Color { from, to } => {
                let color = from.lerp(to, value);
                tree.update_payload(self.target, |payload| {
                    payload.set_color(color);
                })
            }
            EffectKind::Alpha { from, to } => {
                let alpha = from + (to - from) * value;
                tree.update_payload(self.target, |payload| {
                    if let Some(mut color) = payload.color() {
                        color.w = alpha;
                        payload.set_color(color);
                    }
                })
            }
            EffectKind::Size { from, to } => {
                let size = from.lerp(to, value);
                tree.update_placement(self.target, |placement| placement.size_delta = size)
            }
            EffectKind::Offset { from, to } => {
                let offset = from.lerp(to, value);
                tree.update_placement(self.target, |placement| placement.anchored_position = offset)
            }
            EffectKind::SpriteSwap { frames } => {
                if frames.is_empty() {
                    return Ok(());
                }
                let index = ((value * frames.len() as f32) as usize).min(frames.len() - 1);
                let frame = frames[index];
                tree.update_payload(self.target, |payload| {
                    payload.set_content(frame);
                })
            }
        }
    }
}

/// Outcome of one advance step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvanceReport {
    /// Effects that applied a value this step
    pub advanced: usize,
    /// One-shot effects that applied their final value and were removed
    pub completed: Vec<(EffectHandle, NodeId)>,
    /// Effects dropped because their target no longer exists
    pub invalidated: usize,
}

/// Active effects of one dispatcher
#[derive(Debug, Default)]
pub struct EffectSet {
    effects: Vec<VisualEffect>,
    next_handle: u64,
}

impl EffectSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an effect on `target`
    pub fn trigger(
        &mut self,
        tree: &ElementTree,
        target: NodeId,
        kind: EffectKind,
        params: EffectParams,
    ) -> UiResult<EffectHandle> {
        if !tree.contains(target) {
            return Err(UiError::UnknownNode(target));
        }

        let handle = EffectHandle(self.next_handle);
        self.next_handle += 1;
        trace!("Effect {:?} started on {:?}: {:?}", handle, target, kind);
        self.effects.push(VisualEffect {
            handle,
            target,
            kind,
            delay_remaining: params.delay.max(0.0),
            params,
            elapsed: 0.0,
        });
        Ok(handle)
    }

    /// Stop an effect where it is; returns false if it was not active
    pub fn cancel(&mut self, handle: EffectHandle) -> bool {
        let before = self.effects.len();
        self.effects.retain(|effect| effect.handle != handle);
        before != self.effects.len()
    }

    /// Stop every effect targeting `target`
    pub fn cancel_target(&mut self, target: NodeId) -> usize {
        let before = self.effects.len();
        self.effects.retain(|effect| effect.target != target);
        before - self.effects.len()
    }

    /// Drop effects whose target was removed
    pub fn invalidate_targets(&mut self, removed: &[NodeId]) -> usize {
        if removed.is_empty() {
            return 0;
        }
        let removed: HashSet<NodeId> = removed.iter().copied().collect();
        let before = self.effects.len();
        self.effects.retain(|effect| !removed.contains(&effect.target));
        let dropped = before - self.effects.len();
        if dropped > 0 {
            debug!("Invalidated {} effects on removed nodes", dropped);
        }
        dropped
    }

    /// Whether the effect is still running
    pub fn is_active(&self, handle: EffectHandle) -> bool {
        self.effects.iter().any(|effect| effect.handle == handle)
    }

    /// Number of running effects
    pub fn active_count(&self) -> usize {
        self.effects.len()
    }

    /// Handles of the effects running on `target`
    pub fn effects_on(&self, target: NodeId) -> Vec<EffectHandle> {
        self.effects
            .iter()
            .filter(|effect| effect.target == target)
            .map(|effect| effect.handle)
            .collect()
    }

    /// Advance every effect by `delta_time` seconds and apply its value
    pub(crate) fn advance(&mut self, delta_time: f32, tree: &mut ElementTree) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        let delta_time = delta_time.max(0.0);

        self.effects.retain_mut(|effect| {
            if !tree.contains(effect.target) {
                trace!("Effect {:?} dropped: target {:?} is gone", effect.handle, effect.target);
                report.invalidated += 1;
                return false;
            }

            let mut step = delta_time;
            if effect.delay_remaining > 0.0 {
                if step < effect.delay_remaining {
                    effect.delay_remaining -= step;
                    return true;
                }
                step -= effect.delay_remaining;
                effect.delay_remaining = 0.0;
            }
            effect.elapsed = effect.params.wrap(effect.elapsed + step);

            let (t, finished) = effect.params.sample(effect.elapsed);
            let value = effect.params.curve.evaluate(t);
            if effect.apply(tree, value).is_err() {
                report.invalidated += 1;
                return false;
            }
            report.advanced += 1;

            if finished {
                debug!("Effect {:?} on {:?} completed", effect.handle, effect.target);
                report.completed.push((effect.handle, effect.target));
            }
            !finished
        });

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::colors;
    use crate::ui::node::{ElementNode, RenderPayload};
    use crate::ui::placement::Placement;
    use approx::assert_relative_eq;

    fn setup() -> (ElementTree, NodeId) {
        let mut tree = ElementTree::new(Vec2::new(800.0, 600.0));
        let id = tree
            .insert(
                ElementNode::new(RenderPayload::panel(colors::black()))
                    .with_placement(Placement::absolute(0.0, 0.0, 10.0, 10.0)),
                None,
            )
            .unwrap();
        (tree, id)
    }

    fn color_of(tree: &ElementTree, id: NodeId) -> Vec4 {
        tree.get(id).and_then(|node| node.payload().color()).unwrap()
    }

    #[test]
    fn test_trigger_unknown_node_fails() {
        let (mut tree, id) = setup();
        tree.remove_subtree(id);

        let mut effects = EffectSet::new();
        let result = effects.trigger(&tree, id, EffectKind::Alpha { from: 1.0, to: 0.0 }, EffectParams::once(1.0));
        assert_eq!(result, Err(UiError::UnknownNode(id)));
    }

    #[test]
    fn test_once_applies_final_value_then_completes() {
        let (mut tree, id) = setup();
        let mut effects = EffectSet::new();
        let handle = effects
            .trigger(
                &tree,
                id,
                EffectKind::Color { from: colors::black(), to: colors::white() },
                EffectParams::once(1.0).with_curve(Curve::EaseOut),
            )
            .unwrap();

        let report = effects.advance(0.5, &mut tree);
        assert!(report.completed.is_empty());
        assert_relative_eq!(color_of(&tree, id).x, 0.75);

        let report = effects.advance(0.7, &mut tree);
        assert_eq!(report.completed, vec![(handle, id)]);
        assert!(!effects.is_active(handle));
        assert_eq!(color_of(&tree, id), colors::white());
    }

    #[test]
    fn test_loop_wraps_and_ping_pong_reverses() {
        let params = EffectParams::looping(2.0);
        assert_relative_eq!(params.sample(3.0).0, 0.5);
        assert!(!params.sample(100.0).1);

        let params = EffectParams::ping_pong(1.0);
        assert_relative_eq!(params.sample(0.25).0, 0.25);
        assert_relative_eq!(params.sample(1.25).0, 0.75);
        assert_relative_eq!(params.sample(2.25).0, 0.25);
    }

    #[test]
    fn test_long_running_loop_keeps_frame_precision() {
        let (mut tree, id) = setup();
        let mut effects = EffectSet::new();
        effects
            .trigger(&tree, id, EffectKind::Alpha { from: 0.0, to: 1.0 }, EffectParams::looping(1.0))
            .unwrap();

        for _ in 0..5000 {
            effects.advance(1000.0, &mut tree);
        }
        effects.advance(0.25, &mut tree);
        assert_relative_eq!(color_of(&tree, id).w, 0.25, epsilon = 1e-5);

        let mut previous = color_of(&tree, id).w;
        for _ in 0..10 {
            effects.advance(0.016, &mut tree);
            let alpha = color_of(&tree, id).w;
            assert_relative_eq!(alpha - previous, 0.016, epsilon = 1e-5);
            previous = alpha;
        }
    }

    #[test]
    fn test_wrap_keeps_one_period() {
        assert_relative_eq!(EffectParams::looping(2.0).wrap(7.0), 1.0);
        assert_relative_eq!(EffectParams::ping_pong(1.0).wrap(5.5), 1.5);
        assert_relative_eq!(EffectParams::once(1.0).wrap(7.0), 7.0);
        assert_relative_eq!(EffectParams::looping(0.0).wrap(7.0), 0.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        assert_eq!(EffectParams::once(0.0).sample(0.0), (1.0, true));
        assert_eq!(EffectParams::looping(0.0).sample(5.0), (1.0, false));
    }

    #[test]
    fn test_delay_holds_first_value() {
        let (mut tree, id) = setup();
        let mut effects = EffectSet::new();
        effects
            .trigger(
                &tree,
                id,
                EffectKind::Offset { from: Vec2::zeros(), to: Vec2::new(100.0, 0.0) },
                EffectParams::once(1.0).with_delay(0.5),
            )
            .unwrap();

        assert_eq!(effects.advance(0.25, &mut tree).advanced, 0);
        effects.advance(0.75, &mut tree);
        assert_relative_eq!(tree.get(id).unwrap().placement().anchored_position.x, 50.0);
    }

    #[test]
    fn test_last_registered_wins() {
        let (mut tree, id) = setup();
        let mut effects = EffectSet::new();
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let green = Vec4::new(0.0, 1.0, 0.0, 1.0);
        effects
            .trigger(&tree, id, EffectKind::Color { from: red, to: red }, EffectParams::looping(1.0))
            .unwrap();
        effects
            .trigger(&tree, id, EffectKind::Color { from: green, to: green }, EffectParams::looping(1.0))
            .unwrap();

        effects.advance(0.1, &mut tree);
        assert_eq!(color_of(&tree, id), green);
    }

    #[test]
    fn test_effects_on_removed_target_are_dropped() {
        let (mut tree, id) = setup();
        let mut effects = EffectSet::new();
        let handle = effects
            .trigger(&tree, id, EffectKind::Alpha { from: 1.0, to: 0.0 }, EffectParams::looping(1.0))
            .unwrap();

        tree.remove_subtree(id);
        let report = effects.advance(0.1, &mut tree);

        assert_eq!(report.invalidated, 1);
        assert!(!effects.is_active(handle));
        assert!(!effects.cancel(handle));
    }

    #[test]
    fn test_sprite_swap_cycles_frames() {
        let mut tree = ElementTree::new(Vec2::new(800.0, 600.0));
        let id = tree.insert(ElementNode::new(RenderPayload::sprite(ContentHandle(0))), None).unwrap();
        let mut effects = EffectSet::new();
        effects
            .trigger(
                &tree,
                id,
                EffectKind::SpriteSwap { frames: vec![ContentHandle(1), ContentHandle(2), ContentHandle(3)] },
                EffectParams::looping(0.3),
            )
            .unwrap();

        effects.advance(0.15, &mut tree);
        assert_eq!(tree.get(id).unwrap().payload().content(), Some(ContentHandle(2)));
    }
}
