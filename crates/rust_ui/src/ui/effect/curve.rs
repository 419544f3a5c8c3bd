//! Interpolation curves

use crate::foundation::math::utils;

/// Maps normalized effect time to an interpolation factor
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Curve {
    /// Constant speed
    #[default]
    Linear,
    /// Quadratic acceleration
    EaseIn,
    /// Quadratic deceleration
    EaseOut,
    /// Smoothstep
    EaseInOut,
    /// Jumps in `n` equal steps
    Step(u32),
    /// Piecewise linear through `(time, value)` points sorted by time
    Keyframes(Vec<(f32, f32)>),
}

impl Curve {
    /// Keyframe curve; points are sorted by time
    pub fn keyframes(mut points: Vec<(f32, f32)>) -> Self {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self::Keyframes(points)
    }

    /// Evaluate at `t`, clamped to [0, 1]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = utils::clamp(t, 0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
            Self::Step(steps) => {
                let steps = (*steps).max(1) as f32;
                (t * steps).floor() / steps
            }
            Self::Keyframes(points) => evaluate_keyframes(points, t),
        }
    }
}

fn evaluate_keyframes(points: &[(f32, f32)], t: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return t;
    };
    if t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }

    for pair in points.windows(2) {
        let (t0, v0) = pair[0];
        let (t1, v1) = pair[1];
        if t <= t1 {
            let span = t1 - t0;
            if span <= 0.0 {
                return v1;
            }
            return utils::lerp(v0, v1, (t - t0) / span);
        }
    }
    last.1
}
