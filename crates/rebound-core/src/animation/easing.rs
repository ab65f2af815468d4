//! Easing curves for offset transitions

use crate::config::EasingType;

impl EasingType {
    /// Eased fraction of the way from start to target after `t` of the
    /// duration has elapsed. `t` is clamped into [0, 1].
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            // jump to the target on the last frame
            EasingType::None => t.floor(),
            EasingType::Linear => t,
            EasingType::Cubic => power_out(t, 3),
            EasingType::Quintic => power_out(t, 5),
            EasingType::EaseOut => decay_out(t),
        }
    }
}

/// 1 - (1 - t)^n: fast start, settling into the target
#[inline]
fn power_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

/// Exponential decay toward the target, pinned to exactly 1 at the end
#[inline]
fn decay_out(t: f64) -> f64 {
    if t >= 1.0 {
        return 1.0;
    }
    1.0 - (-10.0 * t).exp2()
}
