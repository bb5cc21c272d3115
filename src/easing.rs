//! Easing curves for trail decay

/// Ease-in-out circular. Maps `[0, 1]` onto `[0, 1]`, reaching exactly 1.0 at `t = 1`.
#[inline]
pub fn ease_in_out_circ(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
    } else {
        ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
    }
}

/// `1 - ease_in_out_circ(t)`, rearranged so it stays strictly positive for every `t < 1`.
#[inline]
pub fn ease_in_out_circ_remaining(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        1.0 - ease_in_out_circ(t)
    } else {
        // 1 - sqrt(1 - y^2) == y^2 / (1 + sqrt(1 - y^2))
        let y = 2.0 - 2.0 * t;
        let y2 = y * y;
        y2 / (1.0 + (1.0 - y2).sqrt()) / 2.0
    }
}
