//! Score normalization.

/// Clamp-and-interpolate normalization used by every graded signal:
/// 0 at or below `min`, 1 at or above `max`, linear in between.
/// Monotonic non-decreasing in `x`; a degenerate range yields 0.
pub fn norm(x: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    if x <= min {
        0.0
    } else if x >= max {
        1.0
    } else {
        (x - min) / (max - min)
    }
}
