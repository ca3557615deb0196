// extensions/wave.rs
//
// Closed-form wave helpers for field animation.
// No dependencies on fields or surfaces, just math. Every function is pure,
// so a field attribute evaluated twice at the same time gives the same value.

use std::f32::consts::TAU;

/// `sin(x)` remapped to [0, 1].
#[inline]
pub fn wave01(x: f32) -> f32 {
    x.sin() * 0.5 + 0.5
}

/// Smooth pseudo-random noise in roughly [-1, 1]: three incommensurate sines.
/// `seed` selects the trajectory, `channel` decorrelates the axes.
#[inline]
pub fn smooth_noise(t: f64, seed: f32, channel: f32) -> f32 {
    let s = (seed * 0.7 + channel) as f64;
    ((t * 0.0007 + s).sin() * 0.5
        + (t * 0.0013 + s * 2.1).sin() * 0.3
        + (t * 0.0023 + s * 0.7).sin() * 0.2) as f32
}

/// Value of a quantity bouncing linearly between `min` and `max`.
///
/// Starts at `start` moving down when `falling`, travels `distance` in total.
/// A start outside the range is pulled onto the nearest bound, and a start
/// above `max` always moves down first.
pub fn triangle(start: f32, min: f32, max: f32, falling: bool, distance: f32) -> f32 {
    let span = max - min;
    if !(span > 0.0) {
        return min;
    }
    let falling = falling || start >= max;
    let falling = falling && start > min;
    let offset = start.clamp(min, max) - min;
    let period = 2.0 * span;
    let unfolded = if falling { period - offset } else { offset };
    let u = (unfolded + distance.max(0.0)).rem_euclid(period);
    let v = if u <= span { u } else { period - u };
    (min + v).clamp(min, max)
}

/// Toroidal wrap of `value` into `[0, extent)`. Returns 0 for an empty extent.
#[inline]
pub fn wrap(value: f32, extent: f32) -> f32 {
    if !(extent > 0.0) || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Snap down to a multiple of `grid`.
#[inline]
pub fn snap(value: f32, grid: f32) -> f32 {
    if grid > 0.0 {
        (value / grid).floor() * grid
    } else {
        value
    }
}

/// Accumulated displacement of a per-frame nudge `amplitude * sin(freq*t + phase)`
/// applied every `frame_ms`, integrated in closed form up to time `t` (ms).
///
/// Bounded by `2 * amplitude / (freq * frame_ms)`.
#[inline]
pub fn drift(t: f64, freq: f64, phase: f32, amplitude: f32, frame_ms: f64) -> f32 {
    if freq <= 0.0 || frame_ms <= 0.0 {
        return 0.0;
    }
    let scale = amplitude as f64 / (freq * frame_ms);
    let phase = phase as f64;
    (scale * (phase.cos() - (freq * t + phase).cos())) as f32
}

/// Normalize an angle in degrees into [0, 360).
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 { 0.0 } else { a }
}

/// Random phase in [0, 2π) from a unit sample.
#[inline]
pub fn phase_from_unit(unit: f32) -> f32 {
    unit * TAU
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave01_range() {
        for i in 0..1000 {
            let v = wave01(i as f32 * 0.37);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn smooth_noise_bounded() {
        for i in 0..1000 {
            let v = smooth_noise(i as f64 * 97.0, 3.0, 1.5);
            assert!(v.abs() <= 1.0 + 1e-6, "noise {v}");
        }
    }

    #[test]
    fn triangle_starts_at_start() {
        assert!((triangle(1.0, 0.3, 2.0, false, 0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn triangle_bounces_off_max() {
        // Rising from 1.5 by 1.0 in [0.5, 2.0]: reach 2.0 after 0.5, come back 0.5.
        let v = triangle(1.5, 0.5, 2.0, false, 1.0);
        assert!((v - 1.5).abs() < 1e-5, "got {v}");
    }

    #[test]
    fn triangle_falls_from_above_max() {
        let v = triangle(3.0, 0.5, 2.0, false, 0.25);
        assert!((v - 1.75).abs() < 1e-5, "got {v}");
    }

    #[test]
    fn triangle_is_periodic_and_bounded() {
        let a = triangle(1.0, 0.3, 2.0, true, 0.2);
        let b = triangle(1.0, 0.3, 2.0, true, 0.2 + 2.0 * 1.7 * 10.0);
        assert!((a - b).abs() < 1e-3);
        for i in 0..500 {
            let v = triangle(1.0, 0.3, 2.0, i % 2 == 0, i as f32 * 0.731);
            assert!((0.3..=2.0).contains(&v));
        }
    }

    #[test]
    fn triangle_degenerate_range_is_min() {
        assert_eq!(triangle(1.0, 2.0, 2.0, false, 5.0), 2.0);
    }

    #[test]
    fn wrap_into_extent() {
        assert_eq!(wrap(105.0, 100.0), 5.0);
        assert_eq!(wrap(-5.0, 100.0), 95.0);
        assert_eq!(wrap(-1e-9, 100.0), 0.0);
        assert_eq!(wrap(5.0, 0.0), 0.0);
        let w = wrap(-1e-7, 1.0);
        assert!((0.0..1.0).contains(&w));
    }

    #[test]
    fn snap_to_even_pixels() {
        assert_eq!(snap(7.9, 2.0), 6.0);
        assert_eq!(snap(8.0, 2.0), 8.0);
        assert_eq!(snap(3.3, 0.0), 3.3);
    }

    #[test]
    fn drift_starts_at_zero_and_stays_bounded() {
        assert!(drift(0.0, 0.002, 1.2, 0.3, 16.0).abs() < 1e-6);
        let bound = 2.0 * 0.3 / (0.002 * 16.0) + 1e-3;
        for i in 0..1000 {
            let d = drift(i as f64 * 123.0, 0.002, 1.2, 0.3, 16.0);
            assert!(d.abs() <= bound as f32);
        }
    }

    #[test]
    fn degrees_normalize() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-30.0), 330.0);
    }
}
