//! Pointer-to-dial mapping for the half-turn slider.
//!
//! Angles are in degrees on a half dial opening upward: 0° points full left,
//! 90° straight up, 180° full right. Every function saturates instead of
//! failing, so junk pointer samples just pin the dial to an end.

/// Number of discrete emoji steps on the dial
pub const STEP_COUNT: usize = 5;

/// Full sweep of the dial in degrees
pub const MAX_ANGLE: f64 = 180.0;

/// Angle of a pointer relative to the dial origin, in screen coordinates (y down)
pub fn angle_from_pointer(pointer_x: f64, pointer_y: f64, origin_x: f64, origin_y: f64) -> f64 {
    let dx = pointer_x - origin_x;
    let dy = pointer_y - origin_y;
    let angle = dx.atan2(-dy).to_degrees() + 90.0;
    clamp_angle(angle)
}

fn clamp_angle(angle: f64) -> f64 {
    if angle.is_nan() {
        0.0
    } else {
        angle.clamp(0.0, MAX_ANGLE)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub fn value_from_angle(angle_degrees: f64) -> f64 {
    clamp_unit(clamp_angle(angle_degrees) / MAX_ANGLE)
}

pub fn angle_from_value(value: f64) -> f64 {
    clamp_unit(value) * MAX_ANGLE
}

/// Bucket for `value` when the dial is split into `bucket_count` equal slices
pub fn emoji_index_from_value(value: f64, bucket_count: usize) -> usize {
    if bucket_count == 0 {
        return 0;
    }
    let index = (clamp_unit(value) * bucket_count as f64).floor() as usize;
    index.min(bucket_count - 1)
}

/// Value for discrete step `index`; steps are evenly spaced and include both ends
pub fn value_from_step(index: usize, step_count: usize) -> f64 {
    if step_count < 2 {
        return 0.0;
    }
    index.min(step_count - 1) as f64 / (step_count - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_round_trip_value_angle_value() {
        for i in 0..=1000 {
            let v = i as f64 / 1000.0;
            assert!((value_from_angle(angle_from_value(v)) - v).abs() < EPS, "v = {v}");
        }
    }

    #[test]
    fn test_angles_outside_range_clamp() {
        assert_eq!(value_from_angle(-30.0), 0.0);
        assert_eq!(value_from_angle(540.0), 1.0);
        assert_eq!(value_from_angle(f64::NEG_INFINITY), 0.0);
        assert_eq!(value_from_angle(f64::INFINITY), 1.0);
        assert_eq!(value_from_angle(f64::NAN), 0.0);
        assert_eq!(angle_from_value(2.0), 180.0);
        assert_eq!(angle_from_value(-0.5), 0.0);
    }

    #[test]
    fn test_pointer_directions() {
        // Straight up from the origin
        assert!((angle_from_pointer(10.0, 0.0, 10.0, 10.0) - 90.0).abs() < EPS);
        // Full left and full right
        assert!((angle_from_pointer(0.0, 10.0, 10.0, 10.0) - 0.0).abs() < EPS);
        assert!((angle_from_pointer(20.0, 10.0, 10.0, 10.0) - 180.0).abs() < EPS);
        // Upper left diagonal
        assert!((angle_from_pointer(5.0, 5.0, 10.0, 10.0) - 45.0).abs() < EPS);
    }

    #[test]
    fn test_pointer_below_origin_saturates() {
        assert_eq!(angle_from_pointer(5.0, 15.0, 10.0, 10.0), 0.0);
        assert_eq!(angle_from_pointer(15.0, 15.0, 10.0, 10.0), 180.0);
        let below = angle_from_pointer(10.0, 20.0, 10.0, 10.0);
        assert!(below == 0.0 || below == 180.0);
    }

    #[test]
    fn test_pointer_is_monotonic_along_the_arc() {
        let mut last = -1.0;
        for i in 0..=36 {
            let theta = (i as f64 * 5.0).to_radians();
            // Walk the upper half from left to right (screen y grows downward)
            let x = -theta.cos();
            let y = -theta.sin();
            let angle = angle_from_pointer(x, y, 0.0, 0.0);
            assert!(angle >= last, "angle went backwards at step {i}");
            last = angle;
        }
    }

    #[test]
    fn test_invalid_pointer_samples_never_fail() {
        assert_eq!(angle_from_pointer(f64::NAN, 0.0, 0.0, 0.0), 0.0);
        let far = angle_from_pointer(f64::INFINITY, 0.0, 0.0, 0.0);
        assert!((0.0..=180.0).contains(&far));
    }

    #[test]
    fn test_emoji_buckets() {
        assert_eq!(emoji_index_from_value(0.0, 5), 0);
        assert_eq!(emoji_index_from_value(0.19, 5), 0);
        assert_eq!(emoji_index_from_value(0.25, 5), 1);
        assert_eq!(emoji_index_from_value(0.5, 5), 2);
        assert_eq!(emoji_index_from_value(0.75, 5), 3);
        assert_eq!(emoji_index_from_value(1.0, 5), 4);
        assert_eq!(emoji_index_from_value(7.0, 5), 4);
        assert_eq!(emoji_index_from_value(0.5, 0), 0);
    }

    #[test]
    fn test_five_step_taps() {
        let values: Vec<f64> = (0..STEP_COUNT).map(|i| value_from_step(i, STEP_COUNT)).collect();
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(value_from_step(9, STEP_COUNT), 1.0);
        for (i, v) in values.iter().enumerate() {
            assert_eq!(emoji_index_from_value(*v, STEP_COUNT), i);
        }
    }
}
