use std::f32::consts::TAU;

/// Wrap any angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(theta: f32) -> f32 {
    let a = theta.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to exactly TAU
    if a >= TAU { 0.0 } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn wraps_into_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(3.0 * TAU + 1.0) - 1.0).abs() < 1e-4);
        let tiny = normalize_angle(-1e-9);
        assert!((0.0..TAU).contains(&tiny));
    }
}
