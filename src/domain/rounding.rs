//! Two-decimal rounding shared by every component.

/// Round to 2 decimal places, halves rounding up (towards positive infinity).
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round2(175.324), 175.32);
        assert_eq!(round2(175.326), 175.33);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.12);
    }

    #[test]
    fn negative_values() {
        assert_eq!(round2(-643.654), -643.65);
        assert_eq!(round2(-643.656), -643.66);
    }
}
