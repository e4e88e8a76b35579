//! Domain services
//!
//! Plain Rust with no HTTP types. Actions and controllers call into these.

pub mod analyzer;
pub mod anomaly;
pub mod architect;
pub mod llm;
pub mod mailer;
pub mod predictor;
pub mod telemetry;

/// Round half away from zero to `digits` decimal places
pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-0.456, 1), -0.5);
    }
}
