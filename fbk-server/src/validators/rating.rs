//! Rating validation
//!
//! The submitted rating arrives as arbitrary JSON. It is accepted iff it is
//! a finite number with zero fractional part in [1,5] inclusive. Validation
//! has no side effects and runs before anything touches the network.

use crate::error::ApiError;

/// Validate a raw rating value and return it as an integer
pub fn validate(value: Option<&serde_json::Value>) -> Result<i64, ApiError> {
    let number = value
        .and_then(serde_json::Value::as_f64)
        .ok_or(ApiError::InvalidRating)?;

    if !number.is_finite() || number.fract() != 0.0 || !(1.0..=5.0).contains(&number) {
        return Err(ApiError::InvalidRating);
    }

    Ok(number as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_integers_in_range() {
        for r in 1..=5 {
            let value = json!(r);
            assert_eq!(validate(Some(&value)).unwrap(), r);
        }
    }

    #[test]
    fn test_accepts_integral_float() {
        let value = json!(3.0);
        assert_eq!(validate(Some(&value)).unwrap(), 3);
    }

    #[test]
    fn test_rejects_out_of_range() {
        for raw in [json!(0), json!(6), json!(-1), json!(100)] {
            assert!(validate(Some(&raw)).is_err());
        }
    }

    #[test]
    fn test_rejects_fractional() {
        let value = json!(4.5);
        assert!(validate(Some(&value)).is_err());
    }

    #[test]
    fn test_rejects_non_numeric() {
        for raw in [json!("5"), json!(true), json!(null), json!([5]), json!({"v": 5})] {
            assert!(validate(Some(&raw)).is_err());
        }
    }

    #[test]
    fn test_rejects_missing() {
        assert!(validate(None).is_err());
    }
}
