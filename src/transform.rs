//! Reading transformer
//!
//! Turns a raw flattened value into the value exposed to consumers. Label
//! tables take precedence over scaling; everything else passes through.

use crate::descriptor::{self, SensorDescriptor};
use crate::logging::get_logger;
use serde_json::{Number, Value};

/// Externally visible value of `key` given its raw reading
pub fn transform(key: &str, raw: &Value) -> Value {
    match descriptor::lookup(key) {
        Some(descriptor) => apply(key, descriptor, raw),
        None => raw.clone(),
    }
}

/// Apply `descriptor`'s label table or scale factor to `raw`
pub fn apply(key: &str, descriptor: &SensorDescriptor, raw: &Value) -> Value {
    if let Some(code) = integer(raw)
        && let Some(label) = descriptor.label_for(code)
    {
        return Value::String(label);
    }

    if let (Some(scale), Some(number)) = (descriptor.scale, raw.as_f64()) {
        return match scaled(number, scale) {
            Some(value) => value,
            None => {
                get_logger("transform").warn(&format!(
                    "Could not scale value {} for sensor {} with scale {}",
                    raw, key, scale
                ));
                raw.clone()
            }
        };
    }

    raw.clone()
}

fn integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// `value * scale` rounded to two decimals; `None` when not finite
fn scaled(value: f64, scale: f64) -> Option<Value> {
    let rounded = round2(value * scale);
    Number::from_f64(rounded).map(Value::Number)
}

/// Round to two decimals on the exact binary value, so `49.025` (stored as
/// `49.02499...`) becomes `49.02`
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scales_tenths() {
        assert_eq!(transform("temp1", &json!(237)), json!(23.7));
        assert_eq!(transform("temp1", &json!(2371)), json!(237.1));
        assert_eq!(transform("curr_L2", &json!(-15)), json!(-1.5));
    }

    #[test]
    fn scales_millihertz() {
        assert_eq!(transform("freq", &json!(50012)), json!(50.01));
    }

    #[test]
    fn rounding_uses_exact_binary_value() {
        // 49025 * 0.001 is just below 49.025
        assert_eq!(transform("freq", &json!(49025)), json!(49.02));
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(-1.005), -1.0);
        assert_eq!(round2(237.1), 237.1);
    }

    #[test]
    fn labels_win_over_scaling() {
        assert_eq!(transform("cur_eth_mode", &json!(1)), json!("WLAN"));
        assert_eq!(transform("cur_eth_mode", &json!(99)), json!("Unknown (99)"));
        assert_eq!(transform("screen_mode_flag", &json!(2)), json!("Heating Boost"));
    }

    #[test]
    fn labels_need_integers() {
        assert_eq!(transform("cur_eth_mode", &json!("1")), json!("1"));
        assert_eq!(transform("cur_eth_mode", &json!(1.5)), json!(1.5));
    }

    #[test]
    fn non_numeric_values_pass_through_scaling() {
        assert_eq!(transform("temp1", &json!("n/a")), json!("n/a"));
        assert_eq!(transform("temp1", &json!(true)), json!(true));
    }

    #[test]
    fn unknown_and_unscaled_keys_pass_through() {
        assert_eq!(transform("power_solar", &json!(1234)), json!(1234));
        assert_eq!(transform("not_in_table", &json!({"x": 1})), json!({"x": 1}));
    }

    #[test]
    fn overflowing_scale_falls_back_to_raw() {
        let descriptor = descriptor::lookup("temp1").unwrap().with_scale(f64::MAX);
        assert_eq!(apply("temp1", &descriptor, &json!(1e308)), json!(1e308));
    }
}
