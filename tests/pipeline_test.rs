use mypv::api::Category;
use mypv::flatten::flatten;
use mypv::projector::{DayLabel, forecast_days, hourly_forecast, project};
use mypv::snapshot::Snapshot;
use mypv::transform::transform;
use serde_json::{Value, json};

#[test]
fn flattening_commutes_with_wrapping() {
    let inner = json!({"b": 1, "c": {"d": 2}, "e": [1, 2]});
    let wrapped = json!({"a": inner.clone()});

    let expected: serde_json::Map<String, Value> = flatten(&inner)
        .into_iter()
        .map(|(k, v)| (format!("a_{}", k), v))
        .collect();
    assert_eq!(flatten(&wrapped), expected);
}

#[test]
fn malformed_top_level_never_panics() {
    for payload in [json!("oops"), Value::Null, json!(true), json!([{"a": 1}])] {
        assert!(flatten(&payload).is_empty());
        assert!(project(&Snapshot::new(Category::Data, payload), "1").is_empty());
    }
}

#[test]
fn scaling_and_labels() {
    assert_eq!(transform("temp1", &json!(237)), json!(23.7));
    assert_eq!(transform("temp1", &json!(2371)), json!(237.1));
    assert_eq!(transform("cur_eth_mode", &json!(1)), json!("WLAN"));
    assert_eq!(transform("cur_eth_mode", &json!(99)), json!("Unknown (99)"));
}

#[test]
fn null_and_empty_readings_produce_no_sensors() {
    let snap = Snapshot::new(Category::Soc, json!({"x": null, "y": ""}));
    assert!(project(&snap, "1").is_empty());
}

#[test]
fn nested_readings_are_projected_by_flattened_key() {
    let snap = Snapshot::new(Category::Data, json!({"meter": {"l1": 230}, "power_solar": 1800}));
    let keys: Vec<_> = project(&snap, "1").into_iter().map(|s| s.key).collect();
    assert_eq!(keys, vec!["meter_l1", "power_solar"]);
}

#[test]
fn forecast_days_are_ordered_and_labelled() {
    let raw = json!({
        "watt_hours_day": {"2026-01-15": 100, "2026-01-14": 200, "2026-01-16": 50},
        "watt_hours": {"2026-01-14 08:00:00": 97, "2026-01-15 08:00:00": 10}
    });
    let days = forecast_days(&raw);
    let summary: Vec<_> = days
        .iter()
        .map(|d| (d.label, d.date.as_str(), d.energy.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (DayLabel::Today, "2026-01-14", json!(200)),
            (DayLabel::Tomorrow, "2026-01-15", json!(100)),
            (DayLabel::DayAfterTomorrow, "2026-01-16", json!(50)),
        ]
    );
    assert!(days[2].hourly.is_empty());
}

#[test]
fn hourly_forecast_is_filtered_by_date() {
    let raw = json!({"watt_hours": {"2026-01-14 08:00:00": 97, "2026-01-15 08:00:00": 10}});
    assert_eq!(
        Value::Object(hourly_forecast(&raw, "2026-01-14")),
        json!({"08:00:00": 97})
    );
}

#[test]
fn forecast_sensors_carry_hourly_attribute() {
    let snap = Snapshot::new(
        Category::Forecast,
        json!({
            "watt_hours_day": {"2026-01-14": 200, "2026-01-15": 100},
            "watt_hours": {"2026-01-14 08:00:00": 97}
        }),
    );
    let sensors = project(&snap, "2001003");
    assert_eq!(sensors.len(), 2);
    assert_eq!(sensors[0].name, "Solar Forecast Today");
    assert_eq!(sensors[0].value, json!(200));
    assert_eq!(
        sensors[0].attributes.get("hourly_forecast"),
        Some(&json!({"08:00:00": 97}))
    );
    assert_eq!(sensors[1].name, "Solar Forecast Tomorrow");
    assert!(!sensors[1].attributes.contains_key("hourly_forecast"));
    assert_eq!(sensors[1].unique_id, "2001003_forecast_2026-01-15");
}
