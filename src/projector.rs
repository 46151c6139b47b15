//! Projection of snapshots into named sensor values
//!
//! Device-data and state-of-charge snapshots yield one sensor per present
//! reading. Forecast snapshots yield up to three day sensors, each carrying
//! its hourly breakdown as an attribute.

use crate::api::Category;
use crate::descriptor::{self, DeviceClass, FORECAST_DAY, StateClass, Unit};
use crate::logging::get_logger;
use crate::snapshot::Snapshot;
use crate::transform::transform;
use serde::Serialize;
use serde_json::{Map, Value};

/// One externally visible value with its display metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorValue {
    /// Stable identifier, unique per device
    pub unique_id: String,
    /// Flattened reading key, or the date for forecast days
    pub key: String,
    pub name: String,
    pub category: Category,
    pub value: Value,
    pub unit: Option<Unit>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
    pub attributes: Map<String, Value>,
}

/// Position of a forecast day relative to the earliest date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayLabel {
    Today,
    Tomorrow,
    DayAfterTomorrow,
}

impl DayLabel {
    pub const ORDER: [DayLabel; 3] = [DayLabel::Today, DayLabel::Tomorrow, DayLabel::DayAfterTomorrow];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayLabel::Today => "Today",
            DayLabel::Tomorrow => "Tomorrow",
            DayLabel::DayAfterTomorrow => "Day After Tomorrow",
        }
    }

    pub fn sensor_name(&self) -> String {
        format!("{} {}", FORECAST_DAY.name, self.as_str())
    }
}

/// Time of day (`HH:MM:SS`) to forecast energy
pub type HourlyForecast = Map<String, Value>;

/// Forecast total of one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub label: DayLabel,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Total energy in Wh as reported
    pub energy: Value,
    pub hourly: HourlyForecast,
}

/// Sensors of `snapshot` for the device `serial`
pub fn project(snapshot: &Snapshot, serial: &str) -> Vec<SensorValue> {
    match snapshot.category() {
        Category::Forecast => forecast_sensors(snapshot, serial),
        Category::Data | Category::Soc => reading_sensors(snapshot, serial),
    }
}

/// One sensor per reading that carries a value
pub fn reading_sensors(snapshot: &Snapshot, serial: &str) -> Vec<SensorValue> {
    let category = snapshot.category();
    snapshot
        .present()
        .map(|(key, raw)| {
            let meta = descriptor::lookup(key);
            let mut attributes = Map::new();
            attributes.insert("serial".to_string(), Value::from(serial));
            attributes.insert("data_type".to_string(), Value::from(category.as_str()));
            SensorValue {
                unique_id: format!("{}_{}_{}", serial, category, key),
                key: key.clone(),
                name: descriptor::display_name(key),
                category,
                value: transform(key, raw),
                unit: meta.and_then(|d| d.unit),
                device_class: meta.and_then(|d| d.device_class),
                state_class: meta.and_then(|d| d.state_class),
                attributes,
            }
        })
        .collect()
}

/// Day sensors of a forecast snapshot
pub fn forecast_sensors(snapshot: &Snapshot, serial: &str) -> Vec<SensorValue> {
    forecast_days(snapshot.raw())
        .into_iter()
        .map(|day| {
            let mut attributes = Map::new();
            attributes.insert("serial".to_string(), Value::from(serial));
            attributes.insert("date".to_string(), Value::from(day.date.as_str()));
            if !day.hourly.is_empty() {
                attributes.insert("hourly_forecast".to_string(), Value::Object(day.hourly));
            }
            SensorValue {
                unique_id: format!("{}_{}_{}", serial, Category::Forecast, day.date),
                name: day.label.sensor_name(),
                key: day.date,
                category: Category::Forecast,
                value: day.energy,
                unit: FORECAST_DAY.unit,
                device_class: FORECAST_DAY.device_class,
                state_class: FORECAST_DAY.state_class,
                attributes,
            }
        })
        .collect()
}

/// The three earliest dates of `watt_hours_day`, ascending
pub fn forecast_days(raw: &Value) -> Vec<ForecastDay> {
    let Some(per_day) = raw
        .get("watt_hours_day")
        .and_then(Value::as_object)
        .filter(|days| !days.is_empty())
    else {
        get_logger("projector").warn("No watt_hours_day data found in solar forecast");
        return Vec::new();
    };

    // ISO dates sort chronologically as strings
    let mut dates: Vec<&String> = per_day.keys().collect();
    dates.sort();

    dates
        .into_iter()
        .zip(DayLabel::ORDER)
        .map(|(date, label)| ForecastDay {
            label,
            date: date.clone(),
            energy: per_day.get(date).cloned().unwrap_or(Value::Null),
            hourly: hourly_forecast(raw, date),
        })
        .collect()
}

/// Entries of `watt_hours` whose `"<date> <time>"` key starts with `date`,
/// keyed by the time part
pub fn hourly_forecast(raw: &Value, date: &str) -> HourlyForecast {
    let Some(hours) = raw.get("watt_hours").and_then(Value::as_object) else {
        return HourlyForecast::new();
    };
    hours
        .iter()
        .filter(|(timestamp, _)| timestamp.starts_with(date))
        .map(|(timestamp, value)| {
            let time = timestamp.split(' ').nth(1).unwrap_or(timestamp);
            (time.to_string(), value.clone())
        })
        .collect()
}
