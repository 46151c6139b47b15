//! Static sensor descriptor table
//!
//! Display metadata per known reading key. Keys missing from the table still
//! become sensors, named by [`fallback_name`] and without unit or scaling.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Unit of measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    #[serde(rename = "W")]
    Watt,
    #[serde(rename = "Wh")]
    WattHour,
    #[serde(rename = "A")]
    Ampere,
    #[serde(rename = "V")]
    Volt,
    #[serde(rename = "Hz")]
    Hertz,
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "min")]
    Minutes,
    #[serde(rename = "h")]
    Hours,
    #[serde(rename = "d")]
    Days,
}

/// Semantic class of a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Battery,
    Current,
    Energy,
    Frequency,
    Power,
    Temperature,
    Timestamp,
    Voltage,
}

/// How consumers should aggregate the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    Total,
    TotalIncreasing,
}

/// Integer code to label table
pub type LabelTable = &'static [(i64, &'static str)];

/// `screen_mode_flag` codes
pub const SCREEN_MODE_LABELS: LabelTable = &[
    (0, "Standby"),
    (1, "Heating"),
    (2, "Heating Boost"),
    (3, "Heating Complete"),
    (4, "No Connection / Disabled"),
    (5, "Error"),
    (6, "Blocking Time Active"),
];

/// `cur_eth_mode` codes
pub const ETH_MODE_LABELS: LabelTable = &[(0, "LAN"), (1, "WLAN"), (2, "AP")];

/// Display metadata of one reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorDescriptor {
    pub name: &'static str,
    pub unit: Option<Unit>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
    /// Factor applied to numeric raw values
    pub scale: Option<f64>,
    /// Labels for integer codes
    pub labels: Option<LabelTable>,
}

impl SensorDescriptor {
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub const fn with_class(mut self, class: DeviceClass) -> Self {
        self.device_class = Some(class);
        self
    }

    pub const fn with_state(mut self, state: StateClass) -> Self {
        self.state_class = Some(state);
        self
    }

    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub const fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Label of `code`, or `Unknown (<code>)`
    pub fn label_for(&self, code: i64) -> Option<String> {
        let labels = self.labels?;
        Some(
            labels
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, label)| (*label).to_string())
                .unwrap_or_else(|| format!("Unknown ({})", code)),
        )
    }
}

const fn named(name: &'static str) -> SensorDescriptor {
    SensorDescriptor {
        name,
        unit: None,
        device_class: None,
        state_class: None,
        scale: None,
        labels: None,
    }
}

const fn power(name: &'static str) -> SensorDescriptor {
    named(name)
        .with_unit(Unit::Watt)
        .with_class(DeviceClass::Power)
        .with_state(StateClass::Measurement)
}

// Currents are reported in 0.1 A
const fn current_deci(name: &'static str) -> SensorDescriptor {
    named(name)
        .with_unit(Unit::Ampere)
        .with_class(DeviceClass::Current)
        .with_state(StateClass::Measurement)
        .with_scale(0.1)
}

// Temperatures are reported in 0.1 °C
const fn temperature_deci(name: &'static str) -> SensorDescriptor {
    named(name)
        .with_unit(Unit::Celsius)
        .with_class(DeviceClass::Temperature)
        .with_state(StateClass::Measurement)
        .with_scale(0.1)
}

const fn voltage(name: &'static str) -> SensorDescriptor {
    named(name)
        .with_unit(Unit::Volt)
        .with_class(DeviceClass::Voltage)
        .with_state(StateClass::Measurement)
}

const fn battery(name: &'static str) -> SensorDescriptor {
    named(name)
        .with_unit(Unit::Percent)
        .with_class(DeviceClass::Battery)
        .with_state(StateClass::Measurement)
}

/// Descriptor of each solar forecast day sensor
pub const FORECAST_DAY: SensorDescriptor = named("Solar Forecast")
    .with_unit(Unit::WattHour)
    .with_class(DeviceClass::Energy)
    .with_state(StateClass::Total);

static TABLE: &[(&str, SensorDescriptor)] = &[
    ("9s_state", named("Power Unit 9s Status")),
    ("act_night_flag", named("Day/Night (RH)")),
    ("acthor9s", named("Acthor Device Type")),
    ("blockactive", named("Block Status")),
    ("boostactive", named("Hot Water Boost Status")),
    ("bststrt", named("Hot Water Boost Active")),
    ("cloudstate", named("Cloud Status")),
    ("co_upd_state", named("Co-controller Update Status")),
    ("coversion", named("Co-controller Version")),
    ("coversionlatest", named("Latest Co-controller Firmware")),
    ("ctrl_errors", named("Control Error Bits")),
    ("ctrlstate", named("Control State")),
    ("device", named("Device Type")),
    ("ecarboostctr", named("E-Car Boost Time").with_unit(Unit::Minutes).with_state(StateClass::Measurement)),
    ("ecarstate", named("E-Car Status")),
    ("error_state", named("Error Bits")),
    ("fan_speed", named("Fan Level")),
    ("fsetup", named("First Setup Status")),
    ("fwversion", named("Firmware Version")),
    ("fwversionlatest", named("Latest Firmware")),
    ("legboostnext", named("Next Legionella Boost").with_unit(Unit::Days).with_state(StateClass::Measurement)),
    ("load_state", named("Load State")),
    ("m1devstate", named("Photovoltaic Communication Status")),
    ("m2devstate", named("Battery Storage Communication Status")),
    ("m2state", named("Battery Status")),
    ("m3devstate", named("Charging Station Communication Status")),
    ("m4devstate", named("Heat Pump Communication Status")),
    ("mss2", named("Secondary Controller 2 Status")),
    ("mss3", named("Secondary Controller 3 Status")),
    ("mss4", named("Secondary Controller 4 Status")),
    ("mss5", named("Secondary Controller 5 Status")),
    ("mss6", named("Secondary Controller 6 Status")),
    ("mss7", named("Secondary Controller 7 Status")),
    ("mss8", named("Secondary Controller 8 Status")),
    ("mss9", named("Secondary Controller 9 Status")),
    ("mss10", named("Secondary Controller 10 Status")),
    ("mss11", named("Secondary Controller 11 Status")),
    ("p_co_s", named("Partition Co-controller Status")),
    ("p_co_v", named("Partition Co-controller Version")),
    ("p_ps_s", named("Partition Power Unit Status")),
    ("p_ps_v", named("Partition Power Unit Version")),
    ("p1_s", named("Partition 1 Status")),
    ("p1_v", named("Partition 1 Version")),
    ("p2_s", named("Partition 2 Status")),
    ("p2_v", named("Partition 2 Version")),
    ("p9s_upd_state", named("Power Unit 9s Update Status")),
    ("p9sversion", named("Power Unit 9s Version")),
    ("p9sversionlatest", named("Latest Power Unit 9s Firmware")),
    ("ps_state", named("Power Unit Status")),
    ("ps_upd_state", named("Power Unit Update Status")),
    ("psversion", named("Power Unit Version")),
    ("psversionlatest", named("Latest Power Unit Firmware")),
    ("pump_pwm", named("Pump PWM")),
    ("rel_selv", named("SELV Relay Status")),
    ("rel1_out", named("Relay Status")),
    ("schicht_flag", named("Layer Charging Status")),
    ("screen_mode_flag", named("Device Status").with_labels(SCREEN_MODE_LABELS)),
    ("upd_files_left", named("Update Files Remaining")),
    ("upd_state", named("Update Status")),
    ("warnings", named("Warning Bits")),
    ("wifi_signal", named("WLAN Signal Strength")),
    ("wp_flag", named("Heat Pump Status")),
    ("wp_time1_ctr", named("Heat Pump Time1 Counter")),
    ("wp_time2_ctr", named("Heat Pump Time2 Counter")),
    ("wp_time3_ctr", named("Heat Pump Time3 Counter")),
    ("cur_dns", named("DNS Server")),
    ("cur_eth_mode", named("Ethernet Mode").with_labels(ETH_MODE_LABELS)),
    ("cur_gw", named("Gateway")),
    ("cur_ip", named("IP Address")),
    ("cur_sn", named("Subnet Mask")),
    ("debug_ip", named("Debug IP")),
    ("meter_ss", named("WiFi Meter Signal Strength").with_unit(Unit::Percent).with_state(StateClass::Measurement)),
    ("meter_ssid", named("WiFi Meter SSID")),
    ("meter1_id", named("my-PV Meter 1 ID")),
    ("meter1_ip", named("my-PV Meter 1 IP")),
    ("meter2_id", named("my-PV Meter 2 ID")),
    ("meter2_ip", named("my-PV Meter 2 IP")),
    ("meter3_id", named("my-PV Meter 3 ID")),
    ("meter3_ip", named("my-PV Meter 3 IP")),
    ("meter4_id", named("my-PV Meter 4 ID")),
    ("meter4_ip", named("my-PV Meter 4 IP")),
    ("meter5_id", named("my-PV Meter 5 ID")),
    ("meter5_ip", named("my-PV Meter 5 IP")),
    ("meter6_id", named("my-PV Meter 6 ID")),
    ("meter6_ip", named("my-PV Meter 6 IP")),
    ("date", named("Date")),
    ("loctime", named("Local Time")),
    ("unixtime", named("Unix Time").with_class(DeviceClass::Timestamp)),
    ("uptime", named("Uptime").with_unit(Unit::Hours).with_state(StateClass::TotalIncreasing)),
    ("curr_L2", current_deci("Grid Current L2")),
    ("curr_L3", current_deci("Grid Current L3")),
    ("curr_mains", current_deci("Grid Current L1")),
    ("freq", named("Grid Frequency").with_unit(Unit::Hertz).with_class(DeviceClass::Frequency).with_state(StateClass::Measurement).with_scale(0.001)),
    ("load_nom", power("Nominal Power")),
    ("m0bat", power("Battery Storage Power")),
    ("m0l1", power("House Connection L1")),
    ("m0l2", power("House Connection L2")),
    ("m0l3", power("House Connection L3")),
    ("m0sum", power("House Connection Total")),
    ("m1l1", power("Photovoltaic L1")),
    ("m1l2", power("Photovoltaic L2")),
    ("m1l3", power("Photovoltaic L3")),
    ("m1sum", power("Photovoltaic Total")),
    ("m2l1", power("Battery Storage L1")),
    ("m2l2", power("Battery Storage L2")),
    ("m2l3", power("Battery Storage L3")),
    ("m2sum", power("Battery Storage Total")),
    ("m3l1", power("Charging Station L1")),
    ("m3l2", power("Charging Station L2")),
    ("m3l3", power("Charging Station L3")),
    ("m3sum", power("Charging Station Total")),
    ("m4l1", power("Heat Pump L1")),
    ("m4l2", power("Heat Pump L2")),
    ("m4l3", power("Heat Pump L3")),
    ("m4sum", power("Heat Pump Total")),
    ("power_ac9", power("AC THOR 9s Power")),
    ("power_act", power("AC THOR Power")),
    ("power_elwa2", power("ELWA 2 Power")),
    ("power_grid", power("Grid Power")),
    ("power_grid_ac9", power("Grid Power from Acthor 9s")),
    ("power_grid_act", power("Grid Power from Acthor")),
    ("power_max", power("Maximum Controllable Power")),
    ("power_nominal", power("Nominal Power (Nameplate)")),
    ("power_solar", power("Solar Power")),
    ("power_solar_ac9", power("Solar Power from Acthor 9s")),
    ("power_solar_act", power("Solar Power from Acthor")),
    ("power_system", power("Total System Power")),
    ("power1_grid", power("Output 1 Grid Power")),
    ("power1_solar", power("Output 1 Solar Power")),
    ("power2_grid", power("Output 2 Grid Power")),
    ("power2_solar", power("Output 2 Solar Power")),
    ("power3_grid", power("Output 3 Grid Power")),
    ("power3_solar", power("Output 3 Solar Power")),
    ("surplus", power("Surplus (Meter + Battery Charging)")),
    ("m2soc", battery("Battery Storage SoC")),
    ("m3soc", battery("Charging Station SoC")),
    ("temp_ps", temperature_deci("Power Unit Temperature")),
    ("temp1", temperature_deci("Temperature 1")),
    ("temp2", temperature_deci("Temperature 2")),
    ("temp3", temperature_deci("Temperature 3")),
    ("temp4", temperature_deci("Temperature 4")),
    ("volt_aux", voltage("Voltage L2 at AUX Relay")),
    ("volt_L2", voltage("Power Unit Input Voltage L2")),
    ("volt_L3", voltage("Power Unit Input Voltage L3")),
    ("volt_mains", voltage("Power Unit Input Voltage L1")),
    ("volt_out", voltage("Power Unit Output Voltage")),
];

static INDEX: Lazy<HashMap<&'static str, &'static SensorDescriptor>> =
    Lazy::new(|| TABLE.iter().map(|(key, d)| (*key, d)).collect());

/// Descriptor of `key`, if the key is known
pub fn lookup(key: &str) -> Option<&'static SensorDescriptor> {
    INDEX.get(key).copied()
}

/// Number of known keys
#[cfg(test)]
fn known_keys() -> usize {
    INDEX.len()
}

/// Display name of `key`: the table entry, else [`fallback_name`]
pub fn display_name(key: &str) -> String {
    lookup(key)
        .map(|d| d.name.to_string())
        .unwrap_or_else(|| fallback_name(key))
}

/// Separators become spaces; the first letter of every alphabetic run is
/// upper-cased and the rest lower-cased (`curr_L2` -> `Curr L2`,
/// `m0l1` -> `M0L1`)
pub fn fallback_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_alpha = false;
    for ch in key.chars() {
        let ch = if ch == crate::flatten::SEPARATOR { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_no_duplicate_keys() {
        assert_eq!(known_keys(), TABLE.len());
    }

    #[test]
    fn scaled_entries() {
        assert_eq!(lookup("temp1").and_then(|d| d.scale), Some(0.1));
        assert_eq!(lookup("curr_mains").and_then(|d| d.scale), Some(0.1));
        assert_eq!(lookup("freq").and_then(|d| d.scale), Some(0.001));
        assert_eq!(lookup("power_solar").and_then(|d| d.scale), None);
        assert_eq!(lookup("power_solar").and_then(|d| d.unit), Some(Unit::Watt));
    }

    #[test]
    fn labels() {
        let eth = lookup("cur_eth_mode").unwrap();
        assert_eq!(eth.label_for(1).as_deref(), Some("WLAN"));
        assert_eq!(eth.label_for(99).as_deref(), Some("Unknown (99)"));
        let screen = lookup("screen_mode_flag").unwrap();
        assert_eq!(screen.label_for(6).as_deref(), Some("Blocking Time Active"));
        assert_eq!(lookup("temp1").unwrap().label_for(1), None);
    }

    #[test]
    fn fallback_names() {
        assert_eq!(fallback_name("some_new_key"), "Some New Key");
        assert_eq!(fallback_name("curr_L2"), "Curr L2");
        assert_eq!(fallback_name("m0l1"), "M0L1");
        assert_eq!(fallback_name("9s_state"), "9S State");
        assert_eq!(display_name("m2soc"), "Battery Storage SoC");
        assert_eq!(display_name("meter_extra_x"), "Meter Extra X");
    }

    #[test]
    fn units_serialize_as_symbols() {
        assert_eq!(serde_json::to_string(&Unit::Celsius).unwrap(), "\"°C\"");
        assert_eq!(
            serde_json::to_string(&StateClass::TotalIncreasing).unwrap(),
            "\"total_increasing\""
        );
    }
}
