use std::sync::Arc;

use igptemp_raw::decode;

use crate::sensor::IgpDevice;

/// Driver name reported by the `name` attribute
pub const DRIVER_NAME: &str = "gm965temp";

/// Read-only sensor attributes, mirroring the hwmon surface:
/// temp1_input, temp1_crit, temp1_max, temp1_label and name.
///
/// Everything except the live temperature is constant; the critical and
/// target values are the vendor threshold, not read from hardware, and
/// the label is "GM965 IGP" on every supported chipset.
#[derive(Clone)]
pub struct SensorEndpoint {
    device: Arc<IgpDevice>,
}

impl SensorEndpoint {
    pub fn new(device: Arc<IgpDevice>) -> Self {
        Self { device }
    }

    /// Current die temperature in millidegrees Celsius. Runs a full read
    /// sequence; 0 until the sensor has been sampled successfully.
    pub fn read_temperature(&self) -> u32 {
        self.device.monitor().read_temperature()
    }

    pub fn read_critical_temperature(&self) -> u32 {
        decode::CRITICAL_MILLIDEGREES
    }

    /// Target temperature; exposed under its own name for hwmon
    /// convention but identical to the critical threshold.
    pub fn read_target_temperature(&self) -> u32 {
        decode::CRITICAL_MILLIDEGREES
    }

    pub fn read_label(&self) -> &'static str {
        decode::SENSOR_LABEL
    }

    pub fn read_name(&self) -> &'static str {
        DRIVER_NAME
    }
}
