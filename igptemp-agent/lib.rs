//! Temperature monitoring agent for the Intel GM/GME965-family
//! integrated-graphics chipsets.
//!
//! The library discovers a supported GMCH over PCI, maps its MCHBAR
//! register window and drives the thermal sensor's enable/poll/read
//! sequence; the binary wraps that in a Prometheus `/metrics` endpoint.
//! Register definitions and the calibration curve live in `igptemp-raw`.

pub mod common;
pub mod config;
pub mod error;
pub mod prom;
pub mod sensor;

pub use config::AgentConfig;
pub use error::{IgpTempError, Result};
pub use prom::TempMetricExporter;
pub use sensor::{IgpDevice, SensorEndpoint, ThermalMonitor};
