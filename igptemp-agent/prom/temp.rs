use prometheus::{Gauge, Registry};
use std::sync::Arc;

use crate::error::Result;
use crate::sensor::SensorEndpoint;

/// Publishes the sensor endpoint as Prometheus gauges.
///
/// The critical and target thresholds are constants, so they are set once
/// at registration; only the live temperature is refreshed by the
/// collection loop.
pub struct TempMetricExporter {
    endpoint: SensorEndpoint,
    registry: Arc<Registry>,
    temperature: Gauge,
}

impl TempMetricExporter {
    pub fn new(endpoint: SensorEndpoint) -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let chip = endpoint.read_label();

        let temperature = Gauge::with_opts(
            prometheus::Opts::new("igp_temperature_celsius", "Current IGP die temperature")
                .const_label("chip", chip),
        )?;
        let critical = Gauge::with_opts(
            prometheus::Opts::new(
                "igp_temperature_crit_celsius",
                "Vendor critical temperature threshold",
            )
            .const_label("chip", chip),
        )?;
        let target = Gauge::with_opts(
            prometheus::Opts::new(
                "igp_temperature_max_celsius",
                "Vendor target temperature threshold",
            )
            .const_label("chip", chip),
        )?;

        registry.register(Box::new(temperature.clone()))?;
        registry.register(Box::new(critical.clone()))?;
        registry.register(Box::new(target.clone()))?;

        critical.set(endpoint.read_critical_temperature() as f64 / 1000.0);
        target.set(endpoint.read_target_temperature() as f64 / 1000.0);

        Ok(Self {
            endpoint,
            registry,
            temperature,
        })
    }

    /// Refresh the live temperature gauge. The underlying read blocks for
    /// the sensor poll duration, so it is moved off the async executor.
    pub async fn collect(&self) {
        let endpoint = self.endpoint.clone();
        match tokio::task::spawn_blocking(move || endpoint.read_temperature()).await {
            Ok(millidegrees) => self.temperature.set(millidegrees as f64 / 1000.0),
            Err(e) => tracing::error!("temperature collection task failed: {}", e),
        }
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }
}
