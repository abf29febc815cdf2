use std::net::SocketAddr;
use std::time::Duration;

use igptemp_raw::decode::MobileDecode;

/// Runtime configuration assembled from the CLI
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Mobile decode strategy; ignored on desktop parts
    pub strategy: MobileDecode,
    /// Pause between exporter refreshes
    pub interval: Duration,
    /// Bind address of the /metrics endpoint
    pub listen: SocketAddr,
}

impl AgentConfig {
    pub fn new(strategy: MobileDecode, interval_secs: u64, port: u16) -> Self {
        Self {
            strategy,
            interval: Duration::from_secs(interval_secs.max(1)),
            listen: SocketAddr::from(([0, 0, 0, 0], port)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_has_a_floor_of_one_second() {
        let config = AgentConfig::new(MobileDecode::RegisterPair, 0, 9100);
        assert_eq!(config.interval, Duration::from_secs(1));
    }
}
