use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IgpTempError {
    #[error("no supported chipset present")]
    NotFound,

    #[error("configuration register read failed: {0}")]
    ConfigReadFailed(String),

    #[error("PCI operation failed: {0}")]
    PciError(String),

    #[error("register window at {0:#x} is already claimed")]
    RegionBusy(u64),

    #[error("register window mapping failed: {0}")]
    MapFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Prometheus error: {0}")]
    PrometheusError(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, IgpTempError>;
