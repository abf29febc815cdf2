use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{IgpTempError, Result};

const SYSFS_PCI_DEVICES: &str = "/sys/bus/pci/devices";

/// Read/write access to one device's configuration registers.
pub trait ConfigSpace: Send {
    fn read_u32(&self, offset: u64) -> Result<u32>;
    fn write_u32(&self, offset: u64, value: u32) -> Result<()>;
}

/// Presence check plus config-space handle for a (vendor, device) pair.
///
/// `Ok(None)` means no such device exists; errors are reserved for a
/// present device whose configuration space cannot be reached.
pub trait DeviceEnumerator {
    fn probe(&self, vendor: u16, device: u16) -> Result<Option<Box<dyn ConfigSpace>>>;
}

pub struct SysfsConfigSpace {
    file: Mutex<File>,
    address: String,
}

impl SysfsConfigSpace {
    fn open(dir: &Path, address: String) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(dir.join("config"))
            .map_err(|e| {
                IgpTempError::PciError(format!("failed to open config space of {address}: {e}"))
            })?;

        Ok(Self {
            file: Mutex::new(file),
            address,
        })
    }
}

impl ConfigSpace for SysfsConfigSpace {
    fn read_u32(&self, offset: u64) -> Result<u32> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset)).map_err(|e| {
            IgpTempError::PciError(format!(
                "failed to seek to offset {offset:#x} of {}: {e}",
                self.address
            ))
        })?;

        let mut buffer = [0u8; 4];
        file.read_exact(&mut buffer).map_err(|e| {
            IgpTempError::PciError(format!(
                "failed to read at offset {offset:#x} of {}: {e}",
                self.address
            ))
        })?;

        Ok(u32::from_le_bytes(buffer))
    }

    fn write_u32(&self, offset: u64, value: u32) -> Result<()> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset)).map_err(|e| {
            IgpTempError::PciError(format!(
                "failed to seek to offset {offset:#x} of {}: {e}",
                self.address
            ))
        })?;

        file.write_all(&value.to_le_bytes()).map_err(|e| {
            IgpTempError::PciError(format!(
                "failed to write at offset {offset:#x} of {}: {e}",
                self.address
            ))
        })?;

        Ok(())
    }
}

/// Device enumeration over the sysfs PCI tree.
pub struct SysfsPci {
    root: PathBuf,
}

impl SysfsPci {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(SYSFS_PCI_DEVICES),
        }
    }

    /// Enumerate under an alternate root, for tests and containers.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_id(path: &Path) -> Option<u16> {
        let text = std::fs::read_to_string(path).ok()?;
        parse_sysfs_id(&text)
    }
}

impl Default for SysfsPci {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceEnumerator for SysfsPci {
    fn probe(&self, vendor: u16, device: u16) -> Result<Option<Box<dyn ConfigSpace>>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            IgpTempError::PciError(format!("failed to enumerate {}: {e}", self.root.display()))
        })?;

        for entry in entries.flatten() {
            let dir = entry.path();
            if Self::read_id(&dir.join("vendor")) != Some(vendor) {
                continue;
            }
            if Self::read_id(&dir.join("device")) != Some(device) {
                continue;
            }

            let address = entry.file_name().to_string_lossy().into_owned();
            tracing::debug!("device {:#06x}:{:#06x} present at {}", vendor, device, address);
            return Ok(Some(Box::new(SysfsConfigSpace::open(&dir, address)?)));
        }

        Ok(None)
    }
}

/// Parse a sysfs id attribute like `0x8086\n`.
fn parse_sysfs_id(text: &str) -> Option<u16> {
    u16::from_str_radix(text.trim().trim_start_matches("0x"), 16).ok()
}
