use std::ffi::c_void;
use std::fs::OpenOptions;
use std::num::NonZeroUsize;
use std::os::unix::fs::OpenOptionsExt;
use std::ptr::NonNull;

use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};

use crate::error::{IgpTempError, Result};

/// Physical placement of the register window. The length is fixed at
/// 16 KiB by the MCHBAR address-mask granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDescriptor {
    pub base: u64,
    pub len: u64,
}

/// Ordered, uncached register access at offsets within the window.
///
/// A thin, total primitive: no value caching, no retries, no validation.
/// All policy lives in the thermal monitor.
pub trait Registers: Send + Sync {
    fn read_u8(&self, offset: u64) -> u8;
    fn read_u16(&self, offset: u64) -> u16;
    fn read_u32(&self, offset: u64) -> u32;
    fn write_u16(&self, offset: u64, value: u16);
}

/// An exclusive mapped view of the physical register window, backed by
/// `/dev/mem`. The mapping is released exactly once, in `Drop`.
pub struct MmioWindow {
    map: NonNull<c_void>,
    descriptor: WindowDescriptor,
}

// The raw mapping pointer never leaves the window, and all register
// traffic is serialized by the monitor lock.
unsafe impl Send for MmioWindow {}
unsafe impl Sync for MmioWindow {}

impl MmioWindow {
    pub fn open(descriptor: &WindowDescriptor) -> Result<Self> {
        // O_SYNC gives an uncached view of physical memory
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open("/dev/mem")
            .map_err(|e| IgpTempError::MapFailed(format!("failed to open /dev/mem: {e}")))?;

        let len = NonZeroUsize::new(descriptor.len as usize)
            .ok_or_else(|| IgpTempError::MapFailed("zero-length window".into()))?;

        // The MCHBAR mask guarantees 16 KiB alignment, so the base is a
        // valid mmap offset as-is.
        let map = unsafe {
            mmap(
                None,
                len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                &file,
                descriptor.base as libc::off_t,
            )
        }
        .map_err(|e| match e {
            nix::errno::Errno::EBUSY => IgpTempError::RegionBusy(descriptor.base),
            e => IgpTempError::MapFailed(format!(
                "mmap of {:#x}+{:#x} failed: {e}",
                descriptor.base, descriptor.len
            )),
        })?;

        tracing::info!(
            "mapped register window {:#x}+{:#x}",
            descriptor.base,
            descriptor.len
        );

        Ok(Self {
            map,
            descriptor: *descriptor,
        })
    }

    pub fn descriptor(&self) -> WindowDescriptor {
        self.descriptor
    }

    fn register(&self, offset: u64, width: u64) -> *mut u8 {
        debug_assert!(offset + width <= self.descriptor.len);
        unsafe { self.map.as_ptr().cast::<u8>().add(offset as usize) }
    }
}

impl Registers for MmioWindow {
    fn read_u8(&self, offset: u64) -> u8 {
        unsafe { std::ptr::read_volatile(self.register(offset, 1)) }
    }

    fn read_u16(&self, offset: u64) -> u16 {
        unsafe { std::ptr::read_volatile(self.register(offset, 2).cast::<u16>()) }
    }

    fn read_u32(&self, offset: u64) -> u32 {
        unsafe { std::ptr::read_volatile(self.register(offset, 4).cast::<u32>()) }
    }

    fn write_u16(&self, offset: u64, value: u16) {
        unsafe { std::ptr::write_volatile(self.register(offset, 2).cast::<u16>(), value) }
    }
}

impl Drop for MmioWindow {
    fn drop(&mut self) {
        if let Err(e) = unsafe { munmap(self.map, self.descriptor.len as usize) } {
            tracing::error!("failed to unmap register window: {}", e);
        }
    }
}
