pub mod delay;
pub mod mmio;
pub mod pci;

pub use delay::{Delay, SleepDelay};
pub use mmio::{MmioWindow, Registers, WindowDescriptor};
pub use pci::{ConfigSpace, DeviceEnumerator, SysfsPci};
