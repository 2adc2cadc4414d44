//! Early-boot volume automounting.
//!
//! Mounts a configured set of filesystem volumes before anything else in
//! the guest runs: the root filesystem first, then an ordered fstab-style
//! table of auxiliary volumes, with initrd-backed volumes staged onto a
//! ramfs and unpacked from an in-memory archive image.
//!
//! The mount syscall, archive extraction, and initrd-region discovery are
//! reached through the traits in [`services`], so the sequencing logic is
//! testable without touching the host.

pub mod automount;
pub mod config;
pub mod errors;
pub mod initrd;
pub mod services;
pub mod volume;

pub use automount::AutomountDriver;
pub use config::{AutomountConfig, RootVolume, RootfsConfig, VolumeTable};
pub use errors::{MountliteError, MountliteResult};
pub use volume::VolumeDescriptor;
