//! Seams to the platform services the driver runs against.
//!
//! The sequencing logic only sees these traits; production adapters live
//! in the submodules and tests substitute recording fakes.

use std::io;
use std::path::Path;

pub mod archive;
#[cfg(target_os = "linux")]
pub mod mount;
pub mod registry;

pub use archive::TarballExtractor;
#[cfg(target_os = "linux")]
pub use mount::NixMountService;
pub use registry::StaticInitrdRegistry;

/// Performs one blocking mount call.
pub trait MountService {
    /// Mount `driver` at `target`, backed by `source` (empty for
    /// sourceless filesystems such as ramfs). The error carries the raw
    /// OS failure.
    fn mount(
        &self,
        source: &str,
        target: &Path,
        driver: &str,
        flags: u64,
        options: Option<&str>,
    ) -> io::Result<()>;
}

/// Unpacks an in-memory archive image into an already-mounted filesystem.
pub trait ArchiveExtractor {
    fn extract(&self, target: &Path, image: &[u8]) -> io::Result<()>;
}

/// Hands out initrd memory regions discovered by the platform.
pub trait InitrdRegistry {
    /// The first initrd region, if the platform provided one.
    // TODO: support multiple initrd regions; callers currently use only
    // the first.
    fn first_initrd(&self) -> Option<&[u8]>;
}
