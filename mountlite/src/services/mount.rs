//! Mount adapter backed by the kernel mount syscall.

use std::io;
use std::path::Path;

use nix::mount::{mount, MsFlags};

use super::MountService;

/// Mounts through `nix::mount`, creating the mount point first.
pub struct NixMountService;

impl MountService for NixMountService {
    fn mount(
        &self,
        source: &str,
        target: &Path,
        driver: &str,
        flags: u64,
        options: Option<&str>,
    ) -> io::Result<()> {
        std::fs::create_dir_all(target)?;

        let source = (!source.is_empty()).then_some(source);
        let flags = MsFlags::from_bits_truncate(flags as nix::libc::c_ulong);
        mount(source, target, Some(driver), flags, options)
            .map_err(|errno| io::Error::from_raw_os_error(errno as i32))
    }
}
