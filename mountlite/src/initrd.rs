//! Initrd staging: ramfs mount plus archive extraction.

use std::path::Path;

use tracing::{error, info};

use crate::errors::{MountliteError, MountliteResult};
use crate::services::{ArchiveExtractor, MountService};

/// Driver used for the transient filesystem an initrd is unpacked into.
pub const RAMFS_DRIVER: &str = "ramfs";

/// Mount an empty ramfs at `target` and populate it from `image`.
///
/// If extraction fails the ramfs stays mounted, partially populated; boot
/// is aborting at that point and no rollback is attempted.
pub fn mount_initrd(
    mount: &dyn MountService,
    extractor: &dyn ArchiveExtractor,
    image: &[u8],
    target: &Path,
) -> MountliteResult<()> {
    mount
        .mount("", target, RAMFS_DRIVER, 0, None)
        .map_err(|e| {
            error!("Failed to mount ramfs to {}: {}", target.display(), e);
            MountliteError::mount("", RAMFS_DRIVER, target, e)
        })?;

    info!(
        "Extracting initrd ({} bytes) to {}",
        image.len(),
        target.display()
    );
    extractor.extract(target, image).map_err(|e| {
        error!("Failed to extract initrd to {}: {}", target.display(), e);
        MountliteError::Extract {
            target: target.to_path_buf(),
            source: e,
        }
    })?;

    Ok(())
}
