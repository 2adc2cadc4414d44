//! Boot-time mount orchestration.
//!
//! The driver runs exactly once at startup: root bootstrap first, then the
//! volume table in order, stopping at the first failure. Sub mount points
//! under "/" (like /dev) have to come through the table, after root.

use std::path::Path;

use tracing::{debug, error, info};

use crate::config::{AutomountConfig, RootfsConfig, VolumeTable};
use crate::errors::{MountliteError, MountliteResult};
use crate::initrd;
use crate::services::{ArchiveExtractor, InitrdRegistry, MountService};
use crate::volume::VolumeDescriptor;

/// Drives the automount sequence against the platform services.
pub struct AutomountDriver<'a> {
    mount: &'a dyn MountService,
    extractor: &'a dyn ArchiveExtractor,
    registry: &'a dyn InitrdRegistry,
}

impl<'a> AutomountDriver<'a> {
    pub fn new(
        mount: &'a dyn MountService,
        extractor: &'a dyn ArchiveExtractor,
        registry: &'a dyn InitrdRegistry,
    ) -> Self {
        Self {
            mount,
            extractor,
            registry,
        }
    }

    /// Run the full sequence: root bootstrap, then the volume table.
    ///
    /// A root bootstrap failure aborts the run before any table entry is
    /// attempted.
    pub fn run(&self, config: &AutomountConfig) -> MountliteResult<()> {
        self.mount_rootfs(&config.rootfs)?;
        self.mount_table_volumes(&config.table)
    }

    /// Establish "/" according to the configured strategy.
    fn mount_rootfs(&self, rootfs: &RootfsConfig) -> MountliteResult<()> {
        match rootfs {
            RootfsConfig::Disabled => Ok(()),
            RootfsConfig::Embedded { image } => {
                info!("Mounting root filesystem from embedded initrd image");
                initrd::mount_initrd(self.mount, self.extractor, image, Path::new("/"))
            }
            RootfsConfig::Declared(root) => {
                // An empty driver means no root was configured, which is a
                // valid state rather than an error.
                if root.driver.is_empty() {
                    debug!("No root filesystem configured, skipping root bootstrap");
                    return Ok(());
                }

                let vd = root.to_descriptor();
                if vd.is_initrd() {
                    return self.mount_initrd_volume(&vd);
                }
                self.mount_volume(&vd)
            }
        }
    }

    /// Mount every present table entry in order, failing fast.
    fn mount_table_volumes(&self, table: &VolumeTable) -> MountliteResult<()> {
        for raw in table.entries() {
            let vd = VolumeDescriptor::parse(raw)?;

            let rc = if vd.is_initrd() {
                self.mount_initrd_volume(&vd)
            } else {
                self.mount_volume(&vd)
            };
            if let Err(e) = rc {
                error!("Failed to mount {}: {}", vd.source, e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Mount one regular volume.
    fn mount_volume(&self, vd: &VolumeDescriptor) -> MountliteResult<()> {
        let target = Path::new(&vd.mount_path);

        info!("Mounting {} ({}) at {}", vd.source, vd.driver, vd.mount_path);
        self.mount
            .mount(
                &vd.source,
                target,
                &vd.driver,
                vd.flags,
                vd.options.as_deref(),
            )
            .map_err(|e| {
                error!(
                    "Failed to mount {} ({}) at {}: {}",
                    vd.source, vd.driver, vd.mount_path, e
                );
                MountliteError::mount(&vd.source, &vd.driver, target, e)
            })
    }

    /// Mount one initrd-backed volume from the first discovered region.
    fn mount_initrd_volume(&self, vd: &VolumeDescriptor) -> MountliteResult<()> {
        let Some(image) = self.registry.first_initrd() else {
            error!("Could not find an initrd region");
            return Err(MountliteError::NoInitrdRegion);
        };

        initrd::mount_initrd(self.mount, self.extractor, image, Path::new(&vd.mount_path))
    }
}
