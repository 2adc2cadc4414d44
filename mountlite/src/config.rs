//! Static automount configuration.
//!
//! Everything here is assembled once from boot parameters before the
//! driver runs and is read-only afterwards.

use crate::errors::{MountliteError, MountliteResult};
use crate::volume::VolumeDescriptor;

/// Default number of slots in a volume table.
pub const DEFAULT_TABLE_CAPACITY: usize = 16;

/// Fixed-capacity ordered list of raw fstab entries.
///
/// Iteration stops at the first empty slot, so an empty string acts as a
/// terminator rather than a mountable entry.
#[derive(Debug, Clone)]
pub struct VolumeTable {
    capacity: usize,
    entries: Vec<String>,
}

impl VolumeTable {
    /// Create an empty table with room for `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append one raw fstab entry.
    pub fn push(&mut self, raw: impl Into<String>) -> MountliteResult<()> {
        if self.entries.len() == self.capacity {
            return Err(MountliteError::TableFull {
                capacity: self.capacity,
            });
        }
        self.entries.push(raw.into());
        Ok(())
    }

    /// Entries in table order, up to the first empty slot.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(String::as_str)
            .take_while(|e| !e.is_empty())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for VolumeTable {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_CAPACITY)
    }
}

/// How the root filesystem is established.
///
/// Resolved once at startup; the variants are mutually exclusive.
#[derive(Debug, Clone, Default)]
pub enum RootfsConfig {
    /// Root automounting is turned off entirely.
    #[default]
    Disabled,
    /// Populate "/" from an archive embedded in the boot image
    /// (typically via `include_bytes!`).
    Embedded { image: &'static [u8] },
    /// Mount "/" from declared root settings.
    Declared(RootVolume),
}

/// Declared root volume settings.
///
/// An empty `driver` means no root filesystem was configured, which is a
/// valid state: root bootstrap then does nothing.
#[derive(Debug, Clone, Default)]
pub struct RootVolume {
    /// Root device; empty for sourceless root filesystems.
    pub device: String,
    /// Root filesystem driver name.
    pub driver: String,
    /// Root mount flags.
    pub flags: u64,
    /// Root mount options.
    pub options: Option<String>,
}

impl RootVolume {
    /// Synthesize the descriptor mounted at "/".
    pub(crate) fn to_descriptor(&self) -> VolumeDescriptor {
        VolumeDescriptor {
            source: self.device.clone(),
            mount_path: "/".to_owned(),
            driver: self.driver.clone(),
            flags: self.flags,
            options: self.options.clone(),
        }
    }
}

/// Complete automount configuration: root strategy plus the volume table.
#[derive(Debug, Clone, Default)]
pub struct AutomountConfig {
    pub rootfs: RootfsConfig,
    pub table: VolumeTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_past_capacity_fails() {
        let mut table = VolumeTable::new(2);
        table.push("a:/a:ext4").unwrap();
        table.push("b:/b:ext4").unwrap();
        let err = table.push("c:/c:ext4").unwrap_err();
        assert!(matches!(err, MountliteError::TableFull { capacity: 2 }));
    }

    #[test]
    fn iteration_stops_at_first_empty_slot() {
        let mut table = VolumeTable::new(4);
        table.push("a:/a:ext4").unwrap();
        table.push("").unwrap();
        table.push("b:/b:ext4").unwrap();

        let present: Vec<&str> = table.entries().collect();
        assert_eq!(present, vec!["a:/a:ext4"]);
    }

    #[test]
    fn root_volume_descriptor_targets_root() {
        let root = RootVolume {
            device: "/dev/vda".into(),
            driver: "ext4".into(),
            flags: 1,
            options: Some("ro".into()),
        };
        let vd = root.to_descriptor();
        assert_eq!(vd.mount_path, "/");
        assert_eq!(vd.source, "/dev/vda");
        assert_eq!(vd.flags, 1);
    }
}
