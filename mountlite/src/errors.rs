//! Error types for the automount pipeline.
//!
//! Two families, kept apart on purpose:
//! - [`MountliteError::Descriptor`] and [`MountliteError::TableFull`] point
//!   at a bad boot parameter (configuration fault, not recoverable);
//! - the remaining variants carry runtime failures from the mount,
//!   extraction, and region-discovery collaborators.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that abort the automount sequence.
#[derive(Debug, Error)]
pub enum MountliteError {
    /// Malformed volume descriptor in the boot parameters.
    #[error("bad volume descriptor {raw:?}: {reason}")]
    Descriptor { raw: String, reason: String },

    /// The volume table received more entries than it has slots.
    #[error("volume table full ({capacity} entries)")]
    TableFull { capacity: usize },

    /// The mount service reported a failure.
    #[error("mount {source_dev:?} ({driver}) at {}: {source}", .target.display())]
    Mount {
        source_dev: String,
        driver: String,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Archive extraction failed after the ramfs mount succeeded.
    #[error("extract initrd to {}: {source}", .target.display())]
    Extract {
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The platform handed over no initrd region.
    #[error("no initrd region available")]
    NoInitrdRegion,
}

impl MountliteError {
    /// Create a descriptor fault.
    pub fn descriptor(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Descriptor {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Create a mount failure with its call context.
    pub fn mount(
        source_dev: impl Into<String>,
        driver: impl Into<String>,
        target: &Path,
        source: io::Error,
    ) -> Self {
        Self::Mount {
            source_dev: source_dev.into(),
            driver: driver.into(),
            target: target.to_path_buf(),
            source,
        }
    }

    /// Whether this error is a configuration fault rather than a runtime
    /// mount failure.
    pub fn is_config_fault(&self) -> bool {
        matches!(self, Self::Descriptor { .. } | Self::TableFull { .. })
    }
}

pub type MountliteResult<T> = Result<T, MountliteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MountliteError::descriptor("a:b", "missing filesystem driver");
        assert_eq!(
            err.to_string(),
            "bad volume descriptor \"a:b\": missing filesystem driver"
        );

        let err = MountliteError::mount(
            "/dev/vda",
            "ext4",
            Path::new("/data"),
            io::Error::from_raw_os_error(19),
        );
        assert!(err.to_string().starts_with("mount \"/dev/vda\" (ext4) at /data:"));
    }

    #[test]
    fn test_config_fault_classification() {
        assert!(MountliteError::descriptor("x", "y").is_config_fault());
        assert!(MountliteError::TableFull { capacity: 4 }.is_config_fault());
        assert!(!MountliteError::NoInitrdRegion.is_config_fault());
    }
}
