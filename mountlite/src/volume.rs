//! Volume descriptors and the fstab entry grammar.
//!
//! One table entry has the shape `source:mount_path:driver[:flags[:opts]]`.
//! The first three fields are mandatory (`source` may be empty for
//! sourceless filesystems); an empty flags field means 0 and an empty
//! options field means "no options". There is no escaping, so the first
//! four fields cannot contain `:`.

use crate::errors::{MountliteError, MountliteResult};

/// Separator between descriptor fields.
const FIELD_SEPARATOR: char = ':';

/// Driver names with this prefix route to the initrd path instead of a
/// regular filesystem mount.
const INITRD_DRIVER_PREFIX: &str = "initrd";

/// One parsed mount request.
///
/// Descriptors are transient: parsed (or synthesized by root bootstrap),
/// handed to the mount path once, and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeDescriptor {
    /// Backing device or resource; empty for sourceless filesystems.
    pub source: String,
    /// Absolute mount point path.
    pub mount_path: String,
    /// Filesystem driver name.
    pub driver: String,
    /// Mount flags bitmask.
    pub flags: u64,
    /// Driver-specific mount options, if any.
    pub options: Option<String>,
}

impl VolumeDescriptor {
    /// Parse one raw fstab entry.
    ///
    /// A missing or empty mount path or driver is a configuration fault,
    /// kept distinct from runtime mount failures. The input is not
    /// modified; all fields are copied out.
    pub fn parse(raw: &str) -> MountliteResult<Self> {
        let mut fields = raw.splitn(5, FIELD_SEPARATOR);

        let source = fields.next().unwrap_or_default();
        let mount_path = fields
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| MountliteError::descriptor(raw, "missing mount path"))?;
        let driver = fields
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| MountliteError::descriptor(raw, "missing filesystem driver"))?;

        let flags = match fields.next() {
            Some(f) => parse_flags(f).map_err(|reason| MountliteError::descriptor(raw, reason))?,
            None => 0,
        };

        // Everything after the fourth separator is one opaque options
        // field; driver-specific parsing happens elsewhere.
        let options = fields.next().filter(|o| !o.is_empty()).map(str::to_owned);

        Ok(Self {
            source: source.to_owned(),
            mount_path: mount_path.to_owned(),
            driver: driver.to_owned(),
            flags,
            options,
        })
    }

    /// Whether this volume is populated from an initrd image rather than
    /// mounted from its source device.
    pub fn is_initrd(&self) -> bool {
        self.driver.starts_with(INITRD_DRIVER_PREFIX)
    }
}

/// Parse a flags field with strtol-style base auto-detection: `0x` prefix
/// is hex, a leading `0` is octal, anything else is decimal. An empty
/// field means no flags.
fn parse_flags(field: &str) -> Result<u64, String> {
    if field.is_empty() {
        return Ok(0);
    }

    let (digits, radix) = if let Some(hex) = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
    {
        (hex, 16)
    } else if field.len() > 1 && field.starts_with('0') {
        (&field[1..], 8)
    } else {
        (field, 10)
    };

    u64::from_str_radix(digits, radix).map_err(|e| format!("bad mount flags {field:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_entry() {
        let vd = VolumeDescriptor::parse("/dev/vda:/:ext4").unwrap();
        assert_eq!(vd.source, "/dev/vda");
        assert_eq!(vd.mount_path, "/");
        assert_eq!(vd.driver, "ext4");
        assert_eq!(vd.flags, 0);
        assert_eq!(vd.options, None);
    }

    #[test]
    fn empty_source_is_allowed() {
        let vd = VolumeDescriptor::parse(":/tmp:ramfs").unwrap();
        assert_eq!(vd.source, "");
        assert_eq!(vd.driver, "ramfs");
    }

    #[test]
    fn empty_flags_and_options_fields_default() {
        let vd = VolumeDescriptor::parse("src:/mnt:vfat::").unwrap();
        assert_eq!(vd.flags, 0);
        assert_eq!(vd.options, None);
    }

    #[test]
    fn parses_hex_flags_and_options() {
        let vd = VolumeDescriptor::parse("src:/mnt:vfat:0x10:rw,noatime").unwrap();
        assert_eq!(vd.flags, 0x10);
        assert_eq!(vd.options.as_deref(), Some("rw,noatime"));
    }

    #[test]
    fn parses_decimal_and_octal_flags() {
        assert_eq!(VolumeDescriptor::parse("s:/m:d:42").unwrap().flags, 42);
        assert_eq!(VolumeDescriptor::parse("s:/m:d:010").unwrap().flags, 8);
        assert_eq!(VolumeDescriptor::parse("s:/m:d:0").unwrap().flags, 0);
    }

    #[test]
    fn options_keep_embedded_separators() {
        let vd = VolumeDescriptor::parse("overlay:/merged:overlay:0:lowerdir=/a:/b").unwrap();
        assert_eq!(vd.options.as_deref(), Some("lowerdir=/a:/b"));
    }

    #[test]
    fn missing_driver_is_a_descriptor_fault() {
        let err = VolumeDescriptor::parse("/dev/vda:/data").unwrap_err();
        assert!(err.is_config_fault());

        let err = VolumeDescriptor::parse("/dev/vda:/data:").unwrap_err();
        assert!(err.is_config_fault());
    }

    #[test]
    fn missing_mount_path_is_a_descriptor_fault() {
        assert!(VolumeDescriptor::parse("/dev/vda").is_err());
        assert!(VolumeDescriptor::parse("/dev/vda::ext4").is_err());
        assert!(VolumeDescriptor::parse("").is_err());
    }

    #[test]
    fn garbage_flags_are_a_descriptor_fault() {
        let err = VolumeDescriptor::parse("s:/m:d:banana").unwrap_err();
        assert!(err.is_config_fault());
        assert!(VolumeDescriptor::parse("s:/m:d:0x").is_err());
    }

    #[test]
    fn initrd_driver_prefix_is_detected() {
        assert!(VolumeDescriptor::parse("x:/mnt:initrd").unwrap().is_initrd());
        assert!(VolumeDescriptor::parse("x:/mnt:initrd0").unwrap().is_initrd());
        assert!(!VolumeDescriptor::parse("x:/mnt:ext4").unwrap().is_initrd());
    }
}
