//! In-memory tarball extraction.
//!
//! Initrd images are tarballs, optionally gzip-compressed; compression is
//! detected from the magic bytes so callers can hand over either form.

use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use super::ArchiveExtractor;

/// Gzip magic number.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Extracts tar (or tar.gz) images resident in memory.
pub struct TarballExtractor;

impl ArchiveExtractor for TarballExtractor {
    fn extract(&self, target: &Path, image: &[u8]) -> io::Result<()> {
        let reader: Box<dyn Read + '_> = if image.starts_with(&GZIP_MAGIC) {
            debug!("detected gzip-compressed initrd image");
            Box::new(GzDecoder::new(image))
        } else {
            Box::new(image)
        };

        let mut archive = Archive::new(reader);
        archive.set_preserve_permissions(true);
        archive.unpack(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn sample_tarball() -> Vec<u8> {
        let data = b"hello from the initrd";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();

        let mut builder = tar::Builder::new(Vec::new());
        builder
            .append_data(&mut header, "etc/motd", &data[..])
            .unwrap();
        builder.into_inner().unwrap()
    }

    #[test]
    fn unpacks_plain_tarball() {
        let dir = TempDir::new().unwrap();
        TarballExtractor
            .extract(dir.path(), &sample_tarball())
            .unwrap();

        let motd = std::fs::read_to_string(dir.path().join("etc/motd")).unwrap();
        assert_eq!(motd, "hello from the initrd");
    }

    #[test]
    fn unpacks_gzip_compressed_tarball() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&sample_tarball()).unwrap();
        let compressed = encoder.finish().unwrap();

        let dir = TempDir::new().unwrap();
        TarballExtractor.extract(dir.path(), &compressed).unwrap();
        assert!(dir.path().join("etc/motd").exists());
    }

    #[test]
    fn rejects_garbage_image() {
        let dir = TempDir::new().unwrap();
        assert!(TarballExtractor
            .extract(dir.path(), b"not an archive")
            .is_err());
    }
}
