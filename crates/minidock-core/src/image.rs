//! Base image archives.
//!
//! The lower layer is populated by extracting a tar archive; `commit`
//! packages a container's merged view back into one.

use std::path::Path;

use minidock_common::error::{MinidockError, Result};

/// Extracts a tar archive into `target`.
///
/// Supports plain `.tar` and gzip-compressed `.tar.gz` / `.tgz` archives.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or unpacked.
pub fn extract_image(archive_path: &Path, target: &Path) -> Result<()> {
    tracing::info!(
        archive = %archive_path.display(),
        target = %target.display(),
        "extracting image"
    );

    let file = std::fs::File::open(archive_path).map_err(|e| MinidockError::Io {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    if is_gzip_archive(archive_path) {
        let decoder = flate2::read::GzDecoder::new(file);
        let mut archive = tar::Archive::new(decoder);
        archive.unpack(target).map_err(|e| MinidockError::Io {
            path: target.to_path_buf(),
            source: e,
        })?;
    } else {
        let mut archive = tar::Archive::new(file);
        archive.unpack(target).map_err(|e| MinidockError::Io {
            path: target.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Packages a directory tree into a gzip-compressed tarball.
///
/// Used by `commit` against a running container's merged view; consumes
/// the directory path only and performs no isolation logic.
///
/// # Errors
///
/// Returns an error if the output file cannot be created or the tree
/// cannot be read.
pub fn pack_image(source_dir: &Path, output: &Path) -> Result<()> {
    tracing::info!(
        source = %source_dir.display(),
        output = %output.display(),
        "packing image"
    );

    let file = std::fs::File::create(output).map_err(|e| MinidockError::Io {
        path: output.to_path_buf(),
        source: e,
    })?;
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder
        .append_dir_all(".", source_dir)
        .map_err(|e| MinidockError::Io {
            path: source_dir.to_path_buf(),
            source: e,
        })?;
    let encoder = builder.into_inner().map_err(|e| MinidockError::Io {
        path: output.to_path_buf(),
        source: e,
    })?;
    let _ = encoder.finish().map_err(|e| MinidockError::Io {
        path: output.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Determines whether the archive is gzip-compressed based on extension.
fn is_gzip_archive(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz") || ext.eq_ignore_ascii_case("tgz"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn create_test_tar(dir: &Path) -> std::path::PathBuf {
        let tar_path = dir.join("base.tar");
        let file = std::fs::File::create(&tar_path).expect("failed to create tar file");
        let mut builder = tar::Builder::new(file);
        let data = b"hello from the base image";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "hello.txt", &data[..])
            .expect("failed to append data");
        builder.finish().expect("failed to finish tar");
        tar_path
    }

    #[test]
    fn extract_plain_tar_creates_expected_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tar_path = create_test_tar(dir.path());
        let target = dir.path().join("lower");

        std::fs::create_dir_all(&target).expect("target");
        extract_image(&tar_path, &target).expect("extract");

        let content = std::fs::read_to_string(target.join("hello.txt")).expect("read");
        assert_eq!(content, "hello from the base image");
    }

    #[test]
    fn extract_nonexistent_archive_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = extract_image(&dir.path().join("missing.tar"), &dir.path().join("out"));
        assert!(result.is_err());
    }

    #[test]
    fn packed_tree_extracts_back_intact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("merged");
        std::fs::create_dir_all(source.join("etc")).expect("source tree");
        std::fs::write(source.join("etc/hostname"), "box").expect("file");

        let image = dir.path().join("snapshot.tar.gz");
        pack_image(&source, &image).expect("pack");

        let restored = dir.path().join("restored");
        std::fs::create_dir_all(&restored).expect("restored");
        extract_image(&image, &restored).expect("extract");
        let content = std::fs::read_to_string(restored.join("etc/hostname")).expect("read");
        assert_eq!(content, "box");
    }

    #[test]
    fn gzip_detection_is_extension_based() {
        assert!(is_gzip_archive(Path::new("image.tar.gz")));
        assert!(is_gzip_archive(Path::new("image.tgz")));
        assert!(!is_gzip_archive(Path::new("image.tar")));
    }
}
