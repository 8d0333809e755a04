use std::{
    env,
    path::{Path, PathBuf},
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The disk image format allocated for every VM.
pub const DISK_IMAGE_FORMAT: &str = "qcow2";

/// The default directory where disk images are allocated.
pub const DEFAULT_IMAGE_DIR: &str = "/var/lib/libvirt/images";

/// The environment variable overriding the image directory.
pub const IMAGE_DIR_ENV_VAR: &str = "VIRTCORE_IMAGE_DIR";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Resolves the image directory: an explicit override wins, then the
/// `VIRTCORE_IMAGE_DIR` environment variable, then [`DEFAULT_IMAGE_DIR`].
///
/// The directory is resolved, never created - whether it exists is checked at
/// disk-allocation time.
pub fn resolve_image_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }

    match env::var(IMAGE_DIR_ENV_VAR) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_IMAGE_DIR),
    }
}

/// Derives the deterministic disk image path for a VM name:
/// `<image_dir>/<name>.qcow2`.
///
/// ## Examples
///
/// ```
/// use std::path::Path;
/// use virtcore::utils::disk_image_path;
///
/// let path = disk_image_path(Path::new("/var/lib/libvirt/images"), "testvm1");
/// assert_eq!(path, Path::new("/var/lib/libvirt/images/testvm1.qcow2"));
/// ```
pub fn disk_image_path(image_dir: &Path, vm_name: &str) -> PathBuf {
    image_dir.join(format!("{}.{}", vm_name, DISK_IMAGE_FORMAT))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_image_path() {
        assert_eq!(
            disk_image_path(Path::new("/srv/images"), "racevm"),
            PathBuf::from("/srv/images/racevm.qcow2")
        );
    }

    #[test]
    fn test_resolve_image_dir_explicit_override() {
        assert_eq!(
            resolve_image_dir(Some(PathBuf::from("/tmp/images"))),
            PathBuf::from("/tmp/images")
        );
    }
}
