use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{config::DiskSize, utils::DISK_IMAGE_FORMAT, VirtcoreError, VirtcoreResult};

use super::ImageAllocator;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const QEMU_IMG_BIN: &str = "qemu-img";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Disk allocator backed by the `qemu-img` utility.
///
/// Invokes only `qemu-img create -f qcow2 <path> <size>`, which replaces the
/// caller's zero-length claim file with the image. The resulting image is
/// sparse: its virtual capacity matches `size` while real blocks are
/// allocated on demand.
#[derive(Debug, Clone, Default)]
pub struct QemuImg;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl QemuImg {
    /// Assembles the `qemu-img` argument list for creating an image.
    fn build_args(path: &Path, size: &DiskSize) -> Vec<String> {
        vec![
            "create".to_string(),
            "-f".to_string(),
            DISK_IMAGE_FORMAT.to_string(),
            path.display().to_string(),
            size.to_string(),
        ]
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl ImageAllocator for QemuImg {
    fn required_tools(&self) -> &[&'static str] {
        &[QEMU_IMG_BIN]
    }

    async fn allocate(&self, path: &Path, size: &DiskSize) -> VirtcoreResult<()> {
        let output = Command::new(QEMU_IMG_BIN)
            .args(Self::build_args(path, size))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| VirtcoreError::DiskAllocation {
                path: path.display().to_string(),
                message: format!("failed to spawn {}: {}", QEMU_IMG_BIN, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VirtcoreError::DiskAllocation {
                path: path.display().to_string(),
                message: stderr.trim().to_string(),
            });
        }

        tracing::info!(
            "allocated {} {} image at {}",
            size,
            DISK_IMAGE_FORMAT,
            path.display()
        );

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qemu_img_build_args() {
        let size = "10G".parse::<DiskSize>().unwrap();
        let args = QemuImg::build_args(Path::new("/srv/images/testvm1.qcow2"), &size);

        assert_eq!(
            args,
            vec![
                "create".to_string(),
                "-f".to_string(),
                "qcow2".to_string(),
                "/srv/images/testvm1.qcow2".to_string(),
                "10G".to_string(),
            ]
        );
    }

    #[test]
    fn test_qemu_img_required_tools() {
        assert_eq!(QemuImg.required_tools(), &["qemu-img"]);
    }
}
