use std::{io::ErrorKind, path::Path, time::Duration};

use tokio::{fs, time};

use crate::{config::DiskSize, hypervisor::ImageAllocator, VirtcoreError, VirtcoreResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Allocates a new disk image at `path` with virtual capacity `size`.
///
/// Fail-fast rules, checked before the allocator runs:
/// - The parent directory must already exist ([`VirtcoreError::DirectoryMissing`]).
///   Storage layout is an infrastructure decision; it is never created here.
/// - No file may exist at `path` ([`VirtcoreError::DiskAlreadyExists`]). The
///   path is claimed with an exclusive create, which is the serialization
///   point for concurrent attempts on the same VM name - exactly one claim
///   wins, the rest observe `DiskAlreadyExists` and fail cleanly.
///
/// With `timeout` set, an allocator invocation exceeding it counts as the
/// allocation's failure. On any allocator failure or timeout the claimed file
/// is removed best-effort; a cleanup failure is logged, not escalated, so the
/// original error is always the one reported.
pub async fn create_disk(
    allocator: &dyn ImageAllocator,
    path: &Path,
    size: &DiskSize,
    timeout: Option<Duration>,
) -> VirtcoreResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Err(VirtcoreError::DirectoryMissing(path.display().to_string())),
    };

    if !fs::try_exists(parent).await? {
        return Err(VirtcoreError::DirectoryMissing(
            parent.display().to_string(),
        ));
    }

    // Claim the path atomically before invoking the allocator.
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(VirtcoreError::DiskAlreadyExists(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    let allocation = allocator.allocate(path, size);
    let result = match timeout {
        Some(limit) => match time::timeout(limit, allocation).await {
            Ok(result) => result,
            Err(_) => Err(VirtcoreError::StepTimeout {
                step: "disk allocation",
                secs: limit.as_secs(),
            }),
        },
        None => allocation.await,
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            remove_partial(path).await;
            Err(err)
        }
    }
}

/// Best-effort removal of a claimed or partially written image.
async fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!(
                "failed to clean up partial disk image {}: {}",
                path.display(),
                e
            );
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;

    /// Allocator that mimics the image utility: writes the image file, or
    /// fails after leaving a partial file behind.
    #[derive(Default)]
    struct FakeAllocator {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeAllocator {
        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageAllocator for FakeAllocator {
        async fn allocate(&self, path: &Path, _size: &DiskSize) -> VirtcoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            // The provisioner claims the path before handing it over.
            assert!(path.exists(), "allocator must be invoked on a claimed path");

            if self.fail {
                std::fs::write(path, b"partial").unwrap();
                return Err(VirtcoreError::DiskAllocation {
                    path: path.display().to_string(),
                    message: "no space left on device".to_string(),
                });
            }

            std::fs::write(path, b"qcow2").unwrap();
            Ok(())
        }
    }

    fn size_10g() -> DiskSize {
        "10G".parse().unwrap()
    }

    #[tokio::test]
    async fn test_create_disk_success() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("testvm1.qcow2");
        let allocator = FakeAllocator::default();

        create_disk(&allocator, &path, &size_10g(), None)
            .await
            .unwrap();

        assert!(path.exists());
        assert_eq!(allocator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_create_disk_missing_parent_invokes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-subdir").join("testvm1.qcow2");
        let allocator = FakeAllocator::default();

        let result = create_disk(&allocator, &path, &size_10g(), None).await;

        assert!(matches!(result, Err(VirtcoreError::DirectoryMissing(_))));
        assert_eq!(allocator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_disk_rejects_existing_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("testvm1.qcow2");
        std::fs::write(&path, b"existing disk").unwrap();
        let allocator = FakeAllocator::default();

        let result = create_disk(&allocator, &path, &size_10g(), None).await;

        assert!(matches!(result, Err(VirtcoreError::DiskAlreadyExists(_))));
        assert_eq!(allocator.call_count(), 0);

        // The existing image is untouched.
        assert_eq!(std::fs::read(&path).unwrap(), b"existing disk");
    }

    #[tokio::test]
    async fn test_create_disk_cleans_up_partial_on_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("testvm1.qcow2");
        let allocator = FakeAllocator::failing();

        let result = create_disk(&allocator, &path, &size_10g(), None).await;

        assert!(matches!(result, Err(VirtcoreError::DiskAllocation { .. })));
        assert!(!path.exists(), "partial image must be removed");
    }

    #[tokio::test]
    async fn test_create_disk_timeout_cleans_up_claim() {
        /// Allocator that never finishes.
        struct HangingAllocator;

        #[async_trait]
        impl ImageAllocator for HangingAllocator {
            async fn allocate(&self, _path: &Path, _size: &DiskSize) -> VirtcoreResult<()> {
                time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("testvm1.qcow2");

        let result = create_disk(
            &HangingAllocator,
            &path,
            &size_10g(),
            Some(Duration::from_millis(20)),
        )
        .await;

        assert!(matches!(result, Err(VirtcoreError::StepTimeout { .. })));
        assert!(!path.exists(), "claimed file must be removed after timeout");
    }
}
