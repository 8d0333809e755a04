use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{config::VmSpec, utils::DISK_IMAGE_FORMAT, VirtcoreError, VirtcoreResult};

use super::DescriptorSource;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const VIRT_INSTALL_BIN: &str = "virt-install";

/// The core provisions empty generic VMs; the OS variant is fixed.
const OS_VARIANT: &str = "generic";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Descriptor source backed by `virt-install` in print-only mode.
///
/// Runs `virt-install --print-xml --dry-run` and captures standard output as
/// the descriptor text. The descriptor is regenerated on every call - never
/// cached - so it can't go stale between attempts.
///
/// Operational assumption: `--print-xml --dry-run` performs no side effects.
/// That is a contract of the external tool which this crate cannot enforce;
/// verify it against the `virt-install` version in deployment.
#[derive(Debug, Clone, Default)]
pub struct VirtInstall;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl VirtInstall {
    /// Assembles the `virt-install` argument list for a print-only render.
    fn build_args(spec: &VmSpec, disk_path: &Path) -> Vec<String> {
        vec![
            "--name".to_string(),
            spec.get_name().to_string(),
            "--memory".to_string(),
            spec.get_memory_mib().to_string(),
            "--vcpus".to_string(),
            spec.get_num_vcpus().to_string(),
            "--disk".to_string(),
            format!("path={},format={}", disk_path.display(), DISK_IMAGE_FORMAT),
            "--os-variant".to_string(),
            OS_VARIANT.to_string(),
            "--network".to_string(),
            spec.get_network().to_string(),
            "--print-xml".to_string(),
            "--dry-run".to_string(),
        ]
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl DescriptorSource for VirtInstall {
    fn required_tools(&self) -> &[&'static str] {
        &[VIRT_INSTALL_BIN]
    }

    async fn render(&self, spec: &VmSpec, disk_path: &Path) -> VirtcoreResult<String> {
        let output = Command::new(VIRT_INSTALL_BIN)
            .args(Self::build_args(spec, disk_path))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                VirtcoreError::Descriptor(format!("failed to spawn {}: {}", VIRT_INSTALL_BIN, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VirtcoreError::Descriptor(stderr.trim().to_string()));
        }

        let descriptor = String::from_utf8_lossy(&output.stdout).into_owned();
        if descriptor.trim().is_empty() {
            return Err(VirtcoreError::Descriptor(format!(
                "{} produced an empty descriptor",
                VIRT_INSTALL_BIN
            )));
        }

        tracing::debug!(
            "rendered descriptor for '{}' ({} bytes)",
            spec.get_name(),
            descriptor.len()
        );

        Ok(descriptor)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
