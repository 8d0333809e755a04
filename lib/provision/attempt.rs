use std::path::{Path, PathBuf};

use getset::Getters;

use crate::{
    config::{NetworkSpec, VmSpec},
    utils,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The lifecycle state of a provisioning attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// The attempt exists; nothing has executed.
    Init,

    /// Preflight verified the external toolchain.
    ToolsChecked,

    /// The disk image exists at the attempt's path.
    DiskCreated,

    /// The domain descriptor has been rendered.
    DescriptorGenerated,

    /// The domain is defined with the hypervisor daemon. Terminal success -
    /// ownership of the live VM passes to the operator and no automatic
    /// rollback applies past this point.
    Registered,

    /// Compensating cleanup ran after a failure. Terminal failure.
    RolledBack,
}

/// A single provisioning attempt - the unit of orchestration.
///
/// Holds the validated spec, the deterministic disk path derived from the VM
/// name, and the current lifecycle state. The rendered descriptor flows by
/// value from the descriptor source straight to the registrar; it is
/// regenerated per attempt and never cached here.
#[derive(Debug, Getters)]
pub struct ProvisioningAttempt {
    /// The validated VM specification driving this attempt.
    #[get = "pub with_prefix"]
    spec: VmSpec,

    /// Where the attempt's disk image lives.
    #[get = "pub with_prefix"]
    disk_path: PathBuf,

    /// The current lifecycle state.
    #[get = "pub with_prefix"]
    state: AttemptState,
}

/// The outcome of a successful provisioning attempt.
#[derive(Debug, Clone, Getters)]
pub struct ProvisionReceipt {
    /// The name the domain is registered under.
    #[get = "pub with_prefix"]
    name: String,

    /// The path of the allocated disk image.
    #[get = "pub with_prefix"]
    disk_path: PathBuf,

    /// The network the VM attaches to.
    #[get = "pub with_prefix"]
    network: NetworkSpec,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ProvisioningAttempt {
    /// Creates a new attempt in the `Init` state, deriving the disk path
    /// from the VM name and the image directory.
    pub fn new(spec: VmSpec, image_dir: &Path) -> Self {
        let disk_path = utils::disk_image_path(image_dir, spec.get_name());

        Self {
            spec,
            disk_path,
            state: AttemptState::Init,
        }
    }

    /// Advances the attempt to the next lifecycle state.
    pub fn advance(&mut self, next: AttemptState) {
        tracing::debug!(
            "attempt '{}': {:?} -> {:?}",
            self.spec.get_name(),
            self.state,
            next
        );
        self.state = next;
    }

    /// Consumes the attempt into its success receipt.
    pub fn into_receipt(self) -> ProvisionReceipt {
        ProvisionReceipt {
            name: self.spec.get_name().to_string(),
            network: self.spec.get_network().clone(),
            disk_path: self.disk_path,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
