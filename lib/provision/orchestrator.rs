use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};

use tokio::{fs, time};

use crate::{
    config::VmSpec,
    hypervisor::{
        check_tools, DescriptorSource, DomainRegistrar, ImageAllocator, QemuImg, Virsh, VirtInstall,
    },
    VirtcoreError, VirtcoreResult,
};

use super::{disk, AttemptState, ProvisionReceipt, ProvisioningAttempt};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Sequences the provisioning steps for one VM at a time, with
/// rollback-on-failure semantics.
///
/// Each [`provision`](Provisioner::provision) call is an independent
/// sequential task: steps strictly depend on their predecessor's output and
/// nothing is shared between concurrent calls beyond the filesystem and the
/// hypervisor daemon's own domain table. Concurrent calls for different VM
/// names need no coordination; calls racing on the same name are serialized
/// by the disk provisioner's exclusive claim, with the daemon's
/// duplicate-name rejection as a second line of defense.
pub struct Provisioner {
    image_dir: PathBuf,
    allocator: Arc<dyn ImageAllocator>,
    descriptors: Arc<dyn DescriptorSource>,
    registrar: Arc<dyn DomainRegistrar>,
    step_timeout: Option<Duration>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Provisioner {
    /// Creates a provisioner backed by the real libvirt toolchain
    /// (`qemu-img`, `virt-install`, `virsh`), allocating disk images under
    /// `image_dir`.
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self::with_collaborators(
            image_dir,
            Arc::new(QemuImg),
            Arc::new(VirtInstall),
            Arc::new(Virsh),
        )
    }

    /// Creates a provisioner with custom collaborators.
    ///
    /// This is the seam tests use to substitute fakes for the external
    /// toolchain.
    pub fn with_collaborators(
        image_dir: impl Into<PathBuf>,
        allocator: Arc<dyn ImageAllocator>,
        descriptors: Arc<dyn DescriptorSource>,
        registrar: Arc<dyn DomainRegistrar>,
    ) -> Self {
        Self {
            image_dir: image_dir.into(),
            allocator,
            descriptors,
            registrar,
            step_timeout: None,
        }
    }

    /// Sets a per-step timeout.
    ///
    /// A step exceeding the limit counts as that step's failure and takes
    /// the same rollback path. This is also the supported cancellation
    /// mechanism: bounding each step bounds the whole attempt while keeping
    /// compensation consistent. The shipped collaborators spawn their
    /// subprocesses kill-on-drop, so a timed-out step's child is terminated
    /// rather than left to mutate state behind the rollback.
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = Some(timeout);
        self
    }

    /// Provisions a VM end to end: validate, preflight, allocate the disk,
    /// render the descriptor, register the domain.
    ///
    /// Tool existence is re-checked on every call; the probe is cheap and a
    /// long-lived process may gain or lose tools between calls.
    ///
    /// Validation failures surface before anything mutates. If a step fails
    /// after the disk was created, the disk is deleted before the original
    /// error is returned - a rollback failure is logged as a secondary
    /// warning, never reported in place of the cause. Nothing is rolled back
    /// automatically once the domain is registered, and no step is retried.
    pub async fn provision(&self, spec: VmSpec) -> VirtcoreResult<ProvisionReceipt> {
        spec.validate()?;

        let mut attempt = ProvisioningAttempt::new(spec, &self.image_dir);
        tracing::info!(
            "provisioning vm '{}' with disk at {}",
            attempt.get_spec().get_name(),
            attempt.get_disk_path().display()
        );

        self.check_toolchain()?;
        attempt.advance(AttemptState::ToolsChecked);

        // The disk provisioner owns its own cleanup: on allocator failure or
        // timeout it removes the claimed file, and its precondition errors
        // (directory missing, disk already exists) must never trigger
        // deletion of a file this attempt does not own.
        disk::create_disk(
            self.allocator.as_ref(),
            attempt.get_disk_path(),
            attempt.get_spec().get_disk_size(),
            self.step_timeout,
        )
        .await?;
        attempt.advance(AttemptState::DiskCreated);

        let descriptor = match self
            .run_step(
                "descriptor generation",
                self.descriptors
                    .render(attempt.get_spec(), attempt.get_disk_path()),
            )
            .await
        {
            Ok(descriptor) => descriptor,
            Err(err) => return Err(self.roll_back(&mut attempt, err).await),
        };
        attempt.advance(AttemptState::DescriptorGenerated);

        if let Err(err) = self
            .run_step("domain registration", self.registrar.define(&descriptor))
            .await
        {
            return Err(self.roll_back(&mut attempt, err).await);
        }
        attempt.advance(AttemptState::Registered);

        tracing::info!("vm '{}' registered", attempt.get_spec().get_name());

        Ok(attempt.into_receipt())
    }

    /// Probes the search path for every binary the configured collaborators
    /// will invoke. Fakes declare no tools, so tests never touch `$PATH`.
    fn check_toolchain(&self) -> VirtcoreResult<()> {
        let tools = self
            .allocator
            .required_tools()
            .iter()
            .chain(self.descriptors.required_tools().iter())
            .chain(self.registrar.required_tools().iter())
            .copied();

        check_tools(tools)
    }

    /// Runs a step under the configured timeout, mapping an elapsed limit to
    /// that step's failure.
    async fn run_step<T>(
        &self,
        step: &'static str,
        fut: impl Future<Output = VirtcoreResult<T>>,
    ) -> VirtcoreResult<T> {
        match self.step_timeout {
            Some(limit) => match time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(VirtcoreError::StepTimeout {
                    step,
                    secs: limit.as_secs(),
                }),
            },
            None => fut.await,
        }
    }

    /// Compensating deletion of the attempt's disk image. Returns the
    /// original error untouched; a rollback failure is only logged.
    async fn roll_back(
        &self,
        attempt: &mut ProvisioningAttempt,
        cause: VirtcoreError,
    ) -> VirtcoreError {
        tracing::warn!(
            "provisioning vm '{}' failed after disk creation: {}; rolling back",
            attempt.get_spec().get_name(),
            cause
        );

        if let Err(e) = fs::remove_file(attempt.get_disk_path()).await {
            tracing::warn!(
                "rollback failed to remove disk image {}: {}",
                attempt.get_disk_path().display(),
                e
            );
        }

        attempt.advance(AttemptState::RolledBack);

        cause
    }
}
