//! External hypervisor toolchain collaborators.
//!
//! Every mutating interaction with the outside world goes through one of the
//! traits below, so tests can substitute fakes without spawning subprocesses
//! or requiring elevated privileges. The shipped implementations wrap the
//! libvirt toolchain: [`QemuImg`] for disk allocation, [`VirtInstall`] for
//! descriptor generation, and [`Virsh`] for domain registration.

use std::path::Path;

use async_trait::async_trait;

use crate::{
    config::{DiskSize, VmSpec},
    VirtcoreResult,
};

mod preflight;
mod qemu_img;
mod virsh;
mod virt_install;

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Allocates backing disk images for VMs.
#[async_trait]
pub trait ImageAllocator: Send + Sync {
    /// The binaries this allocator invokes, probed by the preflight check
    /// before any mutating step runs.
    fn required_tools(&self) -> &[&'static str] {
        &[]
    }

    /// Creates a new, logically empty disk image at `path` with virtual
    /// capacity `size`. The caller claims `path` with an exclusive create
    /// before invoking this, so the allocator finds a zero-length claim file
    /// there and must replace it. It is never asked to resize, convert, or
    /// preserve existing content.
    async fn allocate(&self, path: &Path, size: &DiskSize) -> VirtcoreResult<()>;
}

/// Renders domain descriptors from validated VM specifications.
#[async_trait]
pub trait DescriptorSource: Send + Sync {
    /// The binaries this source invokes, probed by the preflight check.
    fn required_tools(&self) -> &[&'static str] {
        &[]
    }

    /// Renders the descriptor text for `spec` with its disk at `disk_path`.
    /// The returned text is opaque to the caller; its internal structure is
    /// the hypervisor daemon's concern.
    async fn render(&self, spec: &VmSpec, disk_path: &Path) -> VirtcoreResult<String>;
}

/// Registers domains with the hypervisor management daemon.
#[async_trait]
pub trait DomainRegistrar: Send + Sync {
    /// The binaries this registrar invokes, probed by the preflight check.
    fn required_tools(&self) -> &[&'static str] {
        &[]
    }

    /// Defines a domain from descriptor text, making it instantiable without
    /// starting it. Duplicate-name conflicts surface verbatim as
    /// registration errors.
    async fn define(&self, descriptor: &str) -> VirtcoreResult<()>;
}

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use preflight::*;
pub use qemu_img::*;
pub use virsh::*;
pub use virt_install::*;
