//! `virtcore` is a provisioning core for libvirt virtual machines.
//!
//! # Overview
//!
//! Given a declarative VM specification (name, disk size, memory, vCPU count,
//! network attachment), virtcore drives the hypervisor toolchain to produce a
//! registered, instantiable domain with a freshly allocated qcow2 disk. It
//! handles:
//! - Preflight verification of the external toolchain
//! - Disk image allocation on shared storage
//! - Domain descriptor generation
//! - Registration with the hypervisor management daemon
//! - Rollback of the disk image when a later step fails
//!
//! # Architecture
//!
//! virtcore consists of several key components:
//!
//! - **Config**: Validated, immutable VM specifications
//! - **Hypervisor**: Polymorphic collaborators wrapping `qemu-img`,
//!   `virt-install`, and `virsh`
//! - **Provision**: The per-attempt lifecycle state machine and orchestrator
//! - **Cli**: Command-line argument surface for the `virtcore` binary
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use virtcore::{config::VmSpec, provision::Provisioner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Describe the VM declaratively
//!     let spec = VmSpec::builder()
//!         .name("testvm1")
//!         .memory_mib(2048)
//!         .num_vcpus(2)
//!         .build()?;
//!
//!     // Provision against the real toolchain
//!     let provisioner = Provisioner::new("/var/lib/libvirt/images");
//!     let receipt = provisioner.provision(spec).await?;
//!
//!     println!("disk image at {}", receipt.get_disk_path().display());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - VM specification types and validation
//! - [`hypervisor`] - External toolchain collaborators and preflight checks
//! - [`provision`] - Lifecycle orchestration with rollback-on-failure
//! - [`utils`] - Path derivation and environment helpers

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod cli;
pub mod config;
pub mod hypervisor;
pub mod provision;
pub mod utils;

pub use error::*;
