use std::path::PathBuf;

use clap::Parser;

use crate::config::{DiskSize, NetworkSpec, DEFAULT_MEMORY_MIB, DEFAULT_NUM_VCPUS};

use super::styles;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Virtcore CLI - provisions a libvirt domain with a freshly allocated qcow2 disk
#[derive(Debug, Parser)]
#[command(name = "virtcore", author, about, version, styles=styles::styles())]
pub struct VirtcoreArgs {
    /// Name of the VM to provision
    #[arg(value_name = "VM_NAME")]
    pub name: String,

    /// Size of the virtual disk (e.g. '20G')
    #[arg(short, long, default_value_t = DiskSize::default())]
    pub size: DiskSize,

    /// Memory in MiB
    #[arg(short, long, default_value_t = DEFAULT_MEMORY_MIB)]
    pub memory: u32,

    /// Number of virtual CPUs
    #[arg(long, default_value_t = DEFAULT_NUM_VCPUS)]
    pub vcpus: u8,

    /// Network configuration: 'bridge=BRIDGE' or 'network=NAME'
    #[arg(short, long, default_value_t = NetworkSpec::default())]
    pub network: NetworkSpec,

    /// Directory where disk images are allocated
    #[arg(long, value_name = "DIR")]
    pub image_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
