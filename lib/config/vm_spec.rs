use getset::Getters;
use serde::{Deserialize, Serialize};

use crate::{InvalidVmSpecError, VirtcoreResult};

use super::{DiskSize, NetworkSpec, DEFAULT_MEMORY_MIB, DEFAULT_NUM_VCPUS};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A declarative specification of the VM to provision.
///
/// Immutable once built - [`VmSpecBuilder::build`] validates the spec, so a
/// `VmSpec` in hand always describes a provisionable VM.
///
/// ## Examples
///
/// ```
/// use virtcore::config::{NetworkSpec, VmSpec};
///
/// # fn main() -> anyhow::Result<()> {
/// let spec = VmSpec::builder()
///     .name("testvm1")
///     .disk_size("10G".parse()?)
///     .memory_mib(2048)
///     .num_vcpus(2)
///     .network(NetworkSpec::with_bridge("br0"))
///     .build()?;
///
/// assert_eq!(spec.get_name(), "testvm1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct VmSpec {
    /// The domain name the VM is registered under.
    #[get = "pub with_prefix"]
    name: String,

    /// The virtual capacity of the VM's disk image.
    #[get = "pub with_prefix"]
    disk_size: DiskSize,

    /// The amount of memory in MiB to give the VM.
    #[get = "pub with_prefix"]
    memory_mib: u32,

    /// The number of virtual CPUs to give the VM.
    #[get = "pub with_prefix"]
    num_vcpus: u8,

    /// The network the VM's NIC attaches to.
    #[get = "pub with_prefix"]
    network: NetworkSpec,
}

/// The builder for a [`VmSpec`].
///
/// ## Required Fields
/// - `name`: The domain name for the VM.
///
/// ## Optional Fields
/// - `disk_size`: The virtual disk capacity (default 20G).
/// - `memory_mib`: The amount of memory in MiB (default 1024).
/// - `num_vcpus`: The number of virtual CPUs (default 1).
/// - `network`: The network attachment (default `network=default`).
#[derive(Debug)]
pub struct VmSpecBuilder<N> {
    name: N,
    disk_size: DiskSize,
    memory_mib: u32,
    num_vcpus: u8,
    network: NetworkSpec,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl VmSpec {
    /// Creates a builder for a `VmSpec`.
    pub fn builder() -> VmSpecBuilder<()> {
        VmSpecBuilder::default()
    }

    /// Validates the spec.
    ///
    /// The name must be non-empty and use only characters legal in a
    /// hypervisor domain name (`[A-Za-z0-9._-]`); memory and vCPU counts must
    /// be positive. Disk size positivity is enforced by [`DiskSize`] itself.
    pub fn validate(&self) -> VirtcoreResult<()> {
        if self.name.is_empty() {
            return Err(InvalidVmSpecError::NameEmpty.into());
        }

        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(InvalidVmSpecError::NameInvalidCharacters(self.name.clone()).into());
        }

        if self.memory_mib == 0 {
            return Err(InvalidVmSpecError::MemoryIsZero.into());
        }

        if self.num_vcpus == 0 {
            return Err(InvalidVmSpecError::VcpusIsZero.into());
        }

        Ok(())
    }
}

impl VmSpecBuilder<()> {
    /// Sets the domain name for the VM.
    pub fn name(self, name: impl Into<String>) -> VmSpecBuilder<String> {
        VmSpecBuilder {
            name: name.into(),
            disk_size: self.disk_size,
            memory_mib: self.memory_mib,
            num_vcpus: self.num_vcpus,
            network: self.network,
        }
    }
}

impl<N> VmSpecBuilder<N> {
    /// Sets the virtual capacity of the VM's disk image.
    pub fn disk_size(mut self, disk_size: DiskSize) -> Self {
        self.disk_size = disk_size;
        self
    }

    /// Sets the amount of memory in MiB.
    pub fn memory_mib(mut self, memory_mib: u32) -> Self {
        self.memory_mib = memory_mib;
        self
    }

    /// Sets the number of virtual CPUs.
    pub fn num_vcpus(mut self, num_vcpus: u8) -> Self {
        self.num_vcpus = num_vcpus;
        self
    }

    /// Sets the network attachment.
    pub fn network(mut self, network: NetworkSpec) -> Self {
        self.network = network;
        self
    }
}

impl VmSpecBuilder<String> {
    /// Builds and validates the `VmSpec`.
    pub fn build(self) -> VirtcoreResult<VmSpec> {
        let spec = VmSpec {
            name: self.name,
            disk_size: self.disk_size,
            memory_mib: self.memory_mib,
            num_vcpus: self.num_vcpus,
            network: self.network,
        };

        spec.validate()?;

        Ok(spec)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for VmSpecBuilder<()> {
    fn default() -> Self {
        Self {
            name: (),
            disk_size: DiskSize::default(),
            memory_mib: DEFAULT_MEMORY_MIB,
            num_vcpus: DEFAULT_NUM_VCPUS,
            network: NetworkSpec::default(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
