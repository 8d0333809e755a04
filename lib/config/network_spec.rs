use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::VirtcoreError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The network attachment for a VM, following the descriptor generator's
/// `--network` convention.
///
/// ## Format
/// Exactly two forms are recognized:
/// - `bridge=<name>` - attach to a host bridge interface (e.g. "bridge=br0")
/// - `network=<name>` - attach to a managed virtual network (e.g. "network=default")
///
/// Anything else fails to parse, so an unrecognized attachment can never
/// reach the external toolchain.
///
/// ## Examples
///
/// ```
/// use virtcore::config::NetworkSpec;
///
/// let bridge = "bridge=br0".parse::<NetworkSpec>().unwrap();
/// assert_eq!(bridge, NetworkSpec::with_bridge("br0"));
///
/// let pool = "network=default".parse::<NetworkSpec>().unwrap();
/// assert_eq!(pool.to_string(), "network=default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkSpec {
    /// A host-level bridge interface attached directly to the VM's NIC.
    Bridge(String),

    /// A hypervisor-managed virtual network with its own NAT/DHCP.
    Network(String),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl NetworkSpec {
    /// Creates a new `NetworkSpec` attached to a host bridge.
    pub fn with_bridge(name: impl Into<String>) -> Self {
        Self::Bridge(name.into())
    }

    /// Creates a new `NetworkSpec` attached to a managed virtual network.
    pub fn with_network(name: impl Into<String>) -> Self {
        Self::Network(name.into())
    }

    /// Returns the bridge or network name.
    pub fn get_name(&self) -> &str {
        match self {
            Self::Bridge(name) | Self::Network(name) => name,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for NetworkSpec {
    /// Returns the default attachment, the `default` managed network.
    fn default() -> Self {
        Self::Network("default".to_string())
    }
}

impl FromStr for NetworkSpec {
    type Err = VirtcoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, name)) = s.split_once('=') else {
            return Err(VirtcoreError::InvalidNetworkSpec(s.to_string()));
        };

        if name.is_empty() {
            return Err(VirtcoreError::InvalidNetworkSpec(s.to_string()));
        }

        match kind {
            "bridge" => Ok(Self::Bridge(name.to_string())),
            "network" => Ok(Self::Network(name.to_string())),
            _ => Err(VirtcoreError::InvalidNetworkSpec(s.to_string())),
        }
    }
}

impl fmt::Display for NetworkSpec {
    /// Formats the attachment in the `--network` argument form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bridge(name) => write!(f, "bridge={}", name),
            Self::Network(name) => write!(f, "network={}", name),
        }
    }
}

impl Serialize for NetworkSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NetworkSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
