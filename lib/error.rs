use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a virtcore-related operation.
pub type VirtcoreResult<T> = Result<T, VirtcoreError>;

/// An error that occurred while provisioning a virtual machine.
#[derive(Debug, Error)]
pub enum VirtcoreError {
    /// An I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A required external tool was not found on the search path.
    #[error("required command not found: {0}")]
    MissingTool(String),

    /// The directory that should hold the disk image does not exist.
    /// Storage directories are infrastructure and are never created here.
    #[error("image directory does not exist: {0}")]
    DirectoryMissing(String),

    /// The disk size did not parse to a positive byte quantity.
    #[error("invalid disk size: {0}")]
    InvalidSize(String),

    /// A disk image already exists at the derived path. Provisioning never
    /// overwrites an existing image.
    #[error("disk image already exists: {0}")]
    DiskAlreadyExists(String),

    /// The underlying image utility failed to allocate the disk image.
    #[error("failed to allocate disk image {path}: {message}")]
    DiskAllocation {
        /// The path the image was being allocated at.
        path: String,

        /// Captured diagnostics from the image utility.
        message: String,
    },

    /// The network attachment was not one of the recognized
    /// `bridge=<name>` / `network=<name>` forms.
    #[error("invalid network spec: {0}. use 'bridge=BRIDGE' or 'network=NAME'")]
    InvalidNetworkSpec(String),

    /// An error that occurred when an invalid VM specification was used.
    #[error("invalid vm spec: {0}")]
    InvalidVmSpec(#[from] InvalidVmSpecError),

    /// The external descriptor generator failed or produced no output.
    #[error("descriptor generation failed: {0}")]
    Descriptor(String),

    /// The hypervisor management daemon rejected the domain definition.
    #[error("domain registration failed: {0}")]
    Registration(String),

    /// A provisioning step exceeded the configured per-step timeout.
    #[error("{step} timed out after {secs}s")]
    StepTimeout {
        /// The step that timed out.
        step: &'static str,

        /// The configured limit in seconds.
        secs: u64,
    },
}

/// An error that occurred when an invalid VM specification was used.
#[derive(Debug, Error)]
pub enum InvalidVmSpecError {
    /// The VM name is empty.
    #[error("vm name is empty")]
    NameEmpty,

    /// The VM name is not a legal domain name.
    #[error("vm name contains characters outside [A-Za-z0-9._-]: {0}")]
    NameInvalidCharacters(String),

    /// The amount of memory is zero.
    #[error("amount of memory is zero")]
    MemoryIsZero,

    /// The number of vCPUs is zero.
    #[error("number of vCPUs is zero")]
    VcpusIsZero,
}
