//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The default number of vCPUs to give a new VM.
pub const DEFAULT_NUM_VCPUS: u8 = 1;

/// The default amount of memory in MiB to give a new VM.
pub const DEFAULT_MEMORY_MIB: u32 = 1024;
