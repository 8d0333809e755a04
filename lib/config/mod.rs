//! VM specification types and validation.

mod defaults;
mod disk_size;
mod network_spec;
mod vm_spec;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use defaults::*;
pub use disk_size::*;
pub use network_spec::*;
pub use vm_spec::*;
