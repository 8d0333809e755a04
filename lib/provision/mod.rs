//! VM provisioning lifecycle: disk allocation, descriptor generation,
//! registration, and rollback-on-failure.

mod attempt;
mod disk;
mod orchestrator;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use attempt::*;
pub use disk::*;
pub use orchestrator::*;
