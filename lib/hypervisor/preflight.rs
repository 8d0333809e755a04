use crate::{VirtcoreError, VirtcoreResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Verifies that every named binary resolves on the search path.
///
/// Read-only probe with no side effects. Returns the first missing tool as a
/// [`VirtcoreError::MissingTool`]; no partial operation is attempted.
pub fn check_tools<'a>(tools: impl IntoIterator<Item = &'a str>) -> VirtcoreResult<()> {
    for tool in tools {
        match which::which(tool) {
            Ok(path) => tracing::debug!("found required tool {} at {}", tool, path.display()),
            Err(_) => return Err(VirtcoreError::MissingTool(tool.to_string())),
        }
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
