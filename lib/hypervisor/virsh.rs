use std::process::Stdio;

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};

use crate::{VirtcoreError, VirtcoreResult};

use super::DomainRegistrar;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const VIRSH_BIN: &str = "virsh";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Domain registrar backed by the `virsh` client.
///
/// Runs `virsh define /dev/stdin` and streams the descriptor over the child's
/// standard input, so no descriptor artifact is ever left on disk. Defining
/// an unchanged descriptor again is safe at the daemon level; a conflicting
/// duplicate name surfaces verbatim as a registration error.
#[derive(Debug, Clone, Default)]
pub struct Virsh;

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl DomainRegistrar for Virsh {
    fn required_tools(&self) -> &[&'static str] {
        &[VIRSH_BIN]
    }

    async fn define(&self, descriptor: &str) -> VirtcoreResult<()> {
        let mut child = Command::new(VIRSH_BIN)
            .arg("define")
            .arg("/dev/stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A step timeout drops this future; the child must not outlive it.
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                VirtcoreError::Registration(format!("failed to spawn {}: {}", VIRSH_BIN, e))
            })?;

        // Write the descriptor and close stdin so virsh sees EOF.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(descriptor.as_bytes()).await.map_err(|e| {
                VirtcoreError::Registration(format!("failed to stream descriptor: {}", e))
            })?;
        }

        let output = child.wait_with_output().await.map_err(|e| {
            VirtcoreError::Registration(format!("failed to wait for {}: {}", VIRSH_BIN, e))
        })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let combined = format!("{}{}", stdout, stderr);
            return Err(VirtcoreError::Registration(combined.trim().to_string()));
        }

        tracing::info!("domain defined with the hypervisor daemon");

        Ok(())
    }
}
