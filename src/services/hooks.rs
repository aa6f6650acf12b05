//! Finish hook execution

use tokio::process::Command;
use tracing::{debug, info};

/// Run a shell command once a countdown finishes
pub async fn run_finish_hook(command: &str) -> Result<(), String> {
    debug!("Running finish hook: {}", command);

    let output = Command::new("sh")
        .args(["-c", command])
        .output()
        .await
        .map_err(|e| format!("Failed to execute finish hook: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("finish hook exited with {}: {}", output.status, stderr.trim()));
    }

    info!("Finish hook completed");
    Ok(())
}
