//! Process management - find and terminate processes by name.

use super::{OsError, OsResult};
use sysinfo::System;
use tokio::process::Command;
use tokio::task;

/// Collect the PIDs of processes whose name contains `needle` (case-insensitive).
async fn find_pids(needle: String) -> OsResult<Vec<u32>> {
    task::spawn_blocking(move || {
        let mut system = System::new_all();
        system.refresh_all();

        let pids: Vec<u32> = system
            .processes()
            .iter()
            .filter(|(_, process)| process.name().to_lowercase().contains(&needle))
            .map(|(pid, _)| pid.as_u32())
            .collect();

        Ok(pids)
    })
    .await
    .map_err(|e| OsError::OperationFailed(e.to_string()))?
}

/// Kill a process by PID
pub async fn kill(pid: u32) -> OsResult<()> {
    let output = Command::new("kill")
        .args(["-9", &pid.to_string()])
        .output()
        .await?;

    if !output.status.success() {
        return Err(OsError::OperationFailed(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    Ok(())
}

/// Kill every process whose name matches `app`; returns how many were signalled.
pub async fn kill_by_name(app: &str) -> OsResult<usize> {
    let needle = app.trim().to_lowercase();
    if needle.is_empty() {
        return Err(OsError::InvalidArgument("app cannot be empty".to_string()));
    }

    let pids = find_pids(needle).await?;
    if pids.is_empty() {
        return Err(OsError::NotFound(format!(
            "no running process matching '{app}'"
        )));
    }

    let mut killed = 0usize;
    for pid in pids {
        if kill(pid).await.is_ok() {
            killed += 1;
        }
    }

    if killed == 0 {
        return Err(OsError::OperationFailed(format!(
            "found processes matching '{app}' but could not signal any"
        )));
    }
    Ok(killed)
}
