//! External command execution
//!
//! [`CommandRunner`] is the seam between the actuator and the host. The
//! default [`ProcessRunner`] spawns a child process whose handle is released
//! on every path: a failed spawn leaves nothing behind, and a dropped future
//! (e.g. on caller timeout) kills the child.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// One external command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs one invocation to completion.
///
/// Only a failure to launch is an error; the exit status is not judged.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<()>;
}

/// Runner backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<()> {
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        match child.wait().await {
            Ok(status) => debug!(command = %invocation, %status, "Actuator command exited"),
            Err(err) => warn!(command = %invocation, %err, "Lost track of actuator command"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let invocation = Invocation {
            program: "/bin/sh".into(),
            args: vec!["actuate.sh".into(), "vm-1-mem".into(), "2048".into()],
        };
        assert_eq!(invocation.to_string(), "/bin/sh actuate.sh vm-1-mem 2048");
    }

    #[tokio::test]
    async fn test_launch_failure_is_error() {
        let invocation = Invocation {
            program: "/nonexistent/fleetloop/actuator.sh".into(),
            args: vec!["vm-1-mem".into(), "2048".into()],
        };
        assert!(ProcessRunner.run(&invocation).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_not_judged() {
        let invocation = Invocation {
            program: "false".into(),
            args: vec![],
        };
        assert!(ProcessRunner.run(&invocation).await.is_ok());
    }
}
