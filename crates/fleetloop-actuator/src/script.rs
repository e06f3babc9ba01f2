//! Script-backed actuator
//!
//! Invokes `<script> <alias> <value>` once per change, optionally through an
//! interpreter. In dry-run mode the intended change is logged and nothing is
//! spawned.

use async_trait::async_trait;
use fleetloop_common::ActuationError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::runner::{CommandRunner, Invocation, ProcessRunner};
use crate::Actuator;

/// Host command used to change a primitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    /// Interpreter to run the script with, e.g. `/bin/sh`
    pub interpreter: Option<String>,
    /// Script (or executable) receiving `<alias> <value>`
    pub script: String,
}

impl Default for ActuatorCommand {
    fn default() -> Self {
        Self {
            interpreter: Some("/bin/sh".to_string()),
            script: "/opt/fleetloop/actuator/memory_actuator.sh".to_string(),
        }
    }
}

impl ActuatorCommand {
    pub fn invocation(&self, alias: &str, value: i64) -> Invocation {
        let mut args = Vec::with_capacity(3);
        let program = match &self.interpreter {
            Some(interpreter) => {
                args.push(self.script.clone());
                interpreter.clone()
            }
            None => self.script.clone(),
        };
        args.push(alias.to_string());
        args.push(value.to_string());
        Invocation { program, args }
    }
}

/// What a successful call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuationOutcome {
    /// Command launched and ran
    Launched,
    /// Dry run; change only logged
    DryRun,
}

/// Actuator shelling out to a host script
pub struct ScriptActuator<R = ProcessRunner> {
    command: ActuatorCommand,
    dry_run: bool,
    runner: R,
}

impl ScriptActuator<ProcessRunner> {
    pub fn new(command: ActuatorCommand, dry_run: bool) -> Self {
        Self::with_runner(command, dry_run, ProcessRunner)
    }
}

impl<R: CommandRunner> ScriptActuator<R> {
    pub fn with_runner(command: ActuatorCommand, dry_run: bool, runner: R) -> Self {
        Self {
            command,
            dry_run,
            runner,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn command(&self) -> &ActuatorCommand {
        &self.command
    }

    /// Apply the first of `values` to `alias`, reporting why it failed
    #[instrument(skip(self))]
    pub async fn try_execute(&self, alias: &str, values: &[i64]) -> Result<ActuationOutcome, ActuationError> {
        let value = *values.first().ok_or_else(|| ActuationError::NoValue {
            alias: alias.to_string(),
        })?;
        if values.len() > 1 {
            debug!(ignored = values.len() - 1, "Only the first value is forwarded");
        }

        if self.dry_run {
            info!(alias, value, "Dry run: primitive change not applied");
            return Ok(ActuationOutcome::DryRun);
        }

        let invocation = self.command.invocation(alias, value);
        self.runner
            .run(&invocation)
            .await
            .map_err(|source| ActuationError::Launch {
                alias: alias.to_string(),
                source,
            })?;

        debug!(command = %invocation, "Applied primitive change");
        Ok(ActuationOutcome::Launched)
    }
}

#[async_trait]
impl<R: CommandRunner> Actuator for ScriptActuator<R> {
    async fn execute(&self, alias: &str, values: &[i64]) -> bool {
        match self.try_execute(alias, values).await {
            Ok(_) => true,
            Err(err) => {
                warn!(%err, "Actuation failed");
                false
            }
        }
    }
}
