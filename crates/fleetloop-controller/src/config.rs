//! Controller configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `fleetloop.toml` in the working directory, then `FLEETLOOP__*`
//! environment variables (e.g. `FLEETLOOP__ACTUATOR__DRY_RUN=true`).

use anyhow::Result;
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use fleetloop_actuator::ActuatorCommand;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base name of the optional configuration file
pub const CONFIG_FILE: &str = "fleetloop";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FLEETLOOP";

/// Controller configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub actuator: ActuatorSettings,
    pub control: ControlSettings,
}

impl ControllerConfig {
    /// Load configuration from `.env`, `fleetloop.toml` and the environment
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let cfg = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    /// Parse a TOML document layered over the defaults
    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg = Self::defaults()?
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder().add_source(Config::try_from(&Self::default())?))
    }
}

/// Actuation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorSettings {
    /// Interpreter for the actuator script; unset runs the script directly
    pub interpreter: Option<String>,
    /// Script invoked as `<script> <alias> <value>`
    pub script: String,
    /// Log changes instead of applying them
    pub dry_run: bool,
    /// Per-change timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ActuatorSettings {
    fn default() -> Self {
        let command = ActuatorCommand::default();
        Self {
            interpreter: command.interpreter,
            script: command.script,
            dry_run: false,
            timeout_ms: 30_000,
        }
    }
}

impl ActuatorSettings {
    pub fn command(&self) -> ActuatorCommand {
        ActuatorCommand {
            interpreter: self.interpreter.clone(),
            script: self.script.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Control loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlSettings {
    /// Interval between commit/observe ticks in milliseconds
    pub tick_interval_ms: u64,
    /// JSON topology loaded at startup
    pub topology_path: Option<String>,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10_000,
            topology_path: None,
        }
    }
}

impl ControlSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
