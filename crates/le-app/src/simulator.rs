//! The external simulator process.

use std::path::{Path, PathBuf};
use std::process::Command;

use le_project::SimulatorDef;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// One blocking invocation of the simulator inside a prepared working
/// directory. Outputs are picked up from the file system afterwards.
pub trait Simulator {
    fn run(&mut self, working_dir: &Path) -> AppResult<()>;
}

/// Runs the configured executable as a child process.
#[derive(Debug, Clone)]
pub struct ProcessSimulator {
    executable: PathBuf,
    args: Vec<String>,
}

impl ProcessSimulator {
    pub fn new(executable: PathBuf, args: Vec<String>) -> Self {
        Self { executable, args }
    }

    /// The executable path is resolved against the configuration directory.
    pub fn from_def(def: &SimulatorDef, config_path: &Path) -> Self {
        let executable = if def.executable.components().count() > 1 {
            le_project::RunConfig::resolve(config_path, &def.executable)
        } else {
            // Bare names are looked up on PATH.
            def.executable.clone()
        };
        Self::new(executable, def.args.clone())
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl Simulator for ProcessSimulator {
    fn run(&mut self, working_dir: &Path) -> AppResult<()> {
        info!(
            executable = %self.executable.display(),
            dir = %working_dir.display(),
            "starting simulator"
        );
        let output = Command::new(&self.executable)
            .args(&self.args)
            .current_dir(working_dir)
            .output()
            .map_err(|e| {
                AppError::Simulator(format!(
                    "failed to start {}: {e}",
                    self.executable.display()
                ))
            })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(target: "le_app::simulator::stdout", "{line}");
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!(target: "le_app::simulator::stderr", "{line}");
        }

        if !output.status.success() {
            return Err(AppError::Simulator(format!(
                "{} exited with {}",
                self.executable.display(),
                output.status
            )));
        }
        Ok(())
    }
}
