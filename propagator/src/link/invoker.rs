//! Run the external tool that establishes a single link.

use crate::link::{ContractNames, LinkTask};
use std::{fmt, future::Future, io};
use tokio::process::Command;
use tracing::{debug, warn};

/// A fully-resolved external command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Executes a [CommandSpec] and waits for it to exit.
pub trait Runner {
    /// Runs `spec` to completion and returns its exit code.
    ///
    /// Returns `Ok(None)` if the process terminated without an exit code (e.g. it was
    /// killed by a signal) and `Err` if it could not be launched at all.
    fn run(&mut self, spec: &CommandSpec) -> impl Future<Output = io::Result<Option<i32>>>;
}

/// [Runner] that spawns a child process, inheriting stdio.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellRunner;

impl Runner for ShellRunner {
    async fn run(&mut self, spec: &CommandSpec) -> io::Result<Option<i32>> {
        let status = Command::new(&spec.program)
            .args(&spec.args)
            .status()
            .await?;
        Ok(status.code())
    }
}

/// Outcome of a single link attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvocationResult {
    /// `None` if the tool failed to launch or exited without a code.
    pub exit_code: Option<i32>,
    pub succeeded: bool,
}

/// Translates [LinkTask]s into invocations of the external tool.
pub struct Invoker<R: Runner> {
    tool: String,
    subcommand: String,
    runner: R,
}

impl<R: Runner> Invoker<R> {
    pub fn new(tool: String, subcommand: String, runner: R) -> Self {
        Self {
            tool,
            subcommand,
            runner,
        }
    }

    /// Builds the command that establishes `task`, run in the context of the source network.
    pub fn command(&self, task: &LinkTask) -> CommandSpec {
        let mut args = vec![
            "--network".to_string(),
            task.source.clone(),
            self.subcommand.clone(),
            "--target-network".to_string(),
            task.target.clone(),
        ];
        match &task.contracts {
            ContractNames::Shared(contract) => {
                args.push("--contract".to_string());
                args.push(contract.clone());
            }
            ContractNames::Distinct { local, remote } => {
                args.push("--local-contract".to_string());
                args.push(local.clone());
                args.push("--remote-contract".to_string());
                args.push(remote.clone());
            }
        }
        CommandSpec {
            program: self.tool.clone(),
            args,
        }
    }

    /// Runs the command for `task` and waits for it to finish.
    ///
    /// Never fails: a tool that cannot be launched is reported as an unsuccessful
    /// [InvocationResult].
    pub async fn establish_link(&mut self, task: &LinkTask) -> InvocationResult {
        let spec = self.command(task);
        match self.runner.run(&spec).await {
            Ok(exit_code) => {
                debug!(command = %spec, ?exit_code, "command exited");
                InvocationResult {
                    exit_code,
                    succeeded: exit_code == Some(0),
                }
            }
            Err(err) => {
                warn!(command = %spec, error = ?err, "failed to launch command");
                InvocationResult {
                    exit_code: None,
                    succeeded: false,
                }
            }
        }
    }

    /// Returns the underlying [Runner].
    pub fn runner(&self) -> &R {
        &self.runner
    }
}
