// src/job/shell.rs

//! Shell-command job.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::model::JobConfig;
use crate::job::{Job, JobFuture};

/// Runs `cmd` through the platform shell, then each `validate` command.
///
/// A non-zero exit of `cmd` is a job error. A non-zero exit of a validation
/// command is collected as a validation failure.
#[derive(Debug, Clone)]
pub struct ShellJob {
    name: String,
    cmd: String,
    validate: Vec<String>,
}

impl ShellJob {
    pub fn new(name: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cmd: cmd.into(),
            validate: Vec::new(),
        }
    }

    pub fn from_config(name: &str, cfg: &JobConfig) -> Self {
        Self {
            name: name.to_string(),
            cmd: cfg.cmd.clone(),
            validate: cfg.validate.clone(),
        }
    }

    pub fn with_validation(mut self, cmd: impl Into<String>) -> Self {
        self.validate.push(cmd.into());
        self
    }
}

impl Job for ShellJob {
    fn run(&self) -> JobFuture {
        let job = self.clone();
        Box::pin(async move { job.run_inner().await })
    }
}

impl ShellJob {
    async fn run_inner(self) -> Result<Vec<String>> {
        info!(job = %self.name, cmd = %self.cmd, "starting job process");

        let code = run_shell(&self.name, &self.cmd).await?;
        if code != 0 {
            bail!("command `{}` exited with code {}", self.cmd, code);
        }

        let mut failures = Vec::new();
        for check in &self.validate {
            let code = run_shell(&self.name, check).await?;
            debug!(job = %self.name, check = %check, exit_code = code, "validation finished");
            if code != 0 {
                failures.push(format!("`{check}` exited with code {code}"));
            }
        }

        info!(
            job = %self.name,
            validation_failures = failures.len(),
            "job process finished"
        );
        Ok(failures)
    }
}

/// Run one shell command to completion and return its exit code (`-1` when
/// terminated by a signal).
async fn run_shell(job: &str, command: &str) -> Result<i32> {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for job '{job}'"))?;

    let readers = forward_output(job, &mut child);

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of job '{job}'"))?;

    // Every line is logged before the job's result is reported.
    for reader in readers {
        if let Err(err) = reader.await {
            warn!(job = %job, error = %err, "output reader did not finish");
        }
    }

    Ok(status.code().unwrap_or(-1))
}

/// Drain stdout/stderr into the log so pipes never fill up.
fn forward_output(job: &str, child: &mut Child) -> Vec<JoinHandle<()>> {
    let mut readers = Vec::with_capacity(2);

    if let Some(stdout) = child.stdout.take() {
        let job = job.to_string();
        readers.push(tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(job = %job, "stdout: {}", line);
            }
        }));
    }

    if let Some(stderr) = child.stderr.take() {
        let job = job.to_string();
        readers.push(tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(job = %job, "stderr: {}", line);
            }
        }));
    }

    readers
}
