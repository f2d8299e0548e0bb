//! MSBuild invocation for the editor solution.
//!
//! Each build target runs
//! `<tool> <solution> /p:Configuration=<config>;Platform=<platform> /m`
//! with the extended search path set on the child process. Output is echoed
//! to the console as it arrives and also kept on the outcome, which is
//! returned to the caller. The caller decides whether a failed target stops the
//! run before anything gets packaged.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use crate::config::{Configuration, MsBuildSettings};
use crate::layout::resolve_path;

/// One MSBuild run in the driver's target list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildTarget {
    pub name: String,
    /// Overrides `[msbuild].solution` for this target.
    #[serde(default)]
    pub solution: Option<PathBuf>,
}

impl BuildTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            solution: None,
        }
    }

    /// The engine, then the game executable. Both build the shared solution
    /// until the game gets a project of its own.
    pub fn defaults() -> Vec<Self> {
        vec![Self::new("engine"), Self::new("game")]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsBuildInvocation {
    pub target: String,
    pub program: PathBuf,
    pub solution: PathBuf,
    pub configuration: Configuration,
    pub platform: String,
    pub parallel: bool,
}

impl MsBuildInvocation {
    pub fn new(
        target: impl Into<String>,
        program: impl Into<PathBuf>,
        solution: impl Into<PathBuf>,
        configuration: Configuration,
        platform: impl Into<String>,
        parallel: bool,
    ) -> Self {
        Self {
            target: target.into(),
            program: program.into(),
            solution: solution.into(),
            configuration,
            platform: platform.into(),
            parallel,
        }
    }

    /// Invocation for `target`, resolving its solution against the scripts directory.
    pub fn for_target(
        target: &BuildTarget,
        program: &Path,
        scripts_dir: &Path,
        configuration: Configuration,
        settings: &MsBuildSettings,
    ) -> Self {
        let solution = target.solution.as_deref().unwrap_or(&settings.solution);
        Self::new(
            target.name.clone(),
            program,
            resolve_path(scripts_dir, solution),
            configuration,
            settings.platform.clone(),
            settings.parallel,
        )
    }

    pub fn properties(&self) -> String {
        format!(
            "/p:Configuration={};Platform={}",
            self.configuration, self.platform
        )
    }

    pub fn args(&self) -> Vec<OsString> {
        let mut args = vec![
            self.solution.clone().into_os_string(),
            OsString::from(self.properties()),
        ];
        if self.parallel {
            args.push(OsString::from("/m"));
        }
        args
    }

    pub fn command(&self, search_path: &OsStr) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args()).env("PATH", search_path);
        cmd
    }

    /// Run the build tool, echoing its output line by line while capturing it.
    pub fn run(&self, search_path: &OsStr) -> Result<BuildOutcome> {
        tracing::info!("[build:{}] {}", self.target, self);
        let mut child = self
            .command(search_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("running {} for target '{}'", self, self.target))?;

        let stdout = child.stdout.take().context("Failed to capture MSBuild stdout")?;
        let stderr = child.stderr.take().context("Failed to capture MSBuild stderr")?;
        let stdout = tee_lines(stdout, io::stdout);
        let stderr = tee_lines(stderr, io::stderr);

        let status = child
            .wait()
            .with_context(|| format!("waiting for MSBuild target '{}'", self.target))?;

        Ok(BuildOutcome {
            target: self.target.clone(),
            status,
            stdout: join_capture(stdout, "stdout")?,
            stderr: join_capture(stderr, "stderr")?,
        })
    }
}

impl fmt::Display for MsBuildInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in self.args() {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Copy `source` to `sink` as each line arrives and keep a copy of everything read.
fn tee_lines<R, W, F>(source: R, sink: F) -> JoinHandle<io::Result<String>>
where
    R: Read + Send + 'static,
    W: Write,
    F: FnOnce() -> W + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(source);
        let mut sink = sink();
        let mut captured = Vec::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            // Console echo is best effort; the captured copy is what callers see.
            let _ = sink.write_all(&line).and_then(|()| sink.flush());
            captured.extend_from_slice(&line);
        }
        Ok(String::from_utf8_lossy(&captured).into_owned())
    })
}

fn join_capture(handle: JoinHandle<io::Result<String>>, stream: &str) -> Result<String> {
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("MSBuild {stream} reader panicked"))?
        .with_context(|| format!("reading MSBuild {stream}"))
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub target: String,
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl BuildOutcome {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn ensure_success(&self) -> Result<()> {
        if self.success() {
            return Ok(());
        }
        bail!(
            "MSBuild failed for target '{}'\n  Exit code: {}\n  stderr: {}",
            self.target,
            self.status.code().unwrap_or(-1),
            self.stderr.trim()
        )
    }
}

/// Build every configured target in order.
///
/// With `fail_on_error` a failing target aborts the run. Without it the
/// failure is logged and the remaining targets still build.
pub fn build_targets(
    program: &Path,
    search_path: &OsStr,
    scripts_dir: &Path,
    configuration: Configuration,
    settings: &MsBuildSettings,
    fail_on_error: bool,
) -> Result<Vec<BuildOutcome>> {
    let mut outcomes = Vec::with_capacity(settings.targets.len());

    for target in &settings.targets {
        let invocation =
            MsBuildInvocation::for_target(target, program, scripts_dir, configuration, settings);
        let outcome = invocation.run(search_path)?;

        if outcome.success() {
            tracing::info!("[build:{}] succeeded", outcome.target);
        } else if fail_on_error {
            outcome.ensure_success()?;
        } else {
            tracing::warn!(
                "[build:{}] failed with status {}; continuing",
                outcome.target,
                outcome.status
            );
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
