// src/runner.rs

//! `ToolRunner`: the entry point host programs use to drive `whitebox_tools`.
//!
//! A runner owns its configuration (executable location, `--wd` override,
//! verbosity) and a [`CancelFlag`]. Use one runner per concurrent invocation;
//! a single runner streams one child at a time.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::{ConfigFile, default_config_path, load_and_validate};
use crate::errors::Result;
use crate::exec::args::{CommandLine, InfoFlag};
use crate::exec::cancel::CancelFlag;
use crate::exec::locate::{EXE_STEM, executable_file_name, resolve_exe_dir};
use crate::exec::process::{EXIT_LOCAL_ERROR, Invocation, stream_output};

/// Sink for the informational operations (`help`, `version`, ...).
pub type Echo = Arc<dyn Fn(&str) + Send + Sync>;

/// Default line callback: write the line to stdout.
pub fn print_line(line: &str) {
    println!("{line}");
}

pub struct ToolRunner {
    exe_dir: PathBuf,
    exe_stem: String,
    exe_path: PathBuf,
    working_dir: String,
    verbose: bool,
    cancel: CancelFlag,
    echo: Echo,
}

impl ToolRunner {
    /// Create a runner, resolving the executable directory from `explicit`,
    /// then `WHITEBOX_TOOLS_BUILD`, then `target/release`.
    ///
    /// Verbose mode is on and no working directory is set.
    pub fn new(explicit: Option<&Path>) -> Result<Self> {
        let exe_dir = resolve_exe_dir(explicit)?;
        let exe_stem = EXE_STEM.to_string();
        let exe_path = exe_dir.join(executable_file_name(&exe_stem));

        Ok(Self {
            exe_dir,
            exe_stem,
            exe_path,
            working_dir: String::new(),
            verbose: true,
            cancel: CancelFlag::new(),
            echo: Arc::new(print_line),
        })
    }

    /// Create a runner from a loaded `[runner]` config section.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let mut runner = Self::new(cfg.runner.exe_dir.as_deref())?;
        if let Some(name) = &cfg.runner.exe_name {
            runner.set_executable_name(name);
        }
        runner.set_working_directory(cfg.runner.working_dir.clone());
        runner.set_verbose(cfg.runner.verbose);
        Ok(runner)
    }

    /// Load and validate the file named by [`default_config_path`], then
    /// build the runner from it.
    pub fn from_default_config() -> Result<Self> {
        let path = default_config_path();
        debug!(path = %path.display(), "loading runner config");
        Self::from_config(&load_and_validate(&path)?)
    }

    /// Re-resolve the executable directory. On failure the previous
    /// location is kept.
    pub fn set_executable_directory(&mut self, explicit: Option<&Path>) -> Result<()> {
        self.exe_dir = resolve_exe_dir(explicit)?;
        self.exe_path = self.exe_dir.join(executable_file_name(&self.exe_stem));
        info!(exe = %self.exe_path.display(), "whitebox_tools executable set");
        Ok(())
    }

    /// Change the executable's file stem (the platform suffix is added).
    pub fn set_executable_name(&mut self, stem: &str) {
        self.exe_stem = stem.to_string();
        self.exe_path = self.exe_dir.join(executable_file_name(stem));
    }

    /// Directory passed to tools as `--wd`; blank disables the flag.
    pub fn set_working_directory(&mut self, path: impl Into<String>) {
        self.working_dir = path.into();
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Replace the callback used by the informational operations.
    pub fn set_echo<F>(&mut self, echo: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.echo = Arc::new(echo);
    }

    pub fn exe_dir(&self) -> &Path {
        &self.exe_dir
    }

    pub fn exe_path(&self) -> &Path {
        &self.exe_path
    }

    pub fn working_directory(&self) -> &str {
        &self.working_dir
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Handle that cancels this runner's in-flight invocation.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// The command line `run_tool` would spawn.
    pub fn tool_command<S: AsRef<str>>(&self, tool_name: &str, extra_args: &[S]) -> CommandLine {
        CommandLine::run_tool(
            &self.exe_path,
            tool_name,
            &self.working_dir,
            extra_args,
            self.verbose,
        )
    }

    /// Run a tool, returning the full [`Invocation`] or the error that
    /// prevented it.
    pub async fn try_run_tool<S, F>(
        &self,
        tool_name: &str,
        extra_args: &[S],
        mut on_line: F,
    ) -> Result<Invocation>
    where
        S: AsRef<str>,
        F: FnMut(&str) + Send,
    {
        let cmd = self.tool_command(tool_name, extra_args);
        info!(tool = tool_name, "running whitebox tool");
        stream_output(&cmd, &self.exe_dir, &self.cancel, false, &mut on_line).await
    }

    /// Run a tool and return its exit code.
    ///
    /// Returns 0 on success, 2 when cancelled, 1 when the process could not
    /// be run (the error text is sent to `on_line`), or the tool's own
    /// nonzero exit code.
    pub async fn run_tool<S, F>(&self, tool_name: &str, extra_args: &[S], mut on_line: F) -> i32
    where
        S: AsRef<str>,
        F: FnMut(&str) + Send,
    {
        match self.try_run_tool(tool_name, extra_args, &mut on_line).await {
            Ok(invocation) => invocation.exit_code,
            Err(err) => {
                error!(tool = tool_name, error = %err, "whitebox tool invocation failed");
                on_line(&err.to_string());
                EXIT_LOCAL_ERROR
            }
        }
    }

    /// Output of `whitebox_tools -h`.
    pub async fn help(&self) -> Result<Vec<String>> {
        self.run_info(InfoFlag::Help, false).await
    }

    /// Output of `whitebox_tools --license`.
    pub async fn license(&self) -> Result<Vec<String>> {
        self.run_info(InfoFlag::License, false).await
    }

    /// Output of `whitebox_tools --version`.
    pub async fn version(&self) -> Result<Vec<String>> {
        self.run_info(InfoFlag::Version, false).await
    }

    /// Output of `whitebox_tools --listtools`.
    pub async fn list_tools(&self) -> Result<Vec<String>> {
        self.run_info(InfoFlag::ListTools, false).await
    }

    /// Output of `whitebox_tools --toolhelp=<tool>`. With `silent`, nothing
    /// is echoed but the lines are still returned.
    pub async fn tool_help(&self, tool_name: &str, silent: bool) -> Result<Vec<String>> {
        self.run_info(InfoFlag::ToolHelp(tool_name.to_string()), silent)
            .await
    }

    async fn run_info(&self, flag: InfoFlag, silent: bool) -> Result<Vec<String>> {
        let cmd = CommandLine::info(&self.exe_path, &flag);
        let echo = Arc::clone(&self.echo);
        let mut on_line = move |line: &str| echo(line);

        let invocation = stream_output(&cmd, &self.exe_dir, &self.cancel, silent, &mut on_line)
            .await
            .inspect_err(|err| error!(flag = %flag, error = %err, "whitebox_tools query failed"))?;
        Ok(invocation.lines)
    }
}

impl fmt::Debug for ToolRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRunner")
            .field("exe_dir", &self.exe_dir)
            .field("exe_path", &self.exe_path)
            .field("working_dir", &self.working_dir)
            .field("verbose", &self.verbose)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerSection;
    use tempfile::TempDir;

    fn runner_in(dir: &TempDir) -> ToolRunner {
        ToolRunner::new(Some(dir.path())).unwrap()
    }

    #[test]
    fn new_runner_defaults() {
        let dir = TempDir::new().unwrap();
        let runner = runner_in(&dir);

        assert_eq!(runner.exe_dir(), dir.path());
        assert_eq!(
            runner.exe_path(),
            dir.path().join(executable_file_name("whitebox_tools"))
        );
        assert!(runner.verbose());
        assert_eq!(runner.working_directory(), "");
        assert!(!runner.cancel_flag().is_cancelled());
    }

    #[test]
    fn tool_command_reflects_setters() {
        let dir = TempDir::new().unwrap();
        let mut runner = runner_in(&dir);

        let cmd = runner.tool_command("Slope", &["--dem=dem.tif"]);
        assert_eq!(cmd.args, vec!["--run=\"Slope\"", "--dem=dem.tif", "-v"]);

        runner.set_verbose(false);
        runner.set_working_directory("/data");
        let cmd = runner.tool_command("Slope", &["--dem=dem.tif"]);
        assert_eq!(cmd.args, vec!["--run=\"Slope\"", "--wd=\"/data\"", "--dem=dem.tif"]);

        runner.set_working_directory("");
        let cmd = runner.tool_command::<&str>("Slope", &[]);
        assert_eq!(cmd.args, vec!["--run=\"Slope\""]);
    }

    #[test]
    fn reresolution_moves_the_executable_path() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let mut runner = runner_in(&first);
        runner.set_executable_name("wbt");

        runner.set_executable_directory(Some(second.path())).unwrap();

        assert_eq!(runner.exe_dir(), second.path());
        assert_eq!(runner.exe_path(), second.path().join(executable_file_name("wbt")));
    }

    #[test]
    fn from_config_applies_runner_section() {
        let dir = TempDir::new().unwrap();
        let cfg = ConfigFile {
            runner: RunnerSection {
                exe_dir: Some(dir.path().to_path_buf()),
                exe_name: Some("wbt".to_string()),
                working_dir: "/data/dem".to_string(),
                verbose: false,
            },
            ..ConfigFile::default()
        };

        let runner = ToolRunner::from_config(&cfg).unwrap();

        assert_eq!(runner.exe_path(), dir.path().join(executable_file_name("wbt")));
        assert_eq!(runner.working_directory(), "/data/dem");
        assert!(!runner.verbose());
    }
}
