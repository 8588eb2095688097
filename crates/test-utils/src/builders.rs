use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use whitebox_runner::ToolRunner;
use whitebox_runner::exec::{EXE_STEM, executable_file_name};

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Builder for a shell script that stands in for `whitebox_tools`.
///
/// The script is written into a fresh temp dir under the real executable
/// name, so a `ToolRunner` pointed at that dir spawns it like the real tool.
/// Unix only: the stub is a `/bin/sh` script.
pub struct StubTool {
    output: Vec<(Stream, String)>,
    echo_args: bool,
    echo_cwd: bool,
    linger_secs: Option<u32>,
    exit_code: i32,
}

impl StubTool {
    pub fn new() -> Self {
        Self {
            output: vec![],
            echo_args: false,
            echo_cwd: false,
            linger_secs: None,
            exit_code: 0,
        }
    }

    /// Print `line` on stdout. Lines are written in the order the builder
    /// calls are made, across both streams.
    pub fn prints(mut self, line: &str) -> Self {
        self.output.push((Stream::Stdout, line.to_string()));
        self
    }

    /// Print `line` on stderr.
    pub fn prints_err(mut self, line: &str) -> Self {
        self.output.push((Stream::Stderr, line.to_string()));
        self
    }

    /// Print every argument as `arg:<value>`, one per line.
    pub fn echo_args(mut self) -> Self {
        self.echo_args = true;
        self
    }

    /// Print the process working directory as `cwd:<path>`.
    pub fn echo_cwd(mut self) -> Self {
        self.echo_cwd = true;
        self
    }

    /// After printing, sleep and then print `late` and touch
    /// [`Stub::marker`]. A killed stub never creates the marker.
    pub fn linger(mut self, secs: u32) -> Self {
        self.linger_secs = Some(secs);
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn build(self) -> Result<Stub> {
        let dir = TempDir::new().context("creating stub dir")?;
        let exe = dir.path().join(executable_file_name(EXE_STEM));
        let marker = dir.path().join("finished.marker");

        let script = self.script(&marker);
        fs::write(&exe, script).with_context(|| format!("writing stub {}", exe.display()))?;
        make_executable(&exe)?;

        Ok(Stub { dir, exe, marker })
    }

    fn script(&self, marker: &Path) -> String {
        let mut s = String::from("#!/bin/sh\n");
        for (stream, line) in &self.output {
            let redirect = match stream {
                Stream::Stdout => "",
                Stream::Stderr => " 1>&2",
            };
            s.push_str(&format!("printf '%s\\n' {}{redirect}\n", sh_quote(line)));
        }
        if self.echo_args {
            s.push_str("for a in \"$@\"; do printf 'arg:%s\\n' \"$a\"; done\n");
        }
        if self.echo_cwd {
            s.push_str("printf 'cwd:%s\\n' \"$(pwd -P)\"\n");
        }
        if let Some(secs) = self.linger_secs {
            s.push_str(&format!("sleep {secs}\n"));
            s.push_str("printf 'late\\n'\n");
            s.push_str(&format!(": > {}\n", sh_quote(&marker.display().to_string())));
        }
        s.push_str(&format!("exit {}\n", self.exit_code));
        s
    }
}

impl Default for StubTool {
    fn default() -> Self {
        Self::new()
    }
}

/// A written stub executable. The temp dir lives as long as this value.
pub struct Stub {
    dir: TempDir,
    exe: PathBuf,
    marker: PathBuf,
}

impl Stub {
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    pub fn marker(&self) -> &Path {
        &self.marker
    }

    /// A runner pointed at this stub, with verbose mode off so argument
    /// assertions only see what the test asked for.
    pub fn runner(&self) -> Result<ToolRunner> {
        let mut runner = ToolRunner::new(Some(self.dir.path()))?;
        runner.set_verbose(false);
        Ok(runner)
    }
}

fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    anyhow::bail!("stub executables are only supported on unix")
}
