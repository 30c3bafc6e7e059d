//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::util::errors::{Error, Result};
use crate::util::fs::truncate;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    log: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            log: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Send combined stdout and stderr to `path` instead of the terminal.
    ///
    /// The file is truncated when the process starts and the child's output
    /// is appended to it.
    pub fn log_to(mut self, path: impl AsRef<Path>) -> Self {
        self.log = Some(path.as_ref().to_path_buf());
        self
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        Error::Process {
            program: self.program.display().to_string(),
            source,
        }
    }

    /// Execute, wait, and return the exit status.
    ///
    /// Output goes to the terminal, or to the log file when one is set. A
    /// non-zero exit is returned as a status, not an error; only a failure to
    /// launch the program is an error.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();

        if let Some(ref log) = self.log {
            drop(truncate(log)?);
            let file = OpenOptions::new()
                .append(true)
                .open(log)
                .map_err(|e| Error::io(log, e))?;
            let stderr = file.try_clone().map_err(|e| Error::io(log, e))?;
            cmd.stdout(Stdio::from(file));
            cmd.stderr(Stdio::from(stderr));
        }

        cmd.status().map_err(|e| self.spawn_error(e))
    }

    /// Display the command for logs and dry runs.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|arg| {
            if arg.contains(' ') {
                format!("\"{}\"", arg)
            } else {
                arg.clone()
            }
        }));
        let mut line = parts.join(" ");
        if let Some(ref log) = self.log {
            line.push_str(&format!(" > \"{}\" 2>&1", log.display()));
        }
        line
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
