
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use crate::codegen::Target;

#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("could not run `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{tool}` failed ({status})\n{stderr}")]
    Failed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Files produced from one source file, all named from the same base.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub assembly: PathBuf,
    pub object: PathBuf,
    pub executable: PathBuf,
}

impl Artifacts {
    pub fn new(base: &Path, target: Target) -> Self {
        let (object, executable) = match target {
            Target::Linux => (base.with_extension("o"), base.with_extension("")),
            Target::Windows => (base.with_extension("obj"), base.with_extension("exe")),
        };
        Self {
            assembly: base.with_extension("asm"),
            object,
            executable,
        }
    }

    /// The first artifact that would be written over `source`, if any.
    /// Paths spelled differently still clash when they resolve to the same
    /// existing file.
    pub fn clobbers(&self, source: &Path) -> Option<&Path> {
        let canonical = source.canonicalize().ok();
        [&self.assembly, &self.object, &self.executable]
            .into_iter()
            .map(PathBuf::as_path)
            .find(|path| {
                *path == source
                    || (canonical.is_some() && path.canonicalize().ok() == canonical)
            })
    }
}

pub struct Toolchain {
    target: Target,
}

impl Toolchain {
    pub fn new(target: Target) -> Self {
        Self { target }
    }

    pub fn assemble(&self, artifacts: &Artifacts) -> Result<String, ToolchainError> {
        let format = match self.target {
            Target::Linux => "elf64",
            Target::Windows => "win64",
        };
        let mut command = Command::new("nasm");
        command
            .args(["-f", format, "-o"])
            .arg(&artifacts.object)
            .arg(&artifacts.assembly);
        run(command)
    }

    pub fn link(&self, artifacts: &Artifacts) -> Result<String, ToolchainError> {
        let command = match self.target {
            Target::Linux => {
                let mut command = Command::new("gcc");
                command
                    .arg(&artifacts.object)
                    .arg("-o")
                    .arg(&artifacts.executable);
                command
            }
            Target::Windows => {
                let mut command = Command::new("GoLink");
                command
                    .args(["/console", "msvcrt.dll", "/entry", "main"])
                    .arg(&artifacts.object);
                command
            }
        };
        run(command)
    }

    /// Runs the program with the terminal's stdin so `read` works.
    pub fn execute(&self, artifacts: &Artifacts) -> Result<String, ToolchainError> {
        let executable = &artifacts.executable;
        let path = if executable.is_relative() && !executable.starts_with(".") {
            Path::new(".").join(executable)
        } else {
            executable.clone()
        };
        let mut command = Command::new(path);
        command.stdin(Stdio::inherit());
        run(command)
    }
}

/// Runs an external tool to completion, returning its stdout. A non-zero
/// exit status is an error carrying the tool's stderr.
pub fn run(mut command: Command) -> Result<String, ToolchainError> {
    let tool = command.get_program().to_string_lossy().into_owned();
    log::debug!("running {:?}", command);

    let output = command.output().map_err(|source| ToolchainError::Spawn {
        tool: tool.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(ToolchainError::Failed {
            tool,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
