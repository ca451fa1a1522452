use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{what} {} does not exist.", .path.display())]
    NotFound { what: &'static str, path: PathBuf },
    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{program} command not found. Please ensure it is installed and in your PATH.")]
    ToolNotFound { program: String },
    #[error("Error running {program} on {}: {status}: {stderr}", .path.display())]
    ToolFailed {
        program: String,
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
    #[error("Failed to run {program}: {source}")]
    ToolIo {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Bad ELF file {}: {source}", .path.display())]
    Elf {
        path: PathBuf,
        #[source]
        source: elf::ParseError,
    },
    #[error("Failed to write report: {0}")]
    Report(#[from] io::Error),
}
