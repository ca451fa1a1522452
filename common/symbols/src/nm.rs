use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{Error, Symbol, SymbolSet, SymbolTableReader};

/// `nm` type letter of a global symbol in the text section.
const TEXT_SYMBOL: &str = "T";

/// Reads the dynamic symbol table by running `nm -D --defined-only`.
#[derive(Debug, Clone)]
pub struct NmReader {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Default for NmReader {
    fn default() -> Self {
        return Self::new("nm");
    }
}

impl NmReader {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        return Self {
            program: program.into(),
            args: vec![OsString::from("-D"), OsString::from("--defined-only")],
        };
    }

    /// Replaces the arguments passed before the library path.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        return self;
    }

    fn program_name(&self) -> String {
        return self.program.to_string_lossy().into_owned();
    }
}

impl SymbolTableReader for NmReader {
    fn read_symbols(&self, path: &Path) -> Result<SymbolSet, Error> {
        if !path.exists() {
            return Err(Error::NotFound {
                what: "Shared object file",
                path: path.to_path_buf(),
            });
        }
        log::debug!(
            "Running {} {:?} {}",
            self.program.display(),
            self.args,
            path.display()
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::ToolNotFound {
                    program: self.program_name(),
                },
                _ => Error::ToolIo {
                    program: self.program_name(),
                    source: e,
                },
            })?;
        if !output.status.success() {
            return Err(Error::ToolFailed {
                program: self.program_name(),
                path: path.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        return Ok(parse_nm_output(&String::from_utf8_lossy(&output.stdout)));
    }
}

/// Collects the names of `T` symbols from `nm` output lines of the form
/// `<address> <type> <name>[@@<version>]`.
pub fn parse_nm_output(output: &str) -> SymbolSet {
    return output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let (_addr, kind, name) = (parts.next()?, parts.next()?, parts.next()?);
            if kind != TEXT_SYMBOL {
                return None;
            }
            return Some(Symbol::from(name));
        })
        .collect();
}
