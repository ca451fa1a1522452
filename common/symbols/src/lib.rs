use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::Serialize;

pub use error::Error;
pub use symtab::SymbolTableReader;

pub mod dynsym;
pub mod error;
pub mod nm;
pub mod symtab;
pub mod version_script;

const VERSION_SEPARATOR: &str = "@@";

/// Symbol name, possibly carrying a default-version suffix (`name@@TAG`).
///
/// Equality is on the full annotated string, so `foo` and `foo@@V1` are
/// different symbols.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

pub type SymbolSet = BTreeSet<Symbol>;

impl Symbol {
    pub fn new<N: Into<String>>(name: N) -> Self {
        return Self(name.into());
    }

    pub fn versioned<N, V>(name: N, version: V) -> Self
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        return Self(format!(
            "{}{VERSION_SEPARATOR}{}",
            name.as_ref(),
            version.as_ref()
        ));
    }

    pub fn name(&self) -> &str {
        return match self.0.split_once(VERSION_SEPARATOR) {
            Some((name, _)) => name,
            None => &self.0,
        };
    }

    pub fn version(&self) -> Option<&str> {
        return self.0.split_once(VERSION_SEPARATOR).map(|(_, ver)| ver);
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        return Self::new(value);
    }
}
