use std::path::Path;

use crate::{Error, SymbolSet};

/// Source of the defined, exported code symbols of a shared library.
pub trait SymbolTableReader {
    fn read_symbols(&self, path: &Path) -> Result<SymbolSet, Error>;

    /// Like [`read_symbols`](Self::read_symbols), but any failure is logged and
    /// treated as "no symbols found".
    fn extract(&self, path: &Path) -> SymbolSet {
        return match self.read_symbols(path) {
            Ok(symbols) => {
                if symbols.is_empty() {
                    log::warn!("No symbols found in {}.", path.display());
                } else {
                    log::debug!("Found {} symbols in {}", symbols.len(), path.display());
                }
                symbols
            }
            Err(e) => {
                log::warn!("{e}");
                SymbolSet::new()
            }
        };
    }
}
