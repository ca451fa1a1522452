use std::fs::File;
use std::path::Path;

use elf::endian::AnyEndian;
use elf::symbol::Symbol as ElfSymbol;
use elf::{abi, ElfStream};

use crate::{Error, Symbol, SymbolSet, SymbolTableReader};

/// Reads `.dynsym` directly, keeping the symbols `nm -D --defined-only` would
/// print as `T`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DynsymReader;

impl DynsymReader {
    pub fn parse<S>(source: S) -> Result<SymbolSet, elf::ParseError>
    where
        S: std::io::Read + std::io::Seek,
    {
        let mut elf = ElfStream::<AnyEndian, S>::open_stream(source)?;

        let all_syms: Vec<(ElfSymbol, String)> = match elf.dynamic_symbol_table()? {
            Some((sym_table, str)) => sym_table
                .iter()
                .map(|sym| {
                    (
                        sym.clone(),
                        String::from(str.get(sym.st_name as usize).unwrap_or("")),
                    )
                })
                .collect(),
            None => return Ok(SymbolSet::new()),
        };
        let ver_table = elf.symbol_version_table()?;

        let symbols = all_syms
            .iter()
            .enumerate()
            .filter_map(|(index, (sym, name))| {
                if sym.is_undefined()
                    || sym.st_name == 0
                    || sym.st_bind() != abi::STB_GLOBAL
                    || sym.st_symtype() != abi::STT_FUNC
                {
                    return None;
                }
                if let Some(ver_table) = &ver_table {
                    if let Some(mut ver) = ver_table.get_definition(index).ok().flatten() {
                        // The base definition names the library itself; nm prints
                        // its symbols unversioned.
                        if ver.flags & abi::VER_FLG_BASE != 0 {
                            return Some(Symbol::new(name.as_str()));
                        }
                        if let Some(Ok(ver_name)) = ver.names.next() {
                            let separator = if ver.hidden { "@" } else { "@@" };
                            return Some(Symbol::new(format!("{name}{separator}{ver_name}")));
                        }
                    }
                }
                return Some(Symbol::new(name.as_str()));
            })
            .collect();
        return Ok(symbols);
    }
}

impl SymbolTableReader for DynsymReader {
    fn read_symbols(&self, path: &Path) -> Result<SymbolSet, Error> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound {
                what: "Shared object file",
                path: path.to_path_buf(),
            },
            _ => Error::FileRead {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        return Self::parse(file).map_err(|source| Error::Elf {
            path: path.to_path_buf(),
            source,
        });
    }
}
