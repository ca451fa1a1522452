//! Extraction of declared symbol names from a linker version script.
//!
//! ```text
//! LIBISM_1.0 {
//!     global:
//!         # comment
//!         ism_init_global_context;
//!         ism_iface_config_alloc;
//!     local: *;
//! };
//! ```
//!
//! The parser is line oriented and tracks at most one open version block.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{Error, Symbol, SymbolSet};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop declarations made while a `local:` section is active.
    pub skip_local: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    #[default]
    Global,
    Local,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanState {
    pub tag: Option<String>,
    pub section: Section,
}

pub struct VersionScript;

impl ScanState {
    /// Consumes one raw line and returns the next state plus the symbol declared
    /// on that line, if any.
    pub fn scan(self, line: &str, options: &ParseOptions) -> (Self, Option<Symbol>) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return (self, None);
        }
        if line.starts_with("global:") {
            return (
                Self {
                    section: Section::Global,
                    ..self
                },
                None,
            );
        }
        if line.starts_with("local:") {
            return (
                Self {
                    section: Section::Local,
                    ..self
                },
                None,
            );
        }
        if let Some((tag, _)) = line.split_once('{') {
            return (
                Self {
                    tag: Some(tag.trim())
                        .filter(|tag| !tag.is_empty())
                        .map(String::from),
                    section: Section::Global,
                },
                None,
            );
        }
        if line.contains('}') {
            return (Self::default(), None);
        }
        if options.skip_local && self.section == Section::Local {
            return (self, None);
        }
        let name = line.split(';').next().unwrap_or_default().trim();
        let symbol = match &self.tag {
            Some(tag) => Symbol::versioned(name, tag),
            None => Symbol::new(name),
        };
        return (self, Some(symbol));
    }
}

pub fn parse_lines<I, S>(lines: I, options: &ParseOptions) -> SymbolSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (_, symbols) = lines.into_iter().fold(
        (ScanState::default(), SymbolSet::new()),
        |(state, mut symbols), line| {
            let (state, symbol) = state.scan(line.as_ref(), options);
            symbols.extend(symbol);
            (state, symbols)
        },
    );
    return symbols;
}

pub fn parse_str(content: &str, options: &ParseOptions) -> SymbolSet {
    return parse_lines(content.lines(), options);
}

impl VersionScript {
    pub fn extract<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<SymbolSet, Error> {
        let path = path.as_ref();
        let read_err = |source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        };
        let reader = BufReader::new(File::open(path).map_err(read_err)?);
        let lines = reader
            .lines()
            .collect::<Result<Vec<String>, _>>()
            .map_err(read_err)?;
        let symbols = parse_lines(lines, options);
        log::debug!("Found {} symbols in {}", symbols.len(), path.display());
        return Ok(symbols);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::version_script::{parse_str, ParseOptions, ScanState, Section, VersionScript};
    use crate::{Error, Symbol, SymbolSet};

    const ISM_MAP: &str = "LIBISM_1.0 {
    global:
        # Sysrepo init
        ism_init_global_context;
        SysrepoRegisterIsmService;

        # Logging
        ism_log_enabled_debug;
    local: *;
};
";

    fn set(items: &[&str]) -> SymbolSet {
        return items.iter().map(|s| Symbol::from(*s)).collect();
    }

    #[test]
    fn test_parse_block() {
        let symbols = parse_str(ISM_MAP, &ParseOptions::default());
        assert_eq!(
            symbols,
            set(&[
                "ism_init_global_context@@LIBISM_1.0",
                "SysrepoRegisterIsmService@@LIBISM_1.0",
                "ism_log_enabled_debug@@LIBISM_1.0",
            ])
        );
    }

    #[test]
    fn test_local_wildcard_on_own_line() {
        let script = "V1 {\nglobal:\na;\nb;\nlocal:\n*;\n};\n";
        assert_eq!(
            parse_str(script, &ParseOptions::default()),
            set(&["a@@V1", "b@@V1", "*@@V1"])
        );
        assert_eq!(
            parse_str(script, &ParseOptions { skip_local: true }),
            set(&["a@@V1", "b@@V1"])
        );
    }

    #[test]
    fn test_unversioned() {
        let script = "{\n  global:\n    foo;\n    bar ;  # trailing\n};\nbaz;\nqux\n";
        // An anonymous block adds no version suffix.
        let symbols = parse_str(script, &ParseOptions::default());
        assert_eq!(symbols, set(&["foo", "bar", "baz", "qux"]));

        let plain = parse_str("alpha;\nbeta;\n", &ParseOptions::default());
        assert_eq!(plain, set(&["alpha", "beta"]));
    }

    #[test]
    fn test_second_block_overwrites_tag() {
        let script = "V1 {\nglobal:\na;\nV2 {\nb;\n};\nc;\n";
        assert_eq!(
            parse_str(script, &ParseOptions::default()),
            set(&["a@@V1", "b@@V2", "c"])
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let symbols = parse_str("V1 {\nfoo;\nfoo;\n};\n", &ParseOptions::default());
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn test_scan_state() {
        let options = ParseOptions::default();
        let (state, sym) = ScanState::default().scan("  LIBX_2 {  ", &options);
        assert_eq!(sym, None);
        assert_eq!(state.tag.as_deref(), Some("LIBX_2"));
        let (state, sym) = state.scan("local:", &options);
        assert_eq!(sym, None);
        assert_eq!(state.section, Section::Local);
        let (state, sym) = state.scan("x;", &options);
        assert_eq!(sym, Some(Symbol::from("x@@LIBX_2")));
        let (state, _) = state.scan("};", &options);
        assert_eq!(state, ScanState::default());
    }

    #[test]
    fn test_extract_file() {
        let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
        file.write_all(ISM_MAP.as_bytes()).unwrap();
        let symbols =
            VersionScript::extract(file.path(), &ParseOptions::default()).expect("should parse");
        assert_eq!(symbols.len(), 3);
    }

    #[test]
    fn test_extract_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = VersionScript::extract(dir.path().join("nope.map"), &ParseOptions::default())
            .expect_err("should fail");
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
