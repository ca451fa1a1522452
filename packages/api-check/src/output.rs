use std::fs::File;
use std::io::{Error, Stdout, Write};
use std::path::Path;

use prettytable::format::{FormatBuilder, LinePosition, LineSeparator, TableFormat};
use prettytable::{Cell, Row, Table};
use term::{color, Attr};

use verify_lib::api::ApiVerifyResult;
use verify_lib::VerifyResult;

use crate::OutputFormat;

pub struct Report<'a> {
    pub version_script: &'a Path,
    pub shared_object: &'a Path,
    pub result: &'a ApiVerifyResult,
}

impl Report<'_> {
    pub fn summary(&self) -> &'static str {
        return if self.result.is_good() {
            "All API symbols are present in the shared library."
        } else {
            "Some API symbols are missing in the shared library."
        };
    }
}

pub trait PrintTable {
    fn status_cell(&self, found: bool, out_fmt: &OutputFormat) -> Cell {
        return if found {
            let mut cell = Cell::new(if *out_fmt == OutputFormat::Markdown {
                ":ok:"
            } else {
                "OK"
            });
            cell.style(Attr::ForegroundColor(color::BRIGHT_GREEN));
            cell
        } else {
            let mut cell = Cell::new(if *out_fmt == OutputFormat::Markdown {
                ":x:"
            } else {
                "MISSING"
            });
            cell.style(Attr::ForegroundColor(color::BRIGHT_RED));
            cell
        };
    }

    fn table_format(&self, out_fmt: &OutputFormat) -> TableFormat {
        match out_fmt {
            OutputFormat::Markdown => FormatBuilder::new()
                .column_separator('|')
                .borders('|')
                .padding(1, 1)
                .separator(LinePosition::Title, LineSeparator::new('-', '|', '|', '|'))
                .build(),
            OutputFormat::Terminal => *prettytable::format::consts::FORMAT_BOX_CHARS,
            OutputFormat::Plain | OutputFormat::Json => {
                *prettytable::format::consts::FORMAT_DEFAULT
            }
        }
    }

    fn print_table(&mut self, table: &Table) -> Result<(), Error>;
}

pub trait ReportOutput: PrintTable + Write {
    fn write_report(&mut self, report: &Report, out_fmt: &OutputFormat) -> Result<(), Error> {
        match out_fmt {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *self, report.result)?;
                return self.write_all(b"\n");
            }
            OutputFormat::Plain => self.write_lines(report)?,
            OutputFormat::Terminal | OutputFormat::Markdown => {
                self.write_table(report, out_fmt)?
            }
        }
        return self.write_fmt(format_args!("{}\n", report.summary()));
    }

    fn write_counts(&mut self, report: &Report) -> Result<(), Error> {
        let result = report.result;
        self.write_fmt(format_args!(
            "Found {} symbols in {}.\n",
            result.declared.len(),
            report.version_script.display()
        ))?;
        if result.defined.is_empty() {
            return self.write_fmt(format_args!(
                "No symbols found in {}.\n",
                report.shared_object.display()
            ));
        }
        return self.write_fmt(format_args!(
            "Found {} symbols in {}.\n",
            result.defined.len(),
            report.shared_object.display()
        ));
    }

    fn write_lines(&mut self, report: &Report) -> Result<(), Error> {
        let result = report.result;
        self.write_counts(report)?;
        for symbol in &result.missing {
            self.write_fmt(format_args!("Missing API symbol: {symbol}\n"))?;
        }
        if result.is_good() {
            for symbol in &result.declared {
                self.write_fmt(format_args!("Declared API symbol found: {symbol}\n"))?;
            }
            for symbol in &result.defined {
                self.write_fmt(format_args!("Exported symbol found: {symbol}\n"))?;
            }
        }
        return Ok(());
    }

    fn write_table(&mut self, report: &Report, out_fmt: &OutputFormat) -> Result<(), Error> {
        let result = report.result;
        if *out_fmt == OutputFormat::Markdown {
            self.h2(&format!(
                "API symbols of {}",
                report.shared_object.display()
            ))?;
        }
        self.write_counts(report)?;
        self.write_all(b"\n")?;
        if result.declared.is_empty() {
            return Ok(());
        }
        let mut table = Table::new();
        table.set_format(self.table_format(out_fmt));
        table.set_titles(Row::new(vec![
            Cell::new("Symbol"),
            Cell::new("Version"),
            Cell::new("Status"),
        ]));
        for symbol in &result.declared {
            table.add_row(Row::new(vec![
                Cell::new(symbol.name()),
                Cell::new(symbol.version().unwrap_or_default()),
                self.status_cell(!result.missing.contains(symbol), out_fmt),
            ]));
        }
        return self.print_table(&table);
    }

    fn h2(&mut self, heading: &str) -> Result<(), Error> {
        return self.write_fmt(format_args!("## {heading}\n\n"));
    }
}

impl PrintTable for Stdout {
    fn print_table(&mut self, table: &Table) -> Result<(), Error> {
        table.print_tty(false)?;
        println!();
        return Ok(());
    }
}

impl PrintTable for File {
    fn print_table(&mut self, table: &Table) -> Result<(), Error> {
        table.print(self)?;
        self.write_all(b"\n")?;
        return Ok(());
    }
}

impl ReportOutput for Stdout {}

impl ReportOutput for File {}

#[cfg(test)]
impl PrintTable for Vec<u8> {
    fn print_table(&mut self, table: &Table) -> Result<(), Error> {
        table.print(self)?;
        self.write_all(b"\n")?;
        return Ok(());
    }
}

#[cfg(test)]
impl ReportOutput for Vec<u8> {}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use symbols_lib::{Symbol, SymbolSet};
    use verify_lib::api::ApiVerifyResult;

    use crate::output::{Report, ReportOutput};
    use crate::OutputFormat;

    fn set(items: &[&str]) -> SymbolSet {
        return items.iter().map(|s| Symbol::from(*s)).collect();
    }

    fn render(result: &ApiVerifyResult, out_fmt: OutputFormat) -> String {
        let report = Report {
            version_script: Path::new("libism.map"),
            shared_object: Path::new("libism.so"),
            result,
        };
        let mut out: Vec<u8> = Vec::new();
        out.write_report(&report, &out_fmt).expect("should write report");
        return String::from_utf8(out).expect("report should be UTF-8");
    }

    #[test]
    fn test_plain_failure() {
        let result = ApiVerifyResult::compare(
            &set(&["ism_init@@LIBISM_1.0", "ism_missing@@LIBISM_1.0"]),
            &set(&["ism_init@@LIBISM_1.0"]),
        );
        let text = render(&result, OutputFormat::Plain);
        assert!(text.contains("Found 2 symbols in libism.map.\n"));
        assert!(text.contains("Found 1 symbols in libism.so.\n"));
        assert!(text.contains("Missing API symbol: ism_missing@@LIBISM_1.0\n"));
        assert!(!text.contains("Declared API symbol found"));
        assert!(text.ends_with("Some API symbols are missing in the shared library.\n"));
    }

    #[test]
    fn test_plain_success_echoes_symbols() {
        let result = ApiVerifyResult::compare(
            &set(&["ism_init@@LIBISM_1.0"]),
            &set(&["ism_init@@LIBISM_1.0", "extra_symbol@@LIBISM_1.0"]),
        );
        let text = render(&result, OutputFormat::Plain);
        assert!(text.contains("Declared API symbol found: ism_init@@LIBISM_1.0\n"));
        assert!(text.contains("Exported symbol found: extra_symbol@@LIBISM_1.0\n"));
        assert!(text.ends_with("All API symbols are present in the shared library.\n"));
    }

    #[test]
    fn test_plain_empty_library() {
        let result = ApiVerifyResult::compare(&set(&["a"]), &SymbolSet::new());
        let text = render(&result, OutputFormat::Plain);
        assert!(text.contains("No symbols found in libism.so.\n"));
    }

    #[test]
    fn test_markdown_table() {
        let result = ApiVerifyResult::compare(
            &set(&["ism_a@@V1", "ism_b@@V1", "ism_plain"]),
            &set(&["ism_a@@V1"]),
        );
        let text = render(&result, OutputFormat::Markdown);
        assert!(text.starts_with("## API symbols of libism.so\n"));
        let row = |name: &str| {
            return String::from(
                text.lines()
                    .find(|line| line.starts_with("| ") && line.contains(name))
                    .expect("should have a row for the symbol"),
            );
        };
        assert!(row("ism_a").contains(":ok:"));
        assert!(row("ism_a").contains("| V1 "));
        assert!(row("ism_b").contains(":x:"));
        assert!(!row("ism_plain").contains("V1"));
        assert!(!text.contains("@@"));
    }

    #[test]
    fn test_json() {
        let result = ApiVerifyResult::compare(&set(&["a@@V1", "b@@V1"]), &set(&["a@@V1"]));
        let text = render(&result, OutputFormat::Json);
        let json: serde_json::Value = serde_json::from_str(&text).expect("should be JSON");
        assert_eq!(json["missing"], serde_json::json!(["b@@V1"]));
        assert_eq!(json["defined"], serde_json::json!(["a@@V1"]));
    }
}
