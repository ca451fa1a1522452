use std::fs::File;
use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, ValueEnum};
use is_terminal::IsTerminal;
use log::LevelFilter;

use symbols_lib::dynsym::DynsymReader;
use symbols_lib::nm::NmReader;
use symbols_lib::version_script::{ParseOptions, VersionScript};
use symbols_lib::{Error, SymbolTableReader};
use verify_lib::api::ApiVerifyResult;
use verify_lib::VerifyResult;

use crate::output::{Report, ReportOutput};

mod output;

/// Checks that every global symbol of a linker version script is defined and
/// exported by a shared library.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    #[arg(help = "Linker version script (map file)")]
    version_script: PathBuf,
    #[arg(help = "Shared library built with the version script")]
    shared_object: PathBuf,
    #[arg(short, long, value_enum, default_value_t = Backend::Nm)]
    backend: Backend,
    #[arg(long, env = "NM", default_value = "nm", help = "nm executable")]
    nm: PathBuf,
    #[arg(long, help = "Ignore declarations in local: sections")]
    skip_local: bool,
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum Backend {
    /// Run `nm -D --defined-only`
    Nm,
    /// Read the ELF dynamic symbol table directly
    Dynsym,
}

#[derive(Debug, Clone, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Terminal,
    Plain,
    Json,
}

impl Args {
    fn reader(&self) -> Box<dyn SymbolTableReader> {
        return match self.backend {
            Backend::Nm => Box::new(NmReader::new(self.nm.clone())),
            Backend::Dynsym => Box::new(DynsymReader),
        };
    }

    fn report_output(&self) -> Result<Box<dyn ReportOutput>, Error> {
        if let Some(path) = &self.output {
            return Ok(Box::new(File::create(path)?));
        }
        return Ok(Box::new(std::io::stdout()));
    }

    fn output_format(&self) -> OutputFormat {
        return if let Some(format) = &self.format {
            format.clone()
        } else if self.output.is_none() && std::io::stdout().is_terminal() {
            OutputFormat::Terminal
        } else {
            OutputFormat::Plain
        };
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            exit(if e.use_stderr() { 1 } else { 0 });
        }
    };
    init_logger(args.debug);
    match run(&args, args.reader().as_ref()) {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(e) => {
            eprintln!("{e}");
            exit(1);
        }
    }
}

fn init_logger(debug: u8) {
    let level = match debug {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn run<R>(args: &Args, reader: &R) -> Result<bool, Error>
where
    R: SymbolTableReader + ?Sized,
{
    let result = check(args, reader)?;
    let report = Report {
        version_script: &args.version_script,
        shared_object: &args.shared_object,
        result: &result,
    };
    let format = args.output_format();
    let mut output = args.report_output()?;
    output.write_report(&report, &format)?;
    if args.output.is_some() || format == OutputFormat::Json {
        eprintln!("{}", report.summary());
    }
    return Ok(result.is_good());
}

fn check<R>(args: &Args, reader: &R) -> Result<ApiVerifyResult, Error>
where
    R: SymbolTableReader + ?Sized,
{
    for (what, path) in [
        ("Link map file", &args.version_script),
        ("Shared object file", &args.shared_object),
    ] {
        if !path.exists() {
            return Err(Error::NotFound {
                what,
                path: path.clone(),
            });
        }
    }
    let options = ParseOptions {
        skip_local: args.skip_local,
    };
    let declared = VersionScript::extract(&args.version_script, &options)?;
    let defined = reader.extract(&args.shared_object);
    return Ok(ApiVerifyResult::compare(&declared, &defined));
}
