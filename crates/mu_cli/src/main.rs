//! muc: The mu compiler CLI.
//!
//! Usage:
//!   muc [options] [file...]
//!
//! Loads manifests, binds their declarations and reports duplicate names.

use clap::{ArgAction, Parser as ClapParser, ValueEnum};
use log::{info, LevelFilter};
use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report, Severity};
use mu_binder::Symbol;
use mu_compiler::{Compilation, Program};
use mu_diagnostics::{Diagnostic, DiagnosticCategory};
use mu_options::{BindScope, CompilerOptions, MuConfig};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[derive(ClapParser, Debug)]
#[command(name = "muc", version, about = "mu - binds infrastructure manifests and reports naming conflicts")]
struct Cli {
    /// Manifest files to compile.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Path to Mu.json.
    #[arg(short = 'p', long = "project")]
    project: Option<PathBuf>,

    /// One namespace for the whole program, or one per document.
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    /// Print every bound symbol.
    #[arg(long = "listSymbols")]
    list_symbols: bool,

    /// Render diagnostics with source snippets when stderr is a terminal.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pretty: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScopeArg {
    Program,
    Document,
}

impl From<ScopeArg> for BindScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Program => BindScope::Program,
            ScopeArg::Document => BindScope::Document,
        }
    }
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    process::exit(run_compile(&cli));
}

/// `RUST_LOG` takes precedence over `-v`.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run_compile(cli: &Cli) -> i32 {
    let start = Instant::now();

    let (files, config) = match resolve_input_files(cli) {
        Ok(resolved) => resolved,
        Err(message) => {
            print_error(&message);
            return 1;
        }
    };

    if files.is_empty() {
        print_error("No input files found.");
        return 1;
    }

    let mut options = config
        .and_then(|cfg| cfg.compiler_options)
        .unwrap_or_default();

    // CLI options override Mu.json
    if let Some(scope) = cli.scope {
        options.bind_scope = Some(scope.into());
    }

    let arena = bumpalo::Bump::new();
    let mut program = Program::new(&arena, files, options);

    if let Err(e) = program.load_root_files() {
        print_error(&format!("Failed to load source files: {}", e));
        return 1;
    }

    let compilation = program.compile();

    if cli.list_symbols {
        list_symbols(&program, &compilation);
    }

    let use_color = cli.pretty && std::io::stderr().is_terminal();
    for diag in compilation.diagnostics.diagnostics() {
        if use_color {
            print_pretty(&program, diag);
        } else {
            print_plain(diag);
        }
    }

    info!(
        "compiled {} file(s) in {:.2}s",
        program.root_files.len(),
        start.elapsed().as_secs_f64()
    );

    if compilation.has_errors() {
        let count = compilation.diagnostics.error_count();
        eprintln!(
            "\nFound {} error{}.",
            count,
            if count == 1 { "" } else { "s" }
        );
        return 2;
    }

    0
}

/// Explicit project, else positional files, else `./Mu.json`.
fn resolve_input_files(cli: &Cli) -> Result<(Vec<PathBuf>, Option<MuConfig>), String> {
    if let Some(ref project) = cli.project {
        load_project(project)
    } else if !cli.files.is_empty() {
        Ok((cli.files.clone(), None))
    } else if Path::new("Mu.json").exists() {
        load_project(Path::new("Mu.json"))
    } else {
        Ok((vec![], None))
    }
}

fn load_project(path: &Path) -> Result<(Vec<PathBuf>, Option<MuConfig>), String> {
    let config = mu_options::parse_config_file(path)
        .map_err(|e| format!("Failed to read project: {}", e))?;
    let files = config.resolved_files(path);
    Ok((files, Some(config)))
}

fn list_symbols(program: &Program<'_>, compilation: &Compilation<'_>) {
    let interner = program.interner();
    for unit in &compilation.units {
        if let Some(document) = unit.document {
            println!("{}:", document.path);
        }
        for symbol in unit.table.all() {
            println!("  {}", describe_symbol(program, symbol, interner.resolve(symbol.name())));
        }
    }
}

fn describe_symbol(program: &Program<'_>, symbol: Symbol<'_>, name: &str) -> String {
    let mut line = format!("{} {}  {}", symbol.kind(), name, symbol.location());
    match symbol {
        Symbol::Stack { stack, .. } => {
            if let Some(description) = stack.description {
                line.push_str(&format!("  # {}", description));
            }
        }
        Symbol::Service { service, .. } => {
            if let Some(service_type) = service.service_type {
                line.push_str(&format!("  : {}", service_type));
            }
        }
        Symbol::Document { document, .. } => {
            let bytes = program.source_text(document.path).map_or(0, str::len);
            line.push_str(&format!("  ({} bytes)", bytes));
        }
    }
    line
}

fn print_plain(diag: &Diagnostic) {
    eprintln!("{}", diag);
    for related in &diag.related_information {
        eprintln!("  {}", related);
    }
}

/// Render through miette when the primary location has a span and source.
fn print_pretty(program: &Program<'_>, diag: &Diagnostic) {
    let Some((file, text)) = diag
        .file()
        .and_then(|file| program.source_text(file).map(|text| (file, text)))
    else {
        print_plain(diag);
        return;
    };
    let Some(span) = diag.span() else {
        print_plain(diag);
        return;
    };

    let primary = (span.start as usize, span.length as usize);
    let mut labels = vec![if diag.related_information.is_empty() {
        LabeledSpan::underline(primary)
    } else {
        LabeledSpan::at(primary, "declared again here")
    }];
    let mut help = Vec::new();
    for related in &diag.related_information {
        match related.span() {
            Some(other) if related.file() == Some(file) => labels.push(LabeledSpan::at(
                (other.start as usize, other.length as usize),
                related.message_text.clone(),
            )),
            _ => help.push(related.to_string()),
        }
    }

    let mut report = MietteDiagnostic::new(diag.message_text.clone())
        .with_code(format!("MU{}", diag.code))
        .with_severity(severity(diag.category))
        .with_labels(labels);
    if !help.is_empty() {
        report = report.with_help(help.join("\n"));
    }

    let report = Report::new(report).with_source_code(NamedSource::new(file, text.to_string()));
    eprintln!("{:?}", report);
}

fn severity(category: DiagnosticCategory) -> Severity {
    match category {
        DiagnosticCategory::Error => Severity::Error,
        DiagnosticCategory::Warning => Severity::Warning,
        DiagnosticCategory::Message => Severity::Advice,
    }
}

fn print_error(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}
