//! Schematic CLI
//!
//! Command-line interface for deriving binding signatures from hyper-schemas.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use schematic::{
    initial_cap, initial_low, load_document_auto, method_cap, Bindings, LoadError, Pointer,
    Target, TypeSyntax,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schematic")]
#[command(about = "Derive typed binding signatures from JSON hyper-schemas")]
#[command(version)]
struct Cli {
    /// Log resolution steps to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print resource types and action signatures as JSON
    Signatures {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Destination language syntax
        #[arg(long, value_enum, default_value = "go")]
        target: Target,

        /// JSON file with custom type syntax (overrides --target)
        #[arg(long)]
        syntax_file: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the inferred type of the schema at a JSON pointer
    Type {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// JSON pointer, e.g. "#/definitions/app"
        pointer: String,

        /// Destination language syntax
        #[arg(long, value_enum, default_value = "go")]
        target: Target,

        /// JSON file with custom type syntax (overrides --target)
        #[arg(long)]
        syntax_file: Option<PathBuf>,
    },

    /// Normalize a name into an identifier
    Ident {
        name: String,

        /// Unexported form (configVar instead of ConfigVar)
        #[arg(long, conflicts_with = "method")]
        low: bool,

        /// Method form (input lower-cased first)
        #[arg(long, conflicts_with = "low")]
        method: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Signatures {
            schema,
            target,
            syntax_file,
            output,
            pretty,
        } => run_signatures(&schema, target, syntax_file, output, pretty),

        Commands::Type {
            schema,
            pointer,
            target,
            syntax_file,
        } => run_type(&schema, &pointer, target, syntax_file),

        Commands::Ident { name, low, method } => run_ident(&name, low, method),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "schematic=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn load_syntax(target: Target, syntax_file: Option<PathBuf>) -> Result<TypeSyntax, u8> {
    match syntax_file {
        Some(path) => TypeSyntax::from_file(&path).map_err(|e| report_load(&e)),
        None => Ok(TypeSyntax::for_target(target)),
    }
}

fn report_load(e: &LoadError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}

fn run_signatures(
    schema_source: &str,
    target: Target,
    syntax_file: Option<PathBuf>,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let syntax = load_syntax(target, syntax_file)?;
    let document = load_document_auto(schema_source).map_err(|e| report_load(&e))?;

    let bindings = Bindings::build(&document, &syntax).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = if pretty {
        serde_json::to_string_pretty(&bindings)
    } else {
        serde_json::to_string(&bindings)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_type(
    schema_source: &str,
    pointer: &str,
    target: Target,
    syntax_file: Option<PathBuf>,
) -> Result<(), u8> {
    let syntax = load_syntax(target, syntax_file)?;
    let document = load_document_auto(schema_source).map_err(|e| report_load(&e))?;

    let ty = document
        .lookup(&Pointer::parse(pointer))
        .and_then(|id| document.type_of(id))
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    println!("{}", syntax.render(&ty));
    Ok(())
}

fn run_ident(name: &str, low: bool, method: bool) -> Result<(), u8> {
    let ident = if low {
        initial_low(name)
    } else if method {
        method_cap(name)
    } else {
        initial_cap(name)
    }
    .map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    println!("{}", ident);
    Ok(())
}
