use clap::{Parser as ClapParser, Subcommand};
use mongoq::cli::{self, CheckOptions, CheckResult, CliError, OutputFormat};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "mongoq")]
#[command(about = "mongoq - Compile filter expressions into MongoDB query documents")]
#[command(version)]
struct Cli {
    /// Log translation steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate an expression into a query document
    Translate {
        /// The filter expression (reads from stdin if not provided)
        expression: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Print the BSON document instead of Extended JSON
        #[arg(long, conflicts_with = "pretty")]
        bson: bool,
    },

    /// Only validate the syntax of an expression
    Check {
        /// The filter expression (reads from stdin if not provided)
        expression: Option<String>,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'mongoq docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Translate {
            expression,
            pretty,
            bson,
        } => {
            let format = if bson {
                OutputFormat::Bson
            } else if pretty {
                OutputFormat::PrettyJson
            } else {
                OutputFormat::Json
            };
            run_check(expression, format, false)
        }
        Commands::Check { expression } => run_check(expression, OutputFormat::Json, true),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_check(
    expression: Option<String>,
    format: OutputFormat,
    syntax_only: bool,
) -> Result<(), CliError> {
    let expression = match expression {
        Some(s) => s,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => return Err(CliError::NoInput),
    };

    let options = CheckOptions {
        expression,
        format,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => println!("{}", output),
    }
    Ok(())
}
