use clap::{Parser as ClapParser, Subcommand};
use filter_ast::cli::{self, CliError, RenderOptions, TokensOptions};
use filter_ast::{quote, quote_ident};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "fexpr")]
#[command(about = "fexpr - Render filter-language expression trees to canonical text")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON-encoded expression tree
    Render {
        /// JSON tree (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Print the token stream of a query as JSON
    Tokens {
        /// The query to tokenize
        query: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Quote a value as a string literal
    Quote {
        value: String,
    },

    /// Quote a name as an identifier, only if needed
    Ident {
        name: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render { input } => run_render(input),
        Commands::Tokens { query, pretty } => {
            cli::execute_tokens(&TokensOptions { query, pretty }).map(|out| println!("{}", out))
        }
        Commands::Quote { value } => {
            println!("{}", quote(&value));
            Ok(())
        }
        Commands::Ident { name } => {
            println!("{}", quote_ident(&name));
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_render(input: Option<String>) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let rendered = cli::execute_render(&RenderOptions { input })?;
    println!("{}", rendered);
    Ok(())
}
