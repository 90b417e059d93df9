//! Command line front end of the engine.
//!
//! Resolves logic and set texts given as arguments, and runs single practice exercises on the
//! terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mantiq::{
    scoring, Config, Difficulty, Domain, FiniteAlgebra, Formatter, LogicResolver, Normalizer,
    Notation, SetResolver, Synthesizer,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mantiq")]
#[command(about = "Resolve logic and set expressions and practice with graded exercises", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized form of a text
    Normalize { text: String },

    /// Resolve and simplify a logic expression
    Logic {
        text: String,

        /// Print the result with mathematical symbols
        #[arg(long)]
        unicode: bool,
    },

    /// Resolve and evaluate a set expression with its definitions
    Set { text: String },

    /// Ask one exercise, read the answer from stdin and grade it
    Exercise {
        /// `logic` or `set_theory`
        domain: Domain,

        /// Difficulty tier from 1 to 3
        #[arg(value_parser = parse_difficulty)]
        difficulty: Difficulty,
    },
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    let tier: u8 = s.parse().map_err(|e| format!("{}", e))?;
    Difficulty::try_from(tier)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("cannot load config from {}", path.display()))?,
        None => Config::default(),
    };
    let algebra = FiniteAlgebra::new(&config.algebra);

    match cli.command {
        Commands::Normalize { text } => {
            println!("{}", Normalizer::new().normalize(&text));
        }
        Commands::Logic { text, unicode } => {
            let resolver = LogicResolver::new(&algebra);
            let (expr, variables) = resolver.resolve(&text)?;
            let simplified = resolver.simplify(&expr)?;
            let formatter = Formatter::new(if unicode { Notation::Unicode } else { Notation::Ascii });
            println!("variables: {}", variables.iter().collect::<String>());
            println!("expression: {}", formatter.format(&expr));
            println!("simplified: {}", formatter.format(&simplified));
        }
        Commands::Set { text } => {
            let outcome = SetResolver::new(&algebra).resolve(&text)?;
            println!("{}", outcome);
        }
        Commands::Exercise { domain, difficulty } => {
            let exercise = Synthesizer::new(&algebra).synthesize(domain, difficulty)?;
            println!("{}", exercise.question());
            print!("> ");
            io::stdout().flush()?;
            let mut answer = String::new();
            io::stdin().lock().read_line(&mut answer)?;
            let correct = scoring::grade(&answer, &exercise);
            let points = config.scoring.points(difficulty, correct, domain);
            info!(%domain, %difficulty, correct, points, "graded answer");
            if correct {
                println!("✅ درست! +{}", points);
            } else {
                println!("❌ غلط. پاسخ صحیح: {} (+{})", exercise.answer(), points);
            }
        }
    }
    Ok(())
}
