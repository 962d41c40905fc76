use std::{
    error::Error,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{CalculationInput, Engine, Evaluation, ValidationIssue};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "nightshare_cli")]
#[command(about = "Split shared accommodation costs from a CSV file or a stored calculation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a CSV file, validate it and print the split.
    Calculate(CalculateArgs),
    /// Import a CSV file and print validation issues only.
    Validate(ValidateArgs),
    /// Delete expired stored calculations.
    Purge(DatabaseArgs),
    /// Load a stored calculation and print its split.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct DatabaseArgs {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./nightshare.db?mode=rwc"
    )]
    database_url: String,
}

#[derive(Args, Debug)]
struct CalculateArgs {
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = Format::Summary)]
    format: Format,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    file: PathBuf,
}

#[derive(Args, Debug)]
struct ShowArgs {
    id: String,
    #[command(flatten)]
    database: DatabaseArgs,
    #[arg(long, value_enum, default_value_t = Format::Summary)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Summary,
    Csv,
    Json,
}

fn read_input(file: &Path) -> Result<CalculationInput, Box<dyn Error + Send + Sync>> {
    let text = std::fs::read_to_string(file)?;
    let import = engine::import_csv(&text)?;
    for skipped in &import.skipped_activities {
        eprintln!("skipped activity with unknown participants: {skipped}");
    }
    Ok(import.into_input()?)
}

fn print_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        let severity = if issue.is_error() { "error" } else { "warning" };
        eprintln!("{severity}: {}", issue.message);
    }
}

/// Prints the evaluation and returns whether it was blocked by errors.
fn print_evaluation(
    input: &CalculationInput,
    evaluation: &Evaluation,
    format: Format,
) -> Result<bool, Box<dyn Error + Send + Sync>> {
    print_issues(&evaluation.issues);
    if evaluation.has_errors() {
        return Ok(true);
    }

    match format {
        Format::Summary => print!("{}", engine::summary_text(&evaluation.result, &input.settings)),
        Format::Csv => print!("{}", engine::export_csv(input, &evaluation.result)?),
        Format::Json => println!("{}", serde_json::to_string_pretty(evaluation)?),
    }
    Ok(false)
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Calculate(args) => {
            let input = read_input(&args.file)?;
            if print_evaluation(&input, &input.evaluate(), args.format)? {
                std::process::exit(1);
            }
        }
        Command::Validate(args) => {
            let input = read_input(&args.file)?;
            let issues = input.validate();
            if issues.is_empty() {
                println!("no issues found");
            }
            print_issues(&issues);
            if engine::validation::has_errors(&issues) {
                std::process::exit(1);
            }
        }
        Command::Purge(args) => {
            let db = connect_db(&args.database_url).await?;
            let engine = Engine::builder().database(db).build().await?;
            let purged = engine.purge_expired().await?;
            println!("purged {purged} expired calculations");
        }
        Command::Show(args) => {
            let db = connect_db(&args.database.database_url).await?;
            let engine = Engine::builder().database(db).build().await?;
            let saved = match engine.load_calculation(&args.id).await {
                Ok(saved) => saved,
                Err(engine::EngineError::KeyNotFound(_)) => {
                    eprintln!("calculation not found or expired: {}", args.id);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };
            eprintln!(
                "calculation {} saved {}, expires {}",
                saved.id, saved.updated_at, saved.expires_at
            );
            if print_evaluation(&saved.input, &saved.input.evaluate(), args.format)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
