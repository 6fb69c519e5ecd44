// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use sql_batch_export::utils::logging::{format_error, format_info, format_success, format_warning};
use sql_batch_export::{
    BatchReport, BatchStats, Config, ManifestExporter, QueryScanner, RunManifest, SqliteClient,
    Validator, run_configured,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "sql_batch_export")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Run SQL query files against SQLite and export each result to CSV", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, value_name = "FILE")]
    database: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    queries: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute every query file and export the results
    Run {
        #[arg(long)]
        continue_on_error: bool,

        #[arg(long)]
        manifest: bool,

        #[arg(long)]
        no_progress: bool,
    },

    /// Show the query files that would run, in execution order
    List,

    /// Check the database connection and the query directory
    Verify,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    sql_batch_export::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Starting query execution...");

    // every failure, setup included, goes through this log line
    let result = run_cli(cli);
    if let Err(e) = &result {
        error!("Error during execution: {:#}", e);
    }

    result
}

fn run_cli(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let colored = cli.color;

    let command = cli.command.unwrap_or(Commands::Run {
        continue_on_error: false,
        manifest: false,
        no_progress: false,
    });

    match command {
        Commands::Run {
            continue_on_error,
            manifest,
            no_progress,
        } => {
            let mut config = config;
            config.pipeline.continue_on_error |= continue_on_error;
            config.export.write_manifest |= manifest;
            config.pipeline.show_progress &= !no_progress;
            cmd_run(&config, colored)
        }
        Commands::List => cmd_list(&config),
        Commands::Verify => cmd_verify(&config),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).context("Failed to load default configuration")?
    };

    config
        .with_overrides(
            cli.database.clone(),
            cli.queries.clone(),
            cli.output.clone(),
        )
        .context("Invalid command line overrides")
}

fn prepare_directories(config: &Config) -> Result<()> {
    if config.queries.create_if_missing {
        Validator::ensure_directory(&config.queries.source_dir)
            .context("Failed to create query directory")?;
    }
    Ok(())
}

fn cmd_run(config: &Config, colored: bool) -> Result<()> {
    prepare_directories(config)?;

    let started_at = Utc::now();
    let start_time = Instant::now();
    let report = run_configured(config, colored)?;

    let stats = BatchStats::from_report(&report, start_time.elapsed().as_millis() as u64);

    if config.export.write_manifest {
        let manifest = RunManifest::new(
            started_at,
            &config.database.path,
            &config.queries.source_dir,
            &config.export.output_dir,
            &report,
        );
        ManifestExporter::new(&config.export.output_dir)?
            .write(&manifest, true)
            .context("Failed to write manifest")?;
    }

    print_summary(&report, &stats);

    if report.has_failures() {
        return Err(anyhow::anyhow!(
            "{} of {} query files failed",
            report.failures.len(),
            report.total()
        ));
    }

    info!("Query execution and saving completed successfully.");
    Ok(())
}

fn print_summary(report: &BatchReport, stats: &BatchStats) {
    if report.total() == 0 {
        println!("{}", format_warning("No query files were executed"));
        return;
    }

    println!(
        "{}",
        format_success(&format!(
            "{} query files exported ({} rows, {} bytes) in {:.2}s, {:.0} rows/s",
            stats.files_executed,
            stats.rows_written,
            stats.bytes_written,
            stats.duration_ms as f64 / 1000.0,
            stats.rows_per_second()
        ))
    );

    for failure in &report.failures {
        println!(
            "{}",
            format_error(&format!(
                "{}: {}",
                failure.query_file.display(),
                failure.error
            ))
        );
    }

    if stats.files_failed > 0 {
        println!(
            "{}",
            format_info(&format!("Success rate: {:.1}%", stats.success_rate()))
        );
    }
}

fn cmd_list(config: &Config) -> Result<()> {
    let source = &config.queries.source_dir;
    let scanner = QueryScanner::new(&config.queries);
    let files = scanner
        .scan_directory(source)
        .context("Failed to scan query directory")?;

    if files.is_empty() {
        warn!("No SQL files found in {}", source.display());
        println!(
            "{}",
            format_warning(&format!("No query files in {}", source.display()))
        );
        return Ok(());
    }

    println!("\nQuery files in {} ({})\n", source.display(), files.len());
    for (idx, file) in files.iter().enumerate() {
        println!(
            "{:>3}. {} → {} ({} bytes)",
            idx + 1,
            file.file_name,
            file.output_path(&config.export.output_dir).display(),
            file.size
        );
    }
    println!();

    Ok(())
}

fn cmd_verify(config: &Config) -> Result<()> {
    info!("Verifying database and query directory");

    let (ok, tables, database) = SqliteClient::with_connection(&config.database, |client| {
        Ok((client.ping()?, client.table_count()?, client.path().to_path_buf()))
    })
    .context("Database check failed")?;

    if !ok {
        println!("{}", format_error("Database ping returned an unexpected value"));
        return Err(anyhow::anyhow!("Database connection failed"));
    }

    println!(
        "{}",
        format_success(&format!(
            "Database {} reachable ({} tables)",
            database.display(),
            tables
        ))
    );

    let source = &config.queries.source_dir;
    match QueryScanner::new(&config.queries).scan_directory(source) {
        Ok(files) if files.is_empty() => {
            println!(
                "{}",
                format_warning(&format!("No query files in {}", source.display()))
            );
        }
        Ok(files) => {
            println!(
                "{}",
                format_success(&format!(
                    "{} query files in {}",
                    files.len(),
                    source.display()
                ))
            );
        }
        Err(e) => {
            println!("{}", format_error(&e.to_string()));
            return Err(e).context("Query directory check failed");
        }
    }

    Ok(())
}
