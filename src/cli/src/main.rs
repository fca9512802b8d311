#![warn(clippy::pedantic)]

mod config;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use config::Config;
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::{LevelFilter, info};
use owo_colors::OwoColorize;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use two_tool_core::{
    AlgDatabase, Color, Method, Scramble, SearchRequest, Solution, SolverWorker,
    rank_and_collapse, rank_json_batch,
};

/// Finds short inspections into known 2x2 last layer cases
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The configuration file to use, in TOML format. Ignored if missing.
    #[arg(long, short = 'c', default_value = "two-tool.toml", value_name = "CONFIG")]
    config: PathBuf,

    /// A case table to use instead of the builtin one, in TOML format.
    #[arg(long, value_name = "CASES")]
    algs: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a scramble and print the best solutions.
    Solve {
        /// The scramble, e.g. "R U' F2". Only R, U and F turns are allowed.
        scramble: Scramble,
        /// Inspection depth for CLL, EG-1, EG-2 and LEG-1
        #[arg(long)]
        eg: Option<u8>,
        /// Inspection depth for TCLL+ and TCLL-
        #[arg(long)]
        tcll: Option<u8>,
        /// Inspection depth for LS1 to LS9
        #[arg(long)]
        ls: Option<u8>,
        /// How many algs to show per case
        #[arg(long)]
        alg: Option<u8>,
        /// Show this method (can be repeated)
        #[arg(long = "method", short = 'm', value_name = "METHOD")]
        methods: Vec<Method>,
        /// Show every method
        #[arg(long, conflicts_with = "methods")]
        all: bool,
        /// Show this color (can be repeated)
        #[arg(long = "color", value_name = "COLOR")]
        colors: Vec<Color>,
        /// How many solutions to show
        #[arg(long)]
        limit: Option<usize>,
        /// Print the shown solutions as JSON
        #[arg(long)]
        json: bool,
        /// Print the unranked search output as JSON, ready for `rank`
        #[arg(long, conflicts_with = "json")]
        raw: bool,
        /// Print an annotated reconstruction of the best solution
        #[arg(long, short = 'r')]
        reconstruct: bool,
    },
    /// Rank and collapse a JSON batch of solutions.
    Rank {
        /// A file holding a JSON array of solutions
        batch: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the cases and algs of the case table.
    Cases {
        /// Only list this method
        #[arg(long, short = 'm')]
        method: Option<Method>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let mut config = Config::load(&cli.config)?;
    let algs = cli.algs.or_else(|| config.algs.clone());
    let database = Arc::new(load_database(algs.as_deref())?);

    match cli.command {
        Commands::Solve {
            scramble,
            eg,
            tcll,
            ls,
            alg,
            methods,
            all,
            colors,
            limit,
            json,
            raw,
            reconstruct,
        } => {
            let depths = &mut config.depths;
            for (flag, depth) in [
                (eg, &mut depths.eg),
                (tcll, &mut depths.tcll),
                (ls, &mut depths.ls),
                (alg, &mut depths.alg),
            ] {
                if let Some(flag) = flag {
                    *depth = flag;
                }
            }
            if all {
                config.methods = Some(Method::ALL.to_vec());
            } else if !methods.is_empty() {
                config.methods = Some(methods);
            }
            if !colors.is_empty() {
                config.colors = Some(colors);
            }
            if limit.is_some() {
                config.limit = limit;
            }

            let mut worker = SolverWorker::spawn(Arc::clone(&database));
            worker.submit(SearchRequest::new(scramble.clone(), &config.depths))?;
            let response = worker.recv_latest(config.timeout())?;

            if raw {
                println!("{}", serde_json::to_string_pretty(&response.solutions)?);
                return Ok(());
            }

            let ranked = rank_and_collapse(response.solutions);
            let filter = config.display_filter();
            let shown = filter.apply(&ranked).collect_vec();
            info!("Showing {} of {} solutions", shown.len(), ranked.len());

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print_solutions(&shown);
                if let Some(best) = shown.first().filter(|_| reconstruct) {
                    println!();
                    print!("{}", best.reconstruction(&scramble));
                }
            }
        }
        Commands::Rank { batch, json } => {
            let text = fs::read_to_string(&batch)
                .wrap_err_with(|| format!("Could not read {}", batch.display()))?;
            let ranked = rank_json_batch(&text)
                .wrap_err_with(|| format!("{} is not a JSON array", batch.display()))?;
            let filter = config.display_filter();
            let shown = filter.apply(&ranked).collect_vec();

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print_solutions(&shown);
            }
        }
        Commands::Cases { method } => {
            let records = database
                .records()
                .iter()
                .filter(|record| method.is_none_or(|method| record.method == method));
            for (method, records) in &records.chunk_by(|record| record.method) {
                println!("{}", method.bold());
                for (subset, records) in &records.chunk_by(|&record| record.subset.as_str()) {
                    let algs = records.map(|record| record.alg.to_string()).join(" | ");
                    println!("  {subset:<12}{algs}");
                }
            }
        }
    }

    Ok(())
}

fn load_database(algs: Option<&Path>) -> color_eyre::Result<AlgDatabase> {
    let database = match algs {
        Some(path) => {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("Could not read {}", path.display()))?;
            AlgDatabase::from_toml_str(&text)
                .wrap_err_with(|| format!("Invalid case table {}", path.display()))?
        }
        None => AlgDatabase::builtin()?,
    };
    Ok(database)
}

fn paint(color: Color) -> String {
    let name = format!("{:<7}", color.name());
    match color {
        Color::White => name.white().to_string(),
        Color::Green => name.green().to_string(),
        Color::Blue => name.blue().to_string(),
        Color::Red => name.red().to_string(),
        Color::Orange => name.truecolor(255, 140, 0).to_string(),
        Color::Yellow => name.yellow().to_string(),
    }
}

fn or_dash(text: String) -> String {
    if text.is_empty() { "-".to_owned() } else { text }
}

fn print_solutions(solutions: &[&Solution]) {
    if solutions.is_empty() {
        println!("{}", "No solutions".dimmed());
        return;
    }
    println!(
        "{}",
        format!(
            "{:>5}  {:<7}{:<12}{:<7}{:<8}{:<18}{:<4}{:<34}{}",
            "score", "method", "subset", "color", "face", "inspection", "pre", "alg", "post"
        )
        .bold()
    );
    for solution in solutions {
        println!(
            "{:>5}  {:<7}{:<12}{}{:<8}{:<18}{:<4}{:<34}{}",
            solution.score,
            solution.method.name(),
            solution.subset,
            paint(solution.color),
            or_dash(solution.face.clone()),
            or_dash(solution.inspection.to_string().to_lowercase()),
            solution.pre_auf.map(|turn| turn.to_string()).unwrap_or_default(),
            solution.alg.to_string(),
            solution.post_auf.map(|turn| turn.to_string()).unwrap_or_default(),
        );
    }
}
