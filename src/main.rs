use bai_engine::config::EngineConfig;
use bai_engine::filter::{self, FilterExpression, LogicalOperator};
use bai_engine::units::{self, AutoUnitPolicy, TargetUnit};
use clap::{Parser, Subcommand};
use std::cmp::Ordering;

#[derive(Parser)]
#[command(name = "bai-engine")]
#[command(about = "Resource size conversion and filter expression tool", long_about = None)]
struct Cli {
    /// Config file with display settings and filterable properties
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a size such as "4g" into another unit
    Convert {
        /// Size string (e.g., "1.5g", "1024")
        quantity: String,

        /// Target unit (B, K, M, G, T, P, E) or "auto"
        #[arg(short, long, default_value = "auto")]
        to: String,

        /// Fractional digits (defaults to the config value)
        #[arg(short, long)]
        digits: Option<usize>,

        /// Round instead of truncating
        #[arg(short, long)]
        round: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two sizes, printing "<", "=" or ">"
    Compare { left: String, right: String },

    /// Percentage of a capacity in use
    Percent {
        used: String,
        total: String,

        #[arg(short, long, default_value_t = 2)]
        digits: usize,
    },

    /// Build a filter string from KEY=VALUE pairs
    Build {
        /// Predicate to add (e.g., "schedulable=true")
        #[arg(short = 'a', long = "add", value_name = "KEY=VALUE")]
        predicates: Vec<String>,
    },

    /// Parse a filter string and print its predicates as JSON
    Parse { filter: String },

    /// Combine filter fragments
    Merge {
        fragments: Vec<String>,

        /// Join with "|" instead of "&"
        #[arg(long)]
        or: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::empty(),
    };

    match cli.command {
        Commands::Convert {
            quantity,
            to,
            digits,
            round,
            json,
        } => convert_size(&config, &quantity, &to, digits, round, json),
        Commands::Compare { left, right } => compare_sizes(&left, &right),
        Commands::Percent {
            used,
            total,
            digits,
        } => print_percent(&used, &total, digits),
        Commands::Build { predicates } => build_filter(&config, &predicates),
        Commands::Parse { filter } => parse_filter(&config, &filter),
        Commands::Merge { fragments, or } => merge_fragments(fragments, or),
    }
}

fn convert_size(
    config: &EngineConfig,
    quantity: &str,
    to: &str,
    digits: Option<usize>,
    round: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = config.display.convert_options();
    if let Some(digits) = digits {
        options.fraction_digits = digits;
    }
    options.rounding |= round;

    let target: TargetUnit = to.parse()?;
    let parsed = units::parse_quantity(quantity)?;
    let policy: &dyn AutoUnitPolicy = &config.display.auto_unit;
    let converted = units::convert_with_policy(&parsed, target, &options, policy)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&converted)?);
    } else {
        println!("{}", converted.number_unit);
    }
    Ok(())
}

fn compare_sizes(left: &str, right: &str) -> Result<(), Box<dyn std::error::Error>> {
    let symbol = match units::compare_quantities(left, right)? {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    println!("{} {} {}", left, symbol, right);
    Ok(())
}

fn print_percent(used: &str, total: &str, digits: usize) -> Result<(), Box<dyn std::error::Error>> {
    let base = units::SizeBase::Binary;
    let used = units::parse_quantity(used)?.to_bytes(base);
    let total = units::parse_quantity(total)?.to_bytes(base);

    match units::usage_percent(used, total, digits) {
        Some(percent) => println!("{}%", percent),
        None => println!("-"),
    }
    Ok(())
}

fn build_filter(config: &EngineConfig, pairs: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let registry = config.registry()?;
    let mut expr = FilterExpression::new();

    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("Expected KEY=VALUE, got '{}'", pair))?;
        expr = expr.add_predicate(&registry, key.trim(), value)?;
    }

    match expr.serialize() {
        Some(filter) => println!("{}", filter),
        None => eprintln!("No predicates given"),
    }
    Ok(())
}

fn parse_filter(config: &EngineConfig, input: &str) -> Result<(), Box<dyn std::error::Error>> {
    let registry = config.registry()?;
    let expr = filter::parse_filter_with_registry(input, &registry);
    println!("{}", serde_json::to_string_pretty(&expr)?);
    Ok(())
}

fn merge_fragments(fragments: Vec<String>, or: bool) -> Result<(), Box<dyn std::error::Error>> {
    let operator = if or {
        LogicalOperator::Or
    } else {
        LogicalOperator::And
    };

    match filter::merge_filter_values_with(fragments.into_iter().map(Some), operator) {
        Some(merged) => println!("{}", merged),
        None => eprintln!("All fragments were empty"),
    }
    Ok(())
}
