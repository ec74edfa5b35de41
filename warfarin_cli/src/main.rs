use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use warfarin_core::catalog::{DISCLAIMER, RESULT_NOTE};
use warfarin_core::config::OutputFormat;
use warfarin_core::schema::{self, FieldKind, FieldSpec};
use warfarin_core::*;

#[derive(Parser)]
#[command(name = "warfarin-dose")]
#[command(about = "Warfarin maintenance dose calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a dose from name=value fields
    Calc {
        /// Model (iwpc, gage, xiangya, biss, clover)
        #[arg(long, short)]
        model: Option<String>,

        /// Input field, e.g. -f age=65 -f vkorc1=AG
        #[arg(long = "field", short = 'f', value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the available models
    Models,

    /// Show the input fields of one model
    Describe {
        /// Model id
        model: String,
    },

    /// Evaluate every row of a CSV file
    Batch {
        /// Model (iwpc, gage, xiangya, biss, clover)
        #[arg(long, short)]
        model: Option<String>,

        /// CSV with one column per input field
        input: PathBuf,

        /// Write results here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print JSON instead of CSV on stdout
        #[arg(long, conflicts_with = "output")]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            if e.is_input_error() {
                eprintln!("Please fill in all required fields.");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    warfarin_core::logging::init_with_level(&config.logging.level);

    let errors = catalog::validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    match cli.command {
        Commands::Calc {
            model,
            fields,
            json,
        } => {
            let model = resolve_model(model.as_deref(), &config)?;
            let format = if json {
                OutputFormat::Json
            } else {
                config.output.format
            };
            cmd_calc(model, fields, format)
        }
        Commands::Models => cmd_models(),
        Commands::Describe { model } => cmd_describe(model.parse()?),
        Commands::Batch {
            model,
            input,
            output,
            json,
        } => {
            let model = resolve_model(model.as_deref(), &config)?;
            cmd_batch(model, input, output, json)
        }
    }
}

fn resolve_model(arg: Option<&str>, config: &Config) -> Result<ModelId> {
    let model = match arg {
        Some(id) => id.parse()?,
        None => config.defaults.model,
    };
    tracing::debug!("Using model {}", model);
    Ok(model)
}

fn parse_field(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    if name.trim().is_empty() {
        return Err(format!("empty field name in '{}'", s));
    }
    Ok((name.trim().to_string(), value.to_string()))
}

fn cmd_calc(model: ModelId, fields: Vec<(String, String)>, format: OutputFormat) -> Result<()> {
    let raw: RawFields = fields.into_iter().collect();
    let result = calculate(model, &raw)?;

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "model": model,
                "result": result,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => display_result(model, &result),
    }
    Ok(())
}

fn cmd_models() -> Result<()> {
    for info in all_models() {
        println!("{:<8} {}", info.id, info.name);
        println!("         {}", info.description);
        println!("         Population: {}", info.population);
    }
    Ok(())
}

fn cmd_describe(model: ModelId) -> Result<()> {
    let info = model_info(model);

    println!("{} ({})", info.name, info.id);
    println!("{}", info.description);
    println!();
    println!("Fields:");
    for field in schema::schema(model) {
        println!("  {}", describe_field(field));
    }
    println!();
    println!("Factors:");
    for factor in info.factors {
        println!("  - {}", factor);
    }
    Ok(())
}

fn describe_field(field: &FieldSpec) -> String {
    let domain = match field.kind {
        FieldKind::Positive { unit, max } => format!("0 < number <= {} ({})", max, unit),
        FieldKind::Choice { labels } => labels.join(" | "),
        FieldKind::Count { max: Some(max) } => format!("0..={}", max),
        FieldKind::Count { max: None } => "whole number >= 0".to_string(),
        FieldKind::Flag => schema::FLAG_LABELS.join(" | "),
    };
    let presence = match field.default {
        Some(default) => format!("optional, default {}", default),
        None => "required".to_string(),
    };
    format!(
        "{:<18} {:<10} {} [{}]",
        field.name, presence, field.description, domain
    )
}

fn cmd_batch(
    model: ModelId,
    input: PathBuf,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let rows = batch::evaluate_csv(model, File::open(&input)?)?;
    let failed = rows.iter().filter(|r| !r.is_ok()).count();

    match output {
        Some(path) => {
            batch::write_csv(&path, &rows)?;
            println!("✓ Wrote {} rows to {}", rows.len(), path.display());
        }
        None if json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        None => {
            let stdout = io::stdout();
            batch::write_rows(stdout.lock(), &rows)?;
        }
    }

    if failed > 0 {
        eprintln!("{} of {} rows failed validation", failed, rows.len());
    }
    Ok(())
}

fn display_result(model: ModelId, result: &DoseResult) {
    let info = model_info(model);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} MODEL", info.name.to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    let prec = info.precision as usize;
    println!("  Daily dose:   {:.prec$} mg/day", result.daily_dose);
    println!("  Weekly dose:  {:.prec$} mg/week", result.weekly_dose);
    if let Some(bsa) = result.bsa {
        println!("  BSA:          {:.2} m²", bsa);
    }
    println!();
    println!("  ℹ {}", RESULT_NOTE);
    println!("  ⚠ {}", DISCLAIMER);
    println!();
}
