use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use referent_core::config_file::{self, ConfigFile};
use referent_core::{
    ExtractedFields, ReferenceType, ReferenceValidator, Style, ValidatorConfigBuilder,
    basic_validation, classify, clean_reference, extract_fields_with,
};
use tracing_subscriber::EnvFilter;

mod output;

use output::{ColorMode, Diagnosis};

/// Bibliographic reference validator - check GOST, APA and MLA references
/// for structure, required fields and field formats
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every reference in a text file (or `-` for stdin)
    Check {
        /// Path to a text file with a bibliography, or `-` for stdin
        input: PathBuf,

        /// Citation style: GOST, APA or MLA
        #[arg(short, long)]
        style: Option<String>,

        /// Expected subtype, e.g. `journal-article` or `Книга`
        #[arg(long)]
        subtype: Option<String>,

        /// CSV journal registry with `journal` and `ISSN` columns
        #[arg(long)]
        journals: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Classify a single reference and show every validation stage
    Classify {
        /// The reference text
        reference: String,

        /// Citation style: GOST, APA or MLA
        #[arg(short, long)]
        style: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List supported styles, subtypes and their required fields
    Styles {
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file_config = config_file::load_config();

    match cli.command {
        Command::Check {
            input,
            style,
            subtype,
            journals,
            format,
            output,
            no_color,
        } => check(
            &file_config,
            CheckArgs {
                input,
                style,
                subtype,
                journals,
                format,
                output,
                no_color,
            },
        ),
        Command::Classify {
            reference,
            style,
            no_color,
        } => classify_one(&file_config, &reference, style, no_color),
        Command::Styles { no_color } => {
            let color = ColorMode(!no_color && file_config.color().unwrap_or(true));
            output::print_styles(&mut std::io::stdout(), color)?;
            Ok(())
        }
    }
}

struct CheckArgs {
    input: PathBuf,
    style: Option<String>,
    subtype: Option<String>,
    journals: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
    no_color: bool,
}

/// Resolve the style: CLI flag > `REFERENT_STYLE` > config file > GOST.
fn resolve_style(flag: Option<String>, file_config: &ConfigFile) -> anyhow::Result<Style> {
    let token = flag
        .or_else(|| std::env::var("REFERENT_STYLE").ok())
        .or_else(|| file_config.style().map(String::from));
    match token {
        Some(token) => Ok(token.parse()?),
        None => Ok(Style::Gost),
    }
}

fn build_validator(
    file_config: &ConfigFile,
    journals: Option<PathBuf>,
) -> anyhow::Result<ReferenceValidator> {
    let registry_path = journals
        .or_else(|| std::env::var("REFERENT_JOURNALS").ok().map(PathBuf::from))
        .or_else(|| file_config.registry_path().map(PathBuf::from));

    let mut builder = file_config.apply(ValidatorConfigBuilder::new());
    if let Some(path) = registry_path {
        if !path.exists() {
            anyhow::bail!("Journal registry not found at {}", path.display());
        }
        builder = builder.journal_registry_path(path);
    }
    let config = builder.build().context("Failed to load journal registry")?;
    Ok(ReferenceValidator::with_config(config))
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn check(file_config: &ConfigFile, args: CheckArgs) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let style = resolve_style(args.style, file_config)?;
    let expected = args
        .subtype
        .or_else(|| std::env::var("REFERENT_SUBTYPE").ok())
        .or_else(|| file_config.subtype().map(String::from))
        .map(|token| ReferenceType::parse(style, &token))
        .transpose()?;
    let validator = build_validator(file_config, args.journals)?;

    let text = read_input(&args.input)?;
    let references = referent_parsing::extract_references_from_text(&text);
    if references.is_empty() {
        anyhow::bail!("No references found in {}", args.input.display());
    }
    tracing::info!(count = references.len(), style = %style, "validating references");

    let report = validator.validate_batch_par(&references, style, expected);

    let use_color = !args.no_color && args.output.is_none() && file_config.color().unwrap_or(true);
    let color = ColorMode(use_color);

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = args.output {
        Box::new(
            std::fs::File::create(output_path)
                .with_context(|| format!("Failed to create {}", output_path.display()))?,
        )
    } else {
        Box::new(std::io::stdout())
    };

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
        OutputFormat::Text => {
            output::print_report(&mut *writer, &report, color)?;
            output::print_summary(&mut *writer, &report, style, color)?;
        }
    }
    writer.flush()?;

    if let Some(ref output_path) = args.output {
        eprintln!("Output written to {}", output_path.display());
    }
    Ok(())
}

fn classify_one(
    file_config: &ConfigFile,
    reference: &str,
    style: Option<String>,
    no_color: bool,
) -> anyhow::Result<()> {
    let style = resolve_style(style, file_config)?;
    let validator = build_validator(file_config, None)?;
    let color = ColorMode(!no_color && file_config.color().unwrap_or(true));

    let cleaned = clean_reference(reference);
    let (ok, basic_errors) = basic_validation(&cleaned);
    let detected = ok.then(|| classify(style, &cleaned));
    let fields = match &detected {
        Some(Ok(t)) if t.is_determined() => {
            extract_fields_with(style, *t, &cleaned, validator.cities())
        }
        _ => ExtractedFields::new(),
    };
    let result = validator.validate(&cleaned, style, None);

    output::print_classification(
        &mut std::io::stdout(),
        &Diagnosis {
            cleaned: &cleaned,
            style,
            basic_errors: &basic_errors,
            detected: detected.as_ref(),
            fields: &fields,
            result: &result,
        },
        color,
    )?;
    Ok(())
}
