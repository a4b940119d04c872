//! codetally CLI - error code frequency tables from Word documents
//!
//! A command-line tool for tallying annotated error codes across a folder
//! of DOCX essays.

use clap::{Args, Parser, Subcommand, ValueEnum};
use codetally::codes::DEFAULT_CODE_FILE;
use codetally::counter::{self, DEFAULT_KEY_TEXT};
use codetally::options::{DEFAULT_RATE, DEFAULT_SKIP_PREFIX};
use codetally::render::to_preview;
use codetally::{
    pivot, CodeSource, CodeTable, CutoffStatus, OutputFormat, TallyOptions, Tallier, TextEncoding,
};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CODETALLY_LOG";

/// Tally annotated error codes in Word documents
#[derive(Parser)]
#[command(
    name = "codetally",
    version,
    about = "Tally annotated error codes in Word documents",
    long_about = "codetally - error code frequency tables from Word documents.\n\n\
                  Counts bracketed error codes such as [AE] in every .docx file of a folder\n\
                  and writes raw and normalized tables grouped by treatment and subject."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tally a folder of documents and write the frequency tables
    Tally {
        /// Folder holding the .docx files
        folder: PathBuf,

        /// Base name of the output files
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        codes: CodeArgs,

        #[command(flatten)]
        key: KeyTextArgs,

        /// Separator between filename fields
        #[arg(short, long, default_value = ".")]
        delimiter: String,

        /// Filename field holding the treatment
        #[arg(long, default_value_t = 0)]
        treatment_index: usize,

        /// Filename field holding the subject
        #[arg(long, default_value_t = 1)]
        case_index: usize,

        /// Normalize counts per this many words
        #[arg(long, default_value_t = DEFAULT_RATE)]
        rate: f64,

        /// Skip files whose names start with this
        #[arg(long, default_value = DEFAULT_SKIP_PREFIX)]
        skip_prefix: String,

        /// Output file format
        #[arg(long, default_value = "csv")]
        format: FormatArg,

        /// Print the normalized table to stdout
        #[arg(long)]
        preview: bool,
    },

    /// Count codes in a single document
    Count {
        /// Input file path
        input: PathBuf,

        #[command(flatten)]
        codes: CodeArgs,

        #[command(flatten)]
        key: KeyTextArgs,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the code table in effect
    Codes {
        #[command(flatten)]
        codes: CodeArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct CodeArgs {
    /// Code table file with one `code, label` per line
    #[arg(long = "codes", default_value = DEFAULT_CODE_FILE)]
    code_file: PathBuf,

    /// Use the built-in codes instead of a code file
    #[arg(long, conflicts_with = "code_file")]
    builtin_codes: bool,

    /// Encoding of the code file
    #[arg(long, default_value = "utf-8")]
    encoding: String,
}

impl CodeArgs {
    fn source(&self) -> Result<CodeSource, Box<dyn std::error::Error>> {
        if self.builtin_codes {
            return Ok(CodeSource::Builtin);
        }
        Ok(CodeSource::File {
            path: self.code_file.clone(),
            encoding: self.encoding.parse::<TextEncoding>()?,
        })
    }
}

#[derive(Args)]
struct KeyTextArgs {
    /// Stop counting at the first occurrence of this text
    #[arg(long, default_value = DEFAULT_KEY_TEXT)]
    key_text: String,

    /// Count whole documents
    #[arg(long, conflicts_with = "key_text")]
    no_key_text: bool,
}

impl KeyTextArgs {
    fn marker(&self) -> Option<String> {
        (!self.no_key_text).then(|| self.key_text.clone())
    }
}

/// Output file format
#[derive(Clone, ValueEnum)]
enum FormatArg {
    /// `, `-separated tables
    Csv,
    /// JSON grids
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("codetally=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Tally {
            folder,
            output,
            codes,
            key,
            delimiter,
            treatment_index,
            case_index,
            rate,
            skip_prefix,
            format,
            preview,
        } => {
            let options = TallyOptions::new(folder, output)
                .with_code_source(codes.source()?)
                .with_key_text(key.marker())
                .with_delimiter(delimiter)
                .with_treatment_index(treatment_index)
                .with_case_index(case_index)
                .with_rate(rate)
                .with_skip_prefix(skip_prefix)
                .with_format(format.into());

            let tallier = Tallier::new(options)?;
            let pb = create_progress(tallier.files().len() as u64);
            let records = tallier.records_with(|_| pb.inc(1));
            pb.finish_and_clear();
            let records = records?;

            let table = pivot::aggregate(&records, tallier.codes())?;
            let paths = tallier.write(&table)?;

            let unkeyed: Vec<&str> = records
                .iter()
                .filter(|r| r.cutoff == CutoffStatus::Missing)
                .map(|r| r.source.as_str())
                .collect();
            if !unkeyed.is_empty() {
                println!(
                    "{} No answer key in {} document(s): {}",
                    "!".yellow().bold(),
                    unkeyed.len(),
                    unkeyed.join(", ")
                );
            }

            if preview {
                print!("{}", to_preview(&table.grid(Some(rate))?));
            }

            println!(
                "{} Tallied {} documents ({} subjects, {} treatments)",
                "✓".green().bold(),
                records.len(),
                table.rows.len(),
                table.treatments.len()
            );
            println!("  {}", paths.frequencies.display());
            println!("  {}", paths.normalized.display());
        }

        Commands::Count {
            input,
            codes,
            key,
            json,
        } => {
            let table = CodeTable::load(&codes.source()?)?;
            let text = codetally::extract_text(&input)?;
            let counts = counter::count(&text, &table, key.marker().as_deref());

            if json {
                let frequencies: serde_json::Map<String, serde_json::Value> = table
                    .codes()
                    .map(|code| (code.to_string(), counts.frequencies[code].into()))
                    .collect();
                let value = serde_json::json!({
                    "file": input.display().to_string(),
                    "frequencies": frequencies,
                    "word_count": counts.word_count,
                    "cutoff": counts.cutoff,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            println!("{}", "Document Tally".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            for entry in &table {
                println!(
                    "{:<8} {:<24} {}",
                    entry.code,
                    entry.label,
                    counts.frequencies[&entry.code]
                );
            }
            println!("{}: {}", "Words".bold(), counts.word_count);
            let cutoff = match counts.cutoff {
                CutoffStatus::Applied => "answer key excluded".normal(),
                CutoffStatus::Missing => "no answer key found".yellow(),
                CutoffStatus::Disabled => "disabled".normal(),
            };
            println!("{}: {}", "Cutoff".bold(), cutoff);
        }

        Commands::Codes { codes } => {
            let source = codes.source()?;
            let table = CodeTable::load(&source)?;
            match source {
                CodeSource::Builtin => println!("{}", "Built-in codes".cyan().bold()),
                CodeSource::File { path, encoding } => println!(
                    "{} {} ({})",
                    "Codes from".cyan().bold(),
                    path.display(),
                    encoding
                ),
            }
            println!("{}", "─".repeat(40));
            for entry in &table {
                println!("{:<8} {}", entry.code, entry.label);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "codetally".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Error code frequency tables from Word documents");
    println!();
    println!("Supported formats: DOCX");
}

fn create_progress(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} documents")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tally_defaults() {
        let cli = Cli::try_parse_from(["codetally", "tally", "texts", "-o", "MyCSV"]).unwrap();
        match cli.command {
            Commands::Tally {
                codes,
                key,
                delimiter,
                rate,
                ..
            } => {
                assert_eq!(codes.code_file, PathBuf::from("codes.csv"));
                assert!(!codes.builtin_codes);
                assert_eq!(key.marker().as_deref(), Some("Key for Error Types:"));
                assert_eq!(delimiter, ".");
                assert_eq!(rate, 100.0);
            }
            _ => panic!("expected tally"),
        }
    }

    #[test]
    fn test_builtin_codes_flag() {
        let cli = Cli::try_parse_from([
            "codetally",
            "tally",
            "texts",
            "-o",
            "out",
            "--builtin-codes",
            "--no-key-text",
        ])
        .unwrap();
        match cli.command {
            Commands::Tally { codes, key, .. } => {
                assert_eq!(codes.source().unwrap(), CodeSource::Builtin);
                assert_eq!(key.marker(), None);
            }
            _ => panic!("expected tally"),
        }
    }
}
