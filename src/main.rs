//! charlock CLI - character encoding detector

use charlock::{Detector, EncodingMatch, SampleSize};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Character encoding detector.
///
/// Reports the most likely encoding of each input, or every plausible
/// encoding ranked by confidence.
#[derive(Parser, Debug)]
#[command(name = "charlock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the most likely encoding of each input
    Detect(DetectArgs),
    /// Print every plausible encoding of each input, best first
    DetectAll(DetectArgs),
    /// List the encodings that can be reported
    List {
        /// Output format
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(ClapArgs, Debug)]
struct DetectArgs {
    /// Input file(s); `-` reads standard input
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Declared or expected encoding, used as a hint
    #[arg(long)]
    hint: Option<String>,

    /// Drop candidates below this confidence (0-100)
    #[arg(short = 'm', long, default_value_t = charlock::DEFAULT_MIN_CONFIDENCE)]
    min_confidence: u8,

    /// Remove markup tags before analysis
    #[arg(long)]
    strip_tags: bool,

    /// Number of bytes to sample from each input
    #[arg(short = 'b', long)]
    sample_bytes: Option<usize>,

    /// Read entire inputs instead of sampling
    #[arg(short = 'a', long)]
    all: bool,

    /// Output format
    #[arg(short = 'f', long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::List { format } => {
            print_supported(format);
            ExitCode::SUCCESS
        }
        Command::Detect(args) => run(&args, false),
        Command::DetectAll(args) => run(&args, true),
    }
}

/// Install the log subscriber; `CHARLOCK_LOG` sets the filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("CHARLOCK_LOG").unwrap_or_else(|_| EnvFilter::new("charlock=warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(args: &DetectArgs, all: bool) -> ExitCode {
    let detector = match build_detector(args) {
        Ok(detector) => detector,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut exit_code = ExitCode::SUCCESS;

    for input in &args.inputs {
        match detect_input(&detector, input, all) {
            Ok(matches) => print_matches(input, &matches, args.format, all),
            Err(e) => {
                eprintln!("Error processing {input}: {e}");
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    exit_code
}

fn build_detector(args: &DetectArgs) -> charlock::Result<Detector> {
    let mut detector = Detector::new();

    if args.all {
        detector.sample_size(SampleSize::All);
    } else if let Some(bytes) = args.sample_bytes {
        if bytes == 0 {
            return Err(charlock::CharlockError::InvalidArgument(
                "--sample-bytes must be greater than 0".to_string(),
            ));
        }
        detector.sample_size(SampleSize::Bytes(bytes));
    }

    if let Some(ref hint) = args.hint {
        detector.hint(hint.as_str());
    }

    detector
        .strip_tags(args.strip_tags)
        .min_confidence(args.min_confidence)?;

    Ok(detector)
}

fn detect_input(
    detector: &Detector,
    input: &str,
    all: bool,
) -> Result<Vec<EncodingMatch>, Box<dyn std::error::Error>> {
    let data = read_input(detector, input)?;
    let matches = if all {
        detector.detect_all(&data)
    } else {
        detector.detect(&data).into_iter().collect()
    };
    Ok(matches)
}

fn read_input(detector: &Detector, input: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if input == "-" {
        return Ok(detector.read_sample(std::io::stdin().lock())?);
    }

    #[cfg(feature = "http")]
    if charlock::http::is_url(input) {
        return Ok(charlock::http::fetch_sample(input, detector.sampling())?);
    }

    let file = std::fs::File::open(input)?;
    Ok(detector.read_sample(std::io::BufReader::new(file))?)
}

fn print_matches(input: &str, matches: &[EncodingMatch], format: OutputFormat, all: bool) {
    match format {
        OutputFormat::Text => {
            if matches.is_empty() {
                println!("{input}: unknown");
                return;
            }
            if !all {
                println!("{input}: {}", describe(&matches[0]));
                return;
            }
            println!("{input}:");
            for m in matches {
                println!("  {}", describe(m));
            }
        }
        OutputFormat::Json => {
            let value = if all {
                serde_json::json!({ "input": input, "matches": matches })
            } else {
                serde_json::json!({ "input": input, "match": matches.first() })
            };
            println!("{value}");
        }
    }
}

fn describe(m: &EncodingMatch) -> String {
    if m.is_binary() {
        "binary".to_string()
    } else {
        m.to_string()
    }
}

fn print_supported(format: OutputFormat) {
    let names = charlock::get_supported_encodings();
    match format {
        OutputFormat::Text => {
            for name in names {
                println!("{name}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::json!(names)),
    }
}
