use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, LevelFilter};
use nomo::{evaluate, load_registry, parse_assignment, AppError, Report, Settings};
use nomo_display::{
    feature_label, labels, render_contributions, render_svg, render_text, Locale,
};
use nomo_models::{FeatureKind, ModelDefinition, ModelRegistry, DEFAULT_MODEL_ID};
use serde_json::Value as JsonValue;

const SVG_WIDTH: u32 = 600;
const SVG_HEIGHT: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Svg,
}

#[derive(Debug, Parser)]
#[command(
    name = "nomo",
    version,
    about = "Nomogram calculator for airway hyperresponsiveness (AHR) risk",
    long_about = "nomo evaluates published logistic nomograms for airway hyperresponsiveness\n\
        in preschool children and reports the probability with a Low / Moderate / High\n\
        risk band and a gradient risk bar.\n\n\
        EXAMPLES:\n\
        \n  nomo score --set FeNO=20 --set RR=25 --set PTEF=150 --set Wheeze=yes\n\
        \n  nomo score --model ahr-clinical --input patient.json --format json\n\
        \n  nomo score --lang zh --set Wheeze=是\n\
        \n  nomo models\n\
        \n  nomo describe ahr-clinical@2.0.0"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file with additional model definitions
    #[arg(
        long = "models-json",
        value_name = "FILE",
        env = "NOMO_MODELS_JSON",
        global = true
    )]
    models_json: Option<PathBuf>,

    /// Language of labels and messages (en, zh)
    #[arg(
        short,
        long = "lang",
        value_name = "LANG",
        env = "NOMO_LANG",
        default_value = "en",
        global = true
    )]
    lang: Locale,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one patient
    #[command(
        about = "Score one patient against the active model",
        long_about = "Collects field values from --input and --set, validates them against the\n\
            model's clinical ranges, and prints the predicted probability of AHR.\n\n\
            Fields left out take the model's default when it declares one.\n\
            Yes/no fields accept yes/no, true/false, 1/0, 是/否."
    )]
    Score(ScoreArgs),

    /// List available models
    Models,

    /// Show the fields, ranges and coefficients of a model
    Describe(DescribeArgs),
}

#[derive(Debug, Args, Clone)]
struct ScoreArgs {
    /// Model to use: ID or ID@VERSION
    #[arg(short, long, value_name = "MODEL", env = "NOMO_MODEL", default_value = DEFAULT_MODEL_ID)]
    model: String,

    /// Field value, repeatable
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// JSON object of field values; --set entries override it
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Include per-feature contributions to the logit
    #[arg(long)]
    explain: bool,

    /// Width of the text risk bar in columns
    #[arg(long, value_name = "COLUMNS", default_value_t = 50)]
    width: usize,
}

#[derive(Debug, Args, Clone)]
struct DescribeArgs {
    /// Model to describe: ID or ID@VERSION
    #[arg(value_name = "MODEL", env = "NOMO_MODEL", default_value = DEFAULT_MODEL_ID)]
    model: String,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn read_input(path: &PathBuf) -> Result<JsonValue, AppError> {
    let text = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn render_report(report: &Report, args: &ScoreArgs, locale: Locale) -> String {
    match args.format {
        OutputFormat::Json => {
            let value = report.to_json(args.explain);
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
        OutputFormat::Svg => render_svg(&report.view, labels(locale), SVG_WIDTH, SVG_HEIGHT),
        OutputFormat::Text => {
            let mut out = format!("{}\n\n", report.definition.title_in(locale.code()));
            out.push_str(&render_text(&report.view, labels(locale), args.width));
            if args.explain {
                out.push('\n');
                out.push_str(&render_contributions(&report.explanation, locale));
            }
            out
        }
    }
}

fn run_score(registry: &ModelRegistry, settings: &Settings, args: &ScoreArgs) -> i32 {
    let mut answers = Vec::with_capacity(args.set.len());
    for item in &args.set {
        match parse_assignment(item) {
            Ok(pair) => answers.push(pair),
            Err(e) => {
                eprintln!("error: {e}");
                return 1;
            }
        }
    }

    let input = match args.input.as_ref().map(read_input).transpose() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return e.exit_code();
        }
    };

    match evaluate(registry, &settings.model, input.as_ref(), &answers) {
        Ok(report) => {
            debug!("scored with {}", report.definition.key());
            let out = render_report(&report, args, settings.locale);
            print!("{out}");
            if !out.ends_with('\n') {
                println!();
            }
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}

fn run_models(registry: &ModelRegistry) -> i32 {
    for def in registry.list() {
        println!(
            "{:<24} {} features  {}",
            def.key(),
            def.model.len(),
            def.title
        );
    }
    0
}

fn describe_model(def: &ModelDefinition, locale: Locale) -> String {
    let labels = labels(locale);
    let mut out = format!("{} ({})\n", def.title_in(locale.code()), def.key());
    if let Some(citation) = &def.citation {
        out.push_str(&format!("{citation}\n"));
    }
    out.push_str(&format!("\n{}\n", labels.prompt));
    out.push_str(&format!(
        "  {:<28} {:>9}\n",
        labels.intercept,
        def.model.intercept()
    ));
    for spec in &def.features {
        let weight = def.model.weight(&spec.key).unwrap_or_default();
        let domain = match &spec.kind {
            FeatureKind::Continuous { min, max, unit } => format!("{min}-{max} {unit}"),
            FeatureKind::Binary => format!("{}/{}", labels.yes, labels.no),
        };
        let default = match spec.default {
            Some(d) if spec.is_binary() => format!("default {}", labels.flag(d != 0.0)),
            Some(d) => format!("default {d}"),
            None => "required".to_string(),
        };
        out.push_str(&format!(
            "  {:<28} {:>9}  {:<16} {}\n",
            feature_label(locale, &spec.key),
            weight,
            domain,
            default
        ));
    }
    out
}

fn run_describe(registry: &ModelRegistry, selector: &str, locale: Locale) -> i32 {
    match registry.resolve(selector) {
        Ok(def) => {
            print!("{}", describe_model(&def, locale));
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            2
        }
    }
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = match load_registry(cli.models_json.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };

    match cli.command {
        Command::Score(args) => {
            let settings = Settings {
                model: args.model.clone(),
                locale: cli.lang,
            };
            run_score(&registry, &settings, &args)
        }
        Command::Models => run_models(&registry),
        Command::Describe(args) => run_describe(&registry, &args.model, cli.lang),
    }
}

fn main() {
    std::process::exit(run_cli());
}
