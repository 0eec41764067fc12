// SPDX-FileCopyrightText: 2025 Galen Cuthbertson <g@galen.me>
// SPDX-License-Identifier: MIT

use ppid::{
    codec::{geo, GEOCODE_SYMBOLS},
    decode_answers, decode_approx, generate,
    path::default_config_path,
    validate, Answer, GeneratorConfig, Location, Ppid, STANDARD_QUESTIONNAIRE,
};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select};
use std::{fs, path::PathBuf, process::exit};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "\n  ppid <ppid-command> [options]",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        match self.command {
            Command::Generate(opts) => run_generate(opts),
            Command::Decode(opts) => run_decode(opts),
            Command::Geocode(opts) => run_geocode(opts),
            Command::Check(opts) => run_check(opts),
            Command::Config(opts) => run_config(opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Generate a new identifier from current time, place, and answers.
    #[command(override_usage = "ppid generate [options]")]
    Generate(GenerateOptions),

    /// Decode approximate time and place from an identifier.
    #[command(override_usage = "ppid decode [options] <identifier>")]
    Decode(DecodeOptions),

    /// Encode a standalone geocode for a coordinate, or decode one.
    #[command(override_usage = "ppid geocode [options]")]
    Geocode(GeocodeOptions),

    /// Structurally check a candidate identifier.
    #[command(override_usage = "ppid check <candidate>")]
    Check(CheckOptions),

    /// Show the effective configuration.
    #[command(override_usage = "ppid config [options]")]
    Config(ConfigOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct GenerateOptions {
    /// Latitude in degrees; prompted for when absent.
    #[arg(long, value_name = "degrees", allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Longitude in degrees; prompted for when absent.
    #[arg(long, value_name = "degrees", allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Generation instant; defaults to the current UTC time.
    #[arg(short, long, value_name = "datetime")]
    pub now: Option<NaiveDateTime>,

    /// Reference epoch override; defaults to the configured epoch.
    #[arg(short, long, value_name = "datetime")]
    pub epoch: Option<NaiveDateTime>,

    /// Path to configuration file.
    #[arg(short, long, value_name = "path")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct DecodeOptions {
    /// Identifier to decode.
    #[arg(required = true, value_name = "identifier")]
    pub identifier: String,

    /// Also recover the standard-questionnaire answers.
    #[arg(short, long)]
    pub answers: bool,

    /// Path to configuration file.
    #[arg(short, long, value_name = "path")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct GeocodeOptions {
    /// Latitude in degrees; prompted for when absent.
    #[arg(long, value_name = "degrees", allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Longitude in degrees; prompted for when absent.
    #[arg(long, value_name = "degrees", allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Decode target geocode instead of encoding.
    #[arg(short, long, value_name = "code")]
    pub decode: Option<String>,

    /// Path to configuration file.
    #[arg(short, long, value_name = "path")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct CheckOptions {
    /// Candidate string to check.
    #[arg(required = true, value_name = "candidate")]
    pub candidate: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ConfigOptions {
    /// Path to configuration file.
    #[arg(short, long, value_name = "path")]
    pub config: Option<PathBuf>,
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn run_generate(opts: GenerateOptions) -> Result<()> {
    let mut config = load_config(opts.config)?;
    if let Some(epoch) = opts.epoch {
        config.epoch = epoch;
    }

    let now = opts.now.unwrap_or_else(|| Utc::now().naive_utc());
    let location = Location::new(
        coordinate(opts.latitude, "latitude (degrees):")?,
        coordinate(opts.longitude, "longitude (degrees):")?,
    )?;

    let mut answers: Vec<Answer> = Vec::with_capacity(STANDARD_QUESTIONNAIRE.len());
    for topic in STANDARD_QUESTIONNAIRE {
        let selection = Select::new(topic.prompt, topic.labels.to_vec()).raw_prompt()?;
        answers.push(topic.answer_by_index(selection.index)?);
    }

    let ppid = generate(now, location, &answers, &config)?;
    println!("{ppid}");

    Ok(())
}

fn run_decode(opts: DecodeOptions) -> Result<()> {
    let config = load_config(opts.config)?;
    let ppid: Ppid = opts.identifier.parse()?;
    let decoded = decode_approx(ppid.as_str(), &config)?;
    let (latitude_error, longitude_error) = geo::cell_error(GEOCODE_SYMBOLS)?;

    println!("identifier:        {ppid}");
    println!("hours since epoch: {}", decoded.hours_since_epoch);
    println!("hour window start: {}", decoded.approx_instant);
    println!(
        "latitude:          {:.4} ± {:.4}",
        decoded.location.latitude(),
        latitude_error
    );
    println!(
        "longitude:         {:.4} ± {:.4}",
        decoded.location.longitude(),
        longitude_error
    );

    if opts.answers {
        let choice_sets: Vec<&str> = STANDARD_QUESTIONNAIRE
            .iter()
            .map(|topic| topic.choices)
            .collect();
        let recovered = decode_answers(ppid.as_str(), &choice_sets, &config)?;
        for (topic, selected) in STANDARD_QUESTIONNAIRE.iter().zip(recovered) {
            let label = topic
                .choices
                .chars()
                .position(|choice| choice == selected)
                .map(|index| topic.labels[index])
                .unwrap_or("?");
            println!("{} {selected} ({label})", topic.prompt);
        }
    }

    Ok(())
}

fn run_geocode(opts: GeocodeOptions) -> Result<()> {
    let config = load_config(opts.config)?;

    if let Some(code) = opts.decode {
        let location = geo::decode(&code, &config.alphabet)?;
        let (latitude_error, longitude_error) = geo::cell_error(code.chars().count())?;
        println!("latitude:  {:.6} ± {:.6}", location.latitude(), latitude_error);
        println!(
            "longitude: {:.6} ± {:.6}",
            location.longitude(),
            longitude_error
        );
        return Ok(());
    }

    let location = Location::new(
        coordinate(opts.latitude, "latitude (degrees):")?,
        coordinate(opts.longitude, "longitude (degrees):")?,
    )?;
    let code = geo::encode(location, config.geocode_length, &config.alphabet)?;
    println!("{code}");

    Ok(())
}

fn run_check(opts: CheckOptions) -> Result<()> {
    if !validate(&opts.candidate) {
        bail!("{:?} is not a structurally valid identifier", opts.candidate);
    }

    println!("ok");
    Ok(())
}

fn run_config(opts: ConfigOptions) -> Result<()> {
    let config = load_config(opts.config)?;
    print!("{config}");

    Ok(())
}

fn coordinate(value: Option<f64>, prompt: &str) -> Result<f64> {
    match value {
        Some(value) => Ok(value),
        None => Ok(CustomType::<f64>::new(prompt).prompt()?),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<GeneratorConfig> {
    let path = match path {
        Some(path) => path,
        None => default_config_path()?,
    };

    if !path.exists() {
        return Ok(GeneratorConfig::default());
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(data.parse::<GeneratorConfig>()?)
}
