//! dodo - command-line client for aircraft separation queries

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dodo::api::{MatrixFormatter, OutputFormat};
use dodo::logging::init_logging;
use dodo::{BlueBirdClient, ClientConfig, IdList, Measure, SeparationEngine};
use std::path::PathBuf;
use std::process;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MeasureArg {
    /// Ellipsoidal geodesic distance
    Geodesic,
    /// Spherical great-circle distance
    GreatCircle,
    /// Altitude difference
    Vertical,
    /// Straight-line 3D distance
    Euclidean,
}

impl From<MeasureArg> for Measure {
    fn from(arg: MeasureArg) -> Self {
        match arg {
            MeasureArg::Geodesic => Measure::Geodesic,
            MeasureArg::GreatCircle => Measure::GreatCircle,
            MeasureArg::Vertical => Measure::Vertical,
            MeasureArg::Euclidean => Measure::Euclidean,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
    PrettyJson,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::PrettyJson => OutputFormat::PrettyJson,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Parser)]
#[command(name = "dodo")]
#[command(about = "Aircraft separation queries against a BlueBird simulation", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// BlueBird host (overrides the configuration file)
    #[arg(long, global = true)]
    host: Option<String>,

    /// BlueBird port (overrides the configuration file)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Separation matrix between two groups of aircraft
    Separation {
        /// Distance model
        #[arg(long, value_enum, default_value = "geodesic")]
        measure: MeasureArg,

        /// Row aircraft ids
        #[arg(required = true, num_args = 1..)]
        from: Vec<String>,

        /// Column aircraft ids (defaults to the row ids)
        #[arg(long, num_args = 1..)]
        to: Option<Vec<String>>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,

        /// Decimal places for distances
        #[arg(long, default_value = "1")]
        precision: u8,
    },
    /// Current positions of the given aircraft
    Positions {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Distance between two explicit points, no network access
    Distance {
        #[arg(long, value_enum, default_value = "geodesic")]
        measure: MeasureArg,

        /// Latitude, longitude, altitude (m) of the first point
        #[arg(long, num_args = 3, allow_negative_numbers = true, value_names = ["LAT", "LON", "ALT"])]
        from: Vec<f64>,

        /// Latitude, longitude, altitude (m) of the second point
        #[arg(long, num_args = 3, allow_negative_numbers = true, value_names = ["LAT", "LON", "ALT"])]
        to: Vec<f64>,
    },
    /// Check that BlueBird is reachable
    Ping,
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(host) = &cli.host {
        config = config.with_host(host);
    }
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::Separation {
            measure,
            from,
            to,
            format,
            precision,
        } => {
            let client = BlueBirdClient::new(&config)?;
            let engine = SeparationEngine::new(client).with_simulator(config.simulator);
            let matrix = engine.separation_on(
                IdList::from(from),
                to.map(IdList::from),
                measure.into(),
                &config.ellipsoid,
            )?;
            info!(missing = matrix.missing_count(), "Separation matrix ready");

            let formatter = MatrixFormatter::new()
                .with_format(format.into())
                .with_precision(precision);
            print!("{}", formatter.format(&matrix)?);
        }
        Command::Positions { ids } => {
            let client = BlueBirdClient::new(&config)?;
            let engine = SeparationEngine::new(client).with_simulator(config.simulator);
            let table = engine.get_position_table(ids.as_slice(), ids.as_slice())?;
            print!("{}", MatrixFormatter::new().format_positions(&table));
        }
        Command::Distance { measure, from, to } => {
            if from.len() != 3 || to.len() != 3 {
                bail!("--from and --to each take LAT LON ALT");
            }
            let from = dodo::GeoPoint::new(from[0], from[1], from[2])?;
            let to = dodo::GeoPoint::new(to[0], to[1], to[2])?;
            let distance = dodo::get_distance(
                &from,
                &to,
                measure.into(),
                config.ellipsoid.major_semiaxis(),
                config.ellipsoid.flattening(),
            )?;
            println!("{:.3}", distance);
        }
        Command::Ping => {
            let client = BlueBirdClient::new(&config)?;
            if client.ping() {
                println!("BlueBird reachable at {}", config.base_url());
            } else {
                bail!("BlueBird not reachable at {}", config.base_url());
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
