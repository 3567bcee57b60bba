use anyhow::Context;
use aperture_planner::{commands, report, Config};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Instrument aperture footprints and target visibility windows")]
struct Cli {
    /// Configuration file (default: ~/.aperture-planner/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the enabled instrument footprints into region files
    Footprint {
        /// Target right ascension (decimal degrees or "H M S")
        #[arg(long)]
        ra: Option<String>,
        /// Target declination (decimal degrees or "D M S")
        #[arg(long)]
        dec: Option<String>,
        /// Aperture position angle, degrees
        #[arg(long)]
        pa: Option<f64>,
        /// Dither pattern: NONE, FULL3, FULL3TIGHT, FULL6, 8NIRSPEC
        #[arg(long)]
        dither: Option<String>,
        /// WCS header-card file of the display image
        #[arg(long)]
        wcs: Option<PathBuf>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Plot the long-wavelength channel
        #[arg(long)]
        long: bool,
        /// Plot the short-wavelength channel
        #[arg(long)]
        short: bool,
        /// Plot the multi-shutter assembly
        #[arg(long)]
        msa: bool,
        /// Plot the configured source catalog
        #[arg(long)]
        sources: bool,
    },
    /// Scan for observability windows and write the per-day roll table
    Timeline {
        /// Target right ascension (decimal degrees or "H M S")
        #[arg(long)]
        ra: Option<String>,
        /// Target declination (decimal degrees or "D M S")
        #[arg(long)]
        dec: Option<String>,
        /// Judge observability at this fixed position angle, degrees
        #[arg(long)]
        pa: Option<f64>,
        /// Search start, MJD
        #[arg(long)]
        start: Option<f64>,
        /// Search span, days
        #[arg(long)]
        span: Option<f64>,
        /// Sun ephemeris table
        #[arg(long)]
        ephemeris: Option<PathBuf>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Write a fresh default configuration file
    InitConfig,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::InitConfig => {
            let config = Config::default();
            config
                .save(&config_path)
                .with_context(|| format!("writing {}", config_path.display()))?;
            println!("{}", config_path.display());
        }
        Commands::Footprint {
            ra,
            dec,
            pa,
            dither,
            wcs,
            out_dir,
            long,
            short,
            msa,
            sources,
        } => {
            let mut config = Config::load_or_default(&config_path)
                .with_context(|| format!("loading {}", config_path.display()))?;
            if let Some(ra) = ra {
                config.ra_camera = ra.clone();
                config.ra_msa = ra;
            }
            if let Some(dec) = dec {
                config.dec_camera = dec.clone();
                config.dec_msa = dec;
            }
            if let Some(pa) = pa {
                config.theta_camera = pa;
                config.theta_msa = pa;
            }
            if let Some(dither) = dither {
                config.dither = dither;
            }
            if let Some(wcs) = wcs {
                config.wcs_header = wcs;
            }
            if let Some(out_dir) = out_dir {
                config.out_dir = out_dir;
            }
            if long || short || msa || sources {
                config.plot_long = long;
                config.plot_short = short;
                config.plot_msa = msa;
                config.plot_sources = sources;
            }

            let written = commands::run_footprints(&config)?;
            if written.is_empty() {
                eprintln!("nothing to plot: enable --long, --short, --msa, or --sources");
            }
            for path in &written {
                println!("{}", path.display());
            }
        }
        Commands::Timeline {
            ra,
            dec,
            pa,
            start,
            span,
            ephemeris,
            out_dir,
        } => {
            let mut config = Config::load_or_default(&config_path)
                .with_context(|| format!("loading {}", config_path.display()))?;
            if let Some(ra) = ra {
                config.ra_camera = ra;
            }
            if let Some(dec) = dec {
                config.dec_camera = dec;
            }
            if pa.is_some() {
                config.fixed_pa = pa;
            }
            if let Some(start) = start {
                config.search_start_mjd = start;
            }
            if let Some(span) = span {
                config.span_days = span;
            }
            if ephemeris.is_some() {
                config.ephemeris = ephemeris;
            }
            if let Some(out_dir) = out_dir {
                config.out_dir = out_dir;
            }

            let timeline = commands::run_timeline(&config)?;
            print!("{}", report::window_summary(&timeline.outcome));
            println!(
                "{} ({} rows)",
                timeline.path.display(),
                timeline.rows_written
            );
        }
    }

    Ok(())
}
