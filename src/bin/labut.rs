use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use labut::utilities::{
    LabConfig, LabError, Result,
    gcxgc::process_chromatogram,
    ir::{baseline_subtract, find_indices, get_tpd_bas, split_experiment},
    online_gc::process_chromatograms,
    parse::parse_spectra,
    simulation::{ScissionModel, mass_distribution, simulate},
    tga::{ExperimentKind, load_tga, summarize, water_content},
};

#[derive(Parser)]
#[command(name = "labut")]
#[command(about = "Processing of GCxGC, online GC, TGA and IR lab data")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fold a GCxGC FID trace and integrate TIFF masks
    Gcxgc {
        file: PathBuf,
        /// Directory holding Mask_*.tif files
        #[arg(short, long)]
        masks: PathBuf,
        #[arg(long)]
        split_time: Option<f64>,
        #[arg(long)]
        sampling_interval: Option<f64>,
        #[arg(long)]
        shift: Option<isize>,
        #[arg(long)]
        solvent_time: Option<f64>,
    },
    /// Integrate the configured peak windows of online GC injections
    OnlineGc {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Summarize a TGA8000 export
    Tga {
        file: PathBuf,
        /// general, pyro or pyro_iso
        #[arg(short, long)]
        kind: Option<ExperimentKind>,
        #[arg(short, long)]
        window: Option<usize>,
    },
    /// Water content of a TGA drying run
    Water { file: PathBuf },
    /// Brønsted acid site TPD profile from an IR spectra CSV
    IrTpd {
        file: PathBuf,
        #[arg(short, long)]
        pellet_weight: Option<f64>,
        /// Experiment directory with an indices file; enables baseline subtraction
        #[arg(long)]
        indices_dir: Option<PathBuf>,
    },
    /// Stochastic chain scission of a polymer melt
    Simulate {
        #[arg(long)]
        steps: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// random, end-chain or mid-chain
        #[arg(long)]
        model: Option<String>,
        /// Decay (end-chain) or relative width (mid-chain)
        #[arg(long, default_value_t = 0.1)]
        param: f64,
    },
}

fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("labut=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("labut=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn print_json<T: Serialize>(v: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(v)?;
    println!("{s}");
    Ok(())
}

fn scission_model(name: &str, param: f64) -> Option<ScissionModel> {
    match name {
        "random" => Some(ScissionModel::Random),
        "end-chain" => Some(ScissionModel::EndChain { decay: param }),
        "mid-chain" => Some(ScissionModel::MidChain { width: param }),
        _ => None,
    }
}

fn run(args: Args) -> Result<()> {
    let mut cfg = match &args.config {
        Some(p) => {
            info!("loading configuration from {}", p.display());
            LabConfig::from_path(p)?
        }
        None => LabConfig::default(),
    };

    match args.command {
        Command::Gcxgc {
            file,
            masks,
            split_time,
            sampling_interval,
            shift,
            solvent_time,
        } => {
            let o = &mut cfg.gcxgc;
            o.split_time = split_time.unwrap_or(o.split_time);
            o.sampling_interval = sampling_interval.unwrap_or(o.sampling_interval);
            o.shift = shift.unwrap_or(o.shift);
            o.solvent_time = solvent_time.unwrap_or(o.solvent_time);
            cfg.validate()?;
            let (integrals, _) = process_chromatogram(&file, cfg.gcxgc, &masks)?;
            print_json(&integrals)
        }
        Command::OnlineGc { files } => {
            let table =
                process_chromatograms(&files, &cfg.online_gc.peaks, cfg.online_gc.baseline)?;
            print_json(&table)
        }
        Command::Tga { file, kind, window } => {
            let kind = kind.unwrap_or(cfg.tga.kind);
            if let Some(w) = window {
                cfg.tga.dtga.averaging_window = w;
            }
            cfg.validate()?;
            let exp = load_tga(&file, kind, Some(cfg.tga.dtga))?;
            print_json(&summarize(&exp)?)
        }
        Command::Water { file } => {
            let wc = water_content(&file)?;
            print_json(&serde_json::json!({ "water_content": wc }))
        }
        Command::IrTpd {
            file,
            pellet_weight,
            indices_dir,
        } => {
            let weight = pellet_weight.unwrap_or(cfg.ir.pellet_weight);
            let series = parse_spectra(&file)?;
            let series = match indices_dir {
                Some(dir) => {
                    let name = file
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("experiment");
                    let idx = find_indices(&dir, name, false)?;
                    let parts = split_experiment(&series, &idx);
                    baseline_subtract(&parts.baseline, &parts.desorb)?
                }
                None => series,
            };
            print_json(&get_tpd_bas(&series, weight, Some(cfg.ir.tpd))?)
        }
        Command::Simulate {
            steps,
            seed,
            model,
            param,
        } => {
            let o = &mut cfg.simulation;
            o.steps = steps.unwrap_or(o.steps);
            o.seed = seed.unwrap_or(o.seed);
            if let Some(name) = model {
                o.model = scission_model(&name, param)
                    .ok_or_else(|| LabError::invalid(format!("unknown scission model '{name}'")))?;
            }
            let res = simulate(Some(cfg.simulation))?;
            print_json(&serde_json::json!({
                "snapshots": res.snapshots,
                "product_distribution": mass_distribution(&res.products),
            }))
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_cli_logger(args.verbose);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("labut: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    // map keys that are not strings cannot be written as JSON
    #[test]
    fn unserializable_output_is_an_error() {
        let mut m = BTreeMap::new();
        m.insert((1u8, 2u8), 3u8);
        assert!(matches!(print_json(&m), Err(LabError::Json(_))));
        assert!(print_json(&[1.0, 2.0]).is_ok());
    }

    #[test]
    fn scission_model_names() {
        assert_eq!(
            scission_model("end-chain", 0.2),
            Some(ScissionModel::EndChain { decay: 0.2 })
        );
        assert_eq!(scission_model("zipper", 0.2), None);
    }
}
