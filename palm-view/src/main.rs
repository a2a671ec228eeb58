//! Application entry point for the palm tree viewer.
//!
//! This binary parses the command line, sets up logging and eframe/egui, and
//! delegates all interactive logic and rendering to [`Viewer`] from the
//! `viewer` module.

mod viewer;

use std::path::PathBuf;

use clap::Parser;
use palm_core::params::Params;
use viewer::Viewer;

#[derive(Debug, Parser)]
#[command(version, about = "Procedural palm tree generator")]
struct Args {
    /// TOML file with generation parameters; missing keys use defaults.
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Seed of the first tree. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    /// Resolves the starting parameters. A file that cannot be loaded is
    /// logged and replaced by the defaults.
    fn initial_params(&self) -> Params {
        let Some(path) = &self.params else {
            return Params::default();
        };

        Params::load(path).unwrap_or_else(|err| {
            log::error!("{err}; using default parameters");
            Params::default()
        })
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let params = args.initial_params();
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("starting with seed {seed}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Palm Tree",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(params, seed)))),
    )
}
