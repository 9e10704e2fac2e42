//! pano-replay: run a curve session script and print the resulting state.
//!
//! ```text
//! pano-replay <script|-> [--camera <json>]
//! ```
//!
//! `-` reads the script from stdin. Every viewport shares one camera plane:
//! the `--camera` JSON if given, else one world unit per pixel at z = 0.
//! Set `RUST_LOG=debug` to trace each mutation.

use pano_core::{CurveConfig, PlaneTransform};
use pano_editor::{PanoramaCurveTool, Uniform};
use std::io::Read;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(source) = args.first() else {
        eprintln!("usage: pano-replay <script|-> [--camera <json>]");
        std::process::exit(2);
    };

    let camera = match args.iter().position(|a| a == "--camera") {
        Some(i) => match args.get(i + 1).map(|json| PlaneTransform::from_json(json)) {
            Some(Ok(plane)) => plane,
            Some(Err(e)) => {
                eprintln!("pano-replay: {e}");
                std::process::exit(1);
            }
            None => {
                eprintln!("pano-replay: --camera needs a JSON argument");
                std::process::exit(2);
            }
        },
        None => PlaneTransform::identity(),
    };

    let script = if source == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        std::fs::read_to_string(source)
    };
    let script = match script {
        Ok(text) => text,
        Err(e) => {
            eprintln!("pano-replay: cannot read {source}: {e}");
            std::process::exit(1);
        }
    };

    let mut tool = PanoramaCurveTool::new(CurveConfig::default());
    match tool.run_script(&script, &Uniform(camera)) {
        Ok(changed) => log::info!("{changed} commands changed state"),
        Err(e) => {
            eprintln!("pano-replay: {e}");
            std::process::exit(1);
        }
    }

    match serde_json::to_string_pretty(&tool.state()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("pano-replay: {e}");
            std::process::exit(1);
        }
    }
}
