use clap::Parser;
use std::sync::OnceLock;
use wasm_bindgen::prelude::*;

pub use game::*;
pub use listener::*;

mod game;
mod listener;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

static FORCED_SEED: OnceLock<u64> = OnceLock::new();

pub(crate) fn forced_seed() -> Option<u64> {
    FORCED_SEED.get().copied()
}

/// Fixes the seed of every game created afterwards; only the first call wins.
fn force_seed(seed: u64) -> bool {
    match FORCED_SEED.set(seed) {
        Ok(()) => true,
        Err(seed) => {
            log::warn!("Bridge started twice, keeping the first seed instead of {}", seed);
            false
        }
    }
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = web_sys::window()
        .and_then(|window| window.location().hash().ok())
        .unwrap_or_default();

    let (args, parse_error) = match Args::try_parse_from(location_hash.split(['#', '&'])) {
        Ok(args) => (args, None),
        Err(err) => (Args::parse_from(["mines"]), Some(err)),
    };
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).map_err(|err| JsError::new(&err.to_string()))?;
    }
    if let Some(err) = parse_error {
        log::warn!("Ignoring location arguments: {}", err);
    }

    if let Some(seed) = args.seed {
        log::debug!("seed: {}", seed);
        force_seed(seed);
    }

    log::debug!("Bridge started");
    Ok(())
}
