//! `env_logger` setup.
//!
//! Logging starts before the configuration is loaded, so it comes up at
//! `info` and [`set_verbose`] raises it once the `verbose` setting is known.
//! An explicit `RUST_LOG` always wins and is never adjusted.

use env_logger::{Builder, Env, DEFAULT_FILTER_ENV};
use log::LevelFilter;

/// Filter installed when `RUST_LOG` is unset; the global max level gates it.
const DEFAULT_FILTER: &str = "info,voice_assistant=debug";

fn filter_from_env() -> bool {
    std::env::var_os(DEFAULT_FILTER_ENV).is_some()
}

pub fn init_logging() {
    let initialised = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_secs()
        .try_init()
        .is_ok();

    if initialised && !filter_from_env() {
        log::set_max_level(LevelFilter::Info);
    }
}

/// Enables this crate's `debug` output when `verbose` is set.
pub fn set_verbose(verbose: bool) {
    if filter_from_env() {
        return;
    }
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
}
