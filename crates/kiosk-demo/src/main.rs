#![forbid(unsafe_code)]

//! Kiosk demo binary entry point.

use kiosk_demo::cli;
use kiosk_demo::session;
use std::io;

fn main() {
    let opts = cli::Opts::parse();

    if let Err(err) = kiosk_runtime::logging::init_from_env() {
        eprintln!("Logging disabled: {err}");
    }

    let stdout = io::stdout().lock();
    let result = if opts.realtime {
        session::run_realtime(&opts, stdout)
    } else {
        session::run_simulated(&opts, stdout)
    };

    match result {
        Ok(last) => {
            tracing::info!(
                percent = last.countdown.percent,
                last_selected = ?last.selector.last_selected,
                "session finished"
            );
        }
        Err(e) => {
            eprintln!("Session error: {e}");
            std::process::exit(1);
        }
    }
}
