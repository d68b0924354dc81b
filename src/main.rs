//! Checkout receipt generator

use std::{io, process::ExitCode};

use jiff::Zoned;
use tracing::error;

use checkout::{checkout::run, config::CheckoutConfig, observability::init_subscriber};

fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match CheckoutConfig::load() {
        Ok(config) => config,
        Err(err) => {
            // Help and version requests are clap "errors" too
            _ = err.print();

            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for subscriber errors"
        )]
        {
            eprintln!("Logging error: {err}");
        }

        return ExitCode::FAILURE;
    }

    let stdout = io::stdout();

    match run(&config, Zoned::now().datetime(), stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "checkout failed");

            ExitCode::FAILURE
        }
    }
}
