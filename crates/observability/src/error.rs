//! Failures while wiring up logging and trace export

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObservabilityError {
    /// `PIXELCODE_LOG` / `RUST_LOG` / `--verbose` produced a directive `EnvFilter` rejects
    #[error("log filter '{filter}' is not valid: {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// The OTLP span exporter for the given endpoint could not be built
    #[error("cannot export traces to {endpoint}: {reason}")]
    Exporter { endpoint: String, reason: String },

    /// A global subscriber was already installed, usually by a test harness
    #[error("tracing subscriber already installed: {0}")]
    SubscriberInstalled(String),
}
