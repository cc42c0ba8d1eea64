//! pixelcode observability - logging and trace export for the pixelcode binaries
//!
//! Logs go to stderr so stdout stays free for streamed completions. Spans are exported over
//! OTLP only when an endpoint is configured.
//!
//! # Quick Start
//!
//! ```no_run
//! use pixelcode_observability::{ObservabilityConfig, init};
//!
//! let config = ObservabilityConfig::new("pixelcode")
//!     .with_otlp_endpoint("http://localhost:4317")
//!     .with_log_level("pixelcode_llms=debug,info");
//!
//! init(config)?;
//! tracing::info!("ready");
//! # Ok::<(), pixelcode_observability::ObservabilityError>(())
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_SERVICE_NAME` - Service name
//! - `OTEL_SERVICE_VERSION` - Service version
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint
//! - `PIXELCODE_LOG` or `RUST_LOG` - Log level filter

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracing;

pub use config::ObservabilityConfig;
pub use error::ObservabilityError;
pub use telemetry::{init, init_from_env, shutdown};
pub use self::tracing::{record_duration, record_error};
