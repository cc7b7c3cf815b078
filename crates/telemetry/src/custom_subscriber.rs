use primitives::{get_pretty_print_logs, Deployment};
use thiserror::Error;
use tracing_subscriber::{
    fmt::MakeWriter,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to initialize: {0}")]
    Init(#[from] TryInitError),
}

type Result<T> = std::result::Result<T, TelemetryError>;

#[derive(Debug)]
pub struct TelemetrySubscriber {}

impl TelemetrySubscriber {
    /// Installs the global subscriber. Output is JSON unless
    /// `BALLOT_PRETTY_PRINT_LOGS` is set, and the `RUST_LOG` filter applies on
    /// top of the default `info` level.
    pub fn init<W>(out: W) -> Result<()>
    where
        W: for<'s> MakeWriter<'s> + 'static + Sync + Send,
    {
        let is_local_env = Deployment::current().is_development();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        if get_pretty_print_logs() {
            let sub = tracing_subscriber::fmt()
                .with_writer(out)
                .with_env_filter(filter)
                .with_file(is_local_env)
                .with_line_number(is_local_env)
                .with_target(is_local_env)
                .compact()
                .finish();

            sub.try_init()?;
        } else {
            let sub = tracing_subscriber::fmt()
                .with_writer(out)
                .with_env_filter(filter)
                .with_file(is_local_env)
                .with_line_number(is_local_env)
                .json()
                .with_current_span(false)
                .flatten_event(true)
                .with_span_list(false)
                .finish();

            sub.try_init()?;
        }

        Ok(())
    }
}
