use thiserror::Error;

/// Configuration errors the process cannot run past. Core code returns
/// these instead of exiting; only the binary's top level decides to
/// terminate.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid storage address {0:?}, expected host:port")]
    InvalidAddress(String),

    #[error("0.0.0.0 specified in storage address but hostname lookup failed")]
    Hostname(#[source] std::io::Error),

    #[error("unsupported digest algorithm {0:?}")]
    UnsupportedAlgorithm(String),

    #[error("unable to parse {field}")]
    InvalidDuration {
        field: &'static str,
        #[source]
        source: humantime::DurationError,
    },

    #[error("unable to initialise storage")]
    Storage(#[source] anyhow::Error),
}

/// Failure modes of the bootstrap entry point. `Config` is
/// unrecoverable misconfiguration; `Registration` is reported back to
/// the caller, which may retry manager startup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("reconciler {name} setup failed")]
    Registration {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}
