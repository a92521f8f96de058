use crate::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";

/// Builds the event filter: `directives` if given, else `RUST_LOG`, else
/// [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Returns an error if `directives` doesn't parse.
pub fn env_filter(directives: Option<&str>) -> Result<EnvFilter, Error> {
    match directives {
        Some(directives) => Ok(EnvFilter::try_new(directives)?),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Installs a formatting subscriber on stderr as the global default.
///
/// # Errors
///
/// Returns an error if the filter doesn't parse or a global subscriber is
/// already set.
pub fn init_tracing(directives: Option<&str>) -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| Error::Subscriber(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn explicit_directives() {
        let filter = env_filter(Some("amitick_core=trace")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn bad_directives() {
        assert!(matches!(
            env_filter(Some("amitick_core=loud")),
            Err(Error::Filter(_))
        ));
    }
}
