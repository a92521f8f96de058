use tracing_subscriber::filter::ParseError;

#[derive(Debug)]
pub enum Error {
    Config(amitick_core::Error),
    Filter(ParseError),
    Json(serde_json::Error),
    /// The run ended before two rising edges were seen.
    NoEdges,
    Subscriber(String),
}

impl std::error::Error for Error {}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Filter(err) => write!(f, "invalid log filter: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::NoEdges => write!(f, "no complete period was observed"),
            Self::Subscriber(err) => write!(f, "couldn't install tracing subscriber: {err}"),
        }
    }
}

impl From<amitick_core::Error> for Error {
    fn from(err: amitick_core::Error) -> Self {
        Self::Config(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Filter(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
