use thiserror::Error;

/// Convenient result alias for the textgen library.
pub type Result<T> = std::result::Result<T, Fault>;

/// Message returned to callers for server-side faults.
pub const SERVER_FAULT_MESSAGE: &str =
    "internal server error. Please access again after some time.";

/// Message returned to callers for failures nobody classified.
pub const UNCLASSIFIED_MESSAGE: &str = "internal server error. Please contact the operator.";

/// Classification tag for a [`Fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The caller's request was malformed or rejected for input reasons.
    Client,
    /// An operational condition prevented fulfillment.
    Server,
    /// Anything not raised as one of the two kinds above.
    Unclassified,
}

impl FaultKind {
    /// HTTP status code reported for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            FaultKind::Client => 400,
            FaultKind::Server | FaultKind::Unclassified => 500,
        }
    }
}

/// Top-level failure type for a single invocation.
///
/// `Client` and `Server` carry the offending input that triggered them so the
/// handler can log it; that input is never sent back to the caller.
#[derive(Debug, Error)]
pub enum Fault {
    /// Caller-attributable failure.
    #[error("{message}: {input}")]
    Client { input: String, message: String },

    /// Operational or service-side failure.
    #[error("{message}: {input}")]
    Server { input: String, message: String },

    /// Any failure that was not explicitly classified.
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl Fault {
    /// Build a client fault.
    pub fn client(input: impl Into<String>, message: impl Into<String>) -> Self {
        Fault::Client {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Build a server fault.
    pub fn server(input: impl Into<String>, message: impl Into<String>) -> Self {
        Fault::Server {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::Client { .. } => FaultKind::Client,
            Fault::Server { .. } => FaultKind::Server,
            Fault::Unclassified(_) => FaultKind::Unclassified,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Offending input captured at the failure site, if any.
    pub fn input(&self) -> Option<&str> {
        match self {
            Fault::Client { input, .. } | Fault::Server { input, .. } => Some(input),
            Fault::Unclassified(_) => None,
        }
    }

    /// Message safe to return to the caller.
    ///
    /// Only client faults echo their own message; server-side detail stays in
    /// the logs.
    pub fn public_message(&self) -> String {
        match self {
            Fault::Client { message, .. } => format!("client error. {}", message),
            Fault::Server { .. } => SERVER_FAULT_MESSAGE.to_string(),
            Fault::Unclassified(_) => UNCLASSIFIED_MESSAGE.to_string(),
        }
    }
}
