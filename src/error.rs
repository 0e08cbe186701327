/// Fatal failures in a search participant or its configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("participant channel closed")]
    ChannelClosed,
    #[error("bad input frame: {0}")]
    BadFrame(String),
}

/// Why a submitted nonce or reported solution failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("digest does not meet difficulty")]
    InvalidDifficulty,
    #[error("solution does not match its input")]
    Malformed,
}
