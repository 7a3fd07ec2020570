use bve_recordparser::DecodeError;

#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    #[error("malformed recording: {0}")]
    Decode(DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("replay cancelled")]
    Cancelled,
}

impl From<DecodeError> for ReplayError {
    fn from(err: DecodeError) -> Self {
        match err {
            // A sink that stopped accepting bytes is the consumer's fault.
            DecodeError::Sink(e) => ReplayError::Io(e),
            err => ReplayError::Decode(err),
        }
    }
}

impl ReplayError {
    /// Whether the recording itself is at fault, as opposed to the environment.
    pub fn is_malformed_recording(&self) -> bool {
        matches!(
            self,
            ReplayError::Decode(DecodeError::UnrecognizedTag(_))
                | ReplayError::Decode(DecodeError::TruncatedRecord { .. })
        )
    }
}
