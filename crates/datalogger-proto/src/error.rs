/// Errors that can occur while decoding device messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The payload is not a valid protobuf message.
    #[error("malformed protobuf payload: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The message decoded but carries no payload variant.
    #[error("{0} has no payload set")]
    MissingPayload(&'static str),
}

pub type Result<T> = std::result::Result<T, ProtoError>;
