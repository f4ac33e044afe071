use thiserror::Error;

/// Errors raised while decoding a recording. Always fatal: no partial playback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("recording is empty")]
    Empty,

    #[error("recording holds {len} bytes, shorter than one {record_size}-byte record")]
    Truncated { len: usize, record_size: usize },

    #[error("record size {record_size} is below the {minimum}-byte minimum")]
    RecordTooSmall { record_size: usize, minimum: usize },

    #[error("sensor geometry {width}x{height} has no pixels")]
    EmptyGeometry { width: u32, height: u32 },
}
