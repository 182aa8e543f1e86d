use thiserror::Error;

/// Provides an [Engine] for zlib and raw DEFLATE streams using [flate2::Decompress]
pub mod zlib;

/// Provides an [Engine] for the DEFLATE algorithm using [inflate::InflateStream]
#[cfg(feature = "deflate")]
pub mod deflate;

#[derive(Error, Debug)]
pub enum EngineInitError {
    #[error("staging buffer size must be positive")]
    InvalidBufferSize,

    #[error("could not initialize engine: {0}")]
    Engine(String)
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("corrupt compressed stream: {0}")]
    Corrupt(String),

    #[error("engine made no progress on buffered input")]
    Stalled,

    #[error("engine is not initialized")]
    NotInitialized
}

/// Controls when an [Engine] is forced to emit buffered output
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushMode {
    /// Let the engine decide when to emit output
    #[default]
    NoFlush
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// More input is expected
    Ok,

    /// The end of the compressed stream was reached
    StreamEnd
}

/// The result of a single [Engine::step]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub consumed: usize,
    pub produced: usize,
    pub status: Status
}

impl Step {
    pub fn new(consumed: usize, produced: usize, status: Status) -> Self {
        Self {
            consumed,
            produced,
            status
        }
    }
}

/// A stateful, block-oriented decompressor
pub trait Engine: std::fmt::Debug + Send {
    /// Acquires the engine state. Called exactly once, before the first step
    fn init(&mut self) -> Result<(), EngineInitError>;

    /// Runs one decompression step
    ///
    /// Decompressed bytes are written straight into `output`. The returned
    /// [Step] tells how much of `input` was consumed and how much of `output`
    /// was filled. An empty `input` is allowed and drains output the engine
    /// is still holding.
    fn step(&mut self, input: &[u8], output: &mut [u8], flush: FlushMode) -> Result<Step, EngineError>;

    /// Releases the engine state. Any later step fails with
    /// [EngineError::NotInitialized]
    fn end(&mut self);
}
