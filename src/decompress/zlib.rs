use std::fmt::Debug;

use flate2::{Decompress, FlushDecompress};

use super::{Engine, EngineError, EngineInitError, FlushMode, Status, Step};

/// The framing expected around the DEFLATE data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// zlib header and adler32 trailer (RFC 1950)
    #[default]
    Zlib,

    /// Bare DEFLATE blocks (RFC 1951)
    Raw
}

/// Wrapper around a [Decompress], allocated on [Engine::init]
pub struct ZlibEngine {
    format: Format,
    inner: Option<Decompress>
}

impl Debug for ZlibEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZlibEngine")
            .field("format", &self.format)
            .field("initialized", &self.inner.is_some())
            .finish()
    }
}

impl Default for ZlibEngine {
    /// Identical to [ZlibEngine::new]
    fn default() -> Self {
        Self::new()
    }
}

impl ZlibEngine {
    /// Creates an engine for zlib streams
    pub fn new() -> Self {
        Self::with_format(Format::Zlib)
    }

    /// Creates an engine for raw DEFLATE streams
    pub fn raw() -> Self {
        Self::with_format(Format::Raw)
    }

    pub fn with_format(format: Format) -> Self {
        Self {
            format,
            inner: None
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

impl Engine for ZlibEngine {
    fn init(&mut self) -> Result<(), EngineInitError> {
        self.inner = Some(Decompress::new(self.format == Format::Zlib));
        Ok(())
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: FlushMode) -> Result<Step, EngineError> {
        let inner = self.inner.as_mut().ok_or(EngineError::NotInitialized)?;

        let flush = match flush {
            FlushMode::NoFlush => FlushDecompress::None
        };

        let in_before = inner.total_in();
        let out_before = inner.total_out();

        let status = inner.decompress(input, output, flush)
            .map_err(|e| EngineError::Corrupt(e.to_string()))?;

        let consumed = (inner.total_in() - in_before) as usize;
        let produced = (inner.total_out() - out_before) as usize;

        let status = match status {
            flate2::Status::StreamEnd => Status::StreamEnd,
            flate2::Status::Ok | flate2::Status::BufError => Status::Ok
        };

        Ok(Step::new(consumed, produced, status))
    }

    fn end(&mut self) {
        self.inner = None;
    }
}
