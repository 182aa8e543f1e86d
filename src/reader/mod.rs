use std::io;

use thiserror::Error;
use tracing::{debug, trace};

use crate::decompress::{zlib::ZlibEngine, Engine, EngineError, EngineInitError, FlushMode, Status};

use self::{drive::DriveState, source::{Source, SourceSignal}};

/// Provides the [Source] trait for upstream suppliers of compressed bytes
pub mod source;

mod drive;

/// Staging buffer size used by [StreamDecompressor::new]
pub const DEFAULT_COMPRESSED_BUFFER_SIZE: usize = 32 * 1024;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("end of stream")]
    EndOfStream,

    #[error("source returned an error: {0}")]
    Source(#[from] anyhow::Error),

    #[error("failed to decompress: {0}")]
    Engine(#[from] EngineError),

    #[error("reader is closed")]
    Closed
}

impl From<SourceSignal> for ReadError {
    fn from(signal: SourceSignal) -> Self {
        match signal {
            SourceSignal::EndOfStream => Self::EndOfStream,
            SourceSignal::Failed(e) => Self::Source(e)
        }
    }
}

impl From<ReadError> for io::Error {
    fn from(error: ReadError) -> Self {
        match error {
            ReadError::EndOfStream => io::Error::from(io::ErrorKind::UnexpectedEof),
            ReadError::Source(e) => match e.downcast::<io::Error>() {
                Ok(e) => e,
                Err(e) => io::Error::other(e)
            },
            ReadError::Engine(e) => io::Error::new(io::ErrorKind::InvalidData, e),
            e @ ReadError::Closed => io::Error::other(e)
        }
    }
}

/// The result of [StreamDecompressor::read_chunk]
///
/// Bytes and an error may be reported together. The bytes are valid either way.
#[derive(Debug)]
pub struct ReadOutcome {
    pub produced: usize,
    pub error: Option<ReadError>
}

impl ReadOutcome {
    fn data(produced: usize) -> Self {
        Self {
            produced,
            error: None
        }
    }

    fn failed(error: ReadError) -> Self {
        Self {
            produced: 0,
            error: Some(error)
        }
    }

    pub fn into_parts(self) -> (usize, Option<ReadError>) {
        (self.produced, self.error)
    }

    /// Returns whether this outcome ends the stream
    pub fn is_end(&self) -> bool {
        matches!(self.error, Some(ReadError::EndOfStream))
    }
}

/// A decompressing reader over a [Source] of compressed bytes
///
/// Compressed bytes are pulled into a fixed-size staging buffer and fed to the
/// [Engine], which writes decompressed bytes straight into the caller's buffer.
/// The source is never closed by this reader.
pub struct StreamDecompressor<S: Source, E: Engine = ZlibEngine> {
    source: S,

    staging: Box<[u8]>,
    staged_pos: usize,
    staged_end: usize,

    engine: E,

    pending: Option<ReadError>,
    state: DriveState,
    closed: bool
}

impl<S: Source, E: Engine> std::fmt::Debug for StreamDecompressor<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDecompressor")
            .field("engine", &self.engine)
            .field("buffered", &self.buffered())
            .field("state", &self.state)
            .field("closed", &self.closed)
            .finish()
    }
}

impl<S: Source> StreamDecompressor<S> {
    /// Creates a new StreamDecompressor for zlib data with a
    /// [DEFAULT_COMPRESSED_BUFFER_SIZE] staging buffer
    pub fn new(source: S) -> Result<Self, EngineInitError> {
        Self::with_buffer_size(source, DEFAULT_COMPRESSED_BUFFER_SIZE)
    }

    /// Same as [StreamDecompressor::new] with a custom staging buffer size
    pub fn with_buffer_size(source: S, buffer_size: usize) -> Result<Self, EngineInitError> {
        Self::with_engine(source, ZlibEngine::new(), buffer_size)
    }
}

impl<S: Source, E: Engine> StreamDecompressor<S, E> {
    /// Creates a new StreamDecompressor driving the provided engine
    ///
    /// The engine is initialized here. If that fails, it is dropped
    /// together with the source. The reader may pull more bytes from the
    /// source than the compressed stream needs.
    pub fn with_engine(source: S, mut engine: E, buffer_size: usize) -> Result<Self, EngineInitError> {
        if buffer_size == 0 {
            return Err(EngineInitError::InvalidBufferSize);
        }

        engine.init()?;
        debug!(buffer_size, ?engine, "initialized stream decompressor");

        Ok(Self {
            source,

            staging: vec![0; buffer_size].into_boxed_slice(),
            staged_pos: 0,
            staged_end: 0,

            engine,

            pending: None,
            state: DriveState::default(),
            closed: false
        })
    }

    /// Decompresses into `dest`, returning as soon as any bytes are available
    ///
    /// When the source reports an error or the end of the stream together
    /// with data, that signal is held back until every byte derived from the
    /// data has been returned. An engine error discards whatever this call
    /// had already placed into `dest` and reports zero bytes.
    pub fn read_chunk(&mut self, dest: &mut [u8]) -> ReadOutcome {
        if self.closed {
            return ReadOutcome::failed(ReadError::Closed);
        }

        if let Some(error) = self.take_due_signal() {
            return ReadOutcome::failed(error);
        }

        if dest.is_empty() {
            return ReadOutcome::data(0);
        }

        loop {
            if let Some(error) = self.take_due_signal() {
                return ReadOutcome::failed(error);
            }

            self.state = self.state.resume(self.buffered());
            if self.state.pulls() {
                let read = self.source.pull(&mut self.staging);
                let count = std::cmp::min(read.count, self.staging.len());
                trace!(count, "pulled compressed bytes");

                if count == 0 {
                    let error = read.signal
                        .map(ReadError::from)
                        .unwrap_or(ReadError::EndOfStream);
                    return ReadOutcome::failed(error);
                }

                self.staged_pos = 0;
                self.staged_end = count;

                if let Some(signal) = read.signal {
                    debug!(count, ?signal, "deferring source signal");
                    self.pending = Some(signal.into());
                }
            }

            let input = &self.staging[self.staged_pos..self.staged_end];
            let step = match self.engine.step(input, dest, FlushMode::NoFlush) {
                Ok(step) => step,
                Err(e) => {
                    debug!(error = %e, "engine failed");
                    self.pending = None;
                    return ReadOutcome::failed(e.into());
                }
            };
            trace!(consumed = step.consumed, produced = step.produced, status = ?step.status, "engine step");

            self.staged_pos += std::cmp::min(step.consumed, self.buffered());
            let produced = std::cmp::min(step.produced, dest.len());
            self.state = DriveState::after_step(step.status, dest.len() - produced, self.buffered());

            if produced > 0 {
                return ReadOutcome {
                    produced,
                    error: self.take_due_signal()
                };
            }

            if step.status == Status::StreamEnd {
                let error = self.pending.take().unwrap_or(ReadError::EndOfStream);
                return ReadOutcome::failed(error);
            }

            if step.consumed == 0 && self.buffered() > 0 {
                self.pending = None;
                return ReadOutcome::failed(EngineError::Stalled.into());
            }
        }
    }

    /// Releases the engine. Calling this more than once has no effect
    ///
    /// The source is left untouched. Dropping the reader closes it as well.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }

        self.engine.end();
        self.closed = true;

        self.pending = None;
        self.staged_pos = 0;
        self.staged_end = 0;

        debug!("closed stream decompressor");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn buffer_size(&self) -> usize {
        self.staging.len()
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source. Reading from it directly
    /// desynchronizes the compressed stream
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn buffered(&self) -> usize {
        self.staged_end - self.staged_pos
    }

    /// The pending signal, if no staged input or engine output is left
    /// to deliver before it
    fn take_due_signal(&mut self) -> Option<ReadError> {
        if self.state.resume(self.buffered()).pulls() {
            self.pending.take()
        } else {
            None
        }
    }
}

impl<S: Source, E: Engine> io::Read for StreamDecompressor<S, E> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let ReadOutcome { produced, error } = self.read_chunk(buf);

        match error {
            None => Ok(produced),
            Some(error) if produced > 0 => {
                self.pending = Some(error);
                Ok(produced)
            },
            Some(ReadError::EndOfStream) => Ok(0),
            Some(error) => Err(error.into())
        }
    }
}

impl<S: Source, E: Engine> Drop for StreamDecompressor<S, E> {
    fn drop(&mut self) {
        self.close();
    }
}
