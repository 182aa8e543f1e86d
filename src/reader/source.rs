use std::io::{ErrorKind, Read};

/// How a source pull ended, besides the bytes it produced
#[derive(Debug)]
pub enum SourceSignal {
    /// The source has no more bytes
    EndOfStream,

    /// The source failed. The error is passed to the caller verbatim
    Failed(anyhow::Error)
}

/// The result of one [Source::pull]
///
/// Unlike [std::io::Read], a pull may return bytes and a signal at the
/// same time, e.g. the last chunk of a stream together with its end.
#[derive(Debug)]
pub struct SourceRead {
    pub count: usize,
    pub signal: Option<SourceSignal>
}

impl SourceRead {
    pub fn data(count: usize) -> Self {
        Self {
            count,
            signal: None
        }
    }

    pub fn end() -> Self {
        Self {
            count: 0,
            signal: Some(SourceSignal::EndOfStream)
        }
    }

    pub fn failed(error: impl Into<anyhow::Error>) -> Self {
        Self {
            count: 0,
            signal: Some(SourceSignal::Failed(error.into()))
        }
    }

    /// Attaches a signal to a read that also produced bytes
    pub fn with_signal(mut self, signal: SourceSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// An upstream supplier of compressed bytes
///
/// A pull of zero bytes without a signal is treated as the end of the stream.
pub trait Source {
    fn pull(&mut self, buf: &mut [u8]) -> SourceRead;
}

impl<R: Read> Source for R {
    fn pull(&mut self, buf: &mut [u8]) -> SourceRead {
        loop {
            match self.read(buf) {
                Ok(0) => return SourceRead::end(),
                Ok(n) => return SourceRead::data(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => {},
                Err(e) => return SourceRead::failed(e)
            }
        }
    }
}
