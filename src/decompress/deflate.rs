use std::fmt::Debug;

use inflate::InflateStream;

use super::{Engine, EngineError, EngineInitError, FlushMode, Status, Step, zlib::Format};

/// Wrapper around an [InflateStream]
///
/// [InflateStream] hands out output from its own window instead of writing
/// into a caller buffer, so whatever does not fit into the output of a step
/// is carried over and delivered first on the next one.
pub struct InflateEngine {
    format: Format,
    stream: Option<InflateStream>,

    carry: Vec<u8>,
    carry_pos: usize
}

impl Debug for InflateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InflateEngine")
            .field("format", &self.format)
            .field("carry", &(self.carry.len() - self.carry_pos))
            .finish()
    }
}

impl Default for InflateEngine {
    /// Identical to [InflateEngine::new]
    fn default() -> Self {
        Self::new()
    }
}

impl InflateEngine {
    /// Creates an InflateEngine for zlib streams
    pub fn new() -> Self {
        Self::with_format(Format::Zlib)
    }

    /// Creates an InflateEngine for raw DEFLATE streams
    pub fn raw() -> Self {
        Self::with_format(Format::Raw)
    }

    pub fn with_format(format: Format) -> Self {
        Self {
            format,
            stream: None,

            carry: Vec::new(),
            carry_pos: 0
        }
    }

    fn drain_carry(&mut self, output: &mut [u8]) -> usize {
        let left = &self.carry[self.carry_pos..];
        let count = std::cmp::min(left.len(), output.len());

        output[..count].copy_from_slice(&left[..count]);
        self.carry_pos += count;

        count
    }

    fn has_carry(&self) -> bool {
        self.carry_pos < self.carry.len()
    }
}

impl Engine for InflateEngine {
    fn init(&mut self) -> Result<(), EngineInitError> {
        self.stream = Some(match self.format {
            Format::Zlib => InflateStream::from_zlib(),
            Format::Raw => InflateStream::new()
        });

        Ok(())
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], _flush: FlushMode) -> Result<Step, EngineError> {
        if self.stream.is_none() {
            return Err(EngineError::NotInitialized);
        }

        let mut produced = self.drain_carry(output);
        if self.has_carry() || input.is_empty() {
            return Ok(Step::new(0, produced, Status::Ok));
        }

        let stream = self.stream.as_mut().ok_or(EngineError::NotInitialized)?;
        let (consumed, inflated) = stream.update(input)
            .map_err(EngineError::Corrupt)?;

        if consumed == 0 && inflated.is_empty() {
            // The inflater has seen the final block and refuses more input
            return Ok(Step::new(0, produced, Status::StreamEnd));
        }

        self.carry.clear();
        self.carry.extend_from_slice(inflated);
        self.carry_pos = 0;

        produced += self.drain_carry(&mut output[produced..]);

        Ok(Step::new(consumed, produced, Status::Ok))
    }

    fn end(&mut self) {
        self.stream = None;
        self.carry = Vec::new();
        self.carry_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::{write::ZlibEncoder, Compression};

    use super::*;

    #[test]
    fn carries_output_that_does_not_fit() {
        let text = b"carry carry carry carry over";
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut engine = InflateEngine::new();
        engine.init().unwrap();

        let mut decompressed = Vec::new();
        let mut input = &compressed[..];
        let mut out = [0; 5];
        for _ in 0..64 {
            let step = engine.step(input, &mut out, FlushMode::NoFlush).unwrap();
            input = &input[step.consumed..];
            decompressed.extend_from_slice(&out[..step.produced]);

            if decompressed.len() == text.len() {
                break;
            }
        }

        assert_eq!(decompressed, text);
    }

    #[test]
    fn end_releases_state() {
        let mut engine = InflateEngine::new();
        engine.init().unwrap();
        engine.end();

        let mut out = [0; 4];
        assert!(matches!(
            engine.step(&[0x78], &mut out, FlushMode::NoFlush),
            Err(EngineError::NotInitialized)
        ));
    }
}
