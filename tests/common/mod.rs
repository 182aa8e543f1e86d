#![allow(dead_code)]

use std::{collections::VecDeque, io::Write};

use flate2::{write::ZlibEncoder, Compression};

use stream_inflate::{Engine, ReadError, Source, SourceRead, SourceSignal, StreamDecompressor};

pub const QUICK_FOX: &[u8] = b"The quick brown fox jumps over the lazy dog. ";

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn text(repeats: usize) -> Vec<u8> {
    QUICK_FOX.repeat(repeats)
}

/// Deterministic bytes that do not compress well
pub fn noise(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

/// Reads until the reader reports an error, returning everything produced
/// and that error
pub fn drain<S: Source, E: Engine>(reader: &mut StreamDecompressor<S, E>, dest_len: usize) -> (Vec<u8>, ReadError) {
    let mut out = Vec::new();
    let mut dest = vec![0; dest_len];

    for _ in 0..1_000_000 {
        let (produced, error) = reader.read_chunk(&mut dest).into_parts();
        assert!(produced <= dest_len);
        out.extend_from_slice(&dest[..produced]);

        if let Some(error) = error {
            return (out, error);
        }
    }

    panic!("reader never reported an end");
}

/// A source that replays a fixed list of pulls, then reports the end
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<(Vec<u8>, Option<SourceSignal>)>,
    pub pulls: usize
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, bytes: impl Into<Vec<u8>>, signal: Option<SourceSignal>) -> Self {
        self.script.push_back((bytes.into(), signal));
        self
    }
}

impl Source for ScriptedSource {
    fn pull(&mut self, buf: &mut [u8]) -> SourceRead {
        self.pulls += 1;

        let Some((bytes, signal)) = self.script.pop_front() else {
            return SourceRead::end();
        };

        assert!(bytes.len() <= buf.len(), "scripted chunk does not fit the staging buffer");
        buf[..bytes.len()].copy_from_slice(&bytes);

        SourceRead {
            count: bytes.len(),
            signal
        }
    }
}

/// A source that fails the test when pulled
#[derive(Debug)]
pub struct UntouchableSource;

impl Source for UntouchableSource {
    fn pull(&mut self, _: &mut [u8]) -> SourceRead {
        panic!("source must not be pulled");
    }
}
