/// Provides the decompression engines driven by [reader::StreamDecompressor]
pub mod decompress;

/// Provides a [std::io::Read] adapter that decompresses a stream of compressed bytes
pub mod reader;

pub use decompress::{Engine, EngineError, EngineInitError, zlib::{Format, ZlibEngine}};
#[cfg(feature = "deflate")]
pub use decompress::deflate::InflateEngine;
pub use reader::{StreamDecompressor, ReadError, ReadOutcome, DEFAULT_COMPRESSED_BUFFER_SIZE, source::{Source, SourceRead, SourceSignal}};
