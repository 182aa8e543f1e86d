use std::{env, fs::File, io::{self, Write}};

use anyhow::Context;

use stream_inflate::StreamDecompressor;

fn main() -> anyhow::Result<()> {
    let path = env::args().nth(1).unwrap_or_else(|| "archive.zz".to_owned());
    let mut file = File::open(&path)
        .with_context(|| format!("could not open {path}"))?;

    let mut reader = StreamDecompressor::new(&mut file)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let copied = io::copy(&mut reader, &mut out)
        .with_context(|| format!("could not decompress {path}"))?;
    out.flush()?;

    reader.close();
    eprintln!("\n{copied} bytes from {path}");

    Ok(())
}
