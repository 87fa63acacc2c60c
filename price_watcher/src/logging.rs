//! Logger setup.
//!
//! Records always go to stderr. With `--log-file` they are also appended to
//! that file and the default level drops to debug, so the file keeps the full
//! trace while the terminal shows the same stream.

use log::LevelFilter;
use price_common::Result;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Writer that copies every byte to two sinks.
pub struct TeeWriter<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    /// Duplicate output into `first` and `second`, in that order.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

/// Log to stderr at info level, plus `log_file` at debug level. `RUST_LOG` overrides both.
pub fn init_logger(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder
            .filter_level(LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(TeeWriter::new(
                io::stderr(),
                file,
            ))));
    }
    builder.parse_default_env().init();
    Ok(())
}
