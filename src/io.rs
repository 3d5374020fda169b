//! Read/write helpers that absorb transient I/O conditions.
//!
//! `Interrupted` is retried at once. `WouldBlock` from a non-blocking
//! source or sink is retried after yielding the thread, then after short
//! sleeps with exponential back-off. Every retry polls the stop token, so a
//! stalled stream can be abandoned through [`enough::Stop`].

use std::io::{self, ErrorKind, Read, Write};
use std::thread;
use std::time::Duration;

use alloc::vec::Vec;
use enough::Stop;
use log::trace;

use crate::error::TgaError;

/// Retries that only yield before sleeping starts.
const YIELD_RETRIES: u32 = 16;
const MIN_SLEEP: Duration = Duration::from_micros(100);
const MAX_SLEEP: Duration = Duration::from_millis(10);

/// Largest chunk allocated ahead of the data actually arriving.
const READ_CHUNK: usize = 64 * 1024;

struct Backoff {
    retries: u32,
}

impl Backoff {
    fn new() -> Self {
        Self { retries: 0 }
    }

    fn reset(&mut self) {
        self.retries = 0;
    }

    fn wait(&mut self) {
        if self.retries < YIELD_RETRIES {
            thread::yield_now();
        } else {
            let shift = (self.retries - YIELD_RETRIES).min(7);
            thread::sleep((MIN_SLEEP * (1u32 << shift)).min(MAX_SLEEP));
        }
        self.retries = self.retries.saturating_add(1);
    }
}

/// Fill `buf` from `reader` until it is full or the stream ends.
///
/// Returns the number of bytes read; less than `buf.len()` means end of stream.
pub(crate) fn read_full<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    stop: &dyn Stop,
) -> Result<usize, TgaError> {
    let mut filled = 0;
    let mut backoff = Backoff::new();
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => {
                filled += n;
                backoff.reset();
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => stop.check()?,
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                stop.check()?;
                trace!("read would block after {filled} bytes, retrying");
                backoff.wait();
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Read up to `len` bytes into a new buffer.
///
/// Memory grows with the data that actually arrives, so a header declaring a
/// huge body cannot force a huge allocation on a short stream. A returned
/// buffer shorter than `len` means the stream ended.
pub(crate) fn read_vec<R: Read + ?Sized>(
    reader: &mut R,
    len: usize,
    stop: &dyn Stop,
) -> Result<Vec<u8>, TgaError> {
    let mut out = Vec::with_capacity(len.min(READ_CHUNK));
    while out.len() < len {
        let start = out.len();
        let want = (len - start).min(READ_CHUNK);
        out.resize(start + want, 0);
        let got = read_full(reader, &mut out[start..], stop)?;
        out.truncate(start + got);
        if got < want {
            break;
        }
        stop.check()?;
    }
    Ok(out)
}

/// Consume and discard up to `len` bytes, returning how many were consumed.
pub(crate) fn skip<R: Read + ?Sized>(
    reader: &mut R,
    len: usize,
    stop: &dyn Stop,
) -> Result<usize, TgaError> {
    let mut scratch = [0u8; 4096];
    let mut skipped = 0;
    while skipped < len {
        let want = (len - skipped).min(scratch.len());
        let got = read_full(reader, &mut scratch[..want], stop)?;
        skipped += got;
        if got < want {
            break;
        }
    }
    Ok(skipped)
}

/// Write all of `buf`, retrying transient conditions.
pub(crate) fn write_all<W: Write + ?Sized>(
    writer: &mut W,
    mut buf: &[u8],
    stop: &dyn Stop,
) -> Result<(), TgaError> {
    let mut backoff = Backoff::new();
    while !buf.is_empty() {
        match writer.write(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    "sink accepted no bytes",
                )
                .into());
            }
            Ok(n) => {
                buf = &buf[n..];
                backoff.reset();
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => stop.check()?,
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                stop.check()?;
                trace!("write would block with {} bytes left", buf.len());
                backoff.wait();
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Write `len` zero bytes.
pub(crate) fn write_zeros<W: Write + ?Sized>(
    writer: &mut W,
    mut len: usize,
    stop: &dyn Stop,
) -> Result<(), TgaError> {
    let zeros = [0u8; 4096];
    while len > 0 {
        let n = len.min(zeros.len());
        write_all(writer, &zeros[..n], stop)?;
        len -= n;
    }
    Ok(())
}

pub(crate) fn flush<W: Write + ?Sized>(writer: &mut W, stop: &dyn Stop) -> Result<(), TgaError> {
    let mut backoff = Backoff::new();
    loop {
        match writer.flush() {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == ErrorKind::Interrupted => stop.check()?,
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                stop.check()?;
                backoff.wait();
            }
            Err(e) => return Err(e.into()),
        }
    }
}
