//! Single-byte, timeout-bounded reads from a raw file descriptor.
//!
//! Corresponds to the blocking `select`-then-`read` loop in `kui_term.c`'s
//! key-reading path. This crate's front end runs inside a `tokio` runtime
//! (see `main.rs`), so the same "wait up to N milliseconds for one byte" is
//! expressed with [`tokio::io::unix::AsyncFd`] instead of raw `select`, but
//! stays single-task and lock-free — no spawning, no shared state, exactly
//! the sequential read-or-timeout step `InputContext` needs.

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::Duration;

use tokio::io::unix::AsyncFd;

use crate::config::FOREVER_MS;

/// Result of one bounded read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// One byte was read.
    Byte(u8),
    /// No byte arrived within the requested timeout.
    Timeout,
    /// The underlying descriptor reached end-of-file.
    Eof,
}

/// Source of single bytes with a per-call timeout, in wall-clock
/// milliseconds. `timeout_ms == FOREVER_MS` waits indefinitely.
pub trait ByteReader {
    async fn read_byte(&mut self, timeout_ms: u64) -> io::Result<ReadOutcome>;

    /// Poll without consuming: `true` if a byte is ready to read within
    /// `timeout_ms`, without blocking past it and without reading it. A
    /// front-end may call this directly on its own descriptor (e.g. before
    /// deciding whether to `select` on other sources too); the engine's own
    /// entry points never need it, since `InputContext`/`KeyManager` always
    /// go straight to `read_byte` and let its own timeout do the waiting.
    async fn ready(&self, timeout_ms: u64) -> io::Result<bool>;
}

/// Thin [`AsRawFd`] wrapper so a bare fd can be handed to [`AsyncFd`].
/// Does not own or close the descriptor.
struct BorrowedFd(RawFd);

impl AsRawFd for BorrowedFd {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

/// Production [`ByteReader`] reading one raw, non-owned file descriptor —
/// typically a terminal's fd placed in raw, non-blocking mode by the
/// caller (see `main.rs`).
pub struct FdByteReader {
    inner: AsyncFd<BorrowedFd>,
}

impl FdByteReader {
    pub fn new(fd: RawFd) -> io::Result<Self> {
        Ok(Self { inner: AsyncFd::new(BorrowedFd(fd))? })
    }

    async fn read_one(&mut self) -> io::Result<ReadOutcome> {
        loop {
            let mut guard = self.inner.readable().await?;
            let mut byte = [0u8; 1];
            let attempt = guard.try_io(|fd| {
                let n = unsafe { libc::read(fd.as_raw_fd(), byte.as_mut_ptr().cast(), 1) };
                if n < 0 {
                    Err(io::Error::last_os_error())
                } else {
                    Ok(n)
                }
            });
            match attempt {
                Ok(Ok(0)) => return Ok(ReadOutcome::Eof),
                Ok(Ok(_)) => return Ok(ReadOutcome::Byte(byte[0])),
                Ok(Err(e)) => return Err(e),
                Err(_would_block) => continue,
            }
        }
    }
}

impl ByteReader for FdByteReader {
    async fn read_byte(&mut self, timeout_ms: u64) -> io::Result<ReadOutcome> {
        if timeout_ms == FOREVER_MS {
            return self.read_one().await;
        }
        match tokio::time::timeout(Duration::from_millis(timeout_ms), self.read_one()).await {
            Ok(result) => result,
            Err(_elapsed) => Ok(ReadOutcome::Timeout),
        }
    }

    async fn ready(&self, timeout_ms: u64) -> io::Result<bool> {
        // Dropping the guard without `clear_ready` leaves the descriptor's
        // readiness state untouched, so this really is a peek: a later
        // `read_byte`/`ready` call sees the same readiness again.
        if timeout_ms == FOREVER_MS {
            self.inner.readable().await?;
            return Ok(true);
        }
        match tokio::time::timeout(Duration::from_millis(timeout_ms), self.inner.readable()).await {
            Ok(guard) => {
                guard?;
                Ok(true)
            }
            Err(_elapsed) => Ok(false),
        }
    }
}
