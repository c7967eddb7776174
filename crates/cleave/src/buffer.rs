//! Bounded look-ahead buffer over a byte reader.
//!
//! The streaming framework needs to inspect up to `max_size` bytes without
//! consuming them, then discard exactly the cutpoint the algorithm chose.
//! With a capacity of twice the peek window, at most one compaction is
//! needed per advance and a discard never straddles more than one refill.

use std::io::{ErrorKind, Read};

/// Read buffer supporting peek-without-consume and deferred discard.
pub struct LookAhead<R> {
    reader: R,
    buf: Vec<u8>,
    /// Offset of the first unconsumed byte.
    start: usize,
    /// Offset one past the last filled byte.
    end: usize,
    eof: bool,
}

impl<R: Read> LookAhead<R> {
    /// Creates a buffer with the given capacity wrapping `reader`.
    pub fn new(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buf: vec![0; capacity],
            start: 0,
            end: 0,
            eof: false,
        }
    }

    /// Returns up to `want` buffered bytes without consuming them.
    ///
    /// Refills from the reader until `want` bytes are available or the
    /// reader reports end of input. A shorter (possibly empty) slice is
    /// returned only at end of input; reader errors other than interruption
    /// propagate unchanged.
    pub fn peek(&mut self, want: usize) -> std::io::Result<&[u8]> {
        debug_assert!(want <= self.buf.len());

        if self.start + want > self.buf.len() {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }

        while self.end - self.start < want && !self.eof {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(0) => self.eof = true,
                Ok(n) => self.end += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        let available = (self.end - self.start).min(want);
        Ok(&self.buf[self.start..self.start + available])
    }

    /// Returns the first `len` buffered bytes.
    ///
    /// Only valid for a `len` no larger than the slice returned by the last
    /// [`peek`](Self::peek).
    pub fn buffered(&self, len: usize) -> &[u8] {
        &self.buf[self.start..self.start + len]
    }

    /// Discards `amount` previously peeked bytes.
    pub fn consume(&mut self, amount: usize) {
        debug_assert!(self.start + amount <= self.end);
        self.start += amount;
    }

    /// Rebinds the buffer to a new reader, dropping all buffered bytes.
    pub fn reset(&mut self, reader: R) {
        self.reader = reader;
        self.start = 0;
        self.end = 0;
        self.eof = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that hands out data in fixed-size fragments.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.step.min(self.data.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut la = LookAhead::new(Cursor::new(vec![1u8, 2, 3, 4]), 8);
        assert_eq!(la.peek(4).unwrap(), &[1, 2, 3, 4]);
        assert_eq!(la.peek(4).unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_peek_short_at_eof() {
        let mut la = LookAhead::new(Cursor::new(vec![9u8; 3]), 8);
        assert_eq!(la.peek(8).unwrap(), &[9, 9, 9]);
        la.consume(3);
        assert!(la.peek(8).unwrap().is_empty());
    }

    #[test]
    fn test_consume_then_refill_compacts() {
        let data: Vec<u8> = (0..=255).collect();
        let mut la = LookAhead::new(Cursor::new(data.clone()), 16);

        let mut seen = Vec::new();
        loop {
            let window = la.peek(8).unwrap().to_vec();
            if window.is_empty() {
                break;
            }
            let take = window.len().min(5);
            seen.extend_from_slice(&window[..take]);
            la.consume(take);
        }
        assert_eq!(seen, data);
    }

    #[test]
    fn test_fragmented_reader_fills_full_window() {
        let data: Vec<u8> = (0..100u8).collect();
        let mut la = LookAhead::new(
            Trickle {
                data: data.clone(),
                pos: 0,
                step: 1,
            },
            64,
        );
        // A 1-byte-at-a-time reader must still produce a full peek window.
        assert_eq!(la.peek(32).unwrap(), &data[..32]);
    }

    #[test]
    fn test_buffered_matches_peek() {
        let mut la = LookAhead::new(Cursor::new(vec![5u8; 10]), 16);
        let len = la.peek(10).unwrap().len();
        assert_eq!(la.buffered(len), &[5u8; 10]);
    }

    #[test]
    fn test_reset_rebinds_reader() {
        let mut la = LookAhead::new(Cursor::new(vec![1u8; 4]), 8);
        assert_eq!(la.peek(8).unwrap().len(), 4);
        la.consume(4);
        assert!(la.peek(8).unwrap().is_empty());

        la.reset(Cursor::new(vec![2u8; 6]));
        assert_eq!(la.peek(8).unwrap(), &[2u8; 6]);
    }
}
