//! Character sources for the tokenizer.
//!
//! A [`CharSource`] hands out one character at a time. The tokenizer never asks for more
//! than the next character, so a source only has to remember where it is.

use crate::{Error, Result};
use std::io;
use std::str::Chars;

/// A pull interface over a stream of characters.
pub trait CharSource {
    /// Returns the next character, or `None` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the underlying stream fails or is not valid UTF-8.
    fn next_char(&mut self) -> Result<Option<char>>;
}

/// A source over an in-memory string.
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        StrSource {
            chars: input.chars(),
        }
    }
}

impl CharSource for StrSource<'_> {
    #[inline]
    fn next_char(&mut self) -> Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// A source over a byte stream, decoding UTF-8 one character at a time.
///
/// Reads are issued byte by byte; wrap unbuffered readers in a [`io::BufReader`].
pub struct ReaderSource<R> {
    bytes: io::Bytes<R>,
}

impl<R: io::Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource {
            bytes: reader.bytes(),
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        self.bytes.next().transpose().map_err(Error::from)
    }
}

impl<R: io::Read> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> Result<Option<char>> {
        let lead = match self.next_byte()? {
            Some(byte) => byte,
            None => return Ok(None),
        };
        if lead.is_ascii() {
            return Ok(Some(char::from(lead)));
        }

        let width = match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(Error::io("stream did not contain valid UTF-8")),
        };
        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self
                .next_byte()?
                .ok_or_else(|| Error::io("stream ended inside a UTF-8 sequence"))?;
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| Error::io("stream did not contain valid UTF-8"))
    }
}
