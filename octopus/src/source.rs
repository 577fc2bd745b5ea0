use std::io::{self, ErrorKind, Read};

use tracing::trace;

/// Bytes requested from the reader on every refill.
pub const CHUNK_SIZE: usize = 1024;

/// Byte-at-a-time cursor over a reader, refilled in fixed-size chunks.
///
/// Slot 0 of the buffer holds the last byte of the previous chunk so that
/// a single `retreat` stays valid right after a refill.
pub struct CharSource<R> {
    reader: R,
    buffer: Box<[u8]>,
    len: usize,
    index: usize,
    floor: usize,
    eof: bool,
}

impl<R: Read> CharSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, CHUNK_SIZE)
    }

    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        let buffer = vec![0; chunk_size.max(1) + 1].into_boxed_slice();
        Self {
            reader,
            buffer,
            len: 1,
            index: 0,
            floor: 1,
            eof: false,
        }
    }

    /// Moves to the next byte, reading another chunk when the current one is
    /// spent. Returns `None` once the reader is exhausted.
    pub fn advance(&mut self) -> io::Result<Option<u8>> {
        if self.eof {
            return Ok(None);
        }
        if self.index + 1 < self.len {
            self.index += 1;
            return Ok(Some(self.buffer[self.index]));
        }
        self.refill()?;
        Ok(self.current())
    }

    /// The byte under the cursor.
    pub fn current(&self) -> Option<u8> {
        if self.eof || self.index < self.floor {
            None
        } else {
            Some(self.buffer[self.index])
        }
    }

    /// Gives back the byte under the cursor so the next `advance` yields it
    /// again. Fails at end of stream and before the first byte.
    pub fn retreat(&mut self) -> bool {
        if self.eof || self.index <= self.floor {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    fn refill(&mut self) -> io::Result<()> {
        let carried = self.index >= self.floor;
        if carried {
            self.buffer[0] = self.buffer[self.index];
        }

        let count = loop {
            match self.reader.read(&mut self.buffer[1..]) {
                Ok(count) => break count,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        };

        if count == 0 {
            trace!("source exhausted");
            self.eof = true;
            return Ok(());
        }

        trace!(bytes = count, "refilled source buffer");
        self.len = count + 1;
        self.index = 1;
        self.floor = if carried { 0 } else { 1 };
        Ok(())
    }
}
