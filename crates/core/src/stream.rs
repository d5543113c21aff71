//! Byte stream abstraction shared by the encoder and decoder.
//!
//! The codec never touches files directly. It reads and writes through the
//! [`ByteStream`] contract, which has two implementations:
//! - [`MemStream`]: a growable in-memory region with a cursor
//! - [`FileStream`]: a buffered file, or standard input/output
//!
//! Encoding scans its input twice (once to count, once to pack), so the
//! input stream must support [`ByteStream::rewind`]. Standard streams don't.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, Stdin, Stdout, Write};
use std::path::Path;

/// Minimal byte-oriented stream contract used by the codec.
pub trait ByteStream {
    /// Return true when no more bytes can be read.
    fn at_end(&mut self) -> io::Result<bool>;

    /// Read up to `buf.len()` bytes, returning how many were read.
    ///
    /// Returns 0 only at end of data.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write up to `buf.len()` bytes, returning how many were written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Move the cursor back to the first byte.
    fn rewind(&mut self) -> io::Result<()>;

    /// Push any buffered bytes to the backing store.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Read until `buf` is full or the stream ends.
    ///
    /// Returns the number of bytes read, which is less than `buf.len()` only
    /// at end of data.
    fn read_full(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(filled)
    }

    /// Write every byte of `buf`, failing if the stream stops accepting data.
    fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "stream accepted no bytes",
                    ))
                }
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    fn at_end(&mut self) -> io::Result<bool> {
        (**self).at_end()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn rewind(&mut self) -> io::Result<()> {
        (**self).rewind()
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// In-memory byte region with a read/write cursor.
///
/// Writes overwrite bytes at the cursor and grow the region past its end.
#[derive(Debug, Clone, Default)]
pub struct MemStream {
    data: Vec<u8>,
    cursor: usize,
}

impl MemStream {
    /// Create an empty stream, typically used as an output sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing bytes; the cursor starts at the first byte.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { data, cursor: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// All bytes held by the stream, regardless of cursor.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the stream and return its bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl From<&[u8]> for MemStream {
    fn from(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }
}

impl ByteStream for MemStream {
    fn at_end(&mut self) -> io::Result<bool> {
        Ok(self.cursor >= self.data.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.data.len().saturating_sub(self.cursor);
        let n = buf.len().min(available);
        buf[..n].copy_from_slice(&self.data[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let end = self.cursor + buf.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.cursor..end].copy_from_slice(buf);
        self.cursor = end;
        Ok(buf.len())
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.cursor = 0;
        Ok(())
    }
}

#[derive(Debug)]
enum Inner {
    Reader(BufReader<File>),
    Writer(BufWriter<File>),
    Stdin(BufReader<Stdin>),
    Stdout(BufWriter<Stdout>),
}

/// Buffered file or standard-stream adapter.
///
/// Each stream is opened for one direction only, mirroring how the CLI uses
/// them: an input opened with [`FileStream::open`] and an output created with
/// [`FileStream::create`] or [`FileStream::stdout`].
#[derive(Debug)]
pub struct FileStream {
    inner: Inner,
}

impl FileStream {
    /// Open an existing file for reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            inner: Inner::Reader(BufReader::new(file)),
        })
    }

    /// Create (or truncate) a file for writing.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Inner::Writer(BufWriter::new(file)),
        })
    }

    /// Standard input. Cannot be rewound.
    pub fn stdin() -> Self {
        Self {
            inner: Inner::Stdin(BufReader::new(io::stdin())),
        }
    }

    /// Standard output.
    pub fn stdout() -> Self {
        Self {
            inner: Inner::Stdout(BufWriter::new(io::stdout())),
        }
    }
}

fn unsupported(op: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{op} is not supported on this stream"),
    )
}

impl ByteStream for FileStream {
    fn at_end(&mut self) -> io::Result<bool> {
        match &mut self.inner {
            Inner::Reader(r) => Ok(r.fill_buf()?.is_empty()),
            Inner::Stdin(r) => Ok(r.fill_buf()?.is_empty()),
            Inner::Writer(_) | Inner::Stdout(_) => Err(unsupported("reading")),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Reader(r) => r.read(buf),
            Inner::Stdin(r) => r.read(buf),
            Inner::Writer(_) | Inner::Stdout(_) => Err(unsupported("reading")),
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Writer(w) => w.write(buf),
            Inner::Stdout(w) => w.write(buf),
            Inner::Reader(_) | Inner::Stdin(_) => Err(unsupported("writing")),
        }
    }

    fn rewind(&mut self) -> io::Result<()> {
        match &mut self.inner {
            Inner::Reader(r) => r.rewind(),
            Inner::Writer(w) => w.rewind(),
            Inner::Stdin(_) | Inner::Stdout(_) => Err(unsupported("rewinding")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            Inner::Writer(w) => w.flush(),
            Inner::Stdout(w) => w.flush(),
            Inner::Reader(_) | Inner::Stdin(_) => Ok(()),
        }
    }
}
