use std::io::{self, Write};

use crate::Error;

/// Compression codec for tar archives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TarCompress {
    None,
    #[default]
    Gzip,
}

impl TarCompress {
    pub fn extension(self) -> &'static str {
        match self {
            Self::None => "tar",
            Self::Gzip => "tar.gz",
        }
    }

    /// Wrap `writer` in the encoder for this codec.
    pub fn encoder<W: Write>(self, writer: W) -> Result<Encoder<W>, Error> {
        match self {
            Self::None => Ok(Encoder::Passthrough(writer)),
            #[cfg(feature = "gzip")]
            Self::Gzip => Ok(Encoder::Gzip(Box::new(flate2::write::GzEncoder::new(
                writer,
                flate2::Compression::default(),
            )))),
            #[cfg(not(feature = "gzip"))]
            Self::Gzip => Err(Error::UnsupportedCompression(self)),
        }
    }
}

/// Encoder wrapper for tar compression.
#[derive(Debug)]
pub enum Encoder<W: Write> {
    Passthrough(W),
    #[cfg(feature = "gzip")]
    Gzip(Box<flate2::write::GzEncoder<W>>),
}

impl<W: Write> Encoder<W> {
    /// Flush trailing codec state and hand back the inner writer.
    pub fn finish(self) -> io::Result<W> {
        match self {
            Self::Passthrough(mut w) => {
                w.flush()?;
                Ok(w)
            }
            #[cfg(feature = "gzip")]
            Self::Gzip(e) => e.finish(),
        }
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(w) => w.write(buf),
            #[cfg(feature = "gzip")]
            Self::Gzip(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Passthrough(w) => w.flush(),
            #[cfg(feature = "gzip")]
            Self::Gzip(e) => e.flush(),
        }
    }
}
