//! Emitting compressed pages into the output stream

use crate::column::EncodedPage;
use crate::compression::BlockCodec;
use crate::metadata::{FileMetadata, PageHeaderInfo};
use crate::Result;
use log::trace;
use std::io::Write;

/// Wraps the output and counts the bytes written through it
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Current offset in the output
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Where a page ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLocation {
    pub offset: u64,
    pub header_size: usize,
    pub compressed_size: usize,
}

/// Compresses page payloads and writes them, header first
pub struct PageWriter {
    codec: Box<dyn BlockCodec>,
}

impl PageWriter {
    pub fn new(codec: Box<dyn BlockCodec>) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &dyn BlockCodec {
        self.codec.as_ref()
    }

    pub fn write<W: Write>(
        &self,
        out: &mut CountingWriter<W>,
        metadata: &mut FileMetadata,
        column: &str,
        page: EncodedPage,
    ) -> Result<PageLocation> {
        let compressed = self.codec.encode(&page.bytes)?;
        let offset = out.bytes_written();

        let header_size = metadata.write_page_header(
            out,
            PageHeaderInfo {
                column,
                offset,
                uncompressed_size: page.bytes.len(),
                compressed_size: compressed.len(),
                num_values: page.num_values,
                num_rows: page.num_rows,
            },
        )?;
        out.write_all(&compressed)?;

        trace!(
            "page for '{}' at offset {}: {} values, {} -> {} bytes",
            column,
            offset,
            page.num_values,
            page.bytes.len(),
            compressed.len()
        );

        Ok(PageLocation {
            offset,
            header_size,
            compressed_size: compressed.len(),
        })
    }
}
