//! Byte-range access to a FASTA file, compressed or not.
//!
//! Supported inputs:
//! - `.fa`, `.fasta`, `.fna` (uncompressed): direct seek
//! - `.fa.gz` / `.fa.bgz` with a `.gzi` index next to it: BGZF random access
//! - `.fa.gz` / `.fa.bgz` without `.gzi`: sequential decompression
//!
//! The sequential backend keeps its decompressor positioned after the last
//! byte it delivered, so queries that move forward through the file only pay
//! for the gap. Moving backwards restarts the stream from the beginning.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use noodles::bgzf;
use tracing::{debug, warn};

use crate::reference::ReferenceError;
use crate::utils::validation::is_gzipped;

type BgzfReader = bgzf::IndexedReader<File>;

/// How the underlying file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceFileKind {
    Plain,
    Bgzf,
    Gzip,
}

enum Backend {
    Plain(BufReader<File>),
    Bgzf(Box<BgzfReader>),
    Gzip(GzipStream),
}

/// Whole-stream gzip reader that remembers where it stopped
struct GzipStream {
    decoder: MultiGzDecoder<BufReader<File>>,
    /// Uncompressed offset of the next byte the decoder will yield
    position: u64,
}

impl GzipStream {
    fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            decoder: MultiGzDecoder::new(BufReader::new(file)),
            position: 0,
        })
    }

    fn read_range(&mut self, path: &Path, first: u64, buf: &mut [u8]) -> io::Result<()> {
        if first < self.position {
            debug!(
                "Restarting decompression of {} to reach offset {first}",
                path.display()
            );
            *self = Self::open(path)?;
        }

        let gap = first - self.position;
        // Poison the position so a failed read forces a restart next time
        self.position = u64::MAX;

        let skipped = io::copy(&mut self.decoder.by_ref().take(gap), &mut io::sink())?;
        if skipped < gap {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("compressed stream ended before offset {first}"),
            ));
        }
        self.decoder.read_exact(buf)?;

        self.position = first + buf.len() as u64;
        Ok(())
    }
}

/// A FASTA file opened for byte-range reads
pub struct SequenceFile {
    path: PathBuf,
    backend: Backend,
}

impl SequenceFile {
    /// Open `path`, picking a backend from its suffix and any `.gzi` sidecar
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::NotFound` if the file does not exist, and
    /// `ReferenceError::Io` if it (or its `.gzi` index) cannot be read.
    pub fn open(path: &Path) -> Result<Self, ReferenceError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ReferenceError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ReferenceError::Io(e),
        })?;

        let backend = if is_gzipped(path) {
            let gzi_path = gzi_path(path);
            if gzi_path.exists() {
                debug!("Using BGZF index {}", gzi_path.display());
                let index = bgzf::gzi::read(&gzi_path)?;
                Backend::Bgzf(Box::new(BgzfReader::new(file, index)))
            } else {
                warn!(
                    "No .gzi index for {}; falling back to sequential decompression",
                    path.display()
                );
                Backend::Gzip(GzipStream {
                    decoder: MultiGzDecoder::new(BufReader::new(file)),
                    position: 0,
                })
            }
        } else {
            Backend::Plain(BufReader::new(file))
        };

        Ok(Self {
            path: path.to_path_buf(),
            backend,
        })
    }

    pub fn kind(&self) -> SequenceFileKind {
        match self.backend {
            Backend::Plain(_) => SequenceFileKind::Plain,
            Backend::Bgzf(_) => SequenceFileKind::Bgzf,
            Backend::Gzip(_) => SequenceFileKind::Gzip,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the inclusive byte range `[first_byte, last_byte]` (uncompressed
    /// coordinates)
    ///
    /// # Errors
    ///
    /// Returns an `UnexpectedEof` error if the file ends inside the range, or
    /// any other I/O error from the underlying reader.
    pub fn read_range(&mut self, first_byte: u64, last_byte: u64) -> io::Result<Vec<u8>> {
        if last_byte < first_byte {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid byte range {first_byte}..={last_byte}"),
            ));
        }
        let len = usize::try_from(last_byte - first_byte + 1).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "byte range too large for memory",
            )
        })?;
        let mut buf = vec![0u8; len];

        match &mut self.backend {
            Backend::Plain(reader) => {
                reader.seek(SeekFrom::Start(first_byte))?;
                reader.read_exact(&mut buf)?;
            }
            Backend::Bgzf(reader) => {
                reader.seek(SeekFrom::Start(first_byte))?;
                reader.read_exact(&mut buf)?;
            }
            Backend::Gzip(stream) => stream.read_range(&self.path, first_byte, &mut buf)?,
        }

        Ok(buf)
    }
}

impl std::fmt::Debug for SequenceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceFile")
            .field("path", &self.path)
            .field("kind", &self.kind())
            .finish()
    }
}

fn gzi_path(path: &Path) -> PathBuf {
    let mut gzi = path.as_os_str().to_owned();
    gzi.push(".gzi");
    PathBuf::from(gzi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONTENT: &[u8] = b">chr1\nACGTACGT\nTTGG\n>chr2\nCCCCAAAA\n";

    fn plain_file() -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(CONTENT).unwrap();
        temp.flush().unwrap();
        temp
    }

    fn gzip_file(members: &[&[u8]]) -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(".fa.gz").unwrap();
        for member in members {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(member).unwrap();
            temp.write_all(&encoder.finish().unwrap()).unwrap();
        }
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_plain_read_range() {
        let temp = plain_file();
        let mut file = SequenceFile::open(temp.path()).unwrap();
        assert_eq!(file.kind(), SequenceFileKind::Plain);

        assert_eq!(file.read_range(6, 13).unwrap(), b"ACGTACGT");
        assert_eq!(file.read_range(0, 4).unwrap(), b">chr1");
    }

    #[test]
    fn test_plain_read_past_end() {
        let temp = plain_file();
        let mut file = SequenceFile::open(temp.path()).unwrap();
        let err = file.read_range(30, 100).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_gzip_forward_and_backward() {
        let temp = gzip_file(&[CONTENT]);
        let mut file = SequenceFile::open(temp.path()).unwrap();
        assert_eq!(file.kind(), SequenceFileKind::Gzip);

        assert_eq!(file.read_range(6, 9).unwrap(), b"ACGT");
        // Forward: skips from the remembered position
        assert_eq!(file.read_range(15, 18).unwrap(), b"TTGG");
        // Backward: restarts the stream
        assert_eq!(file.read_range(10, 13).unwrap(), b"ACGT");
        assert_eq!(file.read_range(26, 33).unwrap(), b"CCCCAAAA");
    }

    #[test]
    fn test_gzip_multiple_members() {
        let (head, tail) = CONTENT.split_at(20);
        let temp = gzip_file(&[head, tail]);
        let mut file = SequenceFile::open(temp.path()).unwrap();

        assert_eq!(file.read_range(15, 18).unwrap(), b"TTGG");
        assert_eq!(file.read_range(26, 33).unwrap(), b"CCCCAAAA");
    }

    #[test]
    fn test_gzip_read_past_end_then_recover() {
        let temp = gzip_file(&[CONTENT]);
        let mut file = SequenceFile::open(temp.path()).unwrap();

        assert!(file.read_range(100, 101).is_err());
        assert_eq!(file.read_range(6, 9).unwrap(), b"ACGT");
    }

    /// BGZF-compress `content` and write a `.gzi` holding no extra entries,
    /// which noodles reads as a single block starting at offset 0
    fn bgzf_file(content: &[u8]) -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(".fa.gz").unwrap();
        let mut writer = bgzf::Writer::new(Vec::new());
        writer.write_all(content).unwrap();
        temp.write_all(&writer.finish().unwrap()).unwrap();
        temp.flush().unwrap();

        std::fs::write(gzi_path(temp.path()), 0u64.to_le_bytes()).unwrap();
        temp
    }

    #[test]
    fn test_bgzf_read_range() {
        let temp = bgzf_file(CONTENT);
        let mut file = SequenceFile::open(temp.path()).unwrap();
        assert_eq!(file.kind(), SequenceFileKind::Bgzf);

        assert_eq!(file.read_range(26, 33).unwrap(), b"CCCCAAAA");
        // Random access in either direction
        assert_eq!(file.read_range(6, 13).unwrap(), b"ACGTACGT");
        assert_eq!(file.read_range(15, 18).unwrap(), b"TTGG");

        std::fs::remove_file(gzi_path(temp.path())).unwrap();
    }

    #[test]
    fn test_bgzf_without_gzi_reads_sequentially() {
        let temp = bgzf_file(CONTENT);
        std::fs::remove_file(gzi_path(temp.path())).unwrap();

        let mut file = SequenceFile::open(temp.path()).unwrap();
        assert_eq!(file.kind(), SequenceFileKind::Gzip);
        assert_eq!(file.read_range(26, 33).unwrap(), b"CCCCAAAA");
    }

    #[test]
    fn test_corrupt_gzi_is_io_error() {
        let temp = bgzf_file(CONTENT);
        std::fs::write(gzi_path(temp.path()), b"abc").unwrap();

        let result = SequenceFile::open(temp.path());
        assert!(matches!(result, Err(ReferenceError::Io(_))));

        std::fs::remove_file(gzi_path(temp.path())).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let result = SequenceFile::open(Path::new("/nonexistent/ref.fa"));
        assert!(matches!(result, Err(ReferenceError::NotFound { .. })));
    }
}
