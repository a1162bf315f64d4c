//! Raw I/Q capture files
//!
//! A capture is headerless interleaved little-endian f32 pairs, `I, Q, I, Q,
//! ...`, the format MATLAB, GNU Radio, and fc32 recorders emit.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::types::{IqSample, IQ_SAMPLE_BYTES};

use super::{Recv, SampleSource, SourceError};

/// Reads complex samples from a raw capture file
pub struct FileSource {
    reader: BufReader<File>,
    bytes: Vec<u8>,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self, std::io::Error> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            bytes: Vec::new(),
        })
    }
}

impl SampleSource for FileSource {
    fn recv(&mut self, buf: &mut [IqSample]) -> Result<Recv, SourceError> {
        let wanted = buf.len() * IQ_SAMPLE_BYTES;
        self.bytes.resize(wanted, 0);

        // read_exact would error on the tail; accumulate instead so a short
        // final hop is reported as a partial count
        let mut filled = 0;
        while filled < wanted {
            match self.reader.read(&mut self.bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let samples = filled / IQ_SAMPLE_BYTES;
        for (sample, pair) in buf
            .iter_mut()
            .zip(self.bytes[..samples * IQ_SAMPLE_BYTES].chunks_exact(IQ_SAMPLE_BYTES))
        {
            let i = f32::from_le_bytes(pair[0..4].try_into().unwrap());
            let q = f32::from_le_bytes(pair[4..8].try_into().unwrap());
            *sample = IqSample::new(i, q);
        }

        Ok(Recv {
            samples,
            overflow: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_capture(samples: &[(f32, f32)]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for &(i, q) in samples {
            file.write_all(&i.to_le_bytes()).unwrap();
            file.write_all(&q.to_le_bytes()).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_interleaved_pairs() {
        let file = write_capture(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]);
        let mut source = FileSource::open(file.path()).unwrap();

        let mut buf = vec![IqSample::default(); 3];
        let recv = source.recv(&mut buf).unwrap();
        assert_eq!(recv.samples, 3);
        assert!(!recv.overflow);
        assert_eq!(buf[0], IqSample::new(1.0, 2.0));
        assert_eq!(buf[2], IqSample::new(5.0, 6.0));
    }

    #[test]
    fn test_short_tail_reports_partial_count() {
        let file = write_capture(&[(1.0, 0.0), (2.0, 0.0)]);
        let mut source = FileSource::open(file.path()).unwrap();

        let mut buf = vec![IqSample::default(); 4];
        let recv = source.recv(&mut buf).unwrap();
        assert_eq!(recv.samples, 2);

        // stream is exhausted afterwards
        let recv = source.recv(&mut buf).unwrap();
        assert_eq!(recv.samples, 0);
    }

    #[test]
    fn test_sub_sample_tail_is_discarded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&1.0f32.to_le_bytes()).unwrap();
        file.write_all(&2.0f32.to_le_bytes()).unwrap();
        // a lone I float with no matching Q
        file.write_all(&9.0f32.to_le_bytes()).unwrap();
        file.flush().unwrap();

        let mut source = FileSource::open(file.path()).unwrap();
        let mut buf = vec![IqSample::default(); 2];
        let recv = source.recv(&mut buf).unwrap();
        assert_eq!(recv.samples, 1);
        assert_eq!(buf[0], IqSample::new(1.0, 2.0));
    }
}
