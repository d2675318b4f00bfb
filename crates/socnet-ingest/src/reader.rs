//! Bounded-size slicing of CSV input

use crate::error::{ImportError, Result};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One data row as read from the file
#[derive(Debug, Clone)]
pub enum RawRow {
    Record { line: u64, record: StringRecord },
    /// The CSV layer could not decode the row (e.g. invalid UTF-8)
    Unreadable { line: u64, reason: String },
}

impl RawRow {
    /// 1-based line number in the source file
    pub fn line(&self) -> u64 {
        match self {
            RawRow::Record { line, .. } | RawRow::Unreadable { line, .. } => *line,
        }
    }
}

/// A contiguous slice of at most `chunk_size` data rows
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 0-based position of the slice in the file
    pub index: usize,
    pub rows: Vec<RawRow>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads a CSV source slice by slice
///
/// Rows with a different field count than the header are returned as-is
/// and left to the mapper to reject. Empty slices are never produced.
pub struct ChunkReader<R> {
    reader: Reader<R>,
    headers: StringRecord,
    chunk_size: usize,
    next_index: usize,
    done: bool,
}

impl ChunkReader<File> {
    /// Open a file, failing with `FileNotFound` before reading anything
    pub fn from_path(path: &Path, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ImportError::InvalidChunkSize);
        }
        if !path.is_file() {
            return Err(ImportError::FileNotFound(path.to_path_buf()));
        }

        debug!(path = %path.display(), chunk_size, "Opening CSV source");
        Self::from_reader(File::open(path)?, chunk_size)
    }
}

impl<R: Read> ChunkReader<R> {
    pub fn from_reader(source: R, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ImportError::InvalidChunkSize);
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(source);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            chunk_size,
            next_index: 0,
            done: false,
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Whether the source had no header row at all
    pub fn is_blank(&self) -> bool {
        self.headers.is_empty()
    }

    fn read_row(&mut self) -> Option<RawRow> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => {
                let line = record.position().map_or(0, |p| p.line());
                Some(RawRow::Record { line, record })
            },
            Ok(false) => {
                self.done = true;
                None
            },
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                // A broken reader cannot make progress
                if e.is_io_error() {
                    self.done = true;
                }
                Some(RawRow::Unreadable {
                    line,
                    reason: e.to_string(),
                })
            },
        }
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let mut rows = Vec::with_capacity(self.chunk_size.min(1024));
        while !self.done && rows.len() < self.chunk_size {
            if let Some(row) = self.read_row() {
                rows.push(row);
            }
        }

        if rows.is_empty() {
            return None;
        }

        let chunk = Chunk {
            index: self.next_index,
            rows,
        };
        self.next_index += 1;
        Some(chunk)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn users_csv(rows: usize) -> String {
        let mut csv = String::from("USER_ID,EMAIL,NAME,LASTNAME\n");
        for i in 0..rows {
            csv.push_str(&format!("user{i},user{i}@uw.edu,Name{i},Last{i}\n"));
        }
        csv
    }

    #[test]
    fn test_250_rows_in_slices_of_100() {
        let source = users_csv(250);
        let reader = ChunkReader::from_reader(source.as_bytes(), 100).unwrap();
        let sizes: Vec<usize> = reader.map(|c| c.len()).collect();

        assert_eq!(sizes, vec![100, 100, 50]);
    }

    #[test]
    fn test_header_only_yields_no_slices() {
        let source = users_csv(0);
        let mut reader = ChunkReader::from_reader(source.as_bytes(), 100).unwrap();

        assert_eq!(reader.headers().len(), 4);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_blank_source() {
        let mut reader = ChunkReader::from_reader("".as_bytes(), 10).unwrap();

        assert!(reader.is_blank());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = ChunkReader::from_reader(users_csv(1).as_bytes(), 0)
            .err()
            .unwrap();
        assert!(matches!(err, ImportError::InvalidChunkSize));
    }

    #[test]
    fn test_missing_file() {
        let err = ChunkReader::from_path(Path::new("/nonexistent/accounts.csv"), 100)
            .err()
            .unwrap();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }

    #[test]
    fn test_line_numbers_and_ragged_rows() {
        let source = "USER_ID,EMAIL,NAME,LASTNAME\na,a@x,A,Aa\nb,b@x\nc,c@x,C,Cc\n";
        let chunks: Vec<Chunk> = ChunkReader::from_reader(source.as_bytes(), 2)
            .unwrap()
            .collect();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[1].index, 1);
        assert_eq!(chunks[0].rows[0].line(), 2);
        match &chunks[0].rows[1] {
            RawRow::Record { line, record } => {
                assert_eq!(*line, 3);
                assert_eq!(record.len(), 2);
            },
            other => panic!("unexpected row: {other:?}"),
        }
        assert_eq!(chunks[1].rows[0].line(), 4);
    }

    #[test]
    fn test_invalid_utf8_row_is_unreadable() {
        let mut source = b"USER_ID,EMAIL,NAME,LASTNAME\na,a@x,A,Aa\n".to_vec();
        source.extend_from_slice(b"b,\xff\xfe,B,Bb\nc,c@x,C,Cc\n");

        let chunk = ChunkReader::from_reader(source.as_slice(), 10)
            .unwrap()
            .next()
            .unwrap();

        assert_eq!(chunk.len(), 3);
        assert!(matches!(chunk.rows[1], RawRow::Unreadable { line: 3, .. }));
        assert!(matches!(chunk.rows[2], RawRow::Record { line: 4, .. }));
    }

    proptest! {
        #[test]
        fn prop_slices_cover_every_row_in_order(rows in 0usize..400, chunk_size in 1usize..120) {
            let source = users_csv(rows);
            let chunks: Vec<Chunk> = ChunkReader::from_reader(source.as_bytes(), chunk_size)
                .unwrap()
                .collect();

            prop_assert_eq!(chunks.len(), rows.div_ceil(chunk_size));
            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.index, i);
                prop_assert!(!chunk.is_empty());
                if i + 1 < chunks.len() {
                    prop_assert_eq!(chunk.len(), chunk_size);
                }
            }

            let lines: Vec<u64> = chunks
                .iter()
                .flat_map(|c| c.rows.iter().map(RawRow::line))
                .collect();
            let expected: Vec<u64> = (2..rows as u64 + 2).collect();
            prop_assert_eq!(lines, expected);
        }
    }
}
