//! Line-oriented record streaming shared by every format.
use std::io::{self, BufRead, Write};
use std::path::Path;

use stabrs_core::utils::get_dynamic_reader;

use crate::error::Result;
use crate::format::Format;
use crate::record::Record;

/// A line reader with one line of look-ahead and line numbering for error messages.
pub struct LineSource {
    reader: Box<dyn BufRead + Send>,
    lines_read: usize,
    line_no: usize,
    pending: Option<(usize, String)>,
}

impl LineSource {
    pub fn new<R: BufRead + Send + 'static>(reader: R) -> Self {
        LineSource {
            reader: Box::new(reader),
            lines_read: 0,
            line_no: 0,
            pending: None,
        }
    }

    fn read_raw(&mut self) -> io::Result<Option<(usize, String)>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        self.lines_read += 1;
        Ok(Some((self.lines_read, buf)))
    }

    /// Consume the next line, without its line terminator.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let next = match self.pending.take() {
            Some(line) => Some(line),
            None => self.read_raw()?,
        };
        Ok(next.map(|(no, line)| {
            self.line_no = no;
            line
        }))
    }

    /// Look at the next line without consuming it.
    pub fn peek_line(&mut self) -> io::Result<Option<&str>> {
        if self.pending.is_none() {
            self.pending = self.read_raw()?;
        }
        Ok(self.pending.as_ref().map(|(_, line)| line.as_str()))
    }

    /// 1-based number of the line most recently returned by [`LineSource::next_line`].
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Consume consecutive lines for which `pred` holds.
    pub fn take_while(&mut self, pred: impl Fn(&str) -> bool) -> io::Result<Vec<String>> {
        let mut taken = Vec::new();
        loop {
            let matches = match self.peek_line()? {
                Some(line) => pred(line),
                None => false,
            };
            if !matches {
                return Ok(taken);
            }
            if let Some(line) = self.next_line()? {
                taken.push(line);
            }
        }
    }

    /// Consume the next line that is neither blank nor accepted by `skip`.
    pub fn next_content_line(&mut self, skip: impl Fn(&str) -> bool) -> io::Result<Option<String>> {
        while let Some(line) = self.next_line()? {
            if line.trim().is_empty() || skip(&line) {
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }
}

///
/// A streaming reader over the records of one file.
///
/// Header lines are read eagerly on construction; records are decoded lazily by iterating.
/// The first malformed record ends the stream with an error.
///
pub struct RecordReader {
    format: Format,
    source: LineSource,
    header: Vec<String>,
    done: bool,
}

impl RecordReader {
    pub fn new<R: BufRead + Send + 'static>(format: Format, reader: R) -> Result<Self> {
        let mut source = LineSource::new(reader);
        let header = format.read_header(&mut source)?;
        Ok(RecordReader {
            format,
            source,
            header,
            done: false,
        })
    }

    /// Open a (possibly gzipped) file, picking the format from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = Format::from_path(path)?;
        let reader = get_dynamic_reader(path)?;
        RecordReader::new(format, reader)
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Header lines kept for output (VCF `#` lines, SAM `@` lines); empty for other formats.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn write_header<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        for line in &self.header {
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}

impl Iterator for RecordReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.format.read_record(&mut self.source) {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use stabrs_core::models::Interval;

    #[rstest]
    fn test_line_source_peek_and_numbering() {
        let mut src = LineSource::new(Cursor::new("a\r\nb\n\nc"));
        assert_eq!(src.peek_line().unwrap(), Some("a"));
        assert_eq!(src.line_no(), 0);
        assert_eq!(src.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(src.line_no(), 1);
        assert_eq!(src.next_content_line(|_| false).unwrap().as_deref(), Some("b"));
        assert_eq!(src.next_content_line(|_| false).unwrap().as_deref(), Some("c"));
        assert_eq!(src.line_no(), 4);
        assert_eq!(src.next_line().unwrap(), None);
    }

    #[rstest]
    fn test_take_while() {
        let mut src = LineSource::new(Cursor::new("##x\n#y\nz\n"));
        let taken = src.take_while(|l| l.starts_with('#')).unwrap();
        assert_eq!(taken, vec!["##x", "#y"]);
        assert_eq!(src.next_line().unwrap().as_deref(), Some("z"));
    }

    #[rstest]
    fn test_reader_stops_after_error() {
        let reader = RecordReader::new(Format::Bed, Cursor::new("chr1\t1\t2\nchr1\tx\t3\nchr1\t4\t5\n")).unwrap();
        let results: Vec<_> = reader.collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().start(), 1);
        assert!(matches!(
            results[1],
            Err(FormatError::Malformed { line: 2, .. })
        ));
    }

    #[rstest]
    fn test_from_path_reads_gzip() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("peaks.bed.gz");
        let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"track name=x\nchr1\t10\t20\nchr2\t5\t6\n").unwrap();
        encoder.finish().unwrap();

        let reader = RecordReader::from_path(&path).unwrap();
        assert_eq!(reader.format(), Format::Bed);
        let records: Vec<Record> = reader.map(|r| r.unwrap()).collect();
        let spans: Vec<(&str, u32, u32)> = records.iter().map(|r| (r.chrom(), r.start(), r.end())).collect();
        assert_eq!(spans, vec![("chr1", 10, 20), ("chr2", 5, 6)]);
    }

    #[rstest]
    fn test_from_path_rejects_unknown_extension() {
        let result = RecordReader::from_path(Path::new("reads.bam"));
        assert!(matches!(result, Err(FormatError::UnsupportedFormat(_))));
    }
}
