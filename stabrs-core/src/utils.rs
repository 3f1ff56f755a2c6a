use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Stdout, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::errors::CoreError;

/// The record formats the overlap tools know how to dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum FileType {
    BED,
    AXT,
    VCF,
    SAM,
    CHAIN,
    UNKNOWN,
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bed" => Ok(FileType::BED),
            "axt" => Ok(FileType::AXT),
            "vcf" => Ok(FileType::VCF),
            "sam" => Ok(FileType::SAM),
            "chain" => Ok(FileType::CHAIN),
            _ => Ok(FileType::UNKNOWN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub file_type: FileType,
    pub is_gzipped: bool,
}

///
/// Work out the record format of a file from its extension. A trailing `.gz` is stripped
/// first, so `peaks.bed.gz` is a gzipped BED file.
///
pub fn get_file_info(path: &Path) -> FileInfo {
    let mut file_type = FileType::UNKNOWN;
    let mut is_gzipped = false;

    if let Some(filename) = path.file_name().and_then(|f| f.to_str()) {
        let base_filename = match filename.strip_suffix(".gz") {
            Some(base) => {
                is_gzipped = true;
                base
            }
            None => filename,
        };

        if let Some(ext) = PathBuf::from(base_filename)
            .extension()
            .and_then(|e| e.to_str())
        {
            file_type = FileType::from_str(ext).unwrap_or(FileType::UNKNOWN);
        }
    }

    FileInfo {
        file_type,
        is_gzipped,
    }
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read + Send>>, CoreError> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)
        .map_err(|e| CoreError::FileReadError(format!("{}: {}", path.display(), e)))?;
    let file: Box<dyn Read + Send> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// An output sink that is either plain, gzip-compressed or stdout.
///
/// Gzip output must be closed with [`DynamicWriter::finish`] to write the trailer.
pub enum DynamicWriter {
    Plain(BufWriter<File>),
    Gzipped(GzEncoder<BufWriter<File>>),
    Stdout(BufWriter<Stdout>),
}

impl Write for DynamicWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DynamicWriter::Plain(w) => w.write(buf),
            DynamicWriter::Gzipped(w) => w.write(buf),
            DynamicWriter::Stdout(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DynamicWriter::Plain(w) => w.flush(),
            DynamicWriter::Gzipped(w) => w.flush(),
            DynamicWriter::Stdout(w) => w.flush(),
        }
    }
}

impl DynamicWriter {
    /// Flush everything and, for gzip output, write the stream trailer.
    pub fn finish(self) -> io::Result<()> {
        match self {
            DynamicWriter::Plain(mut w) => w.flush(),
            DynamicWriter::Gzipped(w) => w.finish()?.flush(),
            DynamicWriter::Stdout(mut w) => w.flush(),
        }
    }
}

///
/// Get a writer for a path, gzip compressing when the path ends in `.gz`. A path of `-`
/// writes to stdout. Parent directories are created as needed.
///
pub fn get_dynamic_writer(path: &Path) -> Result<DynamicWriter, CoreError> {
    if path == Path::new("-") {
        return Ok(DynamicWriter::Stdout(BufWriter::new(io::stdout())));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)
        .map_err(|e| CoreError::FileWriteError(format!("{}: {}", path.display(), e)))?;

    if path.extension() == Some(OsStr::new("gz")) {
        Ok(DynamicWriter::Gzipped(GzEncoder::new(
            BufWriter::new(file),
            Compression::default(),
        )))
    } else {
        Ok(DynamicWriter::Plain(BufWriter::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::BufRead;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("peaks.bed", FileType::BED, false)]
    #[case("peaks.bed.gz", FileType::BED, true)]
    #[case("calls.VCF", FileType::VCF, false)]
    #[case("calls.vcf.gz", FileType::VCF, true)]
    #[case("aln.sam", FileType::SAM, false)]
    #[case("hg38.mm10.axt.gz", FileType::AXT, true)]
    #[case("hg38ToMm10.over.chain", FileType::CHAIN, false)]
    #[case("reads.bam", FileType::UNKNOWN, false)]
    #[case("archive.gz", FileType::UNKNOWN, true)]
    #[case("noext", FileType::UNKNOWN, false)]
    fn test_get_file_info(
        #[case] name: &str,
        #[case] file_type: FileType,
        #[case] is_gzipped: bool,
    ) {
        let info = get_file_info(Path::new(name));
        assert_eq!(
            info,
            FileInfo {
                file_type,
                is_gzipped
            }
        );
    }

    #[rstest]
    #[case("out.bed")]
    #[case("out.bed.gz")]
    fn test_writer_reader_agree(#[case] name: &str) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("nested").join(name);

        let mut writer = get_dynamic_writer(&path).unwrap();
        writeln!(writer, "chr1\t1\t2").unwrap();
        writeln!(writer, "chr1\t3\t4").unwrap();
        writer.finish().unwrap();

        let reader = get_dynamic_reader(&path).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["chr1\t1\t2", "chr1\t3\t4"]);
    }

    #[rstest]
    fn test_missing_file_is_read_error() {
        let result = get_dynamic_reader(Path::new("/definitely/not/here.bed"));
        assert!(matches!(result, Err(CoreError::FileReadError(_))));
    }
}
