//! Rendering of query answers under the three output modes.
use std::io::{self, Write};

use stabrs_core::models::RecordWrite;

use crate::errors::OverlapError;
use crate::pipeline::QueryAnswer;

/// Which answers get written, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Every query with at least one match.
    #[default]
    Overlapping,
    /// Every query with at least one match, followed by its matches.
    Merged,
    /// Every query with no match.
    NonOverlapping,
}

impl OutputMode {
    /// Resolve the two boolean CLI flags; both together is a configuration error.
    pub fn from_flags(merged: bool, non_overlap: bool) -> Result<Self, OverlapError> {
        match (merged, non_overlap) {
            (true, true) => Err(OverlapError::IncompatibleOutputModes),
            (true, false) => Ok(OutputMode::Merged),
            (false, true) => Ok(OutputMode::NonOverlapping),
            (false, false) => Ok(OutputMode::Overlapping),
        }
    }
}

/// Writes [`QueryAnswer`]s to a stream according to an [`OutputMode`].
pub struct AnswerWriter<W: Write> {
    writer: W,
    mode: OutputMode,
    records_written: usize,
}

impl<W: Write> AnswerWriter<W> {
    pub fn new(writer: W, mode: OutputMode) -> Self {
        AnswerWriter {
            writer,
            mode,
            records_written: 0,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Number of query records written so far. Matches emitted in merged mode are not counted.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn write_answer<Q, T>(&mut self, answer: &QueryAnswer<'_, Q, T>) -> io::Result<()>
    where
        Q: RecordWrite,
        T: RecordWrite,
    {
        let has_match = !answer.matches.is_empty();
        match self.mode {
            OutputMode::Overlapping if has_match => {
                answer.query.write_record(&mut self.writer)?;
            }
            OutputMode::Merged if has_match => {
                answer.query.write_record(&mut self.writer)?;
                for hit in &answer.matches {
                    hit.write_record(&mut self.writer)?;
                }
            }
            OutputMode::NonOverlapping if !has_match => {
                answer.query.write_record(&mut self.writer)?;
            }
            _ => return Ok(()),
        }
        self.records_written += 1;
        Ok(())
    }

    /// Hand back the underlying stream without flushing or finishing it.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stabrs_core::models::Region;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(false, false, OutputMode::Overlapping)]
    #[case(true, false, OutputMode::Merged)]
    #[case(false, true, OutputMode::NonOverlapping)]
    fn test_from_flags(#[case] merged: bool, #[case] non_overlap: bool, #[case] mode: OutputMode) {
        assert_eq!(OutputMode::from_flags(merged, non_overlap).unwrap(), mode);
    }

    #[rstest]
    fn test_from_flags_rejects_both() {
        assert!(matches!(
            OutputMode::from_flags(true, true),
            Err(OverlapError::IncompatibleOutputModes)
        ));
    }

    #[fixture]
    fn select() -> Vec<Region> {
        vec![Region::new("chr1", 10, 20), Region::new("chr1", 12, 18)]
    }

    fn render(mode: OutputMode, answers: &[QueryAnswer<'_, Region, Region>]) -> String {
        let mut writer = AnswerWriter::new(Vec::new(), mode);
        for answer in answers {
            writer.write_answer(answer).unwrap();
        }
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[rstest]
    #[case(OutputMode::Overlapping, "chr1\t15\t25\n")]
    #[case(OutputMode::Merged, "chr1\t15\t25\nchr1\t10\t20\nchr1\t12\t18\n")]
    #[case(OutputMode::NonOverlapping, "chr1\t40\t50\n")]
    fn test_write_answers(select: Vec<Region>, #[case] mode: OutputMode, #[case] expected: &str) {
        let answers = vec![
            QueryAnswer {
                seq: 0,
                query: Region::new("chr1", 15, 25),
                matches: select.iter().collect(),
            },
            QueryAnswer {
                seq: 1,
                query: Region::new("chr1", 40, 50),
                matches: vec![],
            },
        ];
        assert_eq!(render(mode, &answers), expected);
    }

    #[rstest]
    fn test_records_written_counts_queries(select: Vec<Region>) {
        let mut writer = AnswerWriter::new(Vec::new(), OutputMode::Merged);
        writer
            .write_answer(&QueryAnswer {
                seq: 0,
                query: Region::new("chr1", 15, 25),
                matches: select.iter().collect(),
            })
            .unwrap();
        assert_eq!(writer.records_written(), 1);
    }
}
