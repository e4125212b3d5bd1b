//! Row reader/writer capabilities over an opened file.

use std::io::{Read, Write};

use crate::error::Result;

/// Writes delimited rows to an underlying sink.
pub trait RowWriter {
    fn write_row(&mut self, fields: &[String]) -> Result<()>;

    /// Flush buffered rows to the sink.
    fn flush(&mut self) -> Result<()>;
}

/// Reads delimited rows until end of data.
pub trait RowReader {
    /// Next row, or `None` at end of data.
    fn read_row(&mut self) -> Result<Option<Vec<String>>>;
}

/// Builds row readers and writers for a file format.
pub trait RowFormat: Send + Sync {
    fn writer(&self, sink: Box<dyn Write>) -> Box<dyn RowWriter>;
    fn reader(&self, source: Box<dyn Read>) -> Box<dyn RowReader>;
}

/// Comma-delimited rows without a header.
///
/// Reads are flexible about field counts so that short rows reach the codec
/// and surface as `BadRowFormat`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRowFormat;

impl RowFormat for CsvRowFormat {
    fn writer(&self, sink: Box<dyn Write>) -> Box<dyn RowWriter> {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(sink);
        Box::new(CsvRowWriter { inner: writer })
    }

    fn reader(&self, source: Box<dyn Read>) -> Box<dyn RowReader> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(source);
        Box::new(CsvRowReader {
            inner: reader,
            record: csv::StringRecord::new(),
        })
    }
}

struct CsvRowWriter {
    inner: csv::Writer<Box<dyn Write>>,
}

impl RowWriter for CsvRowWriter {
    fn write_row(&mut self, fields: &[String]) -> Result<()> {
        self.inner.write_record(fields)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

struct CsvRowReader {
    inner: csv::Reader<Box<dyn Read>>,
    record: csv::StringRecord,
}

impl RowReader for CsvRowReader {
    fn read_row(&mut self) -> Result<Option<Vec<String>>> {
        if !self.inner.read_record(&mut self.record)? {
            return Ok(None);
        }
        Ok(Some(self.record.iter().map(str::to_string).collect()))
    }
}
