//! Layout of delimited text, and the `csv` readers and writers built from it.

use std::io;

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use tl_map::Error;

/// How records are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dialect {
    /// Field separator, `b','` by default.
    pub delimiter: u8,
}

impl Default for Dialect {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl Dialect {
    /// Ends every record with CRLF and quotes a field only when it holds
    /// the delimiter, a quote or a line break.
    pub(super) fn writer<W: io::Write>(&self, out: W) -> csv::Writer<W> {
        WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(Terminator::CRLF)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(out)
    }

    /// The first record is the header. Later records may be shorter.
    pub(super) fn reader<'t>(&self, text: &'t str) -> csv::Reader<&'t [u8]> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes())
    }
}

pub(super) fn format_error(err: impl ToString) -> Error {
    Error::Format(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::Dialect;

    fn write(dialect: &Dialect, records: &[&[&str]]) -> String {
        let mut writer = dialect.writer(Vec::new());
        for record in records {
            writer.write_record(*record).unwrap();
        }
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn quotes_only_when_needed() {
        let out = write(&Dialect::default(), &[&["1", "a,b", "say \"hi\"", "x\ny"]]);
        assert_eq!(out, "1,\"a,b\",\"say \"\"hi\"\"\",\"x\ny\"\r\n");
    }

    #[test]
    fn reads_what_it_writes() {
        let dialect = Dialect { delimiter: b';' };
        let out = write(&dialect, &[&["Id", "Note"], &["1", "a;\"b\"\r\nc"], &["2", ""]]);

        let mut reader = dialect.reader(&out);
        let header: Vec<&str> = reader.headers().unwrap().iter().collect();
        assert_eq!(header, ["Id", "Note"]);
        let records: Vec<Vec<String>> = reader
            .records()
            .map(|record| record.unwrap().iter().map(str::to_owned).collect())
            .collect();
        assert_eq!(records, [vec!["1", "a;\"b\"\r\nc"], vec!["2", ""]]);
    }

    #[test]
    fn short_records_and_lf_endings() {
        let mut reader = Dialect::default().reader("a,b\n1\n");
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(&record[0], "1");
    }
}
