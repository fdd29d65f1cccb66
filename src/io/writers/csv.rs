use crate::core::ClusterRecord;
use crate::io::csv::encode_field;
use crate::io::writers::RecordWriter;
use std::io::Write;

/// Column names, in output order.
pub const HEADER: [&str; 4] = ["group_id", "group_name", "members_id", "members_name"];

/// Writes records as CSV. Member ids are joined with `,` and member names
/// with `, `, each list forming a single quoted cell.
pub struct CsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_row(&mut self, cells: &[String]) -> anyhow::Result<()> {
        let line: Vec<String> = cells.iter().map(|cell| encode_field(cell)).collect();
        writeln!(self.writer, "{}", line.join(","))?;
        Ok(())
    }
}

impl<W: Write> RecordWriter for CsvWriter<W> {
    fn write_records(&mut self, records: &[ClusterRecord]) -> anyhow::Result<()> {
        let header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
        self.write_row(&header)?;
        for record in records {
            self.write_row(&[
                record.group_id.to_string(),
                record.group_name.clone(),
                record.members_id.join(","),
                record.members_name.join(", "),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
