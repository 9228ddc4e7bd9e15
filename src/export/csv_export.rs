use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::ExportError;
use crate::models::{ApproximateMatch, ExactMatch};
use crate::orchestrator::summary::RunSummary;

fn file_writer(path: &str) -> Result<Writer<BufWriter<File>>, ExportError> {
    let file = File::create(path)?;
    let buf_writer = BufWriter::with_capacity(512 * 1024, file);
    Ok(WriterBuilder::new().from_writer(buf_writer))
}

pub fn write_exact<W: Write>(
    w: &mut Writer<W>,
    results: &[ExactMatch],
) -> Result<(), ExportError> {
    w.write_record(["SourceName", "CanonicalName", "SharedVariant"])?;
    for m in results {
        w.write_record([
            m.source.as_str(),
            m.canonical.as_str(),
            m.shared_variant.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_approximate<W: Write>(
    w: &mut Writer<W>,
    results: &[ApproximateMatch],
) -> Result<(), ExportError> {
    w.write_record(["SourceName", "CandidateName", "Score"])?;
    for m in results {
        let score = m.score.to_string();
        w.write_record([m.source.as_str(), m.candidate.as_str(), score.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_summary<W: Write>(
    w: &mut Writer<W>,
    summary: &RunSummary,
) -> Result<(), ExportError> {
    w.write_record(["Key", "Value"])?;
    for (k, v) in summary.rows() {
        w.write_record([k, v.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_exact_csv(path: &str, results: &[ExactMatch]) -> Result<(), ExportError> {
    write_exact(&mut file_writer(path)?, results)
}

pub fn export_approximate_csv(
    path: &str,
    results: &[ApproximateMatch],
) -> Result<(), ExportError> {
    write_approximate(&mut file_writer(path)?, results)
}

pub fn export_summary_csv(path: &str, summary: &RunSummary) -> Result<(), ExportError> {
    write_summary(&mut file_writer(path)?, summary)
}
