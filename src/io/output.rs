use std::path::Path;

use anyhow::{Context, Result};

use crate::models::ResultRow;

/// Column order of the persisted result table.
const HEADER: [&str; 5] = ["module", "questions", "answers", "summary", "score"];

/// Append rows to the result table.
///
/// The header is written only when the file does not yet exist; existing
/// rows are never rewritten or deduplicated, so independent runs against
/// the same table simply accumulate. Callers serialize concurrent writers.
pub fn append_result_rows(rows: &[ResultRow], path: &Path) -> Result<()> {
    let write_header = !path.exists();

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open result table: {:?}", path))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if write_header {
        writer.write_record(HEADER).context("Failed to write header")?;
    }
    for row in rows {
        writer.serialize(row).context("Failed to write result row")?;
    }
    writer.flush().context("Failed to flush result table")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(module: &str, score: &str) -> ResultRow {
        ResultRow {
            module: module.to_string(),
            questions: "คำถาม".to_string(),
            answers: "คำตอบ".to_string(),
            summary: "สรุป".to_string(),
            score: score.to_string(),
        }
    }

    #[test]
    fn test_append_twice_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey_results.csv");

        append_result_rows(&[row("ม1", "5"), row("ม2", "4")], &path).unwrap();
        append_result_rows(&[row("ม1", "5")], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "module,questions,answers,summary,score");
        // no deduplication: the repeated row lands a second time
        assert_eq!(lines[1], lines[3]);
    }

    #[test]
    fn test_header_only_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey_results.csv");

        append_result_rows(&[row("ม1", "")], &path).unwrap();
        append_result_rows(&[row("ม2", "")], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let headers = content
            .lines()
            .filter(|l| l.starts_with("module,"))
            .count();
        assert_eq!(headers, 1);
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey_results.csv");

        let mut r = row("ม1", "3");
        r.summary = "ชัดเจน, ไม่ติดขัด".to_string();
        append_result_rows(&[r], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[3], "ชัดเจน, ไม่ติดขัด");
        assert_eq!(&record[4], "3");
    }
}
