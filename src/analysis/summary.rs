use crate::models::{QaPair, ResultRow};

/// Tunables for pulling summary and score fields out of a response block.
#[derive(Debug, Clone)]
pub struct SummaryParseConfig {
    /// Label marking the score line in the model's output.
    pub score_label: String,
}

impl Default for SummaryParseConfig {
    fn default() -> Self {
        Self {
            score_label: "คะแนน".to_string(),
        }
    }
}

/// Align response blocks with the pairs that produced the prompt.
///
/// Alignment is strictly positional: block `i` belongs to pair `i`. When
/// the model emits fewer blocks than pairs the trailing pairs get empty
/// fields, and extra blocks are ignored. Extraction is best effort over
/// free-form model output and degrades to empty strings instead of failing.
pub fn rows_from_response(
    response: &str,
    pairs: &[QaPair],
    config: &SummaryParseConfig,
) -> Vec<ResultRow> {
    let blocks = split_blocks(response);

    pairs
        .iter()
        .enumerate()
        .map(|(i, qa)| {
            let Some(block) = blocks.get(i) else {
                return ResultRow::unscored(qa);
            };
            let lines: Vec<&str> = block
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();

            let summary = lines
                .iter()
                .find_map(|l| l.split_once(':').map(|(_, rest)| rest.trim().to_string()))
                .unwrap_or_default();

            let mut score = String::new();
            for line in &lines {
                if line.contains(config.score_label.as_str()) {
                    if let Some(digits) = first_digit_run(line) {
                        score = digits;
                        break;
                    }
                }
            }

            ResultRow {
                module: qa.module.clone(),
                questions: qa.question.clone(),
                answers: qa.answer.clone(),
                summary,
                score,
            }
        })
        .collect()
}

/// Split free-form model output into blank-line separated blocks.
/// Runs of blank lines count as a single separator.
fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in text.trim().lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// First contiguous run of ASCII digits in a line, if any.
fn first_digit_run(line: &str) -> Option<String> {
    let mut run = String::new();
    for c in line.chars() {
        if c.is_ascii_digit() {
            run.push(c);
        } else if !run.is_empty() {
            return Some(run);
        }
    }
    if run.is_empty() { None } else { Some(run) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(module: &str, question: &str, answer: &str) -> QaPair {
        QaPair {
            module: module.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn test_split_blocks_collapses_blank_runs() {
        let blocks = split_blocks("a\nb\n\nc\n\n\nd");
        assert_eq!(blocks, vec!["a\nb", "c", "d"]);
    }

    #[test]
    fn test_split_blocks_tolerates_whitespace_lines() {
        let blocks = split_blocks("a\n   \nb");
        assert_eq!(blocks, vec!["a", "b"]);
    }

    #[test]
    fn test_full_response_extraction() {
        let response = "ความโปร่งใส: ผู้ป่วยรู้สึกว่าโรงพยาบาลมีความโปร่งใสสูง\nคะแนน = 5\n\n\
                        ค่าใช้จ่าย: ผู้ป่วยได้รับข้อมูลอย่างชัดเจน\nคะแนน = 4";
        let pairs = vec![
            pair("การเปิดเผยข้อมูล", "q1", "a1"),
            pair("ค่าใช้จ่าย", "q2", "a2"),
        ];
        let rows = rows_from_response(response, &pairs, &SummaryParseConfig::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].summary, "ผู้ป่วยรู้สึกว่าโรงพยาบาลมีความโปร่งใสสูง");
        assert_eq!(rows[0].score, "5");
        assert_eq!(rows[1].summary, "ผู้ป่วยได้รับข้อมูลอย่างชัดเจน");
        assert_eq!(rows[1].score, "4");
        assert_eq!(rows[1].questions, "q2");
        assert_eq!(rows[1].answers, "a2");
    }

    #[test]
    fn test_fewer_blocks_than_pairs() {
        let response = "หัวข้อ: สรุปเดียว\nคะแนน = 3";
        let pairs = vec![pair("ม1", "q1", "a1"), pair("ม2", "q2", "a2")];
        let rows = rows_from_response(response, &pairs, &SummaryParseConfig::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].score, "3");
        assert_eq!(rows[1].summary, "");
        assert_eq!(rows[1].score, "");
        assert_eq!(rows[1].module, "ม2");
    }

    #[test]
    fn test_extra_blocks_are_ignored() {
        let response = "หัวข้อ: หนึ่ง\nคะแนน = 2\n\nหัวข้อ: สอง\nคะแนน = 1";
        let pairs = vec![pair("ม1", "q1", "a1")];
        let rows = rows_from_response(response, &pairs, &SummaryParseConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score, "2");
    }

    #[test]
    fn test_block_without_colon_has_empty_summary() {
        let response = "ไม่มีตัวคั่นในบรรทัดนี้\nคะแนน = 4";
        let pairs = vec![pair("ม1", "q1", "a1")];
        let rows = rows_from_response(response, &pairs, &SummaryParseConfig::default());
        assert_eq!(rows[0].summary, "");
        assert_eq!(rows[0].score, "4");
    }

    #[test]
    fn test_score_label_without_digits_keeps_scanning() {
        let response = "หัวข้อ: สรุป\nคะแนนยังไม่ระบุ\nคะแนนสุดท้าย = 12 จาก 5";
        let pairs = vec![pair("ม1", "q1", "a1")];
        let rows = rows_from_response(response, &pairs, &SummaryParseConfig::default());
        // first digit run on the first score line that has one
        assert_eq!(rows[0].score, "12");
    }

    #[test]
    fn test_empty_response() {
        let pairs = vec![pair("ม1", "q1", "a1")];
        let rows = rows_from_response("", &pairs, &SummaryParseConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].summary, "");
        assert_eq!(rows[0].score, "");
    }
}
