use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::models::{TranscriptRow, TurnId};

/// Source table encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Tsv,
    /// Pick by file extension (`.tsv` / `.txt` are TSV, anything else JSON)
    Auto,
}

impl InputFormat {
    fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("txt") => {
                    Self::Tsv
                }
                _ => Self::Json,
            },
            other => other,
        }
    }
}

/// Top-level JSON layout: a bare array of rows or `{ "turns": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Rows(Vec<serde_json::Value>),
    Wrapped { turns: Vec<serde_json::Value> },
}

#[derive(Debug, Deserialize)]
struct JsonRow {
    speaker: String,
    turn_id: JsonTurnId,
    #[serde(default, alias = "raw_annotation")]
    annotation: Option<JsonAnnotation>,
}

/// Annotation cell: text, or a bare number for a single reference
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonAnnotation {
    Number(u64),
    Text(String),
}

impl From<JsonAnnotation> for String {
    fn from(value: JsonAnnotation) -> Self {
        match value {
            JsonAnnotation::Number(n) => n.to_string(),
            JsonAnnotation::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonTurnId {
    Number(u64),
    Text(String),
}

impl From<JsonTurnId> for TurnId {
    fn from(value: JsonTurnId) -> Self {
        match value {
            JsonTurnId::Number(n) => TurnId::from(n),
            JsonTurnId::Text(s) => TurnId::new(&s),
        }
    }
}

/// Parse a transcript file into rows
pub fn parse_transcript_file(path: &Path, format: InputFormat) -> Result<Vec<TranscriptRow>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    match format.resolve(path) {
        InputFormat::Tsv => parse_transcript_tsv(&content),
        _ => parse_transcript_json(&content),
    }
}

/// Parse a JSON transcript table into rows
pub fn parse_transcript_json(json: &str) -> Result<Vec<TranscriptRow>> {
    let file: TranscriptFile =
        serde_json::from_str(json).context("Failed to parse transcript JSON")?;
    let rows = match file {
        TranscriptFile::Rows(rows) => rows,
        TranscriptFile::Wrapped { turns } => turns,
    };

    rows.into_iter()
        .enumerate()
        .map(|(i, value)| {
            let row: JsonRow = serde_json::from_value(value)
                .with_context(|| format!("Row {}: invalid transcript row", i + 1))?;
            validated_row(
                i + 1,
                row.speaker.trim(),
                row.turn_id.into(),
                row.annotation.map(String::from),
            )
        })
        .collect()
}

/// Parse a tab-separated transcript table into rows
///
/// Columns are `speaker`, `turn_id` and an optional `annotation`. Blank lines
/// and lines starting with `#` are skipped; a leading `speaker` header is ignored.
pub fn parse_transcript_tsv(text: &str) -> Result<Vec<TranscriptRow>> {
    let mut rows = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let mut columns = line.split('\t');
        let speaker = columns.next().unwrap_or_default().trim();
        if rows.is_empty() && speaker.eq_ignore_ascii_case("speaker") {
            continue;
        }

        let Some(turn_id) = columns.next() else {
            bail!("Line {}: expected at least 2 tab-separated columns", line_no);
        };
        let annotation = columns.next().map(str::to_string);

        rows.push(validated_row(line_no, speaker, TurnId::new(turn_id), annotation)?);
    }

    Ok(rows)
}

fn validated_row(
    row_no: usize,
    speaker: &str,
    turn_id: TurnId,
    annotation: Option<String>,
) -> Result<TranscriptRow> {
    if speaker.is_empty() {
        bail!("Row {}: empty speaker", row_no);
    }
    if turn_id.is_empty() {
        bail!("Row {}: empty turn_id", row_no);
    }
    Ok(TranscriptRow {
        speaker: speaker.to_string(),
        turn_id,
        annotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_rows() {
        let json = r#"[
            {"speaker": "A", "turn_id": 1, "annotation": "I"},
            {"speaker": "B", "turn_id": "2", "raw_annotation": "1"},
            {"speaker": "C", "turn_id": "03"}
        ]"#;

        let rows = parse_transcript_json(json).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].turn_id, TurnId::from(1u64));
        assert_eq!(rows[1].annotation.as_deref(), Some("1"));
        assert_eq!(rows[2].turn_id, TurnId::from(3u64));
        assert_eq!(rows[2].annotation, None);
    }

    #[test]
    fn test_parse_json_numeric_annotation() {
        let json = r#"[
            {"speaker": "A", "turn_id": 1, "annotation": "I"},
            {"speaker": "B", "turn_id": 2, "annotation": 1}
        ]"#;

        let rows = parse_transcript_json(json).unwrap();

        assert_eq!(rows[1], TranscriptRow::new("B", 2u64, Some("1")));
    }

    #[test]
    fn test_parse_json_bad_row_reports_row_number() {
        let json = r#"[
            {"speaker": "A", "turn_id": 1},
            {"speaker": "B", "turn_id": 2, "annotation": [1, 2]}
        ]"#;

        let err = parse_transcript_json(json).unwrap_err();

        assert!(err.to_string().contains("Row 2"));
    }

    #[test]
    fn test_parse_json_wrapped() {
        let json = r#"{"turns": [{"speaker": "A", "turn_id": 1, "annotation": null}]}"#;
        let rows = parse_transcript_json(json).unwrap();
        assert_eq!(rows, vec![TranscriptRow::new("A", 1u64, None)]);
    }

    #[test]
    fn test_parse_json_rejects_empty_speaker() {
        let json = r#"[{"speaker": " ", "turn_id": 1}]"#;
        let err = parse_transcript_json(json).unwrap_err();
        assert!(err.to_string().contains("Row 1"));
    }

    #[test]
    fn test_parse_tsv() {
        let tsv = "speaker\tturn_id\tannotation\n\
                   # opening\n\
                   A\t1\tI\n\
                   \n\
                   B\t2\t1\n\
                   C\t3\n";

        let rows = parse_transcript_tsv(tsv).unwrap();

        assert_eq!(
            rows,
            vec![
                TranscriptRow::new("A", 1u64, Some("I")),
                TranscriptRow::new("B", 2u64, Some("1")),
                TranscriptRow::new("C", 3u64, None),
            ]
        );
    }

    #[test]
    fn test_parse_tsv_missing_column() {
        let err = parse_transcript_tsv("A\t1\tI\nB\n").unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_parse_file_auto_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.tsv");
        std::fs::write(&path, "A\t1\tI\nB\t2\t1\n").unwrap();

        let rows = parse_transcript_file(&path, InputFormat::Auto).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
