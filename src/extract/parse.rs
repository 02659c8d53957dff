//! Prompt construction and model-output parsing

use regex::Regex;

use super::MtoRow;
use crate::error::{ManhoursError, ManhoursResult};

const MOC_PATTERN: &str = r"(?i)MOC#\s*[:\-]?\s*([A-Za-z0-9\-/]+)";
const JSON_ARRAY_PATTERN: &str = r"\[[\s\S]*\]";

const PROMPT_RULES: &str = r#"Extract all rows from the following PDF table text as a JSON array.

Each object must have the keys: "Sl No", "Item Description", "Qty", "UOM", and "Remarks".

- "Qty" must be only the numeric value (integer or decimal) for the quantity. Do not include any unit or letters.
- "UOM" must be only the unit of measurement, which can be a single word or multiple words (e.g., "M", "Rolls Each", "Meter Box", "Nos", "Square Meter", "Linear Meter", etc.).
- If the quantity and UOM appear together (e.g., "3000M", "400 M", "2 Rolls Each", "5.5 Meter Box"), extract the numeric portion as "Qty" and the full text portion after the number as "UOM".
- There may be any range of values for Qty, including large numbers or decimal values.
- UOM can be any sequence of words after the quantity (including spaces).
- If Qty or UOM is missing, use an empty string "".
- If multiple lines exist between 'Sl No' rows, treat all those lines as part of "Item Description", except for clearly marked fields such as "Qty", "UOM", or "Remarks".
- Do NOT combine Qty and UOM in a single field. Do NOT include units in the Qty field. Do NOT add any extra explanation.
- Ignore all text outside the table and do NOT include any explanation, just return the JSON array."#;

fn compile(pattern: &str) -> ManhoursResult<Regex> {
    Regex::new(pattern).map_err(|e| ManhoursError::extraction(format!("Invalid pattern: {}", e)))
}

/// First MOC number in the text, or an empty string
pub fn find_moc_number(text: &str) -> ManhoursResult<String> {
    let re = compile(MOC_PATTERN)?;
    Ok(re
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default())
}

/// The instruction sent to the model, followed by the table text
pub fn build_prompt(table_text: &str) -> String {
    format!("{}\n\nTable Text:\n{}", PROMPT_RULES, table_text.trim())
}

/// Parse the rows out of a model completion.
///
/// The span from the first `[` to the last `]` is taken as the JSON array;
/// without one the whole output is tried. Failure keeps the raw output on the
/// error so it can be shown to the user.
pub fn parse_model_output(output: &str) -> ManhoursResult<Vec<MtoRow>> {
    let trimmed = output.trim();
    let json = compile(JSON_ARRAY_PATTERN)?
        .find(trimmed)
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    serde_json::from_str::<Vec<MtoRow>>(json).map_err(|e| {
        tracing::warn!(error = %e, "model output is not a JSON array of rows");
        ManhoursError::Extraction {
            message: "Failed to parse table from model response.".to_string(),
            model_output: Some(json.to_string()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_moc_variants() {
        assert_eq!(find_moc_number("Ref MOC# 12345 rev A").unwrap(), "12345");
        assert_eq!(find_moc_number("moc#: AB-77/2").unwrap(), "AB-77/2");
        assert_eq!(find_moc_number("MOC#-9981").unwrap(), "9981");
        assert_eq!(find_moc_number("no reference here").unwrap(), "");
    }

    #[test]
    fn test_first_moc_wins() {
        let text = "MOC# 100\nsee also MOC# 200";
        assert_eq!(find_moc_number(text).unwrap(), "100");
    }

    #[test]
    fn test_prompt_contains_keys_and_text() {
        let prompt = build_prompt("  1 Pipe 3000M  ");
        assert!(prompt.contains("\"Sl No\", \"Item Description\", \"Qty\", \"UOM\", and \"Remarks\""));
        assert!(prompt.ends_with("Table Text:\n1 Pipe 3000M"));
    }

    #[test]
    fn test_parse_wrapped_array() {
        let output = "Here you go:\n```json\n[{\"Sl No\": 1, \"Item Description\": \"Pipe\\nCS\", \"Qty\": 3000, \"UOM\": \"M\", \"Remarks\": \"\"}]\n```";
        let rows = parse_model_output(output).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sl_no, "1");
        assert_eq!(rows[0].qty, "3000");
        assert_eq!(rows[0].uom, "M");
        assert_eq!(rows[0].description, "Pipe\nCS");
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_model_output("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_failure_keeps_output() {
        let err = parse_model_output("[not json]").unwrap_err();
        assert_eq!(err.model_output(), Some("[not json]"));

        let err = parse_model_output("I could not find a table").unwrap_err();
        assert_eq!(err.model_output(), Some("I could not find a table"));
    }
}
