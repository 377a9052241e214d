//! Record Parser — turns the model's delimited reply into typed `MealRecord`s.
//!
//! Each non-empty line is repaired to the layout's delimiter count, then read
//! with the `csv` reader using standard quoting rules. Any row that still
//! cannot fill every column is a `ParseError`, which the recovery loop feeds
//! back to the model. Layout delimiters must be ASCII.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm_client::strip_code_fences;
use crate::planner::delimiter::{count_delimiters, repair_line};

/// Column layout the caller expects back from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub delimiter: char,
    pub field_count: usize,
}

impl RecordLayout {
    pub fn expected_delimiters(&self) -> usize {
        self.field_count.saturating_sub(1)
    }
}

/// day of week, meal type, ingredients, instructions, nutrition — comma separated.
pub const MEAL_LAYOUT: RecordLayout = RecordLayout {
    delimiter: ',',
    field_count: 5,
};

/// Column header used in prompts; order matches `MealRecord` fields.
pub const MEAL_COLUMNS: [&str; 5] = [
    "day of week",
    "meal type",
    "ingredients",
    "instructions",
    "nutrition",
];

/// A single meal entry produced from one delimited line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MealRecord {
    pub day: String,
    pub meal_type: String,
    pub ingredients: String,
    pub instructions: String,
    pub nutrition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("the response contained no records")]
    NoRecords,

    #[error("record on line {line} has {found} fields, expected {expected}")]
    MissingFields {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("malformed record on line {line}: {message}")]
    Malformed { line: usize, message: String },
}

impl MealRecord {
    /// Builds a record from positional fields. Extra trailing fields are ignored.
    fn from_fields(fields: Vec<String>, line: usize, expected: usize) -> Result<Self, ParseError> {
        let found = fields.len();
        if found < expected {
            return Err(ParseError::MissingFields {
                line,
                found,
                expected,
            });
        }
        let mut fields = fields.into_iter();
        let mut next = || {
            fields.next().ok_or(ParseError::MissingFields {
                line,
                found,
                expected,
            })
        };

        Ok(MealRecord {
            day: next()?,
            meal_type: next()?,
            ingredients: next()?,
            instructions: next()?,
            nutrition: next()?,
        })
    }
}

/// Repairs every non-empty line of `text` to the layout's delimiter count.
/// Returns `(line_number, repaired_line)` pairs; line numbers are 1-based.
fn repair_lines(text: &str, layout: RecordLayout) -> Vec<(usize, String)> {
    let expected = layout.expected_delimiters();

    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            if count_delimiters(line, layout.delimiter) == expected {
                (number, line.to_string())
            } else {
                let repaired = repair_line(line, layout.delimiter, expected);
                debug!("Repaired line {number}: {line:?} -> {repaired:?}");
                (number, repaired)
            }
        })
        .collect()
}

/// Reads one repaired line as a delimited record. A field wrapped in `"` may
/// contain the delimiter and `""` inside it is a literal quote.
fn read_record(line: &str, layout: RecordLayout, number: usize) -> Result<Vec<String>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(layout.delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    reader
        .read_record(&mut record)
        .map_err(|e| ParseError::Malformed {
            line: number,
            message: e.to_string(),
        })?;

    Ok(record.iter().map(str::to_string).collect())
}

/// Parses every non-empty line of a reply into a `MealRecord`.
pub fn parse_meal_records(text: &str, layout: RecordLayout) -> Result<Vec<MealRecord>, ParseError> {
    let text = strip_code_fences(text);

    let records = repair_lines(text, layout)
        .into_iter()
        .map(|(number, line)| {
            let fields = read_record(&line, layout, number)?;
            MealRecord::from_fields(fields, number, layout.field_count)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if records.is_empty() {
        return Err(ParseError::NoRecords);
    }
    Ok(records)
}

/// Parses a swap reply: the first record is the replacement meal.
pub fn parse_single_meal(text: &str, layout: RecordLayout) -> Result<MealRecord, ParseError> {
    parse_meal_records(text, layout)?
        .into_iter()
        .next()
        .ok_or(ParseError::NoRecords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WELL_FORMED: &str = "Monday,Breakfast,Oats; banana,Boil oats for 5 minutes,350 kcal\n\
        Monday,Lunch,Chicken; rice,Grill chicken and steam rice,600 kcal\n\
        \n\
        Tuesday,Dinner,Salmon; broccoli,Bake salmon at 200C,550 kcal\n";

    #[test]
    fn test_one_record_per_non_empty_line_in_column_order() {
        let records = parse_meal_records(WELL_FORMED, MEAL_LAYOUT).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            MealRecord {
                day: "Monday".to_string(),
                meal_type: "Breakfast".to_string(),
                ingredients: "Oats; banana".to_string(),
                instructions: "Boil oats for 5 minutes".to_string(),
                nutrition: "350 kcal".to_string(),
            }
        );
        assert_eq!(records[2].day, "Tuesday");
        assert_eq!(records[2].nutrition, "550 kcal");
    }

    #[test]
    fn test_short_line_is_repaired_not_rejected() {
        let records = parse_meal_records("Monday,Snack,Apple", MEAL_LAYOUT).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ingredients, "Apple");
        assert_eq!(records[0].instructions, "");
        assert_eq!(records[0].nutrition, "");
    }

    #[test]
    fn test_long_line_is_repaired() {
        let records =
            parse_meal_records("Monday,Lunch,Rice,,Cook,500 kcal", MEAL_LAYOUT).unwrap();
        assert_eq!(records[0].instructions, "Cook");
        assert_eq!(records[0].nutrition, "500 kcal");
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "Monday,Breakfast,Eggs,Scramble,300 kcal\r\nMonday,Lunch,Soup,Heat,200 kcal\r\n";
        let records = parse_meal_records(text, MEAL_LAYOUT).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].nutrition, "300 kcal");
    }

    #[test]
    fn test_fenced_reply_is_unwrapped() {
        let text = "```csv\nMonday,Breakfast,Eggs,Scramble,300 kcal\n```";
        let records = parse_meal_records(text, MEAL_LAYOUT).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].day, "Monday");
    }

    #[test]
    fn test_quoted_field_with_escaped_quote() {
        let text = r#"Monday,Dinner,"Beans; rice","Say ""done""",400 kcal"#;
        let records = parse_meal_records(text, MEAL_LAYOUT).unwrap();
        assert_eq!(records[0].ingredients, "Beans; rice");
        assert_eq!(records[0].instructions, r#"Say "done""#);
        assert_eq!(records[0].nutrition, "400 kcal");
    }

    #[test]
    fn test_quoted_delimiter_leaves_too_few_fields() {
        // Four raw delimiters, but one is quoted: only four fields survive.
        let text = r#"Monday,Dinner,"Beans, rice",Cook"#;
        let err = parse_meal_records(text, MEAL_LAYOUT).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingFields {
                line: 1,
                found: 4,
                expected: 5
            }
        );
    }

    #[test]
    fn test_quoted_delimiter_after_repair_is_still_short() {
        // Five raw delimiters get trimmed to four, and the quoted one then
        // swallows a column.
        let text = r#"Monday,Dinner,"Beans, rice","Say ""done""",400 kcal"#;
        let err = parse_meal_records(text, MEAL_LAYOUT).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingFields {
                line: 1,
                found: 4,
                expected: 5
            }
        );
    }

    #[test]
    fn test_unterminated_quote_runs_to_end_of_line() {
        let err = parse_meal_records(r#"Monday,Dinner,"Beans,Cook,1 kcal"#, MEAL_LAYOUT).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingFields {
                line: 1,
                found: 3,
                expected: 5
            }
        );
    }

    #[test]
    fn test_bare_quote_is_kept_literally() {
        let records =
            parse_meal_records(r#"Monday,Dinner,12" pizza,Bake,900 kcal"#, MEAL_LAYOUT).unwrap();
        assert_eq!(records[0].ingredients, r#"12" pizza"#);
    }

    #[test]
    fn test_undecodable_record_is_malformed() {
        // A non-ASCII delimiter is truncated to a UTF-8 continuation byte, so
        // the reader splits a character in half.
        let layout = RecordLayout {
            delimiter: '\u{a9}',
            field_count: 2,
        };
        let err = parse_meal_records("a\u{a9}b", layout).unwrap_err();
        assert!(
            matches!(err, ParseError::Malformed { line: 1, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_empty_reply_has_no_records() {
        assert_eq!(
            parse_meal_records("\n\n  \n", MEAL_LAYOUT).unwrap_err(),
            ParseError::NoRecords
        );
        assert_eq!(
            parse_single_meal("", MEAL_LAYOUT).unwrap_err(),
            ParseError::NoRecords
        );
    }

    #[test]
    fn test_parse_single_meal_takes_first_record() {
        let meal = parse_single_meal(WELL_FORMED, MEAL_LAYOUT).unwrap();
        assert_eq!(meal.meal_type, "Breakfast");
    }

    #[test]
    fn test_error_line_numbers_count_blank_lines() {
        let text = "Monday,Breakfast,Eggs,Scramble,300 kcal\n\nMonday,Lunch,\"Soup,Heat,1 kcal";
        assert_eq!(
            parse_meal_records(text, MEAL_LAYOUT).unwrap_err(),
            ParseError::MissingFields {
                line: 3,
                found: 3,
                expected: 5
            }
        );
    }

    #[test]
    fn test_meal_record_json_uses_camel_case() {
        let meal = MealRecord {
            day: "Monday".to_string(),
            meal_type: "Snack".to_string(),
            ingredients: "Nuts".to_string(),
            instructions: "Eat".to_string(),
            nutrition: "200 kcal".to_string(),
        };
        let json = serde_json::to_value(&meal).unwrap();
        assert_eq!(json["mealType"], "Snack");
        assert_eq!(json["day"], "Monday");
    }

    #[test]
    fn test_expected_delimiters_follows_field_count() {
        assert_eq!(MEAL_LAYOUT.expected_delimiters(), 4);
        let wide = RecordLayout {
            delimiter: ';',
            field_count: 6,
        };
        assert_eq!(wide.expected_delimiters(), 5);
    }

    fn field() -> impl Strategy<Value = String> {
        "[A-Za-z0-9]([A-Za-z0-9 ;.]{0,14}[A-Za-z0-9.])?"
    }

    proptest! {
        #[test]
        fn prop_well_formed_rows_parse_in_column_order(
            rows in proptest::collection::vec(
                (proptest::array::uniform5(field()), any::<bool>()),
                1..8,
            )
        ) {
            let mut text = String::new();
            for (fields, blank_after) in &rows {
                text.push_str(&fields.join(","));
                text.push('\n');
                if *blank_after {
                    text.push('\n');
                }
            }

            let records = parse_meal_records(&text, MEAL_LAYOUT).unwrap();
            prop_assert_eq!(records.len(), rows.len());
            for (record, (fields, _)) in records.iter().zip(&rows) {
                prop_assert_eq!(&record.day, &fields[0]);
                prop_assert_eq!(&record.meal_type, &fields[1]);
                prop_assert_eq!(&record.ingredients, &fields[2]);
                prop_assert_eq!(&record.instructions, &fields[3]);
                prop_assert_eq!(&record.nutrition, &fields[4]);
            }
        }
    }
}
