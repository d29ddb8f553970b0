//! Boundary validation of decoded preview payloads
//!
//! The payload is checked once, right after decoding. Every problem found in
//! the consumed record is collected into a single [`SchemaError`] so that the
//! upstream pipeline can fix them in one pass.

use super::record::PreviewRecord;
use crate::error::{SchemaError, SchemaIssue};
use serde_json::{Map, Value};

/// Validate a decoded payload and extract its first record
///
/// Only element 0 is inspected; remaining elements are ignored.
pub fn first_record(payload: &Value) -> Result<PreviewRecord, SchemaError> {
    let items = match payload {
        Value::Array(items) => items,
        other => {
            return Err(SchemaError::single(
                "",
                format!(
                    "preview payload must be a sequence, found {}",
                    kind_of(other)
                ),
            ))
        }
    };

    let first = items
        .first()
        .ok_or_else(|| SchemaError::single("", "preview payload is empty"))?;

    let issues = check_record(first, "[0]");
    if !issues.is_empty() {
        return Err(SchemaError::new(issues));
    }

    serde_json::from_value(first.clone()).map_err(|e| SchemaError::single("[0]", e.to_string()))
}

/// Collect every schema issue of a single record
pub fn check_record(value: &Value, path: &str) -> Vec<SchemaIssue> {
    let mut checker = Checker::default();

    let Some(record) = value.as_object() else {
        checker.push(path, format!("expected an object, found {}", kind_of(value)));
        return checker.issues;
    };

    for field in ["format_1", "format_2", "content"] {
        checker.required_string(record, path, field);
    }
    for field in ["url", "keyword_primary", "keyword_secondary"] {
        checker.optional_string(record, path, field);
    }

    match record.get("comparison_table") {
        None | Some(Value::Null) => {}
        Some(Value::Object(table)) => {
            let table_path = format!("{}.comparison_table", path);
            if let Some(headers) = checker.required_array(table, &table_path, "headers") {
                checker.strings(headers, &format!("{}.headers", table_path));
            }
            if let Some(rows) = checker.required_array(table, &table_path, "rows") {
                for (i, row) in rows.iter().enumerate() {
                    let row_path = format!("{}.rows[{}]", table_path, i);
                    match row.as_array() {
                        Some(cells) => checker.strings(cells, &row_path),
                        None => checker.push(
                            &row_path,
                            format!("expected an array, found {}", kind_of(row)),
                        ),
                    }
                }
            }
        }
        Some(other) => checker.push(
            &format!("{}.comparison_table", path),
            format!("expected an object or null, found {}", kind_of(other)),
        ),
    }

    checker.entries(record, path, "faq", &["question", "answer"]);
    checker.entries(record, path, "blog_ideas", &["title", "meta"]);
    checker.entries(record, path, "use_cases", &["name", "description"]);

    checker.issues
}

#[derive(Default)]
struct Checker {
    issues: Vec<SchemaIssue>,
}

impl Checker {
    fn push(&mut self, path: &str, problem: String) {
        self.issues.push(SchemaIssue::new(path, problem));
    }

    fn required_string(&mut self, object: &Map<String, Value>, path: &str, field: &str) {
        let field_path = format!("{}.{}", path, field);
        match object.get(field) {
            Some(Value::String(_)) => {}
            None => self.push(&field_path, "missing required string".to_string()),
            Some(other) => {
                self.push(&field_path, format!("expected a string, found {}", kind_of(other)))
            }
        }
    }

    fn optional_string(&mut self, object: &Map<String, Value>, path: &str, field: &str) {
        match object.get(field) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => self.push(
                &format!("{}.{}", path, field),
                format!("expected a string, found {}", kind_of(other)),
            ),
        }
    }

    fn required_array<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        path: &str,
        field: &str,
    ) -> Option<&'a Vec<Value>> {
        let field_path = format!("{}.{}", path, field);
        match object.get(field) {
            Some(Value::Array(items)) => Some(items),
            None => {
                self.push(&field_path, "missing required array".to_string());
                None
            }
            Some(other) => {
                self.push(&field_path, format!("expected an array, found {}", kind_of(other)));
                None
            }
        }
    }

    fn strings(&mut self, items: &[Value], path: &str) {
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                self.push(
                    &format!("{}[{}]", path, i),
                    format!("expected a string, found {}", kind_of(item)),
                );
            }
        }
    }

    /// An array of objects, each carrying the given string fields
    fn entries(&mut self, object: &Map<String, Value>, path: &str, field: &str, keys: &[&str]) {
        let Some(items) = self.required_array(object, path, field) else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}.{}[{}]", path, field, i);
            match item.as_object() {
                Some(entry) => {
                    for key in keys {
                        self.required_string(entry, &item_path, key);
                    }
                }
                None => {
                    self.push(&item_path, format!("expected an object, found {}", kind_of(item)))
                }
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
