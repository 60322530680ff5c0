//! Row encoding
//!
//! A row is an ordered list of opaque text tokens. On disk it is a single
//! line with values joined by [`DELIMITER`].

/// Field separator for record files and the catalog log
pub const DELIMITER: char = ',';

/// A single row: positional values with no type information
pub type Row = Vec<String>;

/// Split a delimited line into its fields.
///
/// A trailing delimiter does not produce an empty final field and an empty
/// line has no fields at all. Empty fields in the middle are kept.
pub fn split_fields(line: &str) -> Row {
    if line.is_empty() {
        return Vec::new();
    }
    let mut fields: Row = line.split(DELIMITER).map(str::to_string).collect();
    if line.ends_with(DELIMITER) {
        fields.pop();
    }
    fields
}

/// Join values into one physical line (without the newline)
pub fn join_fields<S: AsRef<str>>(values: &[S]) -> String {
    let mut line = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        line.push_str(value.as_ref());
    }
    line
}
