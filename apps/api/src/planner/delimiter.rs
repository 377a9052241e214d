//! Delimiter Repair — best-effort normalization of one delimited line to an
//! expected delimiter count before it reaches the record parser.
//!
//! Missing delimiters are added next to an existing empty field (`,,`) when
//! there is one, otherwise appended as empty trailing fields. Surplus
//! delimiters are taken out of an empty field first, otherwise the last
//! delimiter on the line is dropped.

/// Number of occurrences of `delimiter` in `line`.
pub fn count_delimiters(line: &str, delimiter: char) -> usize {
    line.matches(delimiter).count()
}

/// Returns `line` rewritten to contain exactly `expected` delimiters.
/// A line that already has the right count is returned unchanged.
pub fn repair_line(line: &str, delimiter: char, expected: usize) -> String {
    let mut line = line.to_string();
    let empty_field: String = [delimiter, delimiter].iter().collect();
    let mut count = count_delimiters(&line, delimiter);

    while count < expected {
        match line.find(&empty_field) {
            Some(index) => line.insert(index + delimiter.len_utf8(), delimiter),
            None => line.push(delimiter),
        }
        count += 1;
    }

    while count > expected {
        let index = line.find(&empty_field).or_else(|| line.rfind(delimiter));
        match index {
            Some(index) => {
                line.remove(index);
            }
            None => break,
        }
        count -= 1;
    }

    line
}
