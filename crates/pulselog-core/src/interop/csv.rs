//! Quoted CSV encoding and decoding.

/// UTF-8 byte-order mark, so spreadsheet tools detect the encoding.
pub const UTF8_BOM: char = '\u{feff}';

/// Quote a field, doubling embedded quotes.
pub fn quote_field(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Encode rows as CSV: every field quoted, rows joined with `\n`, BOM first.
pub fn encode_csv<R, F>(rows: R) -> String
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = F>,
    F: AsRef<str>,
{
    let lines: Vec<String> = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|field| quote_field(field.as_ref()))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();

    let mut csv = String::new();
    csv.push(UTF8_BOM);
    csv.push_str(&lines.join("\n"));
    csv
}

/// Decode CSV text into rows of fields.
///
/// Handles quoted fields with doubled quotes, embedded commas and newlines,
/// `\r\n` line endings and a leading BOM. Blank lines are skipped.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }
}
