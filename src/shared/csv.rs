//! Minimal CSV assembly for the admin export endpoints.
//!
//! Fields containing commas, quotes, or line breaks are wrapped in double
//! quotes with embedded quotes doubled.

/// Escape a single CSV field.
pub fn escape_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Join already-owned field values into one CSV row (with trailing newline).
pub fn write_row(out: &mut String, fields: &[&str]) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        out.push_str(&escape_field(field));
        first = false;
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(escape_field("hello"), "hello");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn commas_and_quotes_are_escaped() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn rows_are_comma_joined() {
        let mut out = String::new();
        write_row(&mut out, &["id", "blurry, photo", "ok"]);
        assert_eq!(out, "id,\"blurry, photo\",ok\n");
    }
}
