use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static HUNK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(@@ -)(\d+)(,\d+ \+)(\d+)(,\d+ @@)").expect("hunk header pattern is valid")
});

/// Moves every `@@ -a,b +c,d @@` hunk header in `code` by `line_offset`
/// lines. Hunk lengths and body lines are left alone.
pub fn offset_hunk_headers(code: &str, line_offset: isize) -> String {
    if line_offset == 0 {
        return code.to_string();
    }

    HUNK_HEADER
        .replace_all(code, |caps: &Captures| {
            format!(
                "{}{}{}{}{}",
                &caps[1],
                shift(&caps[2], line_offset),
                &caps[3],
                shift(&caps[4], line_offset),
                &caps[5]
            )
        })
        .into_owned()
}

fn shift(digits: &str, line_offset: isize) -> String {
    match digits.parse::<usize>() {
        Ok(line) => line.saturating_add_signed(line_offset).to_string(),
        Err(_) => digits.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shifts_both_sides() {
        let code = "@@ -1,1 +1,1 @@\n-import md5\n+import hashlib\n";
        assert_eq!(
            offset_hunk_headers(code, 1),
            "@@ -2,1 +2,1 @@\n-import md5\n+import hashlib\n"
        );
    }

    #[test]
    fn test_negative_offset() {
        let code = "@@ -10,3 +10,4 @@\n context\n";
        assert_eq!(offset_hunk_headers(code, -4), "@@ -6,3 +6,4 @@\n context\n");
    }

    #[test]
    fn test_every_hunk_is_shifted() {
        let code = "--- a/app.py\n+++ b/app.py\n@@ -3,1 +3,1 @@\n-a\n+b\n@@ -9,2 +9,2 @@\n-c\n+d\n";
        assert_eq!(
            offset_hunk_headers(code, 2),
            "--- a/app.py\n+++ b/app.py\n@@ -5,1 +5,1 @@\n-a\n+b\n@@ -11,2 +11,2 @@\n-c\n+d\n"
        );
    }

    #[test]
    fn test_body_lines_that_look_like_headers_are_kept() {
        let code = "@@ -1,1 +1,1 @@\n+ x = \"@@ -1,1 +1,1 @@\"\n";
        assert_eq!(
            offset_hunk_headers(code, 3),
            "@@ -4,1 +4,1 @@\n+ x = \"@@ -1,1 +1,1 @@\"\n"
        );
    }
}
