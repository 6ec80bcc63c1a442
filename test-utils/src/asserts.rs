pub fn assert_str_contains(s1: &str, to_contain: &str) {
    assert!(
        s1.contains(to_contain),
        "String does not contain expected value. \nString: `{s1}`\nDoes not contain: `{to_contain}`"
    );
}

pub fn assert_str_not_contains(s1: &str, not_to_contain: &str) {
    assert!(
        !s1.contains(not_to_contain),
        "String contains an unexpected value. \nString: `{s1}`\nContains: `{not_to_contain}`"
    );
}

/// Asserts that one of the lines of a rendered view, trimmed, is exactly `line`
pub fn assert_has_line(rendered: &str, line: &str) {
    assert!(
        rendered.lines().any(|l| l.trim() == line),
        "Rendered text has no line equal to `{line}`.\nRendered:\n{rendered}"
    );
}
