/// Lowercase, trim and collapse every run of characters outside `[a-z0-9]`
/// into a single space.
pub fn normalize_title(title: &str) -> String {
    let lower = title.trim().to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut pending_separator = false;

    for c in lower.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !out.is_empty() {
                out.push(' ');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out
}

/// Normalized title with the release year appended, so remakes sharing a
/// title get distinct keys.
pub fn normalize_title_with_year(title: &str, year: Option<u32>) -> String {
    let normalized = normalize_title(title);
    match year {
        Some(year) if year > 0 => format!("{} {}", normalized, year),
        _ => normalized,
    }
}
