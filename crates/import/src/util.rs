/// Characters a spreadsheet treats as the start of a formula.
const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// Trim a free-text field and drop one leading formula trigger, so the value
/// is inert when the trips end up in a spreadsheet.
pub fn sanitize_field(field: &str) -> String {
    let trimmed = field.trim();
    match trimmed.strip_prefix(FORMULA_TRIGGERS) {
        Some(rest) => rest.to_string(),
        None => trimmed.to_string(),
    }
}

/// Lowercase, trim and collapse inner whitespace runs to one space.
pub(crate) fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
