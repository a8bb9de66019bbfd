/// Lower-cases, turns parentheses into spaces and collapses whitespace runs.
///
/// This is the form additive detection runs against, so `Sodium Benzoate (E211)` and
/// `sodium benzoate e211` look the same to the matcher.
pub fn normalize_for_detection(text: &str) -> String {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|ch| if ch == '(' || ch == ')' { ' ' } else { ch })
        .collect();
    collapse_whitespace(&spaced)
}

/// Lower-cases and collapses whitespace runs, keeping punctuation intact.
///
/// Nutrition declarations and alternative-category lookups read this form.
pub fn fold_whitespace(text: &str) -> String {
    collapse_whitespace(&text.to_lowercase())
}

fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_run {
                collapsed.push(' ');
            }
            in_run = true;
        } else {
            collapsed.push(ch);
            in_run = false;
        }
    }
    collapsed
}
