/// Trim surrounding whitespace, then drop every character in `punctuation`.
///
/// Interior whitespace is kept: it separates a room name from the time.
#[must_use]
pub fn normalize(text: &str, punctuation: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !punctuation.contains(*c))
        .collect()
}
