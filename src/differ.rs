/// Classification of one reference character against the typed buffer
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum CharClass {
    Correct,
    Incorrect,
    Pending,
}

/// Classify every character of `reference` against `typed` at the same
/// position. Always yields one entry per reference char; typed characters
/// past the end of the reference are ignored.
pub fn diff(reference: &str, typed: &str) -> Vec<CharClass> {
    let mut typed = typed.chars();

    reference
        .chars()
        .map(|expected| match typed.next() {
            Some(c) if c == expected => CharClass::Correct,
            Some(_) => CharClass::Incorrect,
            None => CharClass::Pending,
        })
        .collect()
}

pub fn count_correct(reference: &str, typed: &str) -> usize {
    reference
        .chars()
        .zip(typed.chars())
        .filter(|(expected, c)| expected == c)
        .count()
}

/// Exact match, length included. Input is expected to be trimmed already.
pub fn is_complete(reference: &str, typed: &str) -> bool {
    reference == typed
}
