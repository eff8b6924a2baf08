//! Shell-like word splitting.
//!
//! Used for probe command templates and for the `CPPFLAGS`/`LDFLAGS` style
//! token lists merged into compiler traces.
//!
//! Rules:
//! - `\` makes the following character literal (the backslash is dropped)
//! - `"` toggles quoted mode, in which spaces do not split
//! - empty tokens are dropped
//! - a token wrapped entirely in one pair of `"` loses those quotes

const ESCAPE: char = '\\';
const QUOTE: char = '"';
const DELIMITER: char = ' ';

/// Split `input` into words.
#[must_use]
pub fn split(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(next) => current.push(next),
                None => current.push(ESCAPE),
            },
            QUOTE => {
                quoted = !quoted;
                current.push(QUOTE);
            }
            DELIMITER if !quoted => words.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    words.push(current);

    words
        .into_iter()
        .filter(|w| !w.is_empty())
        .map(strip_quotes)
        .collect()
}

/// Drop one pair of surrounding double quotes.
fn strip_quotes(word: String) -> String {
    match word
        .strip_prefix(QUOTE)
        .and_then(|w| w.strip_suffix(QUOTE))
    {
        Some(inner) => inner.to_string(),
        None => word,
    }
}
