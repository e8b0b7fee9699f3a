//! Guessable keys and their on-screen layout.

/// Alternate symbol keys, shown as the first keyboard row.
pub const ALT_KEYS: &str = "1234567890-&'";

/// Letter rows in qwerty order.
pub const LETTER_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

pub fn is_guess_key(c: char) -> bool {
    c.is_ascii_lowercase() || ALT_KEYS.contains(c)
}

/// Map a raw input character to a guess key, lowercasing ASCII letters.
#[must_use]
pub fn normalize_key(c: char) -> Option<char> {
    let key = c.to_ascii_lowercase();
    is_guess_key(key).then_some(key)
}

/// All rows in display order: alternate keys first, then the letter rows.
pub fn rows() -> impl Iterator<Item = &'static str> {
    std::iter::once(ALT_KEYS).chain(LETTER_ROWS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_rows_cover_alphabet() {
        let mut letters: Vec<char> = LETTER_ROWS.iter().flat_map(|r| r.chars()).collect();
        letters.sort_unstable();
        let alphabet: Vec<char> = ('a'..='z').collect();
        assert_eq!(letters, alphabet);
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key('a'), Some('a'));
        assert_eq!(normalize_key('Q'), Some('q'));
        assert_eq!(normalize_key('7'), Some('7'));
        assert_eq!(normalize_key('\''), Some('\''));
        assert_eq!(normalize_key('&'), Some('&'));
        assert_eq!(normalize_key(' '), None);
        assert_eq!(normalize_key('!'), None);
        assert_eq!(normalize_key('é'), None);
    }

    #[test]
    fn test_rows_order() {
        let rows: Vec<&str> = rows().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], ALT_KEYS);
        assert_eq!(rows[1], "qwertyuiop");
    }
}
