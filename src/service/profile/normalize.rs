//! Plain-text normalization for fetched page content

/// Characters of each source included in the model prompt
pub const PROMPT_CHARS_PER_SOURCE: usize = 2000;

/// Characters of each source kept when it is stored
pub const STORED_CHARS_PER_SOURCE: usize = 10000;

/// Collapse whitespace runs, trim, and truncate to `max_len` characters
pub fn normalize(raw: &str, max_len: usize) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_len)
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  Acme\n\n builds \t anvils  ", 100), "Acme builds anvils");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize("", 10), "");
        assert_eq!(normalize(" \n\t ", 10), "");
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        assert_eq!(normalize("héllo wörld", 4), "héll");
        assert_eq!(normalize("abc", 0), "");
    }

    #[test]
    fn test_truncation_never_ends_in_space() {
        assert_eq!(normalize("abc def", 4), "abc");
    }
}
