//! Quote list parsing
//!
//! Raw input holds one quote per line. Blank lines are ignored and the
//! remaining lines keep their order, which is the narration order.

/// Split raw multi-line text into trimmed, non-empty quotes
pub fn parse_quotes(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_and_whitespace_removed() {
        assert_eq!(parse_quotes("  a \n\nb\n  \nc  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_crlf_input() {
        assert_eq!(
            parse_quotes("First quote.\r\nSecond quote.\r\n"),
            vec!["First quote.", "Second quote."]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_quotes("").is_empty());
        assert!(parse_quotes(" \n\t\n  ").is_empty());
    }

    #[test]
    fn test_inner_whitespace_kept() {
        assert_eq!(parse_quotes("  to be,  or not  "), vec!["to be,  or not"]);
    }
}
