//! Prompt pattern helpers.

use regex::bytes::Regex;

/// Join several prompt patterns into one alternation.
///
/// Each pattern keeps its own inline flags because it is wrapped in a
/// non-capturing group.
pub fn combine_patterns<'a, I>(patterns: I) -> Result<Regex, regex::Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = patterns
        .into_iter()
        .map(|p| format!("(?:{p})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&joined)
}

/// Return the last non-empty line of `output`, which is where the prompt sits.
pub fn last_line(output: &[u8]) -> &[u8] {
    let trimmed = trim_end(output);
    match memchr::memrchr(b'\n', trimmed) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

fn trim_end(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |p| p + 1);
    &data[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_keeps_flags_per_pattern() {
        let combined = combine_patterns([r"(?m)^R1>$", r"(?mi)^r1#$"]).unwrap();
        assert!(combined.is_match(b"output\nR1>"));
        assert!(combined.is_match(b"output\nR1#"));
        assert!(!combined.is_match(b"output\nR1$"));
    }

    #[test]
    fn test_last_line() {
        assert_eq!(last_line(b"show clock\n*12:00:01\nR1#"), b"R1#");
        assert_eq!(last_line(b"R1(config)# \n"), b"R1(config)#");
        assert_eq!(last_line(b"R1>"), b"R1>");
        assert_eq!(last_line(b""), b"");
    }
}
