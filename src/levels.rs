//! Lines flagging elevation markers ("FFL" for finished floor level, or
//! "Level").

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::LevelLine;

static LEVEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(FFL|Level)\b").expect("Invalid level regex"));

/// Check whether a line mentions a level marker as a whole word.
pub fn is_level_line(line: &str) -> bool {
    LEVEL_PATTERN.is_match(line)
}

/// Line boundaries: LF, CR, VT, FF, the file/group/record separators, NEL
/// and the Unicode line and paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Every line of the page that mentions a level marker, trimmed.
///
/// A CRLF pair yields an empty piece between its halves, which never
/// matches.
pub fn extract_levels(text: &str, page_number: u32) -> Vec<LevelLine> {
    text.split(is_line_break)
        .filter(|line| is_level_line(line))
        .map(|line| LevelLine {
            page: page_number,
            line: line.trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_levels() {
        let text = "Section A\n  FFL +12.450  \nground level slab\nLevels schedule\nffl 3";
        let levels = extract_levels(text, 4);

        let lines: Vec<_> = levels.iter().map(|l| l.line.as_str()).collect();
        assert_eq!(lines, vec!["FFL +12.450", "ground level slab", "ffl 3"]);
        assert!(levels.iter().all(|l| l.page == 4));
    }

    #[test]
    fn test_word_boundaries() {
        assert!(!is_level_line("FFLOOR finish"));
        assert!(!is_level_line("Levelling course"));
        assert!(is_level_line("(Level 2)"));
    }

    #[test]
    fn test_all_line_boundaries() {
        let text = "FFL 1\rLevel 2\r\nplan\x0cFFL 3\u{2028}Level 4\u{85}notes\x0bffl 5";
        let lines: Vec<_> = extract_levels(text, 1).into_iter().map(|l| l.line).collect();
        assert_eq!(lines, vec!["FFL 1", "Level 2", "FFL 3", "Level 4", "ffl 5"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_levels("", 1).is_empty());
    }
}
