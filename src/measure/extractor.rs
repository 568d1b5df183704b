//! Candidate extraction: finds numeric literals in page text and splits them
//! into unit-tagged and loose candidates.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// A numeric literal found in page text.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericToken<'a> {
    /// The literal exactly as it appears in the text
    pub literal: &'a str,

    /// Byte offset of the literal in the text
    pub offset: usize,

    /// Literal with thousands separators (commas) removed
    pub normalized: String,

    /// Parsed value; `None` when the normalized literal is not a number
    pub value: Option<f64>,
}

impl<'a> NumericToken<'a> {
    /// Normalize and parse a literal.
    pub fn new(literal: &'a str, offset: usize) -> Self {
        let normalized = normalize_literal(literal);
        let value = parse_literal(&normalized);
        Self {
            literal,
            offset,
            normalized,
            value,
        }
    }
}

/// Remove comma separators from a literal.
pub fn normalize_literal(literal: &str) -> String {
    literal.replace(',', "")
}

/// Parse a normalized literal, reading any Unicode decimal digit (such as
/// Arabic-Indic or fullwidth digits) as its ASCII value.
fn parse_literal(normalized: &str) -> Option<f64> {
    let ascii: String = normalized
        .chars()
        .map(|c| match decimal_digit_value(c) {
            Some(d) => char::from(b'0' + d),
            None => c,
        })
        .collect();
    ascii.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Value of a Unicode decimal digit (general category Nd).
///
/// Nd characters come in contiguous runs starting at a zero, so the value
/// is the distance from the start of the run, modulo ten.
fn decimal_digit_value(c: char) -> Option<u8> {
    if c.is_ascii_digit() {
        return Some(c as u8 - b'0');
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some(((c as u32 - start) % 10) as u8)
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0; 4];
    DIGIT_PATTERN.is_match(c.encode_utf8(&mut buf))
}

/// Numeric candidates of one page, each category in text order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates {
    /// Values tagged "sq m"
    pub sq_m: Vec<f64>,

    /// Values tagged "mm"
    pub mm: Vec<f64>,

    /// Values tagged "m" (and not "mm")
    pub m: Vec<f64>,

    /// Standalone values whose literal was not tagged anywhere on the page
    pub loose: Vec<f64>,
}

impl Candidates {
    /// Total number of candidates across all categories.
    pub fn len(&self) -> usize {
        self.sq_m.len() + self.mm.len() + self.m.len() + self.loose.len()
    }

    /// Check if no candidate was found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tokens of one page before values are taken, for callers that need the
/// originating literals.
#[derive(Debug, Clone, Default)]
pub struct TokenSet<'a> {
    pub sq_m: Vec<NumericToken<'a>>,
    pub mm: Vec<NumericToken<'a>>,
    pub m: Vec<NumericToken<'a>>,
    pub loose: Vec<NumericToken<'a>>,
}

impl TokenSet<'_> {
    /// Keep the parsed values, dropping tokens that failed to parse.
    pub fn into_candidates(self) -> Candidates {
        fn values(tokens: Vec<NumericToken<'_>>) -> Vec<f64> {
            tokens.into_iter().filter_map(|t| t.value).collect()
        }

        Candidates {
            sq_m: values(self.sq_m),
            mm: values(self.mm),
            m: values(self.m),
            loose: values(self.loose),
        }
    }
}

static SQ_M_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\d.,]+)\s*sq\s*m").expect("Invalid sq m regex"));

static MM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\d.,]+)\s*mm").expect("Invalid mm regex"));

// No look-ahead in the regex crate; a following "m" is checked by hand.
static M_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\d.,]+)\s*m").expect("Invalid m regex"));

static DIGIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d$").expect("Invalid digit regex"));

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:[.,]\d+)?\b").expect("Invalid number regex"));

/// Literals followed by a unit marker, captured by group 1.
fn tagged_tokens<'a>(re: &Regex, text: &'a str) -> Vec<NumericToken<'a>> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|g| NumericToken::new(g.as_str(), g.start()))
        .collect()
}

/// Literals followed by a single "m".
///
/// A match whose next character is another "m" is rejected. No shorter
/// match can start inside the same literal run (the character before the
/// "m" would then be a digit, not a unit marker), so resuming the search
/// after the rejected match finds exactly the remaining metre tags.
fn metre_tokens(text: &str) -> Vec<NumericToken<'_>> {
    let re = &*M_PATTERN;
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(caps) = re.captures_at(text, pos) {
        let whole = match caps.get(0) {
            Some(whole) => whole,
            None => break,
        };
        let followed_by_m = text[whole.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.eq_ignore_ascii_case(&'m'));

        if !followed_by_m {
            if let Some(g) = caps.get(1) {
                tokens.push(NumericToken::new(g.as_str(), g.start()));
            }
        }
        pos = whole.end();
    }

    tokens
}

/// Tokenize a page into the four candidate categories.
///
/// Loose numbers are dropped when their normalized literal equals the
/// normalized literal of any tagged token on the page. Equality is on the
/// text, not the value: "10" and "10.0" are distinct.
pub fn tokenize(text: &str) -> TokenSet<'_> {
    let sq_m = tagged_tokens(&SQ_M_PATTERN, text);
    let mm = tagged_tokens(&MM_PATTERN, text);
    let m = metre_tokens(text);

    let tagged: HashSet<&str> = sq_m
        .iter()
        .chain(&mm)
        .chain(&m)
        .map(|t| t.normalized.as_str())
        .collect();

    let loose = NUMBER_PATTERN
        .find_iter(text)
        .map(|mat| NumericToken::new(mat.as_str(), mat.start()))
        .filter(|t| !tagged.contains(t.normalized.as_str()))
        .collect();

    TokenSet { sq_m, mm, m, loose }
}

/// Extract the numeric candidates of one page.
pub fn extract_candidates(text: &str) -> Candidates {
    tokenize(text).into_candidates()
}
