//! Token vocabulary shared by the time renderer and the pattern compiler.
//!
//! A format string such as `"dddd HH:mm"` is split into [`FormatPiece`]s in a
//! single left-to-right pass. At every position the longest token wins, so
//! `dddd` is never read as `ddd` + `d`, and letters inside a bracketed literal
//! (`[at]`) are never tokenized at all.

/// Full weekday names, indexed by days since Sunday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Three-letter weekday names, indexed by days since Sunday.
pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A recognised date/time token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `YYYY`
    Year,
    /// `MM`
    Month,
    /// `DD`
    Day,
    /// `HH`
    Hour24,
    /// `H`
    Hour24Unpadded,
    /// `hh`
    Hour12,
    /// `h`
    Hour12Unpadded,
    /// `mm`
    Minute,
    /// `m`
    MinuteUnpadded,
    /// `A`
    MeridiemUpper,
    /// `a`
    MeridiemLower,
    /// `ddd`
    WeekdayShort,
    /// `dddd`
    WeekdayLong,
}

/// Every token, longest symbol first. Tokenizing walks this list in order,
/// which is what keeps overlapping symbols from splitting each other.
const TOKENS: [Token; 13] = [
    Token::WeekdayLong,
    Token::Year,
    Token::WeekdayShort,
    Token::Month,
    Token::Day,
    Token::Hour24,
    Token::Hour12,
    Token::Minute,
    Token::Hour24Unpadded,
    Token::Hour12Unpadded,
    Token::MinuteUnpadded,
    Token::MeridiemUpper,
    Token::MeridiemLower,
];

impl Token {
    /// The literal spelling of this token inside a format string.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Year => "YYYY",
            Self::Month => "MM",
            Self::Day => "DD",
            Self::Hour24 => "HH",
            Self::Hour24Unpadded => "H",
            Self::Hour12 => "hh",
            Self::Hour12Unpadded => "h",
            Self::Minute => "mm",
            Self::MinuteUnpadded => "m",
            Self::MeridiemUpper => "A",
            Self::MeridiemLower => "a",
            Self::WeekdayShort => "ddd",
            Self::WeekdayLong => "dddd",
        }
    }

    /// The regular-expression fragment matching a rendered value of this token.
    #[must_use]
    pub fn regex_fragment(self) -> String {
        match self {
            Self::Year => r"\d{4}".to_string(),
            Self::Month | Self::Day | Self::Hour24 | Self::Hour12 | Self::Minute => {
                r"\d{2}".to_string()
            }
            Self::Hour24Unpadded | Self::Hour12Unpadded | Self::MinuteUnpadded => {
                r"\d{1,2}".to_string()
            }
            Self::MeridiemUpper => "(?:AM|PM)".to_string(),
            Self::MeridiemLower => "(?:am|pm)".to_string(),
            Self::WeekdayShort => format!("(?:{})", WEEKDAY_ABBREVIATIONS.join("|")),
            Self::WeekdayLong => format!("(?:{})", WEEKDAY_NAMES.join("|")),
        }
    }
}

/// One piece of a tokenized format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatPiece {
    Token(Token),
    Literal(String),
}

/// Splits `format` into tokens and literal runs.
///
/// Square brackets escape their contents: `"[at] HH"` yields the literal
/// `"at "` followed by [`Token::Hour24`]. An unmatched `[` is kept as a
/// literal character.
#[must_use]
pub fn tokenize(format: &str) -> Vec<FormatPiece> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut rest = format;

    'outer: while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(close) = rest.find(']') {
                literal.push_str(&rest[1..close]);
                rest = &rest[close + 1..];
                continue;
            }
        }

        for token in TOKENS {
            if let Some(after) = rest.strip_prefix(token.symbol()) {
                if !literal.is_empty() {
                    pieces.push(FormatPiece::Literal(std::mem::take(&mut literal)));
                }
                pieces.push(FormatPiece::Token(token));
                rest = after;
                continue 'outer;
            }
        }

        literal.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if !literal.is_empty() {
        pieces.push(FormatPiece::Literal(literal));
    }
    pieces
}
