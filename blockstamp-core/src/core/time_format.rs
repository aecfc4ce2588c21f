//! Rendering the current time with a format string.
//!
//! ## Tokens
//! - `YYYY`, `MM`, `DD`: year, month, day (zero-padded)
//! - `HH`, `hh`, `mm`: 24h hour, 12h hour, minute (zero-padded)
//! - `H`, `h`, `m`: the same without padding
//! - `A`, `a`: `AM`/`PM`, `am`/`pm`
//! - `ddd`, `dddd`: `Mon`, `Monday`
//! - `[...]`: literal text

use std::fmt::Write;

use chrono::{Datelike, Local, NaiveDateTime, Timelike};

use crate::core::format_tokens::{
    tokenize, FormatPiece, Token, WEEKDAY_ABBREVIATIONS, WEEKDAY_NAMES,
};

/// Renders `at` according to `format`.
pub fn render<T: Datelike + Timelike>(format: &str, at: &T) -> String {
    let mut out = String::with_capacity(format.len() + 8);
    let (is_pm, hour12) = at.hour12();
    let weekday = at.weekday().num_days_from_sunday() as usize;

    for piece in tokenize(format) {
        match piece {
            FormatPiece::Literal(text) => out.push_str(&text),
            FormatPiece::Token(token) => {
                let _ = match token {
                    Token::Year => write!(out, "{:04}", at.year()),
                    Token::Month => write!(out, "{:02}", at.month()),
                    Token::Day => write!(out, "{:02}", at.day()),
                    Token::Hour24 => write!(out, "{:02}", at.hour()),
                    Token::Hour24Unpadded => write!(out, "{}", at.hour()),
                    Token::Hour12 => write!(out, "{hour12:02}"),
                    Token::Hour12Unpadded => write!(out, "{hour12}"),
                    Token::Minute => write!(out, "{:02}", at.minute()),
                    Token::MinuteUnpadded => write!(out, "{}", at.minute()),
                    Token::MeridiemUpper => out.write_str(if is_pm { "PM" } else { "AM" }),
                    Token::MeridiemLower => out.write_str(if is_pm { "pm" } else { "am" }),
                    Token::WeekdayShort => out.write_str(WEEKDAY_ABBREVIATIONS[weekday]),
                    Token::WeekdayLong => out.write_str(WEEKDAY_NAMES[weekday]),
                };
            }
        }
    }

    out
}

/// Source of the rendered "now" handed to the rewriter.
pub trait Clock {
    /// Renders the current moment with `format`.
    fn now_rendered(&self, format: &str) -> String;
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_rendered(&self, format: &str) -> String {
        render(format, &Local::now())
    }
}

/// A clock stuck at one moment.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now_rendered(&self, format: &str) -> String {
        render(format, &self.0)
    }
}
