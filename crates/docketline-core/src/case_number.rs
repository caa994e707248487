//! Case-number canonicalisation for CNJ unified numbering.
//!
//! Converts user-typed or registry-supplied case numbers between the bare
//! 20-digit query key (e.g., "00123456720248260001") and the punctuated
//! display form (e.g., "0012345-67.2024.8.26.0001").
//!
//! # CNJ numbering convention
//!
//! `NNNNNNN-DD.AAAA.J.TR.OOOO`
//!
//! - `NNNNNNN`: sequential number within the originating court unit and year
//! - `DD`: check digits
//! - `AAAA`: year the case was filed
//! - `J`: justice segment (8 = state courts)
//! - `TR`: tribunal within the segment (26 = TJSP)
//! - `OOOO`: originating court unit

use std::fmt;

/// Length of a bare CNJ case number.
pub const CASE_NUMBER_DIGITS: usize = 20;

/// Strip punctuation from a case number, keeping only ASCII digits.
///
/// Used to build the upstream query key. Never fails: anything that is not a
/// digit is dropped.
pub fn canonicalize(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Re-insert CNJ separators into a bare 20-character case number.
///
/// Input of any other length is returned unchanged; registry identifiers are
/// untrusted and a malformed one should not block an otherwise usable result.
pub fn format_case_number(digits: &str) -> String {
    if digits.len() != CASE_NUMBER_DIGITS || !digits.is_ascii() {
        return digits.to_string();
    }
    format!(
        "{}-{}.{}.{}.{}.{}",
        &digits[0..7],
        &digits[7..9],
        &digits[9..13],
        &digits[13..14],
        &digits[14..16],
        &digits[16..20],
    )
}

/// A parsed CNJ case number, split into its segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseNumber {
    digits: String,
}

impl CaseNumber {
    /// Parse a case number in either bare or punctuated form.
    ///
    /// Returns `None` unless exactly 20 digits remain after canonicalisation.
    pub fn parse(input: &str) -> Option<Self> {
        let digits = canonicalize(input);
        (digits.len() == CASE_NUMBER_DIGITS).then_some(Self { digits })
    }

    /// The bare 20-digit query key.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn sequence(&self) -> &str {
        &self.digits[0..7]
    }

    pub fn check_digits(&self) -> &str {
        &self.digits[7..9]
    }

    pub fn year(&self) -> &str {
        &self.digits[9..13]
    }

    /// Justice segment (`J`), e.g. "8" for state courts.
    pub fn segment(&self) -> &str {
        &self.digits[13..14]
    }

    pub fn tribunal(&self) -> &str {
        &self.digits[14..16]
    }

    /// Originating court unit (`OOOO`).
    pub fn origin(&self) -> &str {
        &self.digits[16..20]
    }
}

impl fmt::Display for CaseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_case_number(&self.digits))
    }
}
