//! # Identifier Validation
//!
//! Structural and checksum validation for the three government-issued
//! identifiers the engine deals with:
//!
//! - GSTIN: 15 characters, `SS PPPPPPPPPP E Z C` (state code, embedded PAN,
//!   entity code, literal `Z`, mod-36 checksum)
//! - PAN: 10 characters, five letters, four digits, one letter
//! - ARN: 20 characters, `AA` + state code + year + 14 digits
//!
//! Validators never fail: every problem is collected into a
//! [`ValidationResult`] so a form can surface all of them at once. Only a
//! wrong length stops validation early, since positional checks would be
//! meaningless.
//!
//! ## Input contract
//!
//! Inputs are expected trimmed and uppercased by the caller. Use
//! [`normalize_identifier`] when the value comes straight from a form. The
//! typed wrappers [`Gstin`] and [`Pan`] normalise on construction.

use crate::error::{ComplianceError, Result};
use crate::schema::ValidationResult;
use crate::states::{is_valid_state_code, state_name};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const GSTIN_LENGTH: usize = 15;
pub const PAN_LENGTH: usize = 10;
pub const ARN_LENGTH: usize = 20;

const CHECKSUM_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Clone, Copy)]
enum CharClass {
    Digit,
    Upper,
    UpperAlnum,
    Literal(char),
}

impl CharClass {
    fn accepts(self, c: char) -> bool {
        match self {
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::Upper => c.is_ascii_uppercase(),
            CharClass::UpperAlnum => c.is_ascii_digit() || c.is_ascii_uppercase(),
            CharClass::Literal(expected) => c == expected,
        }
    }
}

use CharClass::{Digit, Literal, Upper, UpperAlnum};

const PAN_PATTERN: [CharClass; PAN_LENGTH] = [
    Upper, Upper, Upper, Upper, Upper, Digit, Digit, Digit, Digit, Upper,
];

const GSTIN_PATTERN: [CharClass; GSTIN_LENGTH] = [
    Digit,
    Digit,
    Upper,
    Upper,
    Upper,
    Upper,
    Upper,
    Digit,
    Digit,
    Digit,
    Digit,
    Upper,
    UpperAlnum,
    Literal('Z'),
    UpperAlnum,
];

fn matches_pattern(chars: &[char], pattern: &[CharClass]) -> bool {
    chars.len() == pattern.len()
        && chars
            .iter()
            .zip(pattern.iter())
            .all(|(&c, &class)| class.accepts(c))
}

fn arn_pattern_matches(chars: &[char]) -> bool {
    chars.len() == ARN_LENGTH
        && chars[0] == 'A'
        && chars[1] == 'A'
        && chars[2..].iter().all(|c| c.is_ascii_digit())
}

/// Trims surrounding whitespace and uppercases an identifier.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// The PAN holder category encoded in its fourth character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanHolderType {
    Individual,
    Company,
    HinduUndividedFamily,
    Firm,
    AssociationOfPersons,
    Trust,
    BodyOfIndividuals,
    LocalAuthority,
    ArtificialJuridicalPerson,
    Government,
}

impl PanHolderType {
    pub fn from_code(code: char) -> Option<Self> {
        let holder = match code {
            'P' => PanHolderType::Individual,
            'C' => PanHolderType::Company,
            'H' => PanHolderType::HinduUndividedFamily,
            'F' => PanHolderType::Firm,
            'A' => PanHolderType::AssociationOfPersons,
            'T' => PanHolderType::Trust,
            'B' => PanHolderType::BodyOfIndividuals,
            'L' => PanHolderType::LocalAuthority,
            'J' => PanHolderType::ArtificialJuridicalPerson,
            'G' => PanHolderType::Government,
            _ => return None,
        };
        Some(holder)
    }
}

/// Computes the GSTIN check character over `first14`.
///
/// Luhn mod-36: walking right to left, each symbol's alphabet index is
/// multiplied by a factor alternating 2, 1, 2, ... (2 on the last
/// character); the quotient and remainder of each product by 36 are summed,
/// and the check index is `(36 - sum % 36) % 36`.
///
/// # Errors
///
/// Returns [`ComplianceError::InvalidIdentifierCharacter`] for any character
/// outside `0-9A-Z`.
pub fn calculate_gstin_checksum(first14: &str) -> Result<char> {
    let mut factor = 2;
    let mut sum = 0usize;

    for c in first14.chars().rev() {
        let code_point = CHECKSUM_ALPHABET
            .iter()
            .position(|&symbol| char::from(symbol) == c)
            .ok_or(ComplianceError::InvalidIdentifierCharacter(c))?;

        let product = factor * code_point;
        sum += product / 36 + product % 36;
        factor = if factor == 2 { 1 } else { 2 };
    }

    let index = (36 - sum % 36) % 36;
    Ok(char::from(CHECKSUM_ALPHABET[index]))
}

pub fn validate_gstin(raw: &str) -> ValidationResult {
    let chars: Vec<char> = raw.chars().collect();

    if chars.len() != GSTIN_LENGTH {
        debug!("Rejected GSTIN '{}': length {}", raw, chars.len());
        return ValidationResult::rejected(format!(
            "GSTIN must be exactly {} characters (got {})",
            GSTIN_LENGTH,
            chars.len()
        ));
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !matches_pattern(&chars, &GSTIN_PATTERN) {
        errors.push(
            "GSTIN format is invalid: expected 2-digit state code, 10-character PAN, entity code, 'Z' and checksum character"
                .to_string(),
        );
    }

    let state_code: String = chars[0..2].iter().collect();
    if !is_valid_state_code(&state_code) {
        errors.push(format!("Invalid state code '{}' in GSTIN", state_code));
    }

    let embedded_pan = &chars[2..12];
    if !matches_pattern(embedded_pan, &PAN_PATTERN) {
        let pan: String = embedded_pan.iter().collect();
        errors.push(format!("Embedded PAN '{}' is not a valid PAN format", pan));
    }

    if chars[13] != 'Z' {
        warnings.push(format!(
            "14th character of GSTIN is normally 'Z' (found '{}')",
            chars[13]
        ));
    }

    let prefix: String = chars[..14].iter().collect();
    match calculate_gstin_checksum(&prefix) {
        Ok(expected) if expected != chars[14] => {
            errors.push(format!(
                "GSTIN checksum mismatch: expected '{}', found '{}'",
                expected, chars[14]
            ));
        }
        Ok(_) => {}
        // Characters outside the alphabet already fail the format check.
        Err(e) => debug!("GSTIN checksum not computed for '{}': {}", raw, e),
    }

    let result = ValidationResult::from_findings(errors, warnings);
    if !result.is_valid {
        debug!("Rejected GSTIN '{}': {:?}", raw, result.errors);
    }
    result
}

pub fn validate_pan(raw: &str) -> ValidationResult {
    let chars: Vec<char> = raw.chars().collect();

    if chars.len() != PAN_LENGTH {
        debug!("Rejected PAN '{}': length {}", raw, chars.len());
        return ValidationResult::rejected(format!(
            "PAN must be exactly {} characters (got {})",
            PAN_LENGTH,
            chars.len()
        ));
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !matches_pattern(&chars, &PAN_PATTERN) {
        errors.push(
            "PAN format is invalid: expected 5 letters, 4 digits and 1 letter".to_string(),
        );
    }

    if PanHolderType::from_code(chars[3]).is_none() {
        warnings.push(format!(
            "Unrecognised PAN holder type '{}' in 4th character",
            chars[3]
        ));
    }

    ValidationResult::from_findings(errors, warnings)
}

pub fn validate_arn(raw: &str) -> ValidationResult {
    let chars: Vec<char> = raw.chars().collect();

    if chars.len() != ARN_LENGTH {
        debug!("Rejected ARN '{}': length {}", raw, chars.len());
        return ValidationResult::rejected(format!(
            "ARN must be exactly {} characters (got {})",
            ARN_LENGTH,
            chars.len()
        ));
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !arn_pattern_matches(&chars) {
        errors.push(
            "ARN format is invalid: expected 'AA' followed by state code, year and 14 digits"
                .to_string(),
        );
    }

    let state_code: String = chars[2..4].iter().collect();
    if !is_valid_state_code(&state_code) {
        warnings.push(format!("Unrecognised state code '{}' in ARN", state_code));
    }

    ValidationResult::from_findings(errors, warnings)
}

/// Deserialises through the type's `new()` so invalid identifiers are
/// rejected at the serialization boundary.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// A GSTIN that passed validation, stored uppercase.
///
/// Warnings from validation are not retained; call [`validate_gstin`] on
/// the string form to inspect them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Gstin(String);

impl_validating_deserialize!(Gstin);

impl Gstin {
    pub fn new(value: impl Into<String>) -> std::result::Result<Self, ValidationResult> {
        let normalized = normalize_identifier(&value.into());
        let result = validate_gstin(&normalized);
        if result.is_valid {
            Ok(Self(normalized))
        } else {
            Err(result)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn state_code(&self) -> &str {
        &self.0[0..2]
    }

    pub fn state_name(&self) -> Option<&'static str> {
        state_name(self.state_code())
    }

    /// The PAN embedded in characters 3-12.
    pub fn pan(&self) -> Pan {
        Pan(self.0[2..12].to_string())
    }

    /// Registration number of this PAN within the state (13th character).
    pub fn entity_code(&self) -> char {
        char::from(self.0.as_bytes()[12])
    }

    pub fn check_character(&self) -> char {
        char::from(self.0.as_bytes()[14])
    }
}

impl fmt::Display for Gstin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A PAN that passed validation, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Pan(String);

impl_validating_deserialize!(Pan);

impl Pan {
    pub fn new(value: impl Into<String>) -> std::result::Result<Self, ValidationResult> {
        let normalized = normalize_identifier(&value.into());
        let result = validate_pan(&normalized);
        if result.is_valid {
            Ok(Self(normalized))
        } else {
            Err(result)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `None` for holder codes outside the known set.
    pub fn holder_type(&self) -> Option<PanHolderType> {
        PanHolderType::from_code(char::from(self.0.as_bytes()[3]))
    }
}

impl fmt::Display for Pan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
