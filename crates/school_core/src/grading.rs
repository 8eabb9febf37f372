//! Grade computation.
//!
//! # Responsibility
//! - Derive a rounded percentage and a letter grade from raw marks.
//!
//! # Invariants
//! - `percentage = round(marks_obtained / max_marks * 100)`, half away
//!   from zero.
//! - The letter grade is a step function of the rounded percentage, so
//!   the two stored values always agree with each other.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Discrete letter grade, ordered best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "F")]
    F,
}

/// Lower bounds (inclusive), checked top to bottom.
const LETTER_THRESHOLDS: [(u32, LetterGrade); 9] = [
    (90, LetterGrade::APlus),
    (85, LetterGrade::A),
    (80, LetterGrade::AMinus),
    (75, LetterGrade::BPlus),
    (70, LetterGrade::B),
    (65, LetterGrade::BMinus),
    (60, LetterGrade::CPlus),
    (55, LetterGrade::C),
    (50, LetterGrade::CMinus),
];

impl LetterGrade {
    pub fn from_percentage(percentage: u32) -> Self {
        LETTER_THRESHOLDS
            .iter()
            .find(|(min, _)| percentage >= *min)
            .map(|(_, letter)| *letter)
            .unwrap_or(Self::F)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::F => "F",
        }
    }
}

impl Display for LetterGrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived values stored on every grade record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeScore {
    pub percentage: u32,
    pub letter: LetterGrade,
}

/// Invalid raw marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeError {
    /// `max_marks` is zero, negative or not finite.
    InvalidMaxMarks(f64),
    /// `marks_obtained` is negative or not finite.
    InvalidMarks(f64),
}

impl Display for GradeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMaxMarks(value) => {
                write!(f, "max marks must be a positive number, got {value}")
            }
            Self::InvalidMarks(value) => {
                write!(f, "marks obtained must be a non-negative number, got {value}")
            }
        }
    }
}

impl Error for GradeError {}

/// Computes the rounded percentage for raw marks.
///
/// # Errors
/// - `InvalidMaxMarks` when `max_marks <= 0` or not finite.
/// - `InvalidMarks` when `marks_obtained < 0` or not finite.
pub fn percentage(marks_obtained: f64, max_marks: f64) -> Result<u32, GradeError> {
    if !max_marks.is_finite() || max_marks <= 0.0 {
        return Err(GradeError::InvalidMaxMarks(max_marks));
    }
    if !marks_obtained.is_finite() || marks_obtained < 0.0 {
        return Err(GradeError::InvalidMarks(marks_obtained));
    }
    let value = (marks_obtained / max_marks * 100.0).round();
    Ok(value as u32)
}

/// Computes both derived values for raw marks.
pub fn compute(marks_obtained: f64, max_marks: f64) -> Result<GradeScore, GradeError> {
    let percentage = percentage(marks_obtained, max_marks)?;
    Ok(GradeScore {
        percentage,
        letter: LetterGrade::from_percentage(percentage),
    })
}

#[cfg(test)]
mod tests {
    use super::{compute, percentage, GradeError, LetterGrade};

    #[test]
    fn letter_boundaries_match_threshold_table() {
        let cases = [
            (100, LetterGrade::APlus),
            (90, LetterGrade::APlus),
            (89, LetterGrade::A),
            (85, LetterGrade::A),
            (84, LetterGrade::AMinus),
            (80, LetterGrade::AMinus),
            (79, LetterGrade::BPlus),
            (75, LetterGrade::BPlus),
            (74, LetterGrade::B),
            (70, LetterGrade::B),
            (69, LetterGrade::BMinus),
            (65, LetterGrade::BMinus),
            (64, LetterGrade::CPlus),
            (60, LetterGrade::CPlus),
            (59, LetterGrade::C),
            (55, LetterGrade::C),
            (54, LetterGrade::CMinus),
            (50, LetterGrade::CMinus),
            (49, LetterGrade::F),
            (0, LetterGrade::F),
        ];
        for (value, expected) in cases {
            assert_eq!(LetterGrade::from_percentage(value), expected, "{value}%");
        }
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(45.0, 50.0).unwrap(), 90);
        assert_eq!(percentage(1.0, 8.0).unwrap(), 13);
        assert_eq!(percentage(5.0, 8.0).unwrap(), 63);
        assert_eq!(percentage(2.0, 3.0).unwrap(), 67);
        assert_eq!(percentage(1.0, 3.0).unwrap(), 33);
    }

    #[test]
    fn letter_follows_rounded_percentage() {
        let score = compute(89.6, 100.0).unwrap();
        assert_eq!(score.percentage, 90);
        assert_eq!(score.letter, LetterGrade::APlus);
    }

    #[test]
    fn rejects_invalid_marks() {
        assert_eq!(
            percentage(10.0, 0.0).unwrap_err(),
            GradeError::InvalidMaxMarks(0.0)
        );
        assert_eq!(
            percentage(-1.0, 10.0).unwrap_err(),
            GradeError::InvalidMarks(-1.0)
        );
        assert!(percentage(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn letters_serialize_as_display_strings() {
        let json = serde_json::to_string(&LetterGrade::BMinus).unwrap();
        assert_eq!(json, "\"B-\"");
        assert_eq!(LetterGrade::APlus.to_string(), "A+");
    }
}
