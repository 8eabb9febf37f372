//! Domain model for school records.
//!
//! # Responsibility
//! - Define canonical records for users, academics, assessments and
//!   notifications.
//! - Provide `validate()` checks that repositories run before every write.
//!
//! # Invariants
//! - Every record is identified by a caller-visible string id.
//! - User role is carried by the `User` variant, never by a free field.
//! - Timestamps are Unix epoch milliseconds (UTC).

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod academic;
pub mod assessment;
pub mod notification;
pub mod user;

/// Stable identifier shared by every record type.
pub type EntityId = String;

/// Common shape of records stored in repository collections.
pub trait Entity {
    /// Human-readable record kind used in errors and log events.
    const KIND: &'static str;

    /// Returns the record id.
    fn id(&self) -> &str;
}

/// Generates a fresh id of the form `<prefix>-<uuid>`.
pub fn new_id(prefix: &str) -> EntityId {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Record-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace.
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
    /// Schedule slot day is outside `0..=6`.
    DayOfWeekOutOfRange(u8),
    /// Schedule slot ends before (or when) it starts.
    InvalidTimeRange { start: String, end: String },
    /// More students enrolled than the class allows.
    OverCapacity { enrolled: usize, max: u32 },
    /// The same student id appears twice in one roster.
    DuplicateEnrollment(EntityId),
    /// A numeric field must be strictly positive.
    NonPositive {
        entity: &'static str,
        field: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "{entity}.{field} must not be empty")
            }
            Self::DayOfWeekOutOfRange(day) => {
                write!(f, "day of week {day} is out of range 0-6")
            }
            Self::InvalidTimeRange { start, end } => {
                write!(f, "schedule slot must end after it starts ({start}-{end})")
            }
            Self::OverCapacity { enrolled, max } => {
                write!(f, "{enrolled} students enrolled but class allows {max}")
            }
            Self::DuplicateEnrollment(student_id) => {
                write!(f, "student {student_id} is enrolled more than once")
            }
            Self::NonPositive { entity, field } => {
                write!(f, "{entity}.{field} must be greater than zero")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(())
}
