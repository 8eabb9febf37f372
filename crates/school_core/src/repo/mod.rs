//! Repository layer contracts and the in-memory implementation.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per record type.
//! - Own every domain collection; callers only see owned copies.
//!
//! # Invariants
//! - Writes run `validate()` and foreign-key checks before mutating, so a
//!   rejected write leaves the store unchanged.
//! - Ids are unique per collection; user ids and emails are unique across
//!   all user variants.
//! - Mutations of unknown ids are reported as `Ok(None)` / `Ok(false)`,
//!   never as errors.

use crate::grading::GradeError;
use crate::model::{EntityId, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod academic_repo;
pub mod assessment_repo;
pub mod notification_repo;
mod store;
pub mod user_repo;

pub use academic_repo::{ClassRepository, SubjectRepository};
pub use assessment_repo::{AssignmentRepository, GradeRepository};
pub use notification_repo::NotificationRepository;
pub use store::SchoolRepository;
pub use user_repo::{
    AdminRepository, ParentRepository, StudentRepository, TeacherRepository, UserRepository,
};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for validation, identity and reference checks.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoError {
    Validation(ValidationError),
    Grade(GradeError),
    /// Direct target of an operation does not exist.
    NotFound {
        entity: &'static str,
        id: EntityId,
    },
    DuplicateId {
        entity: &'static str,
        id: EntityId,
    },
    /// Another account already uses this email.
    DuplicateEmail,
    /// A foreign key points at a record that does not exist.
    MissingReference {
        entity: &'static str,
        id: EntityId,
    },
    /// The record is still referenced and cannot be deleted.
    InUse {
        entity: &'static str,
        id: EntityId,
        by: &'static str,
    },
    ClassFull {
        class_id: EntityId,
        max_students: u32,
    },
    /// Assignment subject differs from the subject its class teaches.
    SubjectMismatch {
        class_id: EntityId,
        subject_id: EntityId,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Grade(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DuplicateId { entity, id } => write!(f, "{entity} already exists: {id}"),
            Self::DuplicateEmail => write!(f, "email is already registered"),
            Self::MissingReference { entity, id } => {
                write!(f, "referenced {entity} does not exist: {id}")
            }
            Self::InUse { entity, id, by } => {
                write!(f, "{entity} {id} is still referenced by {by} records")
            }
            Self::ClassFull {
                class_id,
                max_students,
            } => write!(f, "class {class_id} is full ({max_students} students)"),
            Self::SubjectMismatch {
                class_id,
                subject_id,
            } => write!(f, "subject {subject_id} is not taught in class {class_id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Grade(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<GradeError> for RepoError {
    fn from(value: GradeError) -> Self {
        Self::Grade(value)
    }
}

/// Every repository contract at once, for services that span record types.
pub trait SchoolStore:
    UserRepository
    + StudentRepository
    + TeacherRepository
    + AdminRepository
    + ParentRepository
    + SubjectRepository
    + ClassRepository
    + AssignmentRepository
    + GradeRepository
    + NotificationRepository
{
}

impl<T> SchoolStore for T where
    T: UserRepository
        + StudentRepository
        + TeacherRepository
        + AdminRepository
        + ParentRepository
        + SubjectRepository
        + ClassRepository
        + AssignmentRepository
        + GradeRepository
        + NotificationRepository
{
}
