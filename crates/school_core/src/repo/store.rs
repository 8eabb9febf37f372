//! In-memory store backing every repository contract.
//!
//! Collections are plain vectors scanned linearly; the expected data set is
//! tens to low hundreds of records.

use super::{RepoError, RepoResult};
use crate::clock::{now_epoch_ms, Clock};
use crate::model::academic::{Class, Subject};
use crate::model::assessment::{Assignment, Grade};
use crate::model::notification::Notification;
use crate::model::user::{Account, Admin, Parent, Student, Teacher};
use crate::model::Entity;
use log::warn;

/// Explicitly constructed school data store.
///
/// There is no process-wide instance; the composition root builds one and
/// hands it to services.
#[derive(Debug, Clone)]
pub struct SchoolRepository {
    pub(crate) students: Vec<Student>,
    pub(crate) teachers: Vec<Teacher>,
    pub(crate) admins: Vec<Admin>,
    pub(crate) parents: Vec<Parent>,
    pub(crate) subjects: Vec<Subject>,
    pub(crate) classes: Vec<Class>,
    pub(crate) assignments: Vec<Assignment>,
    pub(crate) grades: Vec<Grade>,
    pub(crate) notifications: Vec<Notification>,
    clock: Clock,
}

impl SchoolRepository {
    /// Creates an empty store stamping records with wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(now_epoch_ms)
    }

    /// Creates an empty store with a caller-provided time source.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            students: Vec::new(),
            teachers: Vec::new(),
            admins: Vec::new(),
            parents: Vec::new(),
            subjects: Vec::new(),
            classes: Vec::new(),
            assignments: Vec::new(),
            grades: Vec::new(),
            notifications: Vec::new(),
            clock,
        }
    }

    pub(crate) fn now(&self) -> i64 {
        (self.clock)()
    }

    /// Shared account fields of every user variant.
    pub(crate) fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.students
            .iter()
            .map(|student| &student.account)
            .chain(self.teachers.iter().map(|teacher| &teacher.account))
            .chain(self.admins.iter().map(|admin| &admin.account))
            .chain(self.parents.iter().map(|parent| &parent.account))
    }

    /// Rejects an account whose id or email is already taken.
    ///
    /// `existing_id` is the account being updated, which may keep its own
    /// email.
    pub(crate) fn ensure_account_free(
        &self,
        entity: &'static str,
        account: &Account,
        existing_id: Option<&str>,
    ) -> RepoResult<()> {
        if existing_id.is_none() && self.accounts().any(|other| other.id == account.id) {
            return Err(RepoError::DuplicateId {
                entity,
                id: account.id.clone(),
            });
        }
        let email_taken = self.accounts().any(|other| {
            other.email == account.email && Some(other.id.as_str()) != existing_id
        });
        if email_taken {
            return Err(RepoError::DuplicateEmail);
        }
        Ok(())
    }
}

impl Default for SchoolRepository {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn find<'a, T: Entity>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

pub(crate) fn position<T: Entity>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

pub(crate) fn ensure_unique<T: Entity>(items: &[T], id: &str) -> RepoResult<()> {
    if find(items, id).is_some() {
        return Err(RepoError::DuplicateId {
            entity: T::KIND,
            id: id.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_exists<T: Entity>(items: &[T], id: &str) -> RepoResult<()> {
    if find(items, id).is_none() {
        return Err(RepoError::MissingReference {
            entity: T::KIND,
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Removes the first record with `id`; returns whether one was removed.
pub(crate) fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: &str) -> bool {
    match position(items, id) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

/// Logs a rejected write and hands the error back for propagation.
pub(crate) fn rejected(event: &'static str, err: RepoError) -> RepoError {
    warn!("event={event} module=repo status=rejected error={err}");
    err
}
