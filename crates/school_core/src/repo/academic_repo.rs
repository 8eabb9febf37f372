//! Subject and class repository contracts and in-memory implementation.
//!
//! # Invariants
//! - `Class.teacher_id` and `Class.subject_id` reference existing records
//!   after every successful write.
//! - Roster changes go through `enroll_student` / `unenroll_student`, which
//!   enforce capacity and uniqueness.

use super::store::{
    ensure_exists, ensure_unique, find, position, rejected, remove_by_id, SchoolRepository,
};
use super::{RepoError, RepoResult};
use crate::model::academic::{Class, ClassPatch, Subject, SubjectPatch};
use crate::model::user::Student;
use crate::model::Entity;
use log::info;

pub trait SubjectRepository {
    fn list_subjects(&self) -> Vec<Subject>;
    /// Subjects with `is_active == true`, in insertion order.
    fn list_active_subjects(&self) -> Vec<Subject>;
    fn get_subject(&self, id: &str) -> Option<Subject>;
    fn add_subject(&mut self, subject: Subject) -> RepoResult<Subject>;
    fn update_subject(&mut self, id: &str, patch: SubjectPatch) -> RepoResult<Option<Subject>>;
    /// Refused with `InUse` while classes or assignments reference it.
    fn delete_subject(&mut self, id: &str) -> RepoResult<bool>;
}

pub trait ClassRepository {
    fn list_classes(&self) -> Vec<Class>;
    fn get_class(&self, id: &str) -> Option<Class>;
    fn get_classes_by_teacher(&self, teacher_id: &str) -> Vec<Class>;
    fn get_classes_by_student(&self, student_id: &str) -> Vec<Class>;
    /// Enrolled students in roster order; dangling ids are skipped.
    fn get_class_students(&self, class_id: &str) -> Vec<Student>;
    fn add_class(&mut self, class: Class) -> RepoResult<Class>;
    /// Refuses a subject change while assignments of the old subject exist.
    fn update_class(&mut self, id: &str, patch: ClassPatch) -> RepoResult<Option<Class>>;
    /// Refused with `InUse` while assignments reference it.
    fn delete_class(&mut self, id: &str) -> RepoResult<bool>;
    /// Returns `Ok(false)` when the student is already enrolled.
    fn enroll_student(&mut self, class_id: &str, student_id: &str) -> RepoResult<bool>;
    /// Returns `false` when the class or enrollment does not exist.
    fn unenroll_student(&mut self, class_id: &str, student_id: &str) -> bool;
}

impl SchoolRepository {
    fn check_class_references(&self, class: &Class) -> RepoResult<()> {
        ensure_exists(&self.teachers, &class.teacher_id)?;
        ensure_exists(&self.subjects, &class.subject_id)?;
        for student_id in &class.enrolled_students {
            ensure_exists(&self.students, student_id)?;
        }
        Ok(())
    }
}

impl SubjectRepository for SchoolRepository {
    fn list_subjects(&self) -> Vec<Subject> {
        self.subjects.clone()
    }

    fn list_active_subjects(&self) -> Vec<Subject> {
        self.subjects
            .iter()
            .filter(|subject| subject.is_active)
            .cloned()
            .collect()
    }

    fn get_subject(&self, id: &str) -> Option<Subject> {
        find(&self.subjects, id).cloned()
    }

    fn add_subject(&mut self, subject: Subject) -> RepoResult<Subject> {
        const EVENT: &str = "subject_add";
        subject
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        ensure_unique(&self.subjects, &subject.id).map_err(|err| rejected(EVENT, err))?;

        self.subjects.push(subject.clone());
        info!("event={EVENT} module=repo status=ok id={}", subject.id);
        Ok(subject)
    }

    fn update_subject(&mut self, id: &str, patch: SubjectPatch) -> RepoResult<Option<Subject>> {
        const EVENT: &str = "subject_update";
        let Some(index) = position(&self.subjects, id) else {
            return Ok(None);
        };

        let mut updated = self.subjects[index].clone();
        patch.apply(&mut updated);
        updated
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;

        self.subjects[index] = updated.clone();
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(Some(updated))
    }

    fn delete_subject(&mut self, id: &str) -> RepoResult<bool> {
        const EVENT: &str = "subject_delete";
        if find(&self.subjects, id).is_none() {
            return Ok(false);
        }
        let referrer = if self.classes.iter().any(|class| class.subject_id == id) {
            Some(Class::KIND)
        } else if self
            .assignments
            .iter()
            .any(|assignment| assignment.subject_id == id)
        {
            Some("Assignment")
        } else {
            None
        };
        if let Some(by) = referrer {
            return Err(rejected(
                EVENT,
                RepoError::InUse {
                    entity: Subject::KIND,
                    id: id.to_string(),
                    by,
                },
            ));
        }

        remove_by_id(&mut self.subjects, id);
        for teacher in &mut self.teachers {
            teacher.subjects.retain(|subject_id| subject_id != id);
        }
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(true)
    }
}

impl ClassRepository for SchoolRepository {
    fn list_classes(&self) -> Vec<Class> {
        self.classes.clone()
    }

    fn get_class(&self, id: &str) -> Option<Class> {
        find(&self.classes, id).cloned()
    }

    fn get_classes_by_teacher(&self, teacher_id: &str) -> Vec<Class> {
        self.classes
            .iter()
            .filter(|class| class.teacher_id == teacher_id)
            .cloned()
            .collect()
    }

    fn get_classes_by_student(&self, student_id: &str) -> Vec<Class> {
        self.classes
            .iter()
            .filter(|class| class.is_enrolled(student_id))
            .cloned()
            .collect()
    }

    fn get_class_students(&self, class_id: &str) -> Vec<Student> {
        let Some(class) = find(&self.classes, class_id) else {
            return Vec::new();
        };
        class
            .enrolled_students
            .iter()
            .filter_map(|student_id| find(&self.students, student_id).cloned())
            .collect()
    }

    fn add_class(&mut self, class: Class) -> RepoResult<Class> {
        const EVENT: &str = "class_add";
        class.validate().map_err(|err| rejected(EVENT, err.into()))?;
        ensure_unique(&self.classes, &class.id).map_err(|err| rejected(EVENT, err))?;
        self.check_class_references(&class)
            .map_err(|err| rejected(EVENT, err))?;

        self.classes.push(class.clone());
        info!(
            "event={EVENT} module=repo status=ok id={} enrolled={}",
            class.id,
            class.enrolled_students.len()
        );
        Ok(class)
    }

    fn update_class(&mut self, id: &str, patch: ClassPatch) -> RepoResult<Option<Class>> {
        const EVENT: &str = "class_update";
        let Some(index) = position(&self.classes, id) else {
            return Ok(None);
        };

        let mut updated = self.classes[index].clone();
        patch.apply(&mut updated);
        updated
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        self.check_class_references(&updated)
            .map_err(|err| rejected(EVENT, err))?;
        let stray = self.assignments.iter().find(|assignment| {
            assignment.class_id == id && assignment.subject_id != updated.subject_id
        });
        if let Some(assignment) = stray {
            let err = RepoError::SubjectMismatch {
                class_id: id.to_string(),
                subject_id: assignment.subject_id.clone(),
            };
            return Err(rejected(EVENT, err));
        }

        self.classes[index] = updated.clone();
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(Some(updated))
    }

    fn delete_class(&mut self, id: &str) -> RepoResult<bool> {
        const EVENT: &str = "class_delete";
        if find(&self.classes, id).is_none() {
            return Ok(false);
        }
        if self
            .assignments
            .iter()
            .any(|assignment| assignment.class_id == id)
        {
            return Err(rejected(
                EVENT,
                RepoError::InUse {
                    entity: Class::KIND,
                    id: id.to_string(),
                    by: "Assignment",
                },
            ));
        }

        remove_by_id(&mut self.classes, id);
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(true)
    }

    fn enroll_student(&mut self, class_id: &str, student_id: &str) -> RepoResult<bool> {
        const EVENT: &str = "class_enroll";
        if find(&self.students, student_id).is_none() {
            return Err(rejected(
                EVENT,
                RepoError::NotFound {
                    entity: Student::KIND,
                    id: student_id.to_string(),
                },
            ));
        }
        let Some(index) = position(&self.classes, class_id) else {
            return Err(rejected(
                EVENT,
                RepoError::NotFound {
                    entity: Class::KIND,
                    id: class_id.to_string(),
                },
            ));
        };

        let class = &mut self.classes[index];
        if class.is_enrolled(student_id) {
            return Ok(false);
        }
        if class.is_full() {
            let err = RepoError::ClassFull {
                class_id: class_id.to_string(),
                max_students: class.max_students,
            };
            return Err(rejected(EVENT, err));
        }

        class.enrolled_students.push(student_id.to_string());
        info!(
            "event={EVENT} module=repo status=ok class_id={class_id} student_id={student_id} enrolled={}",
            class.enrolled_students.len()
        );
        Ok(true)
    }

    fn unenroll_student(&mut self, class_id: &str, student_id: &str) -> bool {
        let Some(index) = position(&self.classes, class_id) else {
            return false;
        };
        let roster = &mut self.classes[index].enrolled_students;
        let before = roster.len();
        roster.retain(|id| id != student_id);
        let removed = roster.len() != before;
        if removed {
            info!(
                "event=class_unenroll module=repo status=ok class_id={class_id} student_id={student_id}"
            );
        }
        removed
    }
}
