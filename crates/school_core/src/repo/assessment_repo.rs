//! Assignment and grade repository contracts and in-memory implementation.
//!
//! # Invariants
//! - Assignments reference an existing class, subject and teacher, and
//!   carry the subject of their class.
//! - Grades reference an existing student and assignment.
//! - Grade percentage and letter are recomputed on every add/update.
//! - Deleting an assignment deletes its grades.

use super::store::{
    ensure_exists, ensure_unique, find, position, rejected, remove_by_id, SchoolRepository,
};
use super::{RepoError, RepoResult};
use crate::model::assessment::{
    Assignment, AssignmentPatch, Grade, GradePatch, NewAssignment, NewGrade,
};
use log::info;

pub trait AssignmentRepository {
    fn list_assignments(&self) -> Vec<Assignment>;
    fn get_assignment(&self, id: &str) -> Option<Assignment>;
    fn get_assignments_by_class(&self, class_id: &str) -> Vec<Assignment>;
    fn get_assignments_by_teacher(&self, teacher_id: &str) -> Vec<Assignment>;
    fn add_assignment(&mut self, assignment: NewAssignment) -> RepoResult<Assignment>;
    fn update_assignment(
        &mut self,
        id: &str,
        patch: AssignmentPatch,
    ) -> RepoResult<Option<Assignment>>;
    /// Removes the assignment together with its grades.
    fn delete_assignment(&mut self, id: &str) -> RepoResult<bool>;
}

pub trait GradeRepository {
    fn list_grades(&self) -> Vec<Grade>;
    fn get_grade(&self, id: &str) -> Option<Grade>;
    fn get_grades_by_student(&self, student_id: &str) -> Vec<Grade>;
    fn get_grades_by_assignment(&self, assignment_id: &str) -> Vec<Grade>;
    fn add_grade(&mut self, grade: NewGrade) -> RepoResult<Grade>;
    /// Merges the patch and recomputes percentage and letter.
    fn update_grade(&mut self, id: &str, patch: GradePatch) -> RepoResult<Option<Grade>>;
    fn delete_grade(&mut self, id: &str) -> RepoResult<bool>;
}

impl SchoolRepository {
    fn check_assignment_references(&self, assignment: &Assignment) -> RepoResult<()> {
        ensure_exists(&self.classes, &assignment.class_id)?;
        ensure_exists(&self.subjects, &assignment.subject_id)?;
        ensure_exists(&self.teachers, &assignment.teacher_id)?;
        let class_subject = find(&self.classes, &assignment.class_id)
            .map(|class| class.subject_id.as_str());
        if class_subject != Some(assignment.subject_id.as_str()) {
            return Err(RepoError::SubjectMismatch {
                class_id: assignment.class_id.clone(),
                subject_id: assignment.subject_id.clone(),
            });
        }
        Ok(())
    }

    fn check_grade_references(&self, grade: &Grade) -> RepoResult<()> {
        ensure_exists(&self.students, &grade.student_id)?;
        ensure_exists(&self.assignments, &grade.assignment_id)
    }
}

impl AssignmentRepository for SchoolRepository {
    fn list_assignments(&self) -> Vec<Assignment> {
        self.assignments.clone()
    }

    fn get_assignment(&self, id: &str) -> Option<Assignment> {
        find(&self.assignments, id).cloned()
    }

    fn get_assignments_by_class(&self, class_id: &str) -> Vec<Assignment> {
        self.assignments
            .iter()
            .filter(|assignment| assignment.class_id == class_id)
            .cloned()
            .collect()
    }

    fn get_assignments_by_teacher(&self, teacher_id: &str) -> Vec<Assignment> {
        self.assignments
            .iter()
            .filter(|assignment| assignment.teacher_id == teacher_id)
            .cloned()
            .collect()
    }

    fn add_assignment(&mut self, assignment: NewAssignment) -> RepoResult<Assignment> {
        const EVENT: &str = "assignment_add";
        let assignment = assignment.into_assignment(self.now());
        assignment
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        ensure_unique(&self.assignments, &assignment.id).map_err(|err| rejected(EVENT, err))?;
        self.check_assignment_references(&assignment)
            .map_err(|err| rejected(EVENT, err))?;

        self.assignments.push(assignment.clone());
        info!(
            "event={EVENT} module=repo status=ok id={} class_id={}",
            assignment.id, assignment.class_id
        );
        Ok(assignment)
    }

    fn update_assignment(
        &mut self,
        id: &str,
        patch: AssignmentPatch,
    ) -> RepoResult<Option<Assignment>> {
        const EVENT: &str = "assignment_update";
        let Some(index) = position(&self.assignments, id) else {
            return Ok(None);
        };

        let mut updated = self.assignments[index].clone();
        patch.apply(&mut updated);
        updated
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        self.check_assignment_references(&updated)
            .map_err(|err| rejected(EVENT, err))?;

        self.assignments[index] = updated.clone();
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(Some(updated))
    }

    fn delete_assignment(&mut self, id: &str) -> RepoResult<bool> {
        if !remove_by_id(&mut self.assignments, id) {
            return Ok(false);
        }
        let grades_before = self.grades.len();
        self.grades.retain(|grade| grade.assignment_id != id);
        info!(
            "event=assignment_delete module=repo status=ok id={id} grades_removed={}",
            grades_before - self.grades.len()
        );
        Ok(true)
    }
}

impl GradeRepository for SchoolRepository {
    fn list_grades(&self) -> Vec<Grade> {
        self.grades.clone()
    }

    fn get_grade(&self, id: &str) -> Option<Grade> {
        find(&self.grades, id).cloned()
    }

    fn get_grades_by_student(&self, student_id: &str) -> Vec<Grade> {
        self.grades
            .iter()
            .filter(|grade| grade.student_id == student_id)
            .cloned()
            .collect()
    }

    fn get_grades_by_assignment(&self, assignment_id: &str) -> Vec<Grade> {
        self.grades
            .iter()
            .filter(|grade| grade.assignment_id == assignment_id)
            .cloned()
            .collect()
    }

    fn add_grade(&mut self, grade: NewGrade) -> RepoResult<Grade> {
        const EVENT: &str = "grade_add";
        let grade = grade
            .into_grade(self.now())
            .map_err(|err| rejected(EVENT, err.into()))?;
        grade.validate().map_err(|err| rejected(EVENT, err.into()))?;
        ensure_unique(&self.grades, &grade.id).map_err(|err| rejected(EVENT, err))?;
        self.check_grade_references(&grade)
            .map_err(|err| rejected(EVENT, err))?;

        self.grades.push(grade.clone());
        info!(
            "event={EVENT} module=repo status=ok id={} percentage={} letter={}",
            grade.id, grade.percentage, grade.letter
        );
        Ok(grade)
    }

    fn update_grade(&mut self, id: &str, patch: GradePatch) -> RepoResult<Option<Grade>> {
        const EVENT: &str = "grade_update";
        let Some(index) = position(&self.grades, id) else {
            return Ok(None);
        };

        let mut updated = self.grades[index].clone();
        patch
            .apply(&mut updated, self.now())
            .map_err(|err| rejected(EVENT, err.into()))?;
        updated
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;

        self.grades[index] = updated.clone();
        info!(
            "event={EVENT} module=repo status=ok id={id} percentage={} letter={}",
            updated.percentage, updated.letter
        );
        Ok(Some(updated))
    }

    fn delete_grade(&mut self, id: &str) -> RepoResult<bool> {
        let removed = remove_by_id(&mut self.grades, id);
        if removed {
            info!("event=grade_delete module=repo status=ok id={id}");
        }
        Ok(removed)
    }
}
