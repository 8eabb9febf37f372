//! Assignment and grade records.
//!
//! # Invariants
//! - `Grade.percentage` and `Grade.letter` are derived from the raw marks
//!   by `grading::compute` and are only set through the repository.

use super::{require_text, Entity, EntityId, ValidationError};
use crate::grading::{self, GradeError, LetterGrade};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    Homework,
    Quiz,
    Exam,
    Project,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub subject_id: EntityId,
    pub teacher_id: EntityId,
    pub class_id: EntityId,
    pub due_date: i64,
    pub max_marks: f64,
    #[serde(rename = "type")]
    pub kind: AssignmentType,
    pub created_at: i64,
}

impl Assignment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "id", &self.id)?;
        require_text(Self::KIND, "title", &self.title)?;
        if !self.max_marks.is_finite() || self.max_marks <= 0.0 {
            return Err(ValidationError::NonPositive {
                entity: Self::KIND,
                field: "max_marks",
            });
        }
        Ok(())
    }
}

impl Entity for Assignment {
    const KIND: &'static str = "Assignment";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for `add_assignment`; `created_at` is stamped on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub subject_id: EntityId,
    pub teacher_id: EntityId,
    pub class_id: EntityId,
    pub due_date: i64,
    pub max_marks: f64,
    pub kind: AssignmentType,
}

impl NewAssignment {
    pub(crate) fn into_assignment(self, now: i64) -> Assignment {
        Assignment {
            id: self.id,
            title: self.title,
            description: self.description,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            class_id: self.class_id,
            due_date: self.due_date,
            max_marks: self.max_marks,
            kind: self.kind,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject_id: Option<EntityId>,
    pub teacher_id: Option<EntityId>,
    pub class_id: Option<EntityId>,
    pub due_date: Option<i64>,
    pub max_marks: Option<f64>,
    pub kind: Option<AssignmentType>,
}

impl AssignmentPatch {
    pub(crate) fn apply(self, assignment: &mut Assignment) {
        if let Some(title) = self.title {
            assignment.title = title;
        }
        if let Some(description) = self.description {
            assignment.description = description;
        }
        if let Some(subject_id) = self.subject_id {
            assignment.subject_id = subject_id;
        }
        if let Some(teacher_id) = self.teacher_id {
            assignment.teacher_id = teacher_id;
        }
        if let Some(class_id) = self.class_id {
            assignment.class_id = class_id;
        }
        if let Some(due_date) = self.due_date {
            assignment.due_date = due_date;
        }
        if let Some(max_marks) = self.max_marks {
            assignment.max_marks = max_marks;
        }
        if let Some(kind) = self.kind {
            assignment.kind = kind;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: EntityId,
    pub student_id: EntityId,
    pub assignment_id: EntityId,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub percentage: u32,
    #[serde(rename = "grade")]
    pub letter: LetterGrade,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<i64>,
    pub graded_at: i64,
    /// Teacher record id.
    pub graded_by: EntityId,
}

impl Grade {
    /// Re-derives `percentage` and `letter` from the current raw marks.
    pub(crate) fn recompute(&mut self) -> Result<(), GradeError> {
        let score = grading::compute(self.marks_obtained, self.max_marks)?;
        self.percentage = score.percentage;
        self.letter = score.letter;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "id", &self.id)?;
        require_text(Self::KIND, "graded_by", &self.graded_by)
    }
}

impl Entity for Grade {
    const KIND: &'static str = "Grade";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for `add_grade`; derived fields and `graded_at` are filled in on
/// insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGrade {
    pub id: EntityId,
    pub student_id: EntityId,
    pub assignment_id: EntityId,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub feedback: Option<String>,
    pub submitted_at: Option<i64>,
    pub graded_by: EntityId,
}

impl NewGrade {
    pub fn new(
        id: impl Into<EntityId>,
        student_id: impl Into<EntityId>,
        assignment_id: impl Into<EntityId>,
        marks_obtained: f64,
        max_marks: f64,
        graded_by: impl Into<EntityId>,
    ) -> Self {
        Self {
            id: id.into(),
            student_id: student_id.into(),
            assignment_id: assignment_id.into(),
            marks_obtained,
            max_marks,
            feedback: None,
            submitted_at: None,
            graded_by: graded_by.into(),
        }
    }

    pub(crate) fn into_grade(self, now: i64) -> Result<Grade, GradeError> {
        let score = grading::compute(self.marks_obtained, self.max_marks)?;
        Ok(Grade {
            id: self.id,
            student_id: self.student_id,
            assignment_id: self.assignment_id,
            marks_obtained: self.marks_obtained,
            max_marks: self.max_marks,
            percentage: score.percentage,
            letter: score.letter,
            feedback: self.feedback,
            submitted_at: self.submitted_at,
            graded_at: now,
            graded_by: self.graded_by,
        })
    }
}

/// Partial grade update. Derived fields are always recomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradePatch {
    pub marks_obtained: Option<f64>,
    pub max_marks: Option<f64>,
    pub feedback: Option<Option<String>>,
    pub graded_by: Option<EntityId>,
}

impl GradePatch {
    pub(crate) fn apply(self, grade: &mut Grade, now: i64) -> Result<(), GradeError> {
        if let Some(marks_obtained) = self.marks_obtained {
            grade.marks_obtained = marks_obtained;
        }
        if let Some(max_marks) = self.max_marks {
            grade.max_marks = max_marks;
        }
        if let Some(feedback) = self.feedback {
            grade.feedback = feedback;
        }
        if let Some(graded_by) = self.graded_by {
            grade.graded_by = graded_by;
        }
        grade.graded_at = now;
        grade.recompute()
    }
}

#[cfg(test)]
mod tests {
    use super::{GradePatch, NewGrade};
    use crate::grading::LetterGrade;

    #[test]
    fn new_grade_derives_score() {
        let grade = NewGrade::new("g1", "s1", "a1", 42.0, 50.0, "t1")
            .into_grade(10)
            .unwrap();
        assert_eq!(grade.percentage, 84);
        assert_eq!(grade.letter, LetterGrade::AMinus);
        assert_eq!(grade.graded_at, 10);
    }

    #[test]
    fn patch_recomputes_after_max_marks_change() {
        let mut grade = NewGrade::new("g1", "s1", "a1", 45.0, 50.0, "t1")
            .into_grade(10)
            .unwrap();
        assert_eq!(grade.letter, LetterGrade::APlus);

        GradePatch {
            max_marks: Some(100.0),
            ..GradePatch::default()
        }
        .apply(&mut grade, 20)
        .unwrap();

        assert_eq!(grade.percentage, 45);
        assert_eq!(grade.letter, LetterGrade::F);
        assert_eq!(grade.graded_at, 20);
    }

    #[test]
    fn grade_json_uses_external_field_names() {
        let grade = NewGrade::new("g1", "s1", "a1", 30.0, 40.0, "t1")
            .into_grade(10)
            .unwrap();
        let value = serde_json::to_value(&grade).unwrap();
        assert_eq!(value["grade"], "B+");
        assert_eq!(value["marksObtained"], 30.0);
        assert!(value.get("feedback").is_none());
    }
}
