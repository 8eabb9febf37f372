//! Subject and class records.
//!
//! # Invariants
//! - `Class.enrolled_students` holds unique student ids and never exceeds
//!   `max_students`.
//! - Schedule slots use `day_of_week` 0-6 (Sunday-Saturday) and
//!   zero-padded `HH:MM` times.

use super::{require_text, Entity, EntityId, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: EntityId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub credits: u32,
    pub department: String,
    /// Grade level the subject is offered at.
    pub grade: u8,
    pub is_active: bool,
}

impl Subject {
    pub fn new(
        id: impl Into<EntityId>,
        name: impl Into<String>,
        code: impl Into<String>,
        department: impl Into<String>,
        grade: u8,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            description: String::new(),
            credits: 1,
            department: department.into(),
            grade,
            is_active: true,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "id", &self.id)?;
        require_text(Self::KIND, "name", &self.name)?;
        require_text(Self::KIND, "code", &self.code)
    }
}

impl Entity for Subject {
    const KIND: &'static str = "Subject";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub credits: Option<u32>,
    pub department: Option<String>,
    pub grade: Option<u8>,
    pub is_active: Option<bool>,
}

impl SubjectPatch {
    pub(crate) fn apply(self, subject: &mut Subject) {
        if let Some(name) = self.name {
            subject.name = name;
        }
        if let Some(code) = self.code {
            subject.code = code;
        }
        if let Some(description) = self.description {
            subject.description = description;
        }
        if let Some(credits) = self.credits {
            subject.credits = credits;
        }
        if let Some(department) = self.department {
            subject.department = department;
        }
        if let Some(grade) = self.grade {
            subject.grade = grade;
        }
        if let Some(is_active) = self.is_active {
            subject.is_active = is_active;
        }
    }
}

/// One weekly meeting of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchedule {
    /// 0 = Sunday ... 6 = Saturday.
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
}

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

impl ClassSchedule {
    pub fn new(
        day_of_week: u8,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            day_of_week,
            start_time: start_time.into(),
            end_time: end_time.into(),
            room: room.into(),
        }
    }

    /// Short day name, or `"?"` for an out-of-range day.
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES
            .get(usize::from(self.day_of_week))
            .copied()
            .unwrap_or("?")
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.day_of_week > 6 {
            return Err(ValidationError::DayOfWeekOutOfRange(self.day_of_week));
        }
        // Zero-padded HH:MM compares correctly as text.
        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time.clone(),
                end: self.end_time.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: EntityId,
    pub name: String,
    pub grade: u8,
    pub section: String,
    pub teacher_id: EntityId,
    pub subject_id: EntityId,
    pub schedule: Vec<ClassSchedule>,
    pub max_students: u32,
    /// Student record ids, in enrollment order.
    pub enrolled_students: Vec<EntityId>,
    pub academic_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl Class {
    pub fn new(
        id: impl Into<EntityId>,
        name: impl Into<String>,
        teacher_id: impl Into<EntityId>,
        subject_id: impl Into<EntityId>,
        max_students: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade: 0,
            section: String::new(),
            teacher_id: teacher_id.into(),
            subject_id: subject_id.into(),
            schedule: Vec::new(),
            max_students,
            enrolled_students: Vec::new(),
            academic_year: String::new(),
            room: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.enrolled_students.len() >= self.max_students as usize
    }

    pub fn is_enrolled(&self, student_id: &str) -> bool {
        self.enrolled_students.iter().any(|id| id == student_id)
    }

    /// Renders the schedule as `"Mon 09:00-10:00 (R101), ..."`.
    pub fn schedule_summary(&self) -> String {
        self.schedule
            .iter()
            .map(|slot| {
                format!(
                    "{} {}-{} ({})",
                    slot.day_name(),
                    slot.start_time,
                    slot.end_time,
                    slot.room
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "id", &self.id)?;
        require_text(Self::KIND, "name", &self.name)?;
        if self.max_students == 0 {
            return Err(ValidationError::NonPositive {
                entity: Self::KIND,
                field: "max_students",
            });
        }
        for slot in &self.schedule {
            slot.validate()?;
        }

        let mut seen = HashSet::new();
        for student_id in &self.enrolled_students {
            if !seen.insert(student_id.as_str()) {
                return Err(ValidationError::DuplicateEnrollment(student_id.clone()));
            }
        }
        if self.enrolled_students.len() > self.max_students as usize {
            return Err(ValidationError::OverCapacity {
                enrolled: self.enrolled_students.len(),
                max: self.max_students,
            });
        }
        Ok(())
    }
}

impl Entity for Class {
    const KIND: &'static str = "Class";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial class update. Roster changes go through enrollment operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassPatch {
    pub name: Option<String>,
    pub grade: Option<u8>,
    pub section: Option<String>,
    pub teacher_id: Option<EntityId>,
    pub subject_id: Option<EntityId>,
    pub schedule: Option<Vec<ClassSchedule>>,
    pub max_students: Option<u32>,
    pub academic_year: Option<String>,
    pub room: Option<Option<String>>,
}

impl ClassPatch {
    pub(crate) fn apply(self, class: &mut Class) {
        if let Some(name) = self.name {
            class.name = name;
        }
        if let Some(grade) = self.grade {
            class.grade = grade;
        }
        if let Some(section) = self.section {
            class.section = section;
        }
        if let Some(teacher_id) = self.teacher_id {
            class.teacher_id = teacher_id;
        }
        if let Some(subject_id) = self.subject_id {
            class.subject_id = subject_id;
        }
        if let Some(schedule) = self.schedule {
            class.schedule = schedule;
        }
        if let Some(max_students) = self.max_students {
            class.max_students = max_students;
        }
        if let Some(academic_year) = self.academic_year {
            class.academic_year = academic_year;
        }
        if let Some(room) = self.room {
            class.room = room;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Class, ClassSchedule, ValidationError};

    #[test]
    fn validate_rejects_out_of_range_day() {
        let mut class = Class::new("c1", "Algebra", "t1", "sub1", 30);
        class.schedule.push(ClassSchedule::new(7, "09:00", "10:00", "R1"));
        assert_eq!(
            class.validate().unwrap_err(),
            ValidationError::DayOfWeekOutOfRange(7)
        );
    }

    #[test]
    fn validate_rejects_inverted_time_range() {
        let mut class = Class::new("c1", "Algebra", "t1", "sub1", 30);
        class.schedule.push(ClassSchedule::new(1, "10:00", "09:00", "R1"));
        assert!(matches!(
            class.validate().unwrap_err(),
            ValidationError::InvalidTimeRange { .. }
        ));
    }

    #[test]
    fn validate_rejects_roster_over_capacity_and_duplicates() {
        let mut class = Class::new("c1", "Algebra", "t1", "sub1", 1);
        class.enrolled_students = vec!["s1".to_string(), "s2".to_string()];
        assert_eq!(
            class.validate().unwrap_err(),
            ValidationError::OverCapacity {
                enrolled: 2,
                max: 1
            }
        );

        class.max_students = 5;
        class.enrolled_students = vec!["s1".to_string(), "s1".to_string()];
        assert_eq!(
            class.validate().unwrap_err(),
            ValidationError::DuplicateEnrollment("s1".to_string())
        );
    }

    #[test]
    fn schedule_summary_lists_slots_in_order() {
        let mut class = Class::new("c1", "Algebra", "t1", "sub1", 30);
        class.schedule.push(ClassSchedule::new(1, "09:00", "10:00", "R1"));
        class.schedule.push(ClassSchedule::new(3, "11:00", "12:00", "R2"));
        assert_eq!(
            class.schedule_summary(),
            "Mon 09:00-10:00 (R1), Wed 11:00-12:00 (R2)"
        );
    }
}
