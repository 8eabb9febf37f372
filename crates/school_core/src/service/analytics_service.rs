//! Grade analytics use-case service.
//!
//! # Responsibility
//! - Aggregate stored grades into dashboard figures: averages, letter
//!   distribution, per-subject performance, daily trend and student
//!   rankings.
//!
//! # Invariants
//! - Averages are means of stored (rounded) percentages; empty input
//!   yields `0`.
//! - Grades whose assignment, subject or student no longer resolves are
//!   skipped in the breakdowns that need them, never treated as errors.
//! - Rankings are stable: ties keep first-seen order.

use crate::clock::{epoch_day, format_date, MILLIS_PER_DAY};
use crate::grading::LetterGrade;
use crate::model::assessment::{Assignment, Grade};
use crate::repo::SchoolStore;
use serde::Serialize;
use std::collections::BTreeMap;

/// Window of the recent-trend breakdown.
pub const TREND_WINDOW_DAYS: i64 = 30;
/// Maximum entries in each student ranking.
pub const RANKING_LIMIT: usize = 5;
/// Students averaging below this need attention.
pub const IMPROVEMENT_THRESHOLD: f64 = 70.0;

/// Which grades an analytics run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeScope<'a> {
    All,
    Student(&'a str),
    /// Grades on assignments created by this teacher.
    Teacher(&'a str),
    /// Grades on assignments of this class.
    Class(&'a str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub subject: String,
    pub average: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// UTC day, `YYYY-MM-DD`.
    pub date: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPerformance {
    pub student_id: String,
    pub name: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeAnalytics {
    pub total_grades: usize,
    pub average: f64,
    pub distribution: BTreeMap<LetterGrade, usize>,
    /// Sorted by average, best first.
    pub subject_performance: Vec<SubjectPerformance>,
    /// Ascending by day.
    pub recent_trend: Vec<TrendPoint>,
    /// Empty for single-student scopes.
    pub top_performers: Vec<StudentPerformance>,
    /// Empty for single-student scopes.
    pub improvement_needed: Vec<StudentPerformance>,
}

/// Submission figures for one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStats {
    pub submitted: usize,
    /// Students enrolled in the assignment's class.
    pub total: usize,
    /// Rounded mean percentage of submitted grades.
    pub average: u32,
}

pub struct AnalyticsService<'repo, R: SchoolStore> {
    repo: &'repo R,
}

impl<'repo, R: SchoolStore> AnalyticsService<'repo, R> {
    pub fn new(repo: &'repo R) -> Self {
        Self { repo }
    }

    /// Collects the grades covered by `scope`.
    pub fn grades_in_scope(&self, scope: GradeScope<'_>) -> Vec<Grade> {
        match scope {
            GradeScope::All => self.repo.list_grades(),
            GradeScope::Student(student_id) => self.repo.get_grades_by_student(student_id),
            GradeScope::Teacher(teacher_id) => {
                self.grades_for(self.repo.get_assignments_by_teacher(teacher_id))
            }
            GradeScope::Class(class_id) => {
                if self.repo.get_class(class_id).is_none() {
                    return Vec::new();
                }
                self.grades_for(self.repo.get_assignments_by_class(class_id))
            }
        }
    }

    fn grades_for(&self, assignments: Vec<Assignment>) -> Vec<Grade> {
        assignments
            .iter()
            .flat_map(|assignment| self.repo.get_grades_by_assignment(&assignment.id))
            .collect()
    }

    /// Computes every dashboard figure for `scope`; `now` anchors the
    /// recent-trend window.
    pub fn grade_analytics(&self, scope: GradeScope<'_>, now: i64) -> GradeAnalytics {
        let grades = self.grades_in_scope(scope);
        let percentages: Vec<u32> = grades.iter().map(|grade| grade.percentage).collect();

        let mut distribution = BTreeMap::new();
        for grade in &grades {
            *distribution.entry(grade.letter).or_insert(0) += 1;
        }

        let (top_performers, improvement_needed) = match scope {
            GradeScope::Student(_) => (Vec::new(), Vec::new()),
            _ => self.rankings(&grades),
        };

        GradeAnalytics {
            total_grades: grades.len(),
            average: mean(&percentages),
            distribution,
            subject_performance: self.subject_performance(&grades),
            recent_trend: recent_trend(&grades, now),
            top_performers,
            improvement_needed,
        }
    }

    fn subject_performance(&self, grades: &[Grade]) -> Vec<SubjectPerformance> {
        let mut by_subject: Vec<(String, Vec<u32>)> = Vec::new();
        for grade in grades {
            let subject = self
                .repo
                .get_assignment(&grade.assignment_id)
                .and_then(|assignment| self.repo.get_subject(&assignment.subject_id));
            if let Some(subject) = subject {
                push_grouped(&mut by_subject, subject.name, grade.percentage);
            }
        }

        let mut performance: Vec<SubjectPerformance> = by_subject
            .into_iter()
            .map(|(subject, values)| SubjectPerformance {
                subject,
                average: mean(&values),
                count: values.len(),
            })
            .collect();
        performance.sort_by(|a, b| b.average.total_cmp(&a.average));
        performance
    }

    fn rankings(&self, grades: &[Grade]) -> (Vec<StudentPerformance>, Vec<StudentPerformance>) {
        let mut by_student: Vec<(String, Vec<u32>)> = Vec::new();
        for grade in grades {
            push_grouped(&mut by_student, grade.student_id.clone(), grade.percentage);
        }

        let performance: Vec<StudentPerformance> = by_student
            .into_iter()
            .filter_map(|(student_id, values)| {
                let student = self.repo.get_student(&student_id)?;
                Some(StudentPerformance {
                    student_id,
                    name: student.account.full_name(),
                    average: mean(&values),
                })
            })
            .collect();

        let mut top = performance.clone();
        top.sort_by(|a, b| b.average.total_cmp(&a.average));
        top.truncate(RANKING_LIMIT);

        let mut struggling: Vec<StudentPerformance> = performance
            .into_iter()
            .filter(|entry| entry.average < IMPROVEMENT_THRESHOLD)
            .collect();
        struggling.sort_by(|a, b| a.average.total_cmp(&b.average));
        struggling.truncate(RANKING_LIMIT);

        (top, struggling)
    }

    /// Rounded mean percentage across a student's grades; `0` when none.
    pub fn student_average(&self, student_id: &str) -> u32 {
        let percentages: Vec<u32> = self
            .repo
            .get_grades_by_student(student_id)
            .iter()
            .map(|grade| grade.percentage)
            .collect();
        mean(&percentages).round() as u32
    }

    /// Assignments of the student's classes due after `now`, soonest first.
    pub fn upcoming_assignments(
        &self,
        student_id: &str,
        now: i64,
        limit: usize,
    ) -> Vec<Assignment> {
        let mut upcoming: Vec<Assignment> = self
            .repo
            .get_classes_by_student(student_id)
            .iter()
            .flat_map(|class| self.repo.get_assignments_by_class(&class.id))
            .filter(|assignment| assignment.due_date > now)
            .collect();
        upcoming.sort_by_key(|assignment| assignment.due_date);
        upcoming.truncate(limit);
        upcoming
    }

    /// Submission counts for one assignment; `None` when it does not exist.
    pub fn assignment_stats(&self, assignment_id: &str) -> Option<AssignmentStats> {
        let assignment = self.repo.get_assignment(assignment_id)?;
        let percentages: Vec<u32> = self
            .repo
            .get_grades_by_assignment(assignment_id)
            .iter()
            .map(|grade| grade.percentage)
            .collect();
        let total = self
            .repo
            .get_class(&assignment.class_id)
            .map(|class| class.enrolled_students.len())
            .unwrap_or(0);

        Some(AssignmentStats {
            submitted: percentages.len(),
            total,
            average: mean(&percentages).round() as u32,
        })
    }
}

fn recent_trend(grades: &[Grade], now: i64) -> Vec<TrendPoint> {
    let window_start = now - TREND_WINDOW_DAYS * MILLIS_PER_DAY;
    let mut by_day: BTreeMap<i64, Vec<u32>> = BTreeMap::new();
    for grade in grades.iter().filter(|grade| grade.graded_at >= window_start) {
        by_day
            .entry(epoch_day(grade.graded_at))
            .or_default()
            .push(grade.percentage);
    }

    by_day
        .into_iter()
        .map(|(day, values)| TrendPoint {
            date: format_date(day * MILLIS_PER_DAY),
            average: mean(&values),
        })
        .collect()
}

/// Appends `value` under `key`, keeping keys in first-seen order.
fn push_grouped(groups: &mut Vec<(String, Vec<u32>)>, key: String, value: u32) {
    match groups.iter_mut().find(|(existing, _)| *existing == key) {
        Some((_, values)) => values.push(value),
        None => groups.push((key, vec![value])),
    }
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let total: u64 = values.iter().map(|value| u64::from(*value)).sum();
    total as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::{mean, push_grouped};

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[80, 90]), 85.0);
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let mut groups = Vec::new();
        push_grouped(&mut groups, "b".to_string(), 1);
        push_grouped(&mut groups, "a".to_string(), 2);
        push_grouped(&mut groups, "b".to_string(), 3);
        assert_eq!(
            groups,
            vec![("b".to_string(), vec![1, 3]), ("a".to_string(), vec![2])]
        );
    }
}
