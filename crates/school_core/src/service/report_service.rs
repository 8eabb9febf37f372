//! Printable report data.
//!
//! # Responsibility
//! - Assemble the four dashboard reports (student transcript, class list,
//!   class grade report, school overview) as titled key/value lines and
//!   string tables.
//! - Leave layout to the caller: `render_text` is a plain fallback and
//!   `to_json` feeds external document renderers.
//!
//! # Invariants
//! - References that no longer resolve render as `"Unknown"`; they never
//!   abort a report.
//! - Every table row has as many cells as the table head.

use crate::clock::{format_date, now_epoch_ms, Clock};
use crate::model::academic::Class;
use crate::model::assessment::Grade;
use crate::repo::SchoolStore;
use serde::Serialize;
use std::collections::BTreeMap;

/// Heading printed above every report.
pub const REPORT_HEADER: &str = "School Management System";

const UNKNOWN: &str = "Unknown";

/// A column-oriented table of pre-formatted cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub head: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    fn new(head: &[&str]) -> Self {
        Self {
            head: head.iter().map(|cell| cell.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.head.len());
        self.rows.push(row);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub heading: String,
    /// `(label, value)` pairs printed as `label: value`.
    pub lines: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<ReportTable>,
}

impl ReportSection {
    fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            lines: Vec::new(),
            table: None,
        }
    }

    fn line(mut self, label: &str, value: impl Into<String>) -> Self {
        self.lines.push((label.to_string(), value.into()));
        self
    }

    fn with_table(mut self, table: ReportTable) -> Self {
        self.table = Some(table);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub title: String,
    pub generated_at: i64,
    /// Suggested output file name without extension.
    pub file_stem: String,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Renders the report as aligned plain text.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(REPORT_HEADER);
        out.push('\n');
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&format!("Generated on: {}\n", format_date(self.generated_at)));

        for section in &self.sections {
            out.push('\n');
            out.push_str(&section.heading);
            out.push('\n');
            for (label, value) in &section.lines {
                out.push_str(&format!("  {label}: {value}\n"));
            }
            if let Some(table) = &section.table {
                render_table(&mut out, table);
            }
        }
        out
    }
}

fn render_table(out: &mut String, table: &ReportTable) {
    let mut widths: Vec<usize> = table.head.iter().map(|cell| cell.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut push_row = |cells: &[String]| {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect();
        out.push_str("  ");
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };
    push_row(table.head.as_slice());
    for row in &table.rows {
        push_row(row.as_slice());
    }
}

/// Coarse letter used on class grade reports.
fn coarse_letter(average: f64) -> &'static str {
    match average {
        value if value >= 90.0 => "A",
        value if value >= 80.0 => "B",
        value if value >= 70.0 => "C",
        value if value >= 60.0 => "D",
        _ => "F",
    }
}

/// Formats marks without a trailing `.0` for whole values.
fn format_marks(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn file_stem(parts: &[&str]) -> String {
    parts
        .join("_")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

pub struct ReportService<'repo, R: SchoolStore> {
    repo: &'repo R,
    clock: Clock,
}

impl<'repo, R: SchoolStore> ReportService<'repo, R> {
    pub fn new(repo: &'repo R) -> Self {
        Self::with_clock(repo, now_epoch_ms)
    }

    /// Uses `clock` to stamp `generated_at`.
    pub fn with_clock(repo: &'repo R, clock: Clock) -> Self {
        Self { repo, clock }
    }

    fn report(&self, title: String, file_stem: String, sections: Vec<ReportSection>) -> Report {
        Report {
            title,
            generated_at: (self.clock)(),
            file_stem,
            sections,
        }
    }

    fn subject_name(&self, subject_id: &str) -> String {
        self.repo
            .get_subject(subject_id)
            .map(|subject| subject.name)
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    fn teacher_name(&self, teacher_id: &str) -> String {
        self.repo
            .get_teacher(teacher_id)
            .map(|teacher| teacher.account.full_name())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Transcript of every grade a student holds; `None` for unknown ids.
    pub fn student_transcript(&self, student_id: &str) -> Option<Report> {
        let student = self.repo.get_student(student_id)?;
        let name = student.account.full_name();

        let info = ReportSection::new("Student Information")
            .line("Name", name.clone())
            .line("Student ID", student.student_id.clone())
            .line("Email", student.account.email.clone())
            .line("Grade Level", student.grade.to_string())
            .line("Section", student.section.clone())
            .line("Enrollment Date", format_date(student.enrollment_date));
        let mut sections = vec![info];

        let grades = self.repo.get_grades_by_student(student_id);
        if !grades.is_empty() {
            let mut table = ReportTable::new(&["Subject", "Assignment", "Score", "Grade", "Date"]);
            for grade in &grades {
                let assignment = self.repo.get_assignment(&grade.assignment_id);
                let subject = assignment
                    .as_ref()
                    .map(|assignment| self.subject_name(&assignment.subject_id))
                    .unwrap_or_else(|| UNKNOWN.to_string());
                let title = assignment
                    .map(|assignment| assignment.title)
                    .unwrap_or_else(|| UNKNOWN.to_string());
                table.push(vec![
                    subject,
                    title,
                    format!(
                        "{}/{}",
                        format_marks(grade.marks_obtained),
                        format_marks(grade.max_marks)
                    ),
                    grade.letter.to_string(),
                    format_date(grade.graded_at),
                ]);
            }
            sections.push(ReportSection::new("Academic Record").with_table(table));
        }

        Some(self.report(
            format!("Student Transcript - {name}"),
            file_stem(&[
                student.account.first_name.as_str(),
                student.account.last_name.as_str(),
                "Transcript",
            ]),
            sections,
        ))
    }

    fn class_info(&self, class: &Class, subject: &str) -> ReportSection {
        let schedule = if class.schedule.is_empty() {
            "None".to_string()
        } else {
            class.schedule_summary()
        };
        ReportSection::new("Class Information")
            .line("Class", class.name.clone())
            .line("Subject", subject)
            .line("Teacher", self.teacher_name(&class.teacher_id))
            .line("Schedule", schedule)
            .line("Room", class.room.clone().unwrap_or_else(|| "N/A".to_string()))
    }

    /// Roster of one class; `None` for unknown ids.
    pub fn class_list(&self, class_id: &str) -> Option<Report> {
        let class = self.repo.get_class(class_id)?;
        let subject = self.subject_name(&class.subject_id);
        let mut sections = vec![self.class_info(&class, &subject)];

        let students = self.repo.get_class_students(class_id);
        if !students.is_empty() {
            let mut table = ReportTable::new(&["#", "Name", "Email", "Grade Level"]);
            for (index, student) in students.iter().enumerate() {
                table.push(vec![
                    (index + 1).to_string(),
                    student.account.full_name(),
                    student.account.email.clone(),
                    student.grade.to_string(),
                ]);
            }
            sections.push(ReportSection::new("Enrolled Students").with_table(table));
        }

        Some(self.report(
            format!("Class List - {subject}"),
            file_stem(&[subject.as_str(), "Class_List"]),
            sections,
        ))
    }

    /// Per-student averages in the class subject; `None` for unknown ids.
    pub fn grade_report(&self, class_id: &str) -> Option<Report> {
        let class = self.repo.get_class(class_id)?;
        let subject = self.subject_name(&class.subject_id);
        let info = ReportSection::new("Class Information")
            .line("Class", class.name.clone())
            .line("Subject", subject.clone())
            .line("Teacher", self.teacher_name(&class.teacher_id));

        let mut table = ReportTable::new(&[
            "Student Name",
            "Assignments",
            "Average Score",
            "Letter Grade",
        ]);
        for student in self.repo.get_class_students(class_id) {
            let grades: Vec<Grade> = self
                .repo
                .get_grades_by_student(&student.account.id)
                .into_iter()
                .filter(|grade| {
                    self.repo
                        .get_assignment(&grade.assignment_id)
                        .is_some_and(|assignment| assignment.subject_id == class.subject_id)
                })
                .collect();
            let average = if grades.is_empty() {
                0.0
            } else {
                let total: f64 = grades.iter().map(|grade| f64::from(grade.percentage)).sum();
                total / grades.len() as f64
            };
            table.push(vec![
                student.account.full_name(),
                grades.len().to_string(),
                format!("{average:.1}%"),
                coarse_letter(average).to_string(),
            ]);
        }

        Some(self.report(
            format!("Grade Report - {subject}"),
            file_stem(&[subject.as_str(), "Grade_Report"]),
            vec![info, ReportSection::new("Grade Summary").with_table(table)],
        ))
    }

    /// School-wide counts and the student distribution by grade level.
    pub fn school_overview(&self) -> Report {
        let students = self.repo.list_students();
        let stats = ReportSection::new("School Statistics")
            .line("Total Students", students.len().to_string())
            .line("Total Teachers", self.repo.list_teachers().len().to_string())
            .line("Total Classes", self.repo.list_classes().len().to_string())
            .line("Total Subjects", self.repo.list_subjects().len().to_string());

        let mut by_grade: BTreeMap<u8, usize> = BTreeMap::new();
        for student in &students {
            *by_grade.entry(student.grade).or_insert(0) += 1;
        }
        let mut table = ReportTable::new(&["Grade Level", "Number of Students", "Percentage"]);
        for (grade, count) in by_grade {
            let share = count as f64 / students.len() as f64 * 100.0;
            table.push(vec![
                format!("Grade {grade}"),
                count.to_string(),
                format!("{share:.1}%"),
            ]);
        }

        self.report(
            "School Overview Report".to_string(),
            "School_Overview_Report".to_string(),
            vec![
                stats,
                ReportSection::new("Student Distribution by Grade Level").with_table(table),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{coarse_letter, file_stem, format_marks, Report, ReportSection, ReportTable};

    #[test]
    fn coarse_letter_steps_every_ten_points() {
        assert_eq!(coarse_letter(95.0), "A");
        assert_eq!(coarse_letter(90.0), "A");
        assert_eq!(coarse_letter(89.9), "B");
        assert_eq!(coarse_letter(70.0), "C");
        assert_eq!(coarse_letter(60.0), "D");
        assert_eq!(coarse_letter(0.0), "F");
    }

    #[test]
    fn marks_drop_trailing_zero() {
        assert_eq!(format_marks(45.0), "45");
        assert_eq!(format_marks(45.5), "45.5");
    }

    #[test]
    fn file_stem_replaces_spaces() {
        assert_eq!(file_stem(&["Computer Science", "Class_List"]), "Computer_Science_Class_List");
    }

    #[test]
    fn text_rendering_aligns_columns() {
        let mut table = ReportTable::new(&["#", "Name"]);
        table.push(vec!["1".to_string(), "Ada Lovelace".to_string()]);
        let report = Report {
            title: "Class List - Math".to_string(),
            generated_at: 0,
            file_stem: "Math_Class_List".to_string(),
            sections: vec![ReportSection::new("Enrolled Students")
                .line("Room", "R1")
                .with_table(table)],
        };

        let text = report.render_text();
        assert!(text.starts_with("School Management System\nClass List - Math\n"));
        assert!(text.contains("Generated on: 1970-01-01"));
        assert!(text.contains("  Room: R1\n"));
        assert!(text.contains("  #  Name\n  1  Ada Lovelace\n"));
    }
}
