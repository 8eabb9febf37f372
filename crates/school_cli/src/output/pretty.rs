//! Pretty output formatting.

use school_core::clock::format_date;
use school_core::{Class, GradeAnalytics, Notification, Student, User};

const RULE_WIDTH: usize = 40;

fn heading(title: &str, count: usize) -> String {
    format!("{title} ({count})\n{}", "-".repeat(RULE_WIDTH))
}

/// Format the signed-in user.
pub fn format_user(user: &User) -> String {
    let account = user.account();
    format!(
        "{} ({})\n  ID: {}\n  Email: {}",
        user.full_name(),
        user.role(),
        account.id,
        account.email
    )
}

pub fn format_students(students: &[Student]) -> String {
    if students.is_empty() {
        return "No students found.".to_string();
    }
    let mut output = heading("STUDENTS", students.len());
    for student in students {
        output.push_str(&format!(
            "\n{}  {}  Grade {}{}  {}",
            student.student_id,
            student.account.full_name(),
            student.grade,
            student.section,
            student.account.email
        ));
    }
    output
}

pub fn format_classes(classes: &[Class]) -> String {
    if classes.is_empty() {
        return "No classes found.".to_string();
    }
    let mut output = heading("CLASSES", classes.len());
    for class in classes {
        output.push_str(&format!(
            "\n{}\n  ID: {}\n  Enrolled: {}/{}",
            class.name,
            class.id,
            class.enrolled_students.len(),
            class.max_students
        ));
        if !class.schedule.is_empty() {
            output.push_str(&format!("\n  Schedule: {}", class.schedule_summary()));
        }
    }
    output
}

pub fn format_analytics(analytics: &GradeAnalytics) -> String {
    if analytics.total_grades == 0 {
        return "No grades recorded.".to_string();
    }
    let mut output = format!(
        "GRADES ({})\n{}\nAverage: {:.1}%",
        analytics.total_grades,
        "-".repeat(RULE_WIDTH),
        analytics.average
    );

    output.push_str("\nDistribution:");
    for (letter, count) in &analytics.distribution {
        output.push_str(&format!(" {letter}={count}"));
    }

    if !analytics.subject_performance.is_empty() {
        output.push_str("\nBy subject:");
        for entry in &analytics.subject_performance {
            output.push_str(&format!(
                "\n  {}: {:.1}% ({} grades)",
                entry.subject, entry.average, entry.count
            ));
        }
    }
    if !analytics.top_performers.is_empty() {
        output.push_str("\nTop performers:");
        for entry in &analytics.top_performers {
            output.push_str(&format!("\n  {}: {:.1}%", entry.name, entry.average));
        }
    }
    if !analytics.improvement_needed.is_empty() {
        output.push_str("\nNeeds improvement:");
        for entry in &analytics.improvement_needed {
            output.push_str(&format!("\n  {}: {:.1}%", entry.name, entry.average));
        }
    }
    output
}

pub fn format_notifications(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications.".to_string();
    }
    let mut output = heading("NOTIFICATIONS", notifications.len());
    for notification in notifications {
        let marker = if notification.is_read { " " } else { "*" };
        output.push_str(&format!(
            "\n{marker} {}  {}\n    {}",
            format_date(notification.created_at),
            notification.title,
            notification.message
        ));
    }
    output
}
