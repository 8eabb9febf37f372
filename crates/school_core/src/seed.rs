//! Demo fixtures loaded by the composition root.
//!
//! Everything goes through the public repository operations, so seeded data
//! satisfies the same invariants as data added at runtime. Due dates are
//! relative to the repository clock so the demo always has both past and
//! upcoming assignments.
//!
//! Demo sign-ins: `admin@school.edu` / `admin123`,
//! `john.smith@school.edu` / `teacher123`, `alice.brown@school.edu` /
//! `student123`, `robert.brown@example.com` / `parent123`.

use crate::clock::MILLIS_PER_DAY;
use crate::model::academic::{Class, ClassSchedule, Subject};
use crate::model::assessment::{AssignmentType, NewAssignment, NewGrade};
use crate::model::notification::{NewNotification, NotificationKind};
use crate::model::user::{NewAccount, NewAdmin, NewParent, NewStudent, NewTeacher, UserRole};
use crate::repo::{
    AdminRepository, AssignmentRepository, ClassRepository, GradeRepository,
    NotificationRepository, ParentRepository, RepoResult, SchoolRepository, StudentRepository,
    SubjectRepository, TeacherRepository,
};
use log::info;

const ACADEMIC_YEAR: &str = "2024-2025";

fn days(count: i64) -> i64 {
    count * MILLIS_PER_DAY
}

/// Builds a store with wall-clock timestamps and the demo fixtures.
pub fn seeded_repository() -> RepoResult<SchoolRepository> {
    let mut repo = SchoolRepository::new();
    seed(&mut repo)?;
    Ok(repo)
}

/// Loads the demo fixtures into `repo`.
///
/// # Errors
/// Fails on the first rejected record, e.g. when `repo` already holds
/// records with the fixture ids.
pub fn seed(repo: &mut SchoolRepository) -> RepoResult<()> {
    seed_subjects(repo)?;
    seed_people(repo)?;
    seed_classes(repo)?;
    seed_coursework(repo)?;
    seed_notifications(repo)?;
    info!(
        "event=seed module=core status=ok students={} classes={} grades={}",
        repo.list_students().len(),
        repo.list_classes().len(),
        repo.list_grades().len()
    );
    Ok(())
}

fn seed_subjects(repo: &mut SchoolRepository) -> RepoResult<()> {
    let mut math = Subject::new("sub-math", "Mathematics", "MATH101", "Science", 10);
    math.description = "Algebra, geometry and introductory statistics".to_string();
    math.credits = 4;
    let mut english = Subject::new("sub-eng", "English Literature", "ENG101", "Humanities", 10);
    english.credits = 3;
    let mut physics = Subject::new("sub-phy", "Physics", "PHY101", "Science", 11);
    physics.credits = 4;
    let mut art = Subject::new("sub-art", "Art History", "ART101", "Humanities", 10);
    art.is_active = false;

    for subject in [math, english, physics, art] {
        repo.add_subject(subject)?;
    }
    Ok(())
}

fn seed_people(repo: &mut SchoolRepository) -> RepoResult<()> {
    let mut admin = NewAdmin::new(
        NewAccount::new("a-1", "admin@school.edu", "admin123", "Margaret", "Hale"),
        "ADM001",
    );
    admin.permissions = vec!["manage_users".to_string(), "manage_classes".to_string()];
    repo.add_admin(admin)?;

    let mut smith = NewTeacher::new(
        NewAccount::new("t-1", "john.smith@school.edu", "teacher123", "John", "Smith"),
        "TCH001",
        "Science",
    );
    smith.subjects = vec!["sub-math".to_string(), "sub-phy".to_string()];
    smith.qualification = "M.Sc. Mathematics".to_string();
    smith.experience = 8;
    smith.salary = Some(58_000.0);
    repo.add_teacher(smith)?;

    let mut johnson = NewTeacher::new(
        NewAccount::new("t-2", "sarah.johnson@school.edu", "teacher123", "Sarah", "Johnson"),
        "TCH002",
        "Humanities",
    );
    johnson.subjects = vec!["sub-eng".to_string()];
    johnson.qualification = "M.A. English".to_string();
    johnson.experience = 5;
    repo.add_teacher(johnson)?;

    let mut parent = NewParent::new(
        NewAccount::new("p-1", "robert.brown@example.com", "parent123", "Robert", "Brown"),
        "PAR001",
    );
    parent.occupation = Some("Engineer".to_string());
    repo.add_parent(parent)?;

    // 2009-03-14, 2009-07-02, 2008-11-20
    let students = [
        ("s-1", "alice.brown@school.edu", "Alice", "Brown", "STU001", 10, "A", 1_236_988_800_000),
        ("s-2", "bob.wilson@school.edu", "Bob", "Wilson", "STU002", 10, "A", 1_246_492_800_000),
        ("s-3", "carol.davis@school.edu", "Carol", "Davis", "STU003", 11, "B", 1_227_139_200_000),
    ];
    for (id, email, first, last, student_id, grade, section, born) in students {
        let mut student = NewStudent::new(
            NewAccount::new(id, email, "student123", first, last),
            student_id,
            grade,
            section,
        );
        student.date_of_birth = born;
        student.address = "12 School Lane".to_string();
        if id == "s-1" {
            student.parent_id = Some("p-1".to_string());
        }
        repo.add_student(student)?;
    }
    Ok(())
}

fn seed_classes(repo: &mut SchoolRepository) -> RepoResult<()> {
    let mut math = Class::new("c-1", "Grade 10 Mathematics A", "t-1", "sub-math", 30);
    math.grade = 10;
    math.section = "A".to_string();
    math.schedule = vec![
        ClassSchedule::new(1, "09:00", "10:00", "R101"),
        ClassSchedule::new(3, "09:00", "10:00", "R101"),
    ];
    math.room = Some("R101".to_string());

    let mut english = Class::new("c-2", "Grade 10 English A", "t-2", "sub-eng", 25);
    english.grade = 10;
    english.section = "A".to_string();
    english.schedule = vec![ClassSchedule::new(2, "11:00", "12:00", "R204")];
    english.room = Some("R204".to_string());

    let mut physics = Class::new("c-3", "Grade 11 Physics B", "t-1", "sub-phy", 20);
    physics.grade = 11;
    physics.section = "B".to_string();
    physics.schedule = vec![ClassSchedule::new(4, "13:00", "14:30", "Lab 1")];

    for mut class in [math, english, physics] {
        class.academic_year = ACADEMIC_YEAR.to_string();
        repo.add_class(class)?;
    }

    let rosters = [
        ("c-1", vec!["s-1", "s-2"]),
        ("c-2", vec!["s-1", "s-2", "s-3"]),
        ("c-3", vec!["s-3"]),
    ];
    for (class_id, students) in rosters {
        for student_id in students {
            repo.enroll_student(class_id, student_id)?;
        }
    }
    Ok(())
}

fn seed_coursework(repo: &mut SchoolRepository) -> RepoResult<()> {
    let now = repo.now();
    use AssignmentType::{Exam, Homework, Project, Quiz};
    let assignments = [
        ("as-1", "Algebra Quiz", "c-1", "sub-math", "t-1", -7, 50.0, Quiz),
        ("as-2", "Essay: Modern Poetry", "c-2", "sub-eng", "t-2", -3, 100.0, Homework),
        ("as-3", "Midterm Exam", "c-1", "sub-math", "t-1", 14, 100.0, Exam),
        ("as-4", "Pendulum Lab Report", "c-3", "sub-phy", "t-1", 5, 20.0, Project),
    ];
    for (id, title, class_id, subject_id, teacher_id, due_in_days, max_marks, kind) in assignments {
        repo.add_assignment(NewAssignment {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            subject_id: subject_id.to_string(),
            teacher_id: teacher_id.to_string(),
            class_id: class_id.to_string(),
            due_date: now + days(due_in_days),
            max_marks,
            kind,
        })?;
    }

    let grades = [
        ("g-1", "s-1", "as-1", 45.0, 50.0, "t-1"),
        ("g-2", "s-2", "as-1", 32.0, 50.0, "t-1"),
        ("g-3", "s-1", "as-2", 88.0, 100.0, "t-2"),
        ("g-4", "s-2", "as-2", 55.0, 100.0, "t-2"),
        ("g-5", "s-3", "as-2", 76.0, 100.0, "t-2"),
    ];
    for (id, student_id, assignment_id, marks, max_marks, graded_by) in grades {
        let mut grade = NewGrade::new(id, student_id, assignment_id, marks, max_marks, graded_by);
        grade.submitted_at = Some(now - days(4));
        repo.add_grade(grade)?;
    }
    Ok(())
}

fn seed_notifications(repo: &mut SchoolRepository) -> RepoResult<()> {
    use NotificationKind::{Announcement, Assignment, Grade};
    let notifications = [
        ("n-1", "s-1", UserRole::Student, Grade, "New grade posted", "Algebra Quiz graded."),
        ("n-2", "s-2", UserRole::Student, Assignment, "Midterm scheduled", "Midterm in two weeks."),
        ("n-3", "t-1", UserRole::Teacher, Announcement, "Staff meeting", "Friday at 15:00."),
    ];
    for (id, recipient_id, recipient_role, kind, title, message) in notifications {
        let created_by = if recipient_role == UserRole::Teacher { "a-1" } else { "t-1" };
        repo.add_notification(NewNotification {
            id: id.to_string(),
            recipient_id: recipient_id.to_string(),
            recipient_role,
            title: title.to_string(),
            message: message.to_string(),
            kind,
            created_by: created_by.to_string(),
        })?;
    }
    Ok(())
}
