//! Command dispatch over an already-built repository and auth service.
//!
//! Access rules: staff (admins and teachers) see everything. A student sees
//! only their own records and a parent only their children's. Class and
//! school reports are staff-only.

use crate::cli::report::ReportKind;
use crate::cli::{AnalyticsArgs, Commands};
use crate::output::{format_json, pretty};
use anyhow::{anyhow, bail, ensure, Result};
use school_core::clock::now_epoch_ms;
use school_core::{
    AnalyticsService, AuthService, Entity, GradeScope, ReportService, SchoolStore, SessionStore,
    User, UserRole,
};
use serde::Serialize;

/// Runs one command and returns the text to print.
pub fn execute<R, S>(
    command: Commands,
    auth: &mut AuthService<'_, R, S>,
    json: bool,
) -> Result<String>
where
    R: SchoolStore,
    S: SessionStore,
{
    match command {
        Commands::Login { email, password } => {
            let user = auth.login(&email, &password)?;
            if json {
                return Ok(format_json(user)?);
            }
            Ok(format!("Signed in as {} ({})", user.full_name(), user.role()))
        }
        Commands::Logout => {
            auth.logout()?;
            Ok("Signed out.".to_string())
        }
        Commands::Whoami => match auth.current_user() {
            Some(user) if json => Ok(format_json(user)?),
            Some(user) => Ok(pretty::format_user(user)),
            None => Ok("Not signed in.".to_string()),
        },
        Commands::Students => {
            let user = require_user(auth)?;
            ensure!(
                is_staff(user),
                "students can only be listed by admins and teachers"
            );
            let students = auth.repo().list_students();
            render(students.as_slice(), json, pretty::format_students)
        }
        Commands::Classes { teacher } => {
            require_user(auth)?;
            let repo = auth.repo();
            let classes = match teacher {
                Some(teacher_id) => repo.get_classes_by_teacher(&teacher_id),
                None => repo.list_classes(),
            };
            render(classes.as_slice(), json, pretty::format_classes)
        }
        Commands::Analytics(args) => {
            let user = require_user(auth)?;
            let scope = analytics_scope(&args, user)?;
            let analytics =
                AnalyticsService::new(auth.repo()).grade_analytics(scope, now_epoch_ms());
            render(&analytics, json, pretty::format_analytics)
        }
        Commands::Notifications => {
            let user = require_user(auth)?;
            let notifications = auth.repo().get_notifications_by_user(user.id());
            render(notifications.as_slice(), json, pretty::format_notifications)
        }
        Commands::Report(command) => {
            let user = require_user(auth)?;
            match &command.kind {
                ReportKind::Transcript { id } => {
                    ensure!(
                        can_view_student(user, id),
                        "transcripts are limited to staff, the student and their parents"
                    );
                }
                _ => {
                    ensure!(
                        is_staff(user),
                        "class and school reports are limited to admins and teachers"
                    );
                }
            }
            let reports = ReportService::new(auth.repo());
            let report = match command.kind {
                ReportKind::Transcript { id } => reports
                    .student_transcript(&id)
                    .ok_or_else(|| anyhow!("student `{id}` not found"))?,
                ReportKind::ClassList { id } => reports
                    .class_list(&id)
                    .ok_or_else(|| anyhow!("class `{id}` not found"))?,
                ReportKind::GradeReport { id } => reports
                    .grade_report(&id)
                    .ok_or_else(|| anyhow!("class `{id}` not found"))?,
                ReportKind::School => reports.school_overview(),
            };
            if json {
                return Ok(report.to_json()?);
            }
            Ok(report.render_text())
        }
    }
}

fn require_user<'a, R, S>(auth: &'a AuthService<'_, R, S>) -> Result<&'a User>
where
    R: SchoolStore,
    S: SessionStore,
{
    auth.current_user()
        .ok_or_else(|| anyhow!("not signed in; run `school login <email> <password>` first"))
}

fn is_staff(user: &User) -> bool {
    matches!(user.role(), UserRole::Admin | UserRole::Teacher)
}

fn can_view_student(user: &User, student_id: &str) -> bool {
    match user {
        User::Admin(_) | User::Teacher(_) => true,
        User::Student(student) => student.account.id == student_id,
        User::Parent(parent) => parent.children.iter().any(|child| child == student_id),
    }
}

/// Explicit flags win when the user may see that scope; otherwise students
/// and teachers see their own grades and parents their first child's.
fn analytics_scope<'a>(args: &'a AnalyticsArgs, user: &'a User) -> Result<GradeScope<'a>> {
    if let Some(id) = &args.student {
        ensure!(
            can_view_student(user, id),
            "analytics for student `{id}` are not available to this account"
        );
        return Ok(GradeScope::Student(id));
    }
    if args.teacher.is_some() || args.class.is_some() {
        ensure!(
            is_staff(user),
            "teacher and class analytics are limited to admins and teachers"
        );
    }
    if let Some(id) = &args.teacher {
        return Ok(GradeScope::Teacher(id));
    }
    if let Some(id) = &args.class {
        return Ok(GradeScope::Class(id));
    }
    match user {
        User::Student(_) => Ok(GradeScope::Student(user.id())),
        User::Teacher(_) => Ok(GradeScope::Teacher(user.id())),
        User::Parent(parent) => match parent.children.first() {
            Some(child) => Ok(GradeScope::Student(child)),
            None => bail!("no students are linked to this account"),
        },
        User::Admin(_) => Ok(GradeScope::All),
    }
}

fn render<T: Serialize + ?Sized>(
    value: &T,
    json: bool,
    text: impl FnOnce(&T) -> String,
) -> Result<String> {
    if json {
        Ok(format_json(value)?)
    } else {
        Ok(text(value))
    }
}
