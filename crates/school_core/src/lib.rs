//! Core domain logic for the school records dashboard.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod grading;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod session;

pub use grading::{GradeError, GradeScore, LetterGrade};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::academic::{Class, ClassPatch, ClassSchedule, Subject, SubjectPatch};
pub use model::assessment::{
    Assignment, AssignmentPatch, AssignmentType, Grade, GradePatch, NewAssignment, NewGrade,
};
pub use model::notification::{
    NewNotification, Notification, NotificationKind, NotificationPatch,
};
pub use model::user::{
    Account, AccountPatch, Admin, AdminPatch, NewAccount, NewAdmin, NewParent, NewStudent,
    NewTeacher, Parent, ParentPatch, Student, StudentPatch, StudentStatus, Teacher, TeacherPatch,
    User, UserRole,
};
pub use model::{new_id, Entity, EntityId, ValidationError};
pub use repo::{
    AdminRepository, AssignmentRepository, ClassRepository, GradeRepository,
    NotificationRepository, ParentRepository, RepoError, RepoResult, SchoolRepository,
    SchoolStore, StudentRepository, SubjectRepository, TeacherRepository, UserRepository,
};
pub use service::analytics_service::{
    AnalyticsService, AssignmentStats, GradeAnalytics, GradeScope, StudentPerformance,
    SubjectPerformance, TrendPoint,
};
pub use service::auth_service::{AuthError, AuthResult, AuthService};
pub use service::report_service::{Report, ReportSection, ReportService, ReportTable};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
