//! User domain model.
//!
//! # Responsibility
//! - Define the shared account fields and the four role-specific variants.
//! - Keep role-specific fields reachable only through the matching variant.
//!
//! # Invariants
//! - `User::role()` is derived from the variant and cannot disagree with it.
//! - Serialized users are internally tagged by `role` with camelCase fields.
//! - Passwords are stored and compared as plaintext; they must never be
//!   written to logs.

use super::{require_text, Entity, EntityId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Access role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl UserRole {
    /// Stable lowercase name used in serialized records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Parent => "parent",
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by every user variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: EntityId,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Account {
    /// Returns `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn validate(&self, entity: &'static str) -> Result<(), ValidationError> {
        require_text(entity, "id", &self.id)?;
        require_text(entity, "email", &self.email)?;
        require_text(entity, "password", &self.password)?;
        require_text(entity, "first_name", &self.first_name)?;
        require_text(entity, "last_name", &self.last_name)
    }
}

/// Caller-supplied account fields for a new user.
///
/// Timestamps are stamped by the repository on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub id: EntityId,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

impl NewAccount {
    pub fn new(
        id: impl Into<EntityId>,
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            avatar: None,
        }
    }

    fn into_account(self, now: i64) -> Account {
        Account {
            id: self.id,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            avatar: self.avatar,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of shared account fields. `None` keeps the current value;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<Option<String>>,
    pub avatar: Option<Option<String>>,
}

impl AccountPatch {
    fn apply(self, account: &mut Account, now: i64) {
        if let Some(email) = self.email {
            account.email = email;
        }
        if let Some(password) = self.password {
            account.password = password;
        }
        if let Some(first_name) = self.first_name {
            account.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            account.last_name = last_name;
        }
        if let Some(phone) = self.phone {
            account.phone = phone;
        }
        if let Some(avatar) = self.avatar {
            account.avatar = avatar;
        }
        account.updated_at = now;
    }
}

/// Enrollment state of a student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(flatten)]
    pub account: Account,
    /// School-issued student number, distinct from the record id.
    pub student_id: String,
    /// Grade level (year of study).
    pub grade: u8,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    pub date_of_birth: i64,
    pub address: String,
    pub enrollment_date: i64,
    pub status: StudentStatus,
}

impl Student {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.account.validate(Self::KIND)?;
        require_text(Self::KIND, "student_id", &self.student_id)?;
        require_text(Self::KIND, "section", &self.section)
    }
}

/// Input for `add_student`; status defaults to active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub account: NewAccount,
    pub student_id: String,
    pub grade: u8,
    pub section: String,
    pub parent_id: Option<EntityId>,
    pub date_of_birth: i64,
    pub address: String,
    /// Defaults to the insert time when `None`.
    pub enrollment_date: Option<i64>,
}

impl NewStudent {
    pub fn new(
        account: NewAccount,
        student_id: impl Into<String>,
        grade: u8,
        section: impl Into<String>,
    ) -> Self {
        Self {
            account,
            student_id: student_id.into(),
            grade,
            section: section.into(),
            parent_id: None,
            date_of_birth: 0,
            address: String::new(),
            enrollment_date: None,
        }
    }

    pub(crate) fn into_student(self, now: i64) -> Student {
        Student {
            account: self.account.into_account(now),
            student_id: self.student_id,
            grade: self.grade,
            section: self.section,
            parent_id: self.parent_id,
            date_of_birth: self.date_of_birth,
            address: self.address,
            enrollment_date: self.enrollment_date.unwrap_or(now),
            status: StudentStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub account: AccountPatch,
    pub grade: Option<u8>,
    pub section: Option<String>,
    /// `Some(None)` unlinks the student from its parent.
    pub parent_id: Option<Option<EntityId>>,
    pub date_of_birth: Option<i64>,
    pub address: Option<String>,
    pub status: Option<StudentStatus>,
}

impl StudentPatch {
    pub(crate) fn apply(self, student: &mut Student, now: i64) {
        self.account.apply(&mut student.account, now);
        if let Some(grade) = self.grade {
            student.grade = grade;
        }
        if let Some(section) = self.section {
            student.section = section;
        }
        if let Some(parent_id) = self.parent_id {
            student.parent_id = parent_id;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            student.date_of_birth = date_of_birth;
        }
        if let Some(address) = self.address {
            student.address = address;
        }
        if let Some(status) = self.status {
            student.status = status;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(flatten)]
    pub account: Account,
    pub teacher_id: String,
    pub department: String,
    /// Subject ids this teacher is qualified to teach.
    pub subjects: Vec<EntityId>,
    pub qualification: String,
    /// Years of teaching experience.
    pub experience: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    pub join_date: i64,
}

impl Teacher {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.account.validate(Self::KIND)?;
        require_text(Self::KIND, "teacher_id", &self.teacher_id)?;
        require_text(Self::KIND, "department", &self.department)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTeacher {
    pub account: NewAccount,
    pub teacher_id: String,
    pub department: String,
    pub subjects: Vec<EntityId>,
    pub qualification: String,
    pub experience: u32,
    pub salary: Option<f64>,
    /// Defaults to the insert time when `None`.
    pub join_date: Option<i64>,
}

impl NewTeacher {
    pub fn new(
        account: NewAccount,
        teacher_id: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            account,
            teacher_id: teacher_id.into(),
            department: department.into(),
            subjects: Vec::new(),
            qualification: String::new(),
            experience: 0,
            salary: None,
            join_date: None,
        }
    }

    pub(crate) fn into_teacher(self, now: i64) -> Teacher {
        Teacher {
            account: self.account.into_account(now),
            teacher_id: self.teacher_id,
            department: self.department,
            subjects: self.subjects,
            qualification: self.qualification,
            experience: self.experience,
            salary: self.salary,
            join_date: self.join_date.unwrap_or(now),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherPatch {
    pub account: AccountPatch,
    pub department: Option<String>,
    pub subjects: Option<Vec<EntityId>>,
    pub qualification: Option<String>,
    pub experience: Option<u32>,
    pub salary: Option<Option<f64>>,
}

impl TeacherPatch {
    pub(crate) fn apply(self, teacher: &mut Teacher, now: i64) {
        self.account.apply(&mut teacher.account, now);
        if let Some(department) = self.department {
            teacher.department = department;
        }
        if let Some(subjects) = self.subjects {
            teacher.subjects = subjects;
        }
        if let Some(qualification) = self.qualification {
            teacher.qualification = qualification;
        }
        if let Some(experience) = self.experience {
            teacher.experience = experience;
        }
        if let Some(salary) = self.salary {
            teacher.salary = salary;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(flatten)]
    pub account: Account,
    pub admin_id: String,
    pub permissions: Vec<String>,
}

impl Admin {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.account.validate(Self::KIND)?;
        require_text(Self::KIND, "admin_id", &self.admin_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmin {
    pub account: NewAccount,
    pub admin_id: String,
    pub permissions: Vec<String>,
}

impl NewAdmin {
    pub fn new(account: NewAccount, admin_id: impl Into<String>) -> Self {
        Self {
            account,
            admin_id: admin_id.into(),
            permissions: Vec::new(),
        }
    }

    pub(crate) fn into_admin(self, now: i64) -> Admin {
        Admin {
            account: self.account.into_account(now),
            admin_id: self.admin_id,
            permissions: self.permissions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPatch {
    pub account: AccountPatch,
    pub permissions: Option<Vec<String>>,
}

impl AdminPatch {
    pub(crate) fn apply(self, admin: &mut Admin, now: i64) {
        self.account.apply(&mut admin.account, now);
        if let Some(permissions) = self.permissions {
            admin.permissions = permissions;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    #[serde(flatten)]
    pub account: Account,
    pub parent_id: String,
    /// Student record ids.
    pub children: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

impl Parent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.account.validate(Self::KIND)?;
        require_text(Self::KIND, "parent_id", &self.parent_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParent {
    pub account: NewAccount,
    pub parent_id: String,
    pub children: Vec<EntityId>,
    pub occupation: Option<String>,
}

impl NewParent {
    pub fn new(account: NewAccount, parent_id: impl Into<String>) -> Self {
        Self {
            account,
            parent_id: parent_id.into(),
            children: Vec::new(),
            occupation: None,
        }
    }

    pub(crate) fn into_parent(self, now: i64) -> Parent {
        Parent {
            account: self.account.into_account(now),
            parent_id: self.parent_id,
            children: self.children,
            occupation: self.occupation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentPatch {
    pub account: AccountPatch,
    pub children: Option<Vec<EntityId>>,
    pub occupation: Option<Option<String>>,
}

impl ParentPatch {
    pub(crate) fn apply(self, parent: &mut Parent, now: i64) {
        self.account.apply(&mut parent.account, now);
        if let Some(children) = self.children {
            parent.children = children;
        }
        if let Some(occupation) = self.occupation {
            parent.occupation = occupation;
        }
    }
}

/// Any user account, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum User {
    Admin(Admin),
    Teacher(Teacher),
    Student(Student),
    Parent(Parent),
}

impl User {
    pub fn role(&self) -> UserRole {
        match self {
            Self::Admin(_) => UserRole::Admin,
            Self::Teacher(_) => UserRole::Teacher,
            Self::Student(_) => UserRole::Student,
            Self::Parent(_) => UserRole::Parent,
        }
    }

    pub fn account(&self) -> &Account {
        match self {
            Self::Admin(admin) => &admin.account,
            Self::Teacher(teacher) => &teacher.account,
            Self::Student(student) => &student.account,
            Self::Parent(parent) => &parent.account,
        }
    }

    pub fn email(&self) -> &str {
        &self.account().email
    }

    pub fn full_name(&self) -> String {
        self.account().full_name()
    }
}

impl From<Admin> for User {
    fn from(value: Admin) -> Self {
        Self::Admin(value)
    }
}

impl From<Teacher> for User {
    fn from(value: Teacher) -> Self {
        Self::Teacher(value)
    }
}

impl From<Student> for User {
    fn from(value: Student) -> Self {
        Self::Student(value)
    }
}

impl From<Parent> for User {
    fn from(value: Parent) -> Self {
        Self::Parent(value)
    }
}

impl Entity for User {
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.account().id
    }
}

impl Entity for Student {
    const KIND: &'static str = "Student";

    fn id(&self) -> &str {
        &self.account.id
    }
}

impl Entity for Teacher {
    const KIND: &'static str = "Teacher";

    fn id(&self) -> &str {
        &self.account.id
    }
}

impl Entity for Admin {
    const KIND: &'static str = "Admin";

    fn id(&self) -> &str {
        &self.account.id
    }
}

impl Entity for Parent {
    const KIND: &'static str = "Parent";

    fn id(&self) -> &str {
        &self.account.id
    }
}
