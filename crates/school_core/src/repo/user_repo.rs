//! User repository contracts (all roles) and in-memory implementation.
//!
//! # Invariants
//! - Email lookup and authentication are exact, case-sensitive matches.
//! - Authentication failures never reveal whether the email exists.
//! - `Student.parent_id == Some(p)` exactly when the student is listed in
//!   `p.children`; every add/update/delete of either side keeps both in
//!   step, and a student belongs to at most one parent.
//! - Deleting a student removes it from class rosters, parent links and
//!   grades; deleting a teacher is refused while classes or assignments
//!   reference it.

use super::store::{ensure_exists, find, position, rejected, remove_by_id, SchoolRepository};
use super::{RepoError, RepoResult};
use crate::model::user::{
    Admin, AdminPatch, NewAdmin, NewParent, NewStudent, NewTeacher, Parent, ParentPatch, Student,
    StudentPatch, Teacher, TeacherPatch, User,
};
use crate::model::{Entity, EntityId};
use log::{info, warn};

/// Role-agnostic lookups across every user variant.
pub trait UserRepository {
    /// All users in variant order: students, teachers, admins, parents.
    fn list_users(&self) -> Vec<User>;
    fn get_user(&self, id: &str) -> Option<User>;
    fn get_user_by_email(&self, email: &str) -> Option<User>;
    /// Returns the user only when both email and password match exactly.
    fn authenticate(&self, email: &str, password: &str) -> Option<User>;
}

pub trait StudentRepository {
    fn list_students(&self) -> Vec<Student>;
    fn get_student(&self, id: &str) -> Option<Student>;
    fn add_student(&mut self, student: NewStudent) -> RepoResult<Student>;
    fn update_student(&mut self, id: &str, patch: StudentPatch) -> RepoResult<Option<Student>>;
    fn delete_student(&mut self, id: &str) -> RepoResult<bool>;
}

pub trait TeacherRepository {
    fn list_teachers(&self) -> Vec<Teacher>;
    fn get_teacher(&self, id: &str) -> Option<Teacher>;
    fn add_teacher(&mut self, teacher: NewTeacher) -> RepoResult<Teacher>;
    fn update_teacher(&mut self, id: &str, patch: TeacherPatch) -> RepoResult<Option<Teacher>>;
    fn delete_teacher(&mut self, id: &str) -> RepoResult<bool>;
}

pub trait AdminRepository {
    fn list_admins(&self) -> Vec<Admin>;
    fn get_admin(&self, id: &str) -> Option<Admin>;
    fn add_admin(&mut self, admin: NewAdmin) -> RepoResult<Admin>;
    fn update_admin(&mut self, id: &str, patch: AdminPatch) -> RepoResult<Option<Admin>>;
    fn delete_admin(&mut self, id: &str) -> RepoResult<bool>;
}

pub trait ParentRepository {
    fn list_parents(&self) -> Vec<Parent>;
    fn get_parent(&self, id: &str) -> Option<Parent>;
    fn add_parent(&mut self, parent: NewParent) -> RepoResult<Parent>;
    fn update_parent(&mut self, id: &str, patch: ParentPatch) -> RepoResult<Option<Parent>>;
    fn delete_parent(&mut self, id: &str) -> RepoResult<bool>;
}

impl SchoolRepository {
    /// Points `student_id` at `parent_id` and lists it under that parent
    /// only.
    fn link_child(&mut self, parent_id: &str, student_id: &str) {
        if let Some(index) = position(&self.students, student_id) {
            self.students[index].parent_id = Some(parent_id.to_string());
        }
        for parent in &mut self.parents {
            if parent.account.id == parent_id {
                if !parent.children.iter().any(|child| child == student_id) {
                    parent.children.push(student_id.to_string());
                }
            } else {
                parent.children.retain(|child| child != student_id);
            }
        }
        info!(
            "event=parent_link module=repo status=ok parent_id={parent_id} student_id={student_id}"
        );
    }

    /// Removes every parent link of `student_id`.
    fn unlink_child(&mut self, student_id: &str) {
        if let Some(index) = position(&self.students, student_id) {
            self.students[index].parent_id = None;
        }
        for parent in &mut self.parents {
            parent.children.retain(|child| child != student_id);
        }
    }
}

/// Drops repeated ids, keeping first occurrences in order.
fn dedup_ids(ids: &mut Vec<EntityId>) {
    let mut seen: Vec<EntityId> = Vec::with_capacity(ids.len());
    ids.retain(|id| {
        if seen.contains(id) {
            return false;
        }
        seen.push(id.clone());
        true
    });
}

impl UserRepository for SchoolRepository {
    fn list_users(&self) -> Vec<User> {
        self.students
            .iter()
            .cloned()
            .map(User::from)
            .chain(self.teachers.iter().cloned().map(User::from))
            .chain(self.admins.iter().cloned().map(User::from))
            .chain(self.parents.iter().cloned().map(User::from))
            .collect()
    }

    fn get_user(&self, id: &str) -> Option<User> {
        find(&self.students, id)
            .cloned()
            .map(User::from)
            .or_else(|| find(&self.teachers, id).cloned().map(User::from))
            .or_else(|| find(&self.admins, id).cloned().map(User::from))
            .or_else(|| find(&self.parents, id).cloned().map(User::from))
    }

    fn get_user_by_email(&self, email: &str) -> Option<User> {
        let id = self
            .accounts()
            .find(|account| account.email == email)
            .map(|account| account.id.clone())?;
        self.get_user(&id)
    }

    fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        match self.get_user_by_email(email) {
            Some(user) if user.account().password == password => {
                info!(
                    "event=authenticate module=repo status=ok role={}",
                    user.role()
                );
                Some(user)
            }
            _ => {
                warn!("event=authenticate module=repo status=rejected");
                None
            }
        }
    }
}

impl StudentRepository for SchoolRepository {
    fn list_students(&self) -> Vec<Student> {
        self.students.clone()
    }

    fn get_student(&self, id: &str) -> Option<Student> {
        find(&self.students, id).cloned()
    }

    fn add_student(&mut self, student: NewStudent) -> RepoResult<Student> {
        const EVENT: &str = "student_add";
        let student = student.into_student(self.now());
        student
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        self.ensure_account_free(Student::KIND, &student.account, None)
            .map_err(|err| rejected(EVENT, err))?;
        if let Some(parent_id) = &student.parent_id {
            ensure_exists(&self.parents, parent_id).map_err(|err| rejected(EVENT, err))?;
        }

        self.students.push(student.clone());
        if let Some(parent_id) = &student.parent_id {
            self.link_child(parent_id, &student.account.id);
        }
        info!("event={EVENT} module=repo status=ok id={}", student.id());
        Ok(student)
    }

    fn update_student(&mut self, id: &str, patch: StudentPatch) -> RepoResult<Option<Student>> {
        const EVENT: &str = "student_update";
        let Some(index) = position(&self.students, id) else {
            return Ok(None);
        };

        let mut updated = self.students[index].clone();
        patch.apply(&mut updated, self.now());
        updated
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        self.ensure_account_free(Student::KIND, &updated.account, Some(id))
            .map_err(|err| rejected(EVENT, err))?;
        if let Some(parent_id) = &updated.parent_id {
            ensure_exists(&self.parents, parent_id).map_err(|err| rejected(EVENT, err))?;
        }

        let previous_parent = self.students[index].parent_id.clone();
        self.students[index] = updated.clone();
        if previous_parent != updated.parent_id {
            match &updated.parent_id {
                Some(parent_id) => self.link_child(parent_id, id),
                None => self.unlink_child(id),
            }
        }
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(Some(updated))
    }

    fn delete_student(&mut self, id: &str) -> RepoResult<bool> {
        if !remove_by_id(&mut self.students, id) {
            return Ok(false);
        }

        for class in &mut self.classes {
            class.enrolled_students.retain(|student_id| student_id != id);
        }
        for parent in &mut self.parents {
            parent.children.retain(|student_id| student_id != id);
        }
        let grades_before = self.grades.len();
        self.grades.retain(|grade| grade.student_id != id);

        info!(
            "event=student_delete module=repo status=ok id={id} grades_removed={}",
            grades_before - self.grades.len()
        );
        Ok(true)
    }
}

impl TeacherRepository for SchoolRepository {
    fn list_teachers(&self) -> Vec<Teacher> {
        self.teachers.clone()
    }

    fn get_teacher(&self, id: &str) -> Option<Teacher> {
        find(&self.teachers, id).cloned()
    }

    fn add_teacher(&mut self, teacher: NewTeacher) -> RepoResult<Teacher> {
        const EVENT: &str = "teacher_add";
        let teacher = teacher.into_teacher(self.now());
        teacher
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        self.ensure_account_free(Teacher::KIND, &teacher.account, None)
            .map_err(|err| rejected(EVENT, err))?;
        for subject_id in &teacher.subjects {
            ensure_exists(&self.subjects, subject_id).map_err(|err| rejected(EVENT, err))?;
        }

        self.teachers.push(teacher.clone());
        info!("event={EVENT} module=repo status=ok id={}", teacher.id());
        Ok(teacher)
    }

    fn update_teacher(&mut self, id: &str, patch: TeacherPatch) -> RepoResult<Option<Teacher>> {
        const EVENT: &str = "teacher_update";
        let Some(index) = position(&self.teachers, id) else {
            return Ok(None);
        };

        let mut updated = self.teachers[index].clone();
        patch.apply(&mut updated, self.now());
        updated
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        self.ensure_account_free(Teacher::KIND, &updated.account, Some(id))
            .map_err(|err| rejected(EVENT, err))?;
        for subject_id in &updated.subjects {
            ensure_exists(&self.subjects, subject_id).map_err(|err| rejected(EVENT, err))?;
        }

        self.teachers[index] = updated.clone();
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(Some(updated))
    }

    fn delete_teacher(&mut self, id: &str) -> RepoResult<bool> {
        const EVENT: &str = "teacher_delete";
        if find(&self.teachers, id).is_none() {
            return Ok(false);
        }
        if self.classes.iter().any(|class| class.teacher_id == id) {
            return Err(rejected(
                EVENT,
                RepoError::InUse {
                    entity: Teacher::KIND,
                    id: id.to_string(),
                    by: "Class",
                },
            ));
        }
        if self
            .assignments
            .iter()
            .any(|assignment| assignment.teacher_id == id)
        {
            return Err(rejected(
                EVENT,
                RepoError::InUse {
                    entity: Teacher::KIND,
                    id: id.to_string(),
                    by: "Assignment",
                },
            ));
        }

        remove_by_id(&mut self.teachers, id);
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(true)
    }
}

impl AdminRepository for SchoolRepository {
    fn list_admins(&self) -> Vec<Admin> {
        self.admins.clone()
    }

    fn get_admin(&self, id: &str) -> Option<Admin> {
        find(&self.admins, id).cloned()
    }

    fn add_admin(&mut self, admin: NewAdmin) -> RepoResult<Admin> {
        const EVENT: &str = "admin_add";
        let admin = admin.into_admin(self.now());
        admin.validate().map_err(|err| rejected(EVENT, err.into()))?;
        self.ensure_account_free(Admin::KIND, &admin.account, None)
            .map_err(|err| rejected(EVENT, err))?;

        self.admins.push(admin.clone());
        info!("event={EVENT} module=repo status=ok id={}", admin.id());
        Ok(admin)
    }

    fn update_admin(&mut self, id: &str, patch: AdminPatch) -> RepoResult<Option<Admin>> {
        const EVENT: &str = "admin_update";
        let Some(index) = position(&self.admins, id) else {
            return Ok(None);
        };

        let mut updated = self.admins[index].clone();
        patch.apply(&mut updated, self.now());
        updated
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        self.ensure_account_free(Admin::KIND, &updated.account, Some(id))
            .map_err(|err| rejected(EVENT, err))?;

        self.admins[index] = updated.clone();
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(Some(updated))
    }

    fn delete_admin(&mut self, id: &str) -> RepoResult<bool> {
        let removed = remove_by_id(&mut self.admins, id);
        if removed {
            info!("event=admin_delete module=repo status=ok id={id}");
        }
        Ok(removed)
    }
}

impl ParentRepository for SchoolRepository {
    fn list_parents(&self) -> Vec<Parent> {
        self.parents.clone()
    }

    fn get_parent(&self, id: &str) -> Option<Parent> {
        find(&self.parents, id).cloned()
    }

    fn add_parent(&mut self, parent: NewParent) -> RepoResult<Parent> {
        const EVENT: &str = "parent_add";
        let mut parent = parent.into_parent(self.now());
        dedup_ids(&mut parent.children);
        parent
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        self.ensure_account_free(Parent::KIND, &parent.account, None)
            .map_err(|err| rejected(EVENT, err))?;
        for student_id in &parent.children {
            ensure_exists(&self.students, student_id).map_err(|err| rejected(EVENT, err))?;
        }

        self.parents.push(parent.clone());
        for student_id in &parent.children {
            self.link_child(&parent.account.id, student_id);
        }
        info!("event={EVENT} module=repo status=ok id={}", parent.id());
        Ok(parent)
    }

    fn update_parent(&mut self, id: &str, patch: ParentPatch) -> RepoResult<Option<Parent>> {
        const EVENT: &str = "parent_update";
        let Some(index) = position(&self.parents, id) else {
            return Ok(None);
        };

        let mut updated = self.parents[index].clone();
        patch.apply(&mut updated, self.now());
        dedup_ids(&mut updated.children);
        updated
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        self.ensure_account_free(Parent::KIND, &updated.account, Some(id))
            .map_err(|err| rejected(EVENT, err))?;
        for student_id in &updated.children {
            ensure_exists(&self.students, student_id).map_err(|err| rejected(EVENT, err))?;
        }

        let previous = std::mem::replace(&mut self.parents[index], updated.clone());
        let previous_children = previous.children;
        for student_id in &previous_children {
            if !updated.children.contains(student_id) {
                self.unlink_child(student_id);
            }
        }
        for student_id in &updated.children {
            self.link_child(id, student_id);
        }
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(Some(updated))
    }

    fn delete_parent(&mut self, id: &str) -> RepoResult<bool> {
        if !remove_by_id(&mut self.parents, id) {
            return Ok(false);
        }
        for student in &mut self.students {
            if student.parent_id.as_deref() == Some(id) {
                student.parent_id = None;
            }
        }
        info!("event=parent_delete module=repo status=ok id={id}");
        Ok(true)
    }
}
