use school_core::{
    AccountPatch, AdminPatch, AdminRepository, NewAccount, NewAdmin, NewParent, NewStudent,
    NewTeacher, ParentPatch, ParentRepository, RepoError, SchoolRepository, StudentPatch,
    StudentRepository, Subject, SubjectRepository, TeacherPatch, TeacherRepository,
};

fn fixed_clock() -> i64 {
    1_725_148_800_000
}

fn new_parent(id: &str) -> NewParent {
    NewParent::new(
        NewAccount::new(id, format!("{id}@home.test"), "pw", "Pat", "Parent"),
        format!("PAR-{id}"),
    )
}

fn new_student(id: &str, parent_id: Option<&str>) -> NewStudent {
    let mut student = NewStudent::new(
        NewAccount::new(id, format!("{id}@school.test"), "pw", "Sam", "Student"),
        format!("STU-{id}"),
        10,
        "A",
    );
    student.parent_id = parent_id.map(str::to_string);
    student
}

fn children(repo: &SchoolRepository, parent_id: &str) -> Vec<String> {
    repo.get_parent(parent_id).unwrap().children
}

fn parent_of(repo: &SchoolRepository, student_id: &str) -> Option<String> {
    repo.get_student(student_id).unwrap().parent_id
}

#[test]
fn admin_crud_round_trip() {
    let mut repo = SchoolRepository::with_clock(fixed_clock);
    let mut admin = NewAdmin::new(
        NewAccount::new("a1", "admin@school.test", "pw", "Ada", "Admin"),
        "ADM1",
    );
    admin.account.phone = Some("555-0100".to_string());
    repo.add_admin(admin).unwrap();

    let patch = AdminPatch {
        account: AccountPatch {
            phone: Some(None),
            ..AccountPatch::default()
        },
        permissions: Some(vec!["manage_users".to_string()]),
    };
    let updated = repo.update_admin("a1", patch).unwrap().unwrap();
    assert!(updated.account.phone.is_none());
    assert_eq!(updated.permissions, vec!["manage_users".to_string()]);
    assert_eq!(repo.get_admin("a1").unwrap(), updated);
    assert!(repo.update_admin("a9", AdminPatch::default()).unwrap().is_none());

    assert!(repo.delete_admin("a1").unwrap());
    assert!(repo.get_admin("a1").is_none());
    assert!(!repo.delete_admin("a1").unwrap());
}

#[test]
fn teacher_update_checks_subjects_and_clears_salary() {
    let mut repo = SchoolRepository::with_clock(fixed_clock);
    repo.add_subject(Subject::new("m", "Math", "M1", "Science", 10))
        .unwrap();
    let mut teacher = NewTeacher::new(
        NewAccount::new("t1", "t1@school.test", "pw", "Tess", "Teacher"),
        "TCH1",
        "Science",
    );
    teacher.salary = Some(50_000.0);
    repo.add_teacher(teacher).unwrap();

    let patch = TeacherPatch {
        subjects: Some(vec!["m".to_string()]),
        experience: Some(3),
        salary: Some(None),
        ..TeacherPatch::default()
    };
    let updated = repo.update_teacher("t1", patch).unwrap().unwrap();
    assert_eq!(updated.subjects, vec!["m".to_string()]);
    assert_eq!(updated.experience, 3);
    assert!(updated.salary.is_none());

    let unknown_subject = TeacherPatch {
        subjects: Some(vec!["x".to_string()]),
        ..TeacherPatch::default()
    };
    assert!(matches!(
        repo.update_teacher("t1", unknown_subject),
        Err(RepoError::MissingReference { entity: "Subject", .. })
    ));
    assert_eq!(repo.get_teacher("t1").unwrap(), updated);
}

#[test]
fn parent_crud_round_trip() {
    let mut repo = SchoolRepository::with_clock(fixed_clock);
    let mut parent = new_parent("p1");
    parent.occupation = Some("Engineer".to_string());
    repo.add_parent(parent).unwrap();

    let patch = ParentPatch {
        occupation: Some(None),
        ..ParentPatch::default()
    };
    let updated = repo.update_parent("p1", patch).unwrap().unwrap();
    assert!(updated.occupation.is_none());
    assert!(repo.update_parent("p9", ParentPatch::default()).unwrap().is_none());

    assert!(repo.delete_parent("p1").unwrap());
    assert!(!repo.delete_parent("p1").unwrap());
    assert!(repo.list_parents().is_empty());
}

#[test]
fn adding_a_student_lists_it_under_its_parent() {
    let mut repo = SchoolRepository::with_clock(fixed_clock);
    repo.add_parent(new_parent("p1")).unwrap();
    repo.add_student(new_student("s1", Some("p1"))).unwrap();

    assert_eq!(children(&repo, "p1"), vec!["s1".to_string()]);
    assert!(matches!(
        repo.add_student(new_student("s2", Some("p9"))),
        Err(RepoError::MissingReference { entity: "Parent", .. })
    ));
}

#[test]
fn changing_a_students_parent_moves_the_link() {
    let mut repo = SchoolRepository::with_clock(fixed_clock);
    repo.add_parent(new_parent("p1")).unwrap();
    repo.add_parent(new_parent("p2")).unwrap();
    repo.add_student(new_student("s1", Some("p1"))).unwrap();

    let move_to_p2 = StudentPatch {
        parent_id: Some(Some("p2".to_string())),
        ..StudentPatch::default()
    };
    repo.update_student("s1", move_to_p2).unwrap();
    assert!(children(&repo, "p1").is_empty());
    assert_eq!(children(&repo, "p2"), vec!["s1".to_string()]);

    let unlink = StudentPatch {
        parent_id: Some(None),
        ..StudentPatch::default()
    };
    repo.update_student("s1", unlink).unwrap();
    assert!(children(&repo, "p2").is_empty());
    assert_eq!(parent_of(&repo, "s1"), None);
}

#[test]
fn parent_children_update_rewrites_student_links() {
    let mut repo = SchoolRepository::with_clock(fixed_clock);
    repo.add_parent(new_parent("p1")).unwrap();
    repo.add_student(new_student("s1", Some("p1"))).unwrap();
    repo.add_student(new_student("s2", None)).unwrap();

    let mut p2 = new_parent("p2");
    p2.children = vec!["s1".to_string(), "s1".to_string()];
    let added = repo.add_parent(p2).unwrap();
    assert_eq!(added.children, vec!["s1".to_string()]);
    assert_eq!(parent_of(&repo, "s1").as_deref(), Some("p2"));
    assert!(children(&repo, "p1").is_empty());

    let swap = ParentPatch {
        children: Some(vec!["s2".to_string()]),
        ..ParentPatch::default()
    };
    repo.update_parent("p2", swap).unwrap();
    assert_eq!(parent_of(&repo, "s1"), None);
    assert_eq!(parent_of(&repo, "s2").as_deref(), Some("p2"));

    let ghost = ParentPatch {
        children: Some(vec!["ghost".to_string()]),
        ..ParentPatch::default()
    };
    assert!(matches!(
        repo.update_parent("p2", ghost),
        Err(RepoError::MissingReference { entity: "Student", .. })
    ));
    assert_eq!(children(&repo, "p2"), vec!["s2".to_string()]);
}

#[test]
fn deleting_a_parent_unlinks_its_children_only() {
    let mut repo = SchoolRepository::with_clock(fixed_clock);
    repo.add_parent(new_parent("p1")).unwrap();
    repo.add_parent(new_parent("p2")).unwrap();
    repo.add_student(new_student("s1", Some("p1"))).unwrap();
    repo.add_student(new_student("s2", Some("p2"))).unwrap();

    let adopt = ParentPatch {
        children: Some(vec!["s1".to_string(), "s2".to_string()]),
        ..ParentPatch::default()
    };
    repo.update_parent("p2", adopt).unwrap();
    assert_eq!(parent_of(&repo, "s1").as_deref(), Some("p2"));

    assert!(repo.delete_parent("p2").unwrap());
    assert_eq!(parent_of(&repo, "s1"), None);
    assert_eq!(parent_of(&repo, "s2"), None);
    assert!(children(&repo, "p1").is_empty());
}
