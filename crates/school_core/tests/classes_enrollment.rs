use school_core::{
    AssignmentRepository, AssignmentType, Class, ClassPatch, ClassRepository, ClassSchedule,
    NewAccount, NewAssignment, NewStudent, NewTeacher, RepoError, SchoolRepository,
    StudentRepository, Subject, SubjectPatch, SubjectRepository, TeacherRepository,
    ValidationError,
};

fn fixed_clock() -> i64 {
    1_725_148_800_000
}

fn repo_with_staff() -> SchoolRepository {
    let mut repo = SchoolRepository::with_clock(fixed_clock);
    repo.add_subject(Subject::new("m", "Math", "M1", "Science", 10))
        .unwrap();
    for (id, email) in [("t1", "t1@school.test"), ("t2", "t2@school.test")] {
        let mut teacher = NewTeacher::new(
            NewAccount::new(id, email, "pw", "Tess", "Teacher"),
            format!("TCH-{id}"),
            "Science",
        );
        teacher.subjects = vec!["m".to_string()];
        repo.add_teacher(teacher).unwrap();
    }
    repo
}

fn add_students(repo: &mut SchoolRepository, ids: &[&str]) {
    for id in ids {
        repo.add_student(NewStudent::new(
            NewAccount::new(*id, format!("{id}@school.test"), "pw", "Sam", "Student"),
            format!("STU-{id}"),
            10,
            "A",
        ))
        .unwrap();
    }
}

#[test]
fn classes_by_teacher_filters_on_teacher_id() {
    let mut repo = repo_with_staff();
    let class = repo
        .add_class(Class::new("c1", "Math A", "t1", "m", 30))
        .unwrap();

    assert_eq!(repo.get_classes_by_teacher("t1"), vec![class]);
    assert!(repo.get_classes_by_teacher("t2").is_empty());
}

#[test]
fn add_class_checks_references() {
    let mut repo = repo_with_staff();

    let missing_teacher = repo.add_class(Class::new("c1", "Math A", "t9", "m", 30));
    assert!(matches!(
        missing_teacher,
        Err(RepoError::MissingReference { entity: "Teacher", .. })
    ));

    let mut with_ghost = Class::new("c2", "Math B", "t1", "m", 30);
    with_ghost.enrolled_students = vec!["ghost".to_string()];
    assert!(matches!(
        repo.add_class(with_ghost),
        Err(RepoError::MissingReference { entity: "Student", .. })
    ));
    assert!(repo.list_classes().is_empty());
}

#[test]
fn add_class_rejects_invalid_schedule() {
    let mut repo = repo_with_staff();
    let mut class = Class::new("c1", "Math A", "t1", "m", 30);
    class.schedule = vec![ClassSchedule::new(1, "10:00", "09:00", "R1")];

    let result = repo.add_class(class);
    assert!(matches!(
        result,
        Err(RepoError::Validation(ValidationError::InvalidTimeRange { .. }))
    ));
}

#[test]
fn enrollment_respects_capacity_and_duplicates() {
    let mut repo = repo_with_staff();
    add_students(&mut repo, &["s1", "s2", "s3"]);
    repo.add_class(Class::new("c1", "Math A", "t1", "m", 2))
        .unwrap();

    assert!(repo.enroll_student("c1", "s1").unwrap());
    assert!(!repo.enroll_student("c1", "s1").unwrap());
    assert!(repo.enroll_student("c1", "s2").unwrap());

    let full = repo.enroll_student("c1", "s3");
    assert_eq!(
        full,
        Err(RepoError::ClassFull {
            class_id: "c1".to_string(),
            max_students: 2,
        })
    );
    assert_eq!(
        repo.get_class("c1").unwrap().enrolled_students,
        vec!["s1".to_string(), "s2".to_string()]
    );
}

#[test]
fn enrolling_unknown_records_is_not_found() {
    let mut repo = repo_with_staff();
    add_students(&mut repo, &["s1"]);
    repo.add_class(Class::new("c1", "Math A", "t1", "m", 2))
        .unwrap();

    assert!(matches!(
        repo.enroll_student("c9", "s1"),
        Err(RepoError::NotFound { entity: "Class", .. })
    ));
    assert!(matches!(
        repo.enroll_student("c1", "s9"),
        Err(RepoError::NotFound { entity: "Student", .. })
    ));
}

#[test]
fn rosters_and_student_classes_agree() {
    let mut repo = repo_with_staff();
    add_students(&mut repo, &["s1", "s2"]);
    repo.add_class(Class::new("c1", "Math A", "t1", "m", 5))
        .unwrap();
    repo.add_class(Class::new("c2", "Math B", "t2", "m", 5))
        .unwrap();
    repo.enroll_student("c1", "s1").unwrap();
    repo.enroll_student("c2", "s1").unwrap();
    repo.enroll_student("c2", "s2").unwrap();

    let s1_classes: Vec<String> = repo
        .get_classes_by_student("s1")
        .into_iter()
        .map(|class| class.id)
        .collect();
    assert_eq!(s1_classes, vec!["c1".to_string(), "c2".to_string()]);
    assert_eq!(repo.get_class_students("c2").len(), 2);

    assert!(repo.unenroll_student("c2", "s1"));
    assert!(!repo.unenroll_student("c2", "s1"));
    assert_eq!(repo.get_classes_by_student("s1").len(), 1);
}

#[test]
fn shrinking_capacity_below_roster_is_rejected() {
    let mut repo = repo_with_staff();
    add_students(&mut repo, &["s1", "s2"]);
    repo.add_class(Class::new("c1", "Math A", "t1", "m", 5))
        .unwrap();
    repo.enroll_student("c1", "s1").unwrap();
    repo.enroll_student("c1", "s2").unwrap();

    let patch = ClassPatch {
        max_students: Some(1),
        ..ClassPatch::default()
    };
    assert!(matches!(
        repo.update_class("c1", patch),
        Err(RepoError::Validation(ValidationError::OverCapacity { .. }))
    ));
    assert_eq!(repo.get_class("c1").unwrap().max_students, 5);
    assert!(repo.update_class("c9", ClassPatch::default()).unwrap().is_none());
}

#[test]
fn referenced_subjects_and_classes_cannot_be_deleted() {
    let mut repo = repo_with_staff();
    repo.add_class(Class::new("c1", "Math A", "t1", "m", 5))
        .unwrap();
    repo.add_assignment(NewAssignment {
        id: "a1".to_string(),
        title: "Homework 1".to_string(),
        description: String::new(),
        subject_id: "m".to_string(),
        teacher_id: "t1".to_string(),
        class_id: "c1".to_string(),
        due_date: fixed_clock(),
        max_marks: 20.0,
        kind: AssignmentType::Homework,
    })
    .unwrap();

    assert!(matches!(
        repo.delete_subject("m"),
        Err(RepoError::InUse { entity: "Subject", .. })
    ));
    assert!(matches!(
        repo.delete_class("c1"),
        Err(RepoError::InUse { by: "Assignment", .. })
    ));

    assert!(repo.delete_assignment("a1").unwrap());
    assert!(repo.delete_class("c1").unwrap());
    assert!(repo.delete_subject("m").unwrap());
    assert!(repo.get_teacher("t1").unwrap().subjects.is_empty());
    assert!(!repo.delete_subject("m").unwrap());
}

#[test]
fn subject_updates_and_active_listing() {
    let mut repo = repo_with_staff();
    repo.add_subject(Subject::new("h", "History", "H1", "Humanities", 10))
        .unwrap();

    let patch = SubjectPatch {
        is_active: Some(false),
        ..SubjectPatch::default()
    };
    let updated = repo.update_subject("h", patch).unwrap().unwrap();
    assert!(!updated.is_active);

    let active: Vec<String> = repo
        .list_active_subjects()
        .into_iter()
        .map(|subject| subject.id)
        .collect();
    assert_eq!(active, vec!["m".to_string()]);
    assert_eq!(repo.list_subjects().len(), 2);
}
