use school_core::grading::{compute, percentage};
use school_core::{
    AssignmentPatch, AssignmentRepository, AssignmentType, Class, ClassPatch, ClassRepository,
    GradeError, GradePatch, GradeRepository, LetterGrade, NewAccount, NewAssignment, NewGrade,
    NewStudent, NewTeacher, RepoError, SchoolRepository, StudentRepository, Subject,
    SubjectRepository, TeacherRepository,
};

const FIXED_NOW: i64 = 1_725_148_800_000;

fn fixed_clock() -> i64 {
    FIXED_NOW
}

fn assignment(id: &str, max_marks: f64) -> NewAssignment {
    NewAssignment {
        id: id.to_string(),
        title: format!("Assignment {id}"),
        description: String::new(),
        subject_id: "m".to_string(),
        teacher_id: "t1".to_string(),
        class_id: "c1".to_string(),
        due_date: FIXED_NOW,
        max_marks,
        kind: AssignmentType::Exam,
    }
}

fn graded_repo() -> SchoolRepository {
    let mut repo = SchoolRepository::with_clock(fixed_clock);
    repo.add_subject(Subject::new("m", "Math", "M1", "Science", 10))
        .unwrap();
    repo.add_teacher(NewTeacher::new(
        NewAccount::new("t1", "t1@school.test", "pw", "Tess", "Teacher"),
        "TCH1",
        "Science",
    ))
    .unwrap();
    repo.add_student(NewStudent::new(
        NewAccount::new("s1", "s1@school.test", "pw", "Sam", "Student"),
        "STU1",
        10,
        "A",
    ))
    .unwrap();
    repo.add_class(Class::new("c1", "Math A", "t1", "m", 30))
        .unwrap();
    repo.add_assignment(assignment("a1", 100.0)).unwrap();
    repo
}

#[test]
fn letter_table_boundaries() {
    let cases = [
        (100.0, LetterGrade::APlus),
        (90.0, LetterGrade::APlus),
        (89.0, LetterGrade::A),
        (85.0, LetterGrade::A),
        (84.0, LetterGrade::AMinus),
        (80.0, LetterGrade::AMinus),
        (79.0, LetterGrade::BPlus),
        (75.0, LetterGrade::BPlus),
        (74.0, LetterGrade::B),
        (70.0, LetterGrade::B),
        (69.0, LetterGrade::BMinus),
        (65.0, LetterGrade::BMinus),
        (64.0, LetterGrade::CPlus),
        (60.0, LetterGrade::CPlus),
        (59.0, LetterGrade::C),
        (55.0, LetterGrade::C),
        (54.0, LetterGrade::CMinus),
        (50.0, LetterGrade::CMinus),
        (49.0, LetterGrade::F),
        (0.0, LetterGrade::F),
    ];
    for (marks, letter) in cases {
        let score = compute(marks, 100.0).unwrap();
        assert_eq!(score.percentage, marks as u32);
        assert_eq!(score.letter, letter, "marks {marks}");
    }
}

#[test]
fn percentage_rounds_to_nearest() {
    assert_eq!(percentage(45.0, 50.0).unwrap(), 90);
    assert_eq!(percentage(2.0, 3.0).unwrap(), 67);
    assert_eq!(percentage(1.0, 3.0).unwrap(), 33);
    assert_eq!(percentage(60.0, 50.0).unwrap(), 120);
}

#[test]
fn invalid_marks_are_rejected() {
    assert_eq!(percentage(5.0, 0.0), Err(GradeError::InvalidMaxMarks(0.0)));
    assert_eq!(percentage(-1.0, 10.0), Err(GradeError::InvalidMarks(-1.0)));
    assert!(percentage(f64::NAN, 10.0).is_err());
}

#[test]
fn add_grade_derives_score_and_stamps_graded_at() {
    let mut repo = graded_repo();
    let grade = repo
        .add_grade(NewGrade::new("g1", "s1", "a1", 84.0, 100.0, "t1"))
        .unwrap();

    assert_eq!(grade.percentage, 84);
    assert_eq!(grade.letter, LetterGrade::AMinus);
    assert_eq!(grade.graded_at, FIXED_NOW);
    assert_eq!(repo.get_grade("g1").unwrap(), grade);
}

#[test]
fn update_grade_recomputes_derived_fields() {
    let mut repo = graded_repo();
    repo.add_grade(NewGrade::new("g1", "s1", "a1", 84.0, 100.0, "t1"))
        .unwrap();

    let patch = GradePatch {
        marks_obtained: Some(45.0),
        feedback: Some(Some("Needs work on proofs".to_string())),
        ..GradePatch::default()
    };
    let updated = repo.update_grade("g1", patch).unwrap().unwrap();

    assert_eq!(updated.percentage, 45);
    assert_eq!(updated.letter, LetterGrade::F);
    assert_eq!(updated.feedback.as_deref(), Some("Needs work on proofs"));
    assert_eq!(repo.get_grade("g1").unwrap(), updated);
    assert!(repo
        .update_grade("missing", GradePatch::default())
        .unwrap()
        .is_none());
}

#[test]
fn invalid_grade_update_keeps_stored_values() {
    let mut repo = graded_repo();
    repo.add_grade(NewGrade::new("g1", "s1", "a1", 84.0, 100.0, "t1"))
        .unwrap();

    let patch = GradePatch {
        max_marks: Some(0.0),
        ..GradePatch::default()
    };
    assert_eq!(
        repo.update_grade("g1", patch),
        Err(RepoError::Grade(GradeError::InvalidMaxMarks(0.0)))
    );
    assert_eq!(repo.get_grade("g1").unwrap().percentage, 84);
}

#[test]
fn grades_need_existing_student_and_assignment() {
    let mut repo = graded_repo();

    assert!(matches!(
        repo.add_grade(NewGrade::new("g1", "s9", "a1", 1.0, 10.0, "t1")),
        Err(RepoError::MissingReference { entity: "Student", .. })
    ));
    assert!(matches!(
        repo.add_grade(NewGrade::new("g1", "s1", "a9", 1.0, 10.0, "t1")),
        Err(RepoError::MissingReference { entity: "Assignment", .. })
    ));
    assert!(repo.list_grades().is_empty());
}

#[test]
fn grade_queries_filter_by_student_and_assignment() {
    let mut repo = graded_repo();
    repo.add_assignment(assignment("a2", 20.0)).unwrap();
    repo.add_grade(NewGrade::new("g1", "s1", "a1", 70.0, 100.0, "t1"))
        .unwrap();
    repo.add_grade(NewGrade::new("g2", "s1", "a2", 18.0, 20.0, "t1"))
        .unwrap();

    assert_eq!(repo.get_grades_by_student("s1").len(), 2);
    assert!(repo.get_grades_by_student("s2").is_empty());
    let on_a2 = repo.get_grades_by_assignment("a2");
    assert_eq!(on_a2.len(), 1);
    assert_eq!(on_a2[0].percentage, 90);
}

#[test]
fn deleting_an_assignment_removes_its_grades() {
    let mut repo = graded_repo();
    repo.add_grade(NewGrade::new("g1", "s1", "a1", 70.0, 100.0, "t1"))
        .unwrap();

    assert!(repo.delete_assignment("a1").unwrap());
    assert!(repo.get_grade("g1").is_none());
    assert!(!repo.delete_assignment("a1").unwrap());
}

#[test]
fn assignments_are_listed_by_class_and_teacher() {
    let mut repo = graded_repo();
    let patch = AssignmentPatch {
        title: Some("Final Exam".to_string()),
        ..AssignmentPatch::default()
    };
    let updated = repo.update_assignment("a1", patch).unwrap().unwrap();
    assert_eq!(updated.title, "Final Exam");

    assert_eq!(repo.get_assignments_by_class("c1"), vec![updated.clone()]);
    assert_eq!(repo.get_assignments_by_teacher("t1"), vec![updated]);
    assert!(repo.get_assignments_by_teacher("t2").is_empty());

    let mut orphan = assignment("a2", 10.0);
    orphan.class_id = "c9".to_string();
    assert!(matches!(
        repo.add_assignment(orphan),
        Err(RepoError::MissingReference { entity: "Class", .. })
    ));
}

#[test]
fn delete_grade_returns_true_then_false() {
    let mut repo = graded_repo();
    repo.add_grade(NewGrade::new("g1", "s1", "a1", 70.0, 100.0, "t1"))
        .unwrap();

    assert!(repo.delete_grade("g1").unwrap());
    assert!(repo.get_grade("g1").is_none());
    assert!(!repo.delete_grade("g1").unwrap());
    assert!(repo.get_assignment("a1").is_some());
}

#[test]
fn assignment_subject_must_match_its_class() {
    let mut repo = graded_repo();
    repo.add_subject(Subject::new("h", "History", "H1", "Humanities", 10))
        .unwrap();

    let mut off_subject = assignment("a2", 10.0);
    off_subject.subject_id = "h".to_string();
    assert_eq!(
        repo.add_assignment(off_subject),
        Err(RepoError::SubjectMismatch {
            class_id: "c1".to_string(),
            subject_id: "h".to_string(),
        })
    );

    let patch = AssignmentPatch {
        subject_id: Some("h".to_string()),
        ..AssignmentPatch::default()
    };
    assert!(matches!(
        repo.update_assignment("a1", patch),
        Err(RepoError::SubjectMismatch { .. })
    ));
    assert_eq!(repo.get_assignment("a1").unwrap().subject_id, "m");

    let class_patch = ClassPatch {
        subject_id: Some("h".to_string()),
        ..ClassPatch::default()
    };
    assert!(matches!(
        repo.update_class("c1", class_patch),
        Err(RepoError::SubjectMismatch { .. })
    ));
    assert_eq!(repo.get_class("c1").unwrap().subject_id, "m");
}
