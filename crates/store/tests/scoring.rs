mod common;

use common::TestStore;
use coursedb_core::domain::{ChoiceId, EnrollmentMode, QuestionId};
use coursedb_store::ErrorKind;
use coursedb_store::repository::{
    ChoiceFilter, EnrollmentFilter, NewEnrollment, NewQuestion, NewSubmission, QuestionFilter,
    SubmissionFilter, SubmissionSummary, UpdateEnrollment, UpdateQuestion,
};

#[tokio::test]
async fn test_all_correct_question_earns_full_grade_point() {
    let t = TestStore::new().await;
    let course_id = t.course("Scoring").await;
    let question = t.question(course_id, 10, &[true, true]).await;

    let score = t
        .store
        .compute_submission_score(&[question])
        .await
        .expect("score should be computed");

    assert_eq!(score, 10.0);
}

#[tokio::test]
async fn test_partially_correct_question_earns_proportional_credit() {
    let t = TestStore::new().await;
    let course_id = t.course("Scoring").await;
    let question = t.question(course_id, 10, &[true, false, false, false]).await;

    let score = t
        .store
        .compute_submission_score(&[question])
        .await
        .expect("score should be computed");

    assert_eq!(score, 2.5);
}

#[tokio::test]
async fn test_question_without_choices_contributes_nothing() {
    let t = TestStore::new().await;
    let course_id = t.course("Scoring").await;
    let question = t.question(course_id, 7, &[]).await;

    let score = t
        .store
        .compute_submission_score(&[question])
        .await
        .expect("score should be computed");

    assert_eq!(score, 0.0);
}

#[tokio::test]
async fn test_scores_are_summed_in_any_order() {
    let t = TestStore::new().await;
    let course_id = t.course("Scoring").await;
    let full = t.question(course_id, 5, &[true]).await;
    let partial = t.question(course_id, 15, &[true, false]).await;

    let forward = t
        .store
        .compute_submission_score(&[full, partial])
        .await
        .expect("score should be computed");
    let backward = t
        .store
        .compute_submission_score(&[partial, full])
        .await
        .expect("score should be computed");

    assert_eq!(forward, 12.5);
    assert_eq!(backward, forward);
}

#[tokio::test]
async fn test_unknown_question_fails_without_changing_state() {
    let t = TestStore::new().await;
    let course_id = t.course("Scoring").await;
    let known = t.question(course_id, 10, &[true, false]).await;

    let err = t
        .store
        .compute_submission_score(&[known, QuestionId::new()])
        .await
        .expect_err("unknown question must fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let questions = t
        .store
        .questions
        .list(QuestionFilter {
            course_id: Some(course_id),
        })
        .await
        .expect("list should succeed");
    assert_eq!(questions.len(), 1);
    let choices = t
        .store
        .choices
        .list(ChoiceFilter {
            question_id: Some(known),
            ..ChoiceFilter::default()
        })
        .await
        .expect("list should succeed");
    assert_eq!(choices.len(), 2);
}

#[tokio::test]
async fn test_grade_point_out_of_range_is_rejected() {
    let t = TestStore::new().await;
    let course_id = t.course("Scoring").await;

    for grade_point in [-1, 32768] {
        let err = t
            .store
            .questions
            .create(NewQuestion {
                course_id,
                text: "out of range".to_string(),
                grade_point,
            })
            .await
            .expect_err("grade point must fit a positive small integer");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

#[tokio::test]
async fn test_enrollment_counter_and_uniqueness() {
    let t = TestStore::new().await;
    let course_id = t.course("Counting").await;
    let alice = t.user("alice").await;
    let bob = t.user("bob").await;
    let enrollments = &t.store.enrollments;

    let first = enrollments
        .create(NewEnrollment::audit(alice, course_id))
        .await
        .expect("enrollment should be created");
    assert_eq!(first.mode, EnrollmentMode::Audit);
    assert_eq!(first.rating, 5.0);

    enrollments
        .create(NewEnrollment {
            mode: EnrollmentMode::Honor,
            ..NewEnrollment::audit(bob, course_id)
        })
        .await
        .expect("enrollment should be created");

    let err = enrollments
        .create(NewEnrollment::audit(alice, course_id))
        .await
        .expect_err("duplicate enrollment");
    assert_eq!(err.kind(), ErrorKind::Integrity);

    let course = t
        .store
        .courses
        .find_by_id(course_id)
        .await
        .expect("lookup should succeed")
        .expect("course should exist");
    assert_eq!(course.total_enrollment, 2);

    let honor = enrollments
        .list(EnrollmentFilter {
            mode: Some(EnrollmentMode::Honor),
            ..EnrollmentFilter::default()
        })
        .await
        .expect("list should succeed");
    assert_eq!(honor.len(), 1);
    assert_eq!(honor[0].user_id, bob);

    let err = enrollments
        .update(
            first.id,
            UpdateEnrollment {
                rating: Some(f64::NAN),
                ..UpdateEnrollment::default()
            },
        )
        .await
        .expect_err("rating must be finite");
    assert_eq!(err.kind(), ErrorKind::Validation);

    enrollments.delete(first.id).await.expect("delete should succeed");
    let course = t
        .store
        .courses
        .find_by_id(course_id)
        .await
        .expect("lookup should succeed")
        .expect("course should exist");
    assert_eq!(course.total_enrollment, 1);
}

#[tokio::test]
async fn test_is_enrolled_is_computed_per_viewer() {
    let t = TestStore::new().await;
    let course_id = t.course("Viewing").await;
    let enrolled = t.user("enrolled").await;
    let visitor = t.user("visitor").await;
    t.store
        .enrollments
        .create(NewEnrollment::audit(enrolled, course_id))
        .await
        .expect("enrollment should be created");

    let courses = &t.store.courses;
    let as_enrolled = courses
        .view_for(course_id, Some(enrolled))
        .await
        .expect("view should load")
        .expect("course should exist");
    let as_visitor = courses
        .view_for(course_id, Some(visitor))
        .await
        .expect("view should load")
        .expect("course should exist");
    let anonymous = courses
        .view_for(course_id, None)
        .await
        .expect("view should load")
        .expect("course should exist");

    assert!(as_enrolled.is_enrolled);
    assert!(!as_visitor.is_enrolled);
    assert!(!anonymous.is_enrolled);
    assert_eq!(as_enrolled.total_enrollment, 1);
}

#[tokio::test]
async fn test_submission_is_scored_once() {
    let t = TestStore::new().await;
    let course_id = t.course("Quiz").await;
    let user_id = t.user("quizzer").await;
    let question = t.question(course_id, 10, &[true, false, false, false]).await;
    let enrollment = t
        .store
        .enrollments
        .create(NewEnrollment::audit(user_id, course_id))
        .await
        .expect("enrollment should be created");

    let choices: Vec<ChoiceId> = t
        .store
        .choices
        .list(ChoiceFilter {
            question_id: Some(question),
            ..ChoiceFilter::default()
        })
        .await
        .expect("list should succeed")
        .into_iter()
        .map(|choice| choice.id)
        .collect();

    let submissions = &t.store.submissions;
    let submission = submissions
        .create(NewSubmission {
            enrollment_id: enrollment.id,
            selected_choice_ids: vec![choices[0], choices[0]],
        })
        .await
        .expect("submission should be created");
    assert!(!submission.is_scored());
    assert_eq!(submission.selected_choice_ids, vec![choices[0]]);
    assert_eq!(submission.summary, SubmissionSummary::default());

    let changed = submissions
        .update(submission.id, vec![choices[1], choices[2]])
        .await
        .expect("unscored submission can change");
    assert_eq!(changed.selected_choice_ids.len(), 2);

    let score = t
        .store
        .compute_submission_score(&[question])
        .await
        .expect("score should be computed");
    let scored = submissions
        .record_score(submission.id, SubmissionSummary::default().with_score(score))
        .await
        .expect("first scoring succeeds");
    assert!(scored.is_scored());
    assert_eq!(scored.summary.total_score, 3);

    let err = submissions
        .record_score(submission.id, SubmissionSummary::default())
        .await
        .expect_err("already scored");
    assert_eq!(err.kind(), ErrorKind::Integrity);

    let err = submissions
        .update(submission.id, vec![choices[0]])
        .await
        .expect_err("scored submission is frozen");
    assert_eq!(err.kind(), ErrorKind::Integrity);

    let corrected = submissions
        .correct_score(submission.id, SubmissionSummary::default().with_score(4.0))
        .await
        .expect("correction succeeds");
    assert_eq!(corrected.summary.total_score, 4);

    let scored_list = submissions
        .list(SubmissionFilter {
            enrollment_id: Some(enrollment.id),
            scored: Some(true),
        })
        .await
        .expect("list should succeed");
    assert_eq!(scored_list.len(), 1);
    assert_eq!(scored_list[0].id, corrected.id);
    assert_eq!(scored_list[0].summary.total_score, 4);
}

#[tokio::test]
async fn test_submission_rejects_missing_references() {
    let t = TestStore::new().await;
    let course_id = t.course("Quiz").await;
    let user_id = t.user("quizzer").await;
    let enrollment = t
        .store
        .enrollments
        .create(NewEnrollment::audit(user_id, course_id))
        .await
        .expect("enrollment should be created");
    let submissions = &t.store.submissions;

    let err = submissions
        .create(NewSubmission {
            enrollment_id: enrollment.id,
            selected_choice_ids: vec![ChoiceId::new()],
        })
        .await
        .expect_err("choice must exist");
    assert_eq!(err.kind(), ErrorKind::Integrity);

    let remaining = submissions
        .list(SubmissionFilter::default())
        .await
        .expect("list should succeed");
    assert!(remaining.is_empty(), "failed create must not leave a row");

    let submission = submissions
        .create(NewSubmission {
            enrollment_id: enrollment.id,
            selected_choice_ids: Vec::new(),
        })
        .await
        .expect("empty selection is allowed");
    let err = submissions
        .correct_score(submission.id, SubmissionSummary::default())
        .await
        .expect_err("correction needs a prior score");
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[tokio::test]
async fn test_question_update_changes_the_score() {
    let t = TestStore::new().await;
    let course_id = t.course("Regrade").await;
    let question = t.question(course_id, 10, &[true, false]).await;
    let questions = &t.store.questions;

    let err = questions
        .update(
            question,
            UpdateQuestion {
                grade_point: Some(-1),
                ..UpdateQuestion::default()
            },
        )
        .await
        .expect_err("negative grade point");
    assert_eq!(err.kind(), ErrorKind::Validation);

    let updated = questions
        .update(
            question,
            UpdateQuestion {
                text: Some("reworded".to_string()),
                grade_point: Some(20),
            },
        )
        .await
        .expect("update should succeed");
    assert_eq!(updated.text, "reworded");
    assert_eq!(updated.grade_point.value(), 20);

    let score = t
        .store
        .compute_submission_score(&[question])
        .await
        .expect("score should be computed");
    assert_eq!(score, 10.0);

    let err = questions
        .update(QuestionId::new(), UpdateQuestion::default())
        .await
        .expect_err("unknown question");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_selected_choices_are_reported_in_one_order() {
    let t = TestStore::new().await;
    let course_id = t.course("Ordering").await;
    let user_id = t.user("orderly").await;
    let question = t.question(course_id, 8, &[true, false, true, false]).await;
    let enrollment = t
        .store
        .enrollments
        .create(NewEnrollment::audit(user_id, course_id))
        .await
        .expect("enrollment should be created");

    let mut selected: Vec<ChoiceId> = t
        .store
        .choices
        .list(ChoiceFilter {
            question_id: Some(question),
            ..ChoiceFilter::default()
        })
        .await
        .expect("list should succeed")
        .into_iter()
        .map(|choice| choice.id)
        .collect();
    selected.reverse();

    let created = t
        .store
        .submissions
        .create(NewSubmission {
            enrollment_id: enrollment.id,
            selected_choice_ids: selected,
        })
        .await
        .expect("submission should be created");
    let found = t
        .store
        .submissions
        .find_by_id(created.id)
        .await
        .expect("lookup should succeed")
        .expect("submission should exist");
    let listed = t
        .store
        .submissions
        .list(SubmissionFilter {
            enrollment_id: Some(enrollment.id),
            ..SubmissionFilter::default()
        })
        .await
        .expect("list should succeed");

    assert_eq!(created.selected_choice_ids.len(), 4);
    assert_eq!(found.selected_choice_ids, created.selected_choice_ids);
    assert_eq!(listed[0].selected_choice_ids, created.selected_choice_ids);
}
