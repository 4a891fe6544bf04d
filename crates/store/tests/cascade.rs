mod common;

use common::TestStore;
use coursedb_core::domain::Occupation;
use coursedb_store::repository::{
    ChoiceFilter, EnrollmentFilter, LessonFilter, NewEnrollment, NewInstructor, NewLearner,
    NewLesson, NewSubmission, QuestionFilter, SubmissionFilter,
};

#[tokio::test]
async fn test_course_delete_removes_everything_it_owns() {
    let t = TestStore::new().await;
    let course_id = t.course("Doomed").await;
    let survivor = t.course("Survivor").await;
    let user_id = t.user("student").await;

    t.store
        .lessons
        .create(NewLesson {
            course_id,
            title: Some("Only lesson".to_string()),
            order: 0,
            content: "text".to_string(),
        })
        .await
        .expect("lesson should be created");
    let question = t.question(course_id, 10, &[true, false]).await;
    let kept_question = t.question(survivor, 3, &[true]).await;
    let enrollment = t
        .store
        .enrollments
        .create(NewEnrollment::audit(user_id, course_id))
        .await
        .expect("enrollment should be created");
    t.store
        .submissions
        .create(NewSubmission {
            enrollment_id: enrollment.id,
            selected_choice_ids: Vec::new(),
        })
        .await
        .expect("submission should be created");

    t.store
        .courses
        .delete(course_id)
        .await
        .expect("delete should succeed");

    let store = &t.store;
    assert!(store.courses.find_by_id(course_id).await.expect("lookup").is_none());
    assert!(
        store
            .lessons
            .list(LessonFilter {
                course_id: Some(course_id),
            })
            .await
            .expect("list")
            .is_empty()
    );
    assert!(store.questions.find_by_id(question).await.expect("lookup").is_none());
    assert!(
        store
            .choices
            .list(ChoiceFilter {
                question_id: Some(question),
                ..ChoiceFilter::default()
            })
            .await
            .expect("list")
            .is_empty()
    );
    assert!(store.enrollments.find_by_id(enrollment.id).await.expect("lookup").is_none());
    assert!(
        store
            .submissions
            .list(SubmissionFilter::default())
            .await
            .expect("list")
            .is_empty()
    );

    let kept = store
        .questions
        .list(QuestionFilter {
            course_id: Some(survivor),
        })
        .await
        .expect("list");
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, kept_question);
}

#[tokio::test]
async fn test_user_delete_removes_profiles_and_releases_seats() {
    let t = TestStore::new().await;
    let first_course = t.course("First").await;
    let second_course = t.course("Second").await;
    let leaving = t.user("leaving").await;
    let staying = t.user("staying").await;
    let store = &t.store;

    store
        .instructors
        .create(NewInstructor::full_time(leaving))
        .await
        .expect("instructor should be created");
    store
        .learners
        .create(NewLearner {
            user_id: leaving,
            occupation: Occupation::Developer,
            social_link: "https://example.com/leaving".to_string(),
        })
        .await
        .expect("learner should be created");
    for course_id in [first_course, second_course] {
        store
            .enrollments
            .create(NewEnrollment::audit(leaving, course_id))
            .await
            .expect("enrollment should be created");
    }
    store
        .enrollments
        .create(NewEnrollment::audit(staying, first_course))
        .await
        .expect("enrollment should be created");

    store.users.delete(leaving).await.expect("delete should succeed");

    assert!(store.instructors.find_by_user_id(leaving).await.expect("lookup").is_none());
    assert!(store.learners.find_by_user_id(leaving).await.expect("lookup").is_none());
    assert!(
        store
            .enrollments
            .list(EnrollmentFilter {
                user_id: Some(leaving),
                ..EnrollmentFilter::default()
            })
            .await
            .expect("list")
            .is_empty()
    );

    let first = store
        .courses
        .find_by_id(first_course)
        .await
        .expect("lookup")
        .expect("course should exist");
    let second = store
        .courses
        .find_by_id(second_course)
        .await
        .expect("lookup")
        .expect("course should exist");
    assert_eq!(first.total_enrollment, 1);
    assert_eq!(second.total_enrollment, 0);
}

#[tokio::test]
async fn test_question_delete_removes_choices_and_selections() {
    let t = TestStore::new().await;
    let course_id = t.course("Quiz").await;
    let user_id = t.user("quizzer").await;
    let question = t.question(course_id, 4, &[true, false]).await;
    let choice = t
        .store
        .choices
        .list(ChoiceFilter {
            question_id: Some(question),
            is_correct: Some(true),
        })
        .await
        .expect("list")
        .remove(0);
    let enrollment = t
        .store
        .enrollments
        .create(NewEnrollment::audit(user_id, course_id))
        .await
        .expect("enrollment should be created");
    let submission = t
        .store
        .submissions
        .create(NewSubmission {
            enrollment_id: enrollment.id,
            selected_choice_ids: vec![choice.id],
        })
        .await
        .expect("submission should be created");

    t.store
        .questions
        .delete(question)
        .await
        .expect("delete should succeed");

    assert!(t.store.choices.find_by_id(choice.id).await.expect("lookup").is_none());
    let submission = t
        .store
        .submissions
        .find_by_id(submission.id)
        .await
        .expect("lookup")
        .expect("submission survives its choices");
    assert!(submission.selected_choice_ids.is_empty());
}

#[tokio::test]
async fn test_enrollment_delete_removes_submissions() {
    let t = TestStore::new().await;
    let course_id = t.course("Quiz").await;
    let user_id = t.user("quizzer").await;
    let enrollment = t
        .store
        .enrollments
        .create(NewEnrollment::audit(user_id, course_id))
        .await
        .expect("enrollment should be created");
    let submission = t
        .store
        .submissions
        .create(NewSubmission {
            enrollment_id: enrollment.id,
            selected_choice_ids: Vec::new(),
        })
        .await
        .expect("submission should be created");

    t.store
        .enrollments
        .delete(enrollment.id)
        .await
        .expect("delete should succeed");

    assert!(t.store.submissions.find_by_id(submission.id).await.expect("lookup").is_none());
    let course = t
        .store
        .courses
        .find_by_id(course_id)
        .await
        .expect("lookup")
        .expect("course should exist");
    assert_eq!(course.total_enrollment, 0);
}
