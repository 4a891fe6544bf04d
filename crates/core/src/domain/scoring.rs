use async_trait::async_trait;

use super::{DomainError, GradePoint, QuestionId};

/// Choice counts of a single question, as needed to score it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTally {
    pub grade_point: GradePoint,
    pub correct_choices: u32,
    pub total_choices: u32,
}

impl QuestionTally {
    pub fn from_choices<I>(grade_point: GradePoint, correctness: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut tally = Self {
            grade_point,
            correct_choices: 0,
            total_choices: 0,
        };

        for is_correct in correctness {
            if is_correct {
                tally.correct_choices += 1;
            }
            tally.total_choices += 1;
        }

        tally
    }

    /// Score contributed by this question.
    ///
    /// A question without choices contributes nothing, a question whose
    /// choices are all correct contributes its full grade point, and any other
    /// question contributes `grade_point * correct / total`.
    pub fn contribution(&self) -> f64 {
        if self.total_choices == 0 {
            0.0
        } else if self.correct_choices == self.total_choices {
            self.grade_point.as_f64()
        } else {
            self.grade_point.as_f64()
                * (f64::from(self.correct_choices) / f64::from(self.total_choices))
        }
    }
}

/// Read access to questions and their choices.
#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    type Error: From<DomainError> + Send;

    async fn tally(&self, question_id: QuestionId) -> Result<Option<QuestionTally>, Self::Error>;
}

/// Sums the contribution of every question in `question_ids`.
///
/// Fails with [`DomainError::QuestionNotFound`] on the first id the catalog
/// cannot resolve; no partial total is returned.
pub async fn compute_submission_score<C>(
    catalog: &C,
    question_ids: &[QuestionId],
) -> Result<f64, C::Error>
where
    C: QuestionCatalog + ?Sized,
{
    let mut total_score = 0.0;

    for &question_id in question_ids {
        let tally = catalog
            .tally(question_id)
            .await?
            .ok_or(DomainError::QuestionNotFound(question_id))?;
        total_score += tally.contribution();
    }

    Ok(total_score)
}

/// Converts a computed score into the integer `total_score` column,
/// rounding half away from zero.
pub fn stored_total_score(score: f64) -> i32 {
    score.round() as i32
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct InMemoryCatalog {
        questions: HashMap<QuestionId, QuestionTally>,
    }

    impl InMemoryCatalog {
        fn insert(&mut self, grade_point: i32, choices: &[bool]) -> QuestionId {
            let id = QuestionId::new();
            let grade_point = GradePoint::new(grade_point).expect("grade point should be valid");
            self.questions.insert(
                id,
                QuestionTally::from_choices(grade_point, choices.iter().copied()),
            );
            id
        }
    }

    #[async_trait]
    impl QuestionCatalog for InMemoryCatalog {
        type Error = DomainError;

        async fn tally(&self, question_id: QuestionId) -> Result<Option<QuestionTally>, DomainError> {
            Ok(self.questions.get(&question_id).copied())
        }
    }

    fn fixture() -> (InMemoryCatalog, QuestionId, QuestionId, QuestionId) {
        let mut catalog = InMemoryCatalog::default();
        let q1 = catalog.insert(10, &[true, true]);
        let q2 = catalog.insert(10, &[true, false, false, false]);
        let q3 = catalog.insert(5, &[]);
        (catalog, q1, q2, q3)
    }

    #[test]
    fn question_without_choices_contributes_zero() {
        let grade_point = GradePoint::new(7).expect("valid grade point");
        let tally = QuestionTally::from_choices(grade_point, []);

        assert_eq!(tally.total_choices, 0);
        assert_eq!(tally.contribution(), 0.0);
    }

    #[test]
    fn all_correct_question_contributes_full_grade_point() {
        let grade_point = GradePoint::new(3).expect("valid grade point");
        let tally = QuestionTally::from_choices(grade_point, [true, true, true]);

        assert_eq!(tally.contribution(), 3.0);
    }

    #[test]
    fn partially_correct_question_is_strictly_between_bounds() {
        let grade_point = GradePoint::new(9).expect("valid grade point");
        let tally = QuestionTally::from_choices(grade_point, [true, false, true]);

        let score = tally.contribution();
        assert_eq!(score, 9.0 * (2.0 / 3.0));
        assert!(score > 0.0 && score < 9.0);
    }

    #[test]
    fn question_without_correct_choices_contributes_zero() {
        let grade_point = GradePoint::new(4).expect("valid grade point");
        let tally = QuestionTally::from_choices(grade_point, [false, false]);

        assert_eq!(tally.contribution(), 0.0);
    }

    #[tokio::test]
    async fn single_question_scenarios() {
        let (catalog, q1, q2, q3) = fixture();

        assert_eq!(compute_submission_score(&catalog, &[q1]).await, Ok(10.0));
        assert_eq!(compute_submission_score(&catalog, &[q2]).await, Ok(2.5));
        assert_eq!(compute_submission_score(&catalog, &[q3]).await, Ok(0.0));
    }

    #[tokio::test]
    async fn total_is_sum_of_contributions_in_any_order() {
        let (catalog, q1, q2, q3) = fixture();

        assert_eq!(
            compute_submission_score(&catalog, &[q1, q2, q3]).await,
            Ok(12.5)
        );
        assert_eq!(
            compute_submission_score(&catalog, &[q3, q1, q2]).await,
            Ok(12.5)
        );
    }

    #[tokio::test]
    async fn empty_question_list_scores_zero() {
        let (catalog, ..) = fixture();

        assert_eq!(compute_submission_score(&catalog, &[]).await, Ok(0.0));
    }

    #[tokio::test]
    async fn unknown_question_fails_fast() {
        let (catalog, q1, ..) = fixture();
        let missing = QuestionId::new();

        let err = compute_submission_score(&catalog, &[q1, missing])
            .await
            .expect_err("unknown question should fail");

        assert_eq!(err, DomainError::QuestionNotFound(missing));
    }

    #[test]
    fn stored_total_rounds_half_away_from_zero() {
        assert_eq!(stored_total_score(12.5), 13);
        assert_eq!(stored_total_score(2.4), 2);
        assert_eq!(stored_total_score(0.0), 0);
    }
}
