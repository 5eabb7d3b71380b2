//! Balanced test assembly.
//!
//! Builds an ordered question list under a target easy/medium/hard quota,
//! degrading gracefully when a difficulty bucket is short: the shortfall
//! is refilled from the remaining buckets' spare capacity, easiest first,
//! so the test stays as approachable as possible.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AssemblyError;
use crate::model::{Difficulty, DifficultyQuota, Question};
use crate::traits::{CancelToken, QuestionRepository};

/// The outcome of one test assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledTest {
    /// Selected questions, grouped by ascending difficulty; within a group
    /// the order is the random sample's order.
    pub questions: Vec<Question>,
    /// The ideal per-difficulty quota for the requested size.
    pub target: DifficultyQuota,
    /// What was actually drawn per difficulty.
    pub actual: DifficultyQuota,
    /// Soft signal that at least one bucket was short and the test
    /// deviates from the ideal quota.
    pub fallback_used: bool,
}

/// Split `total` into three per-difficulty quotas as evenly as possible,
/// handing the remainder out one unit at a time starting from the easiest
/// bucket: 10 → {4, 3, 3}, 9 → {3, 3, 3}, 11 → {4, 4, 3}.
pub fn target_quota(total: usize) -> DifficultyQuota {
    let base = total / 3;
    let remainder = total % 3;
    let mut quota = DifficultyQuota::default();
    for (i, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        quota.set(difficulty, base + usize::from(i < remainder));
    }
    quota
}

/// Shuffle the grouped question order in place. The assembler always
/// returns easy→medium→hard groups; whether those groups are interleaved
/// for presentation is the caller's choice.
pub fn interleave<R: Rng + ?Sized>(questions: &mut [Question], rng: &mut R) {
    questions.shuffle(rng);
}

/// Assembles balanced tests from a question repository.
pub struct TestAssembler {
    repository: Arc<dyn QuestionRepository>,
}

impl TestAssembler {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    /// Build a test of up to `total` questions, optionally scoped to one
    /// category.
    ///
    /// The three per-difficulty pool reads are issued concurrently; they
    /// are independent and read-only, and the merge below is deterministic
    /// regardless of arrival order. The final selected count is
    /// `min(total, Σ pool sizes)` — never more than exists, never fewer
    /// than what is available.
    pub async fn build_test<R>(
        &self,
        total: usize,
        category_id: Option<u64>,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> Result<AssembledTest, AssemblyError>
    where
        R: Rng + Send + ?Sized,
    {
        if cancel.is_cancelled() {
            return Err(AssemblyError::Cancelled);
        }

        let (easy, medium, hard) = tokio::try_join!(
            self.repository.fetch(category_id, Difficulty::Easy, true),
            self.repository.fetch(category_id, Difficulty::Medium, true),
            self.repository.fetch(category_id, Difficulty::Hard, true),
        )?;
        let mut pools = [easy, medium, hard];

        if pools.iter().all(|pool| pool.is_empty()) {
            return Err(AssemblyError::EmptyPool);
        }

        let target = target_quota(total);

        // Shuffle each pool once; drawing a prefix of a uniformly shuffled
        // pool is a uniform sample without replacement, and extending the
        // prefix during redistribution keeps it one.
        for pool in pools.iter_mut() {
            pool.shuffle(rng);
        }

        let mut drawn = DifficultyQuota::default();
        let mut deficit = 0usize;
        for difficulty in Difficulty::ALL {
            let quota = target.get(difficulty);
            let available = pools[bucket_index(difficulty)].len();
            let take = quota.min(available);
            drawn.set(difficulty, take);
            if available < quota {
                deficit += quota - available;
                tracing::warn!(
                    %difficulty,
                    quota,
                    available,
                    "difficulty pool short of quota, redistributing"
                );
            }
        }

        let fallback_used = deficit > 0;

        // Refill the shortfall from spare capacity, easiest buckets first.
        if deficit > 0 {
            for difficulty in Difficulty::ALL {
                if deficit == 0 {
                    break;
                }
                let index = bucket_index(difficulty);
                let spare = pools[index].len() - drawn.get(difficulty);
                let extra = spare.min(deficit);
                if extra > 0 {
                    drawn.set(difficulty, drawn.get(difficulty) + extra);
                    deficit -= extra;
                    tracing::debug!(%difficulty, extra, "refilled shortfall from spare capacity");
                }
            }
        }

        let mut questions = Vec::with_capacity(drawn.total());
        for difficulty in Difficulty::ALL {
            let index = bucket_index(difficulty);
            questions.extend(pools[index].drain(..).take(drawn.get(difficulty)));
        }

        Ok(AssembledTest {
            questions,
            target,
            actual: drawn,
            fallback_used,
        })
    }
}

fn bucket_index(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => 0,
        Difficulty::Medium => 1,
        Difficulty::Hard => 2,
    }
}

/// Check an assembled question list for duplicate ids. The assembler never
/// produces them; repositories that return overlapping pools would.
pub fn has_duplicates(questions: &[Question]) -> bool {
    let mut seen = HashSet::new();
    questions.iter().any(|q| !seen.insert(q.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, OptionLabel};
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FixedRepo {
        easy: usize,
        medium: usize,
        hard: usize,
    }

    #[async_trait]
    impl QuestionRepository for FixedRepo {
        async fn fetch(
            &self,
            _category_id: Option<u64>,
            difficulty: Difficulty,
            _active_only: bool,
        ) -> anyhow::Result<Vec<Question>> {
            let (count, offset) = match difficulty {
                Difficulty::Easy => (self.easy, 0),
                Difficulty::Medium => (self.medium, 1000),
                Difficulty::Hard => (self.hard, 2000),
            };
            Ok((0..count as u64)
                .map(|i| question(offset + i, difficulty))
                .collect())
        }

        async fn categories(&self, _active_only: bool) -> anyhow::Result<Vec<Category>> {
            Ok(vec![])
        }
    }

    fn question(id: u64, difficulty: Difficulty) -> Question {
        Question {
            id,
            text: format!("q{id}"),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct: OptionLabel::A,
            difficulty,
            category_ids: vec![1],
            explanation: None,
            relevance_until: None,
            active: true,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn quota_splits_evenly_with_remainder_to_easiest() {
        assert_eq!(
            target_quota(10),
            DifficultyQuota { easy: 4, medium: 3, hard: 3 }
        );
        assert_eq!(
            target_quota(9),
            DifficultyQuota { easy: 3, medium: 3, hard: 3 }
        );
        assert_eq!(
            target_quota(11),
            DifficultyQuota { easy: 4, medium: 4, hard: 3 }
        );
        assert_eq!(
            target_quota(1),
            DifficultyQuota { easy: 1, medium: 0, hard: 0 }
        );
        assert_eq!(target_quota(0), DifficultyQuota::default());
    }

    #[test]
    fn quota_parts_sum_and_stay_within_one() {
        for total in 0..50 {
            let quota = target_quota(total);
            assert_eq!(quota.total(), total);
            let counts = [quota.easy, quota.medium, quota.hard];
            let max = counts.iter().max().unwrap();
            let min = counts.iter().min().unwrap();
            assert!(max - min <= 1, "uneven split for {total}: {quota:?}");
        }
    }

    #[tokio::test]
    async fn ample_pools_fill_the_quota_exactly() {
        let assembler = TestAssembler::new(Arc::new(FixedRepo {
            easy: 20,
            medium: 20,
            hard: 20,
        }));
        let test = assembler
            .build_test(10, None, &mut rng(), &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(test.questions.len(), 10);
        assert!(!test.fallback_used);
        assert_eq!(test.target, test.actual);
        assert!(!has_duplicates(&test.questions));

        // Grouped ascending by difficulty.
        let difficulties: Vec<Difficulty> =
            test.questions.iter().map(|q| q.difficulty).collect();
        let mut sorted = difficulties.clone();
        sorted.sort();
        assert_eq!(difficulties, sorted);
    }

    #[tokio::test]
    async fn short_bucket_refills_from_easier_pools_first() {
        // 9 requested, pools {10, 10, 1}: hard is 2 short, easy has spare.
        let assembler = TestAssembler::new(Arc::new(FixedRepo {
            easy: 10,
            medium: 10,
            hard: 1,
        }));
        let test = assembler
            .build_test(9, None, &mut rng(), &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(
            test.target,
            DifficultyQuota { easy: 3, medium: 3, hard: 3 }
        );
        assert_eq!(test.actual.hard, 1);
        assert_eq!(test.actual.easy, 5, "shortfall refills easiest-first");
        assert_eq!(test.actual.medium, 3);
        assert_eq!(test.questions.len(), 9);
        assert!(test.fallback_used);
    }

    #[tokio::test]
    async fn combined_shortfall_caps_at_available_total() {
        let assembler = TestAssembler::new(Arc::new(FixedRepo {
            easy: 2,
            medium: 1,
            hard: 0,
        }));
        let test = assembler
            .build_test(12, None, &mut rng(), &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(test.questions.len(), 3);
        assert_eq!(test.actual.total(), 3);
        assert!(test.fallback_used);
        assert!(!has_duplicates(&test.questions));
    }

    #[tokio::test]
    async fn empty_pool_is_an_error_not_an_empty_test() {
        let assembler = TestAssembler::new(Arc::new(FixedRepo {
            easy: 0,
            medium: 0,
            hard: 0,
        }));
        let err = assembler
            .build_test(10, None, &mut rng(), &CancelToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AssemblyError::EmptyPool));
    }

    #[tokio::test]
    async fn cancelled_before_fetch() {
        let assembler = TestAssembler::new(Arc::new(FixedRepo {
            easy: 10,
            medium: 10,
            hard: 10,
        }));
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = assembler
            .build_test(10, None, &mut rng(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, AssemblyError::Cancelled));
    }

    #[tokio::test]
    async fn draws_vary_across_rng_states() {
        let assembler = TestAssembler::new(Arc::new(FixedRepo {
            easy: 50,
            medium: 50,
            hard: 50,
        }));
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        let cancel = CancelToken::new();

        let first = assembler.build_test(9, None, &mut a, &cancel).await.unwrap();
        let second = assembler.build_test(9, None, &mut b, &cancel).await.unwrap();

        let ids = |t: &AssembledTest| t.questions.iter().map(|q| q.id).collect::<Vec<_>>();
        assert_ne!(ids(&first), ids(&second));
    }

    #[test]
    fn interleave_keeps_the_same_questions() {
        let mut questions: Vec<Question> = (0..9)
            .map(|i| question(i, Difficulty::ALL[(i % 3) as usize]))
            .collect();
        let mut ids: Vec<u64> = questions.iter().map(|q| q.id).collect();

        interleave(&mut questions, &mut rng());

        let mut after: Vec<u64> = questions.iter().map(|q| q.id).collect();
        ids.sort_unstable();
        after.sort_unstable();
        assert_eq!(ids, after);
    }
}
