use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use crate::database::models::Question;

/// Category id meaning "questions from every category"
pub const ALL_CATEGORIES: i64 = 0;

/// Pick one question uniformly at random among `candidates` whose id is not
/// in `previous`. `None` once every candidate has been seen.
pub fn pick_question<'a, R>(candidates: &'a [Question], previous: &[i64], rng: &mut R) -> Option<&'a Question>
where
    R: Rng + ?Sized,
{
    let seen: HashSet<i64> = previous.iter().copied().collect();
    let remaining: Vec<&Question> = candidates.iter().filter(|q| !seen.contains(&q.id)).collect();
    remaining.choose(rng).copied()
}
