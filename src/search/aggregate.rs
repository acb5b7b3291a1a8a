use indexmap::IndexMap;
use std::cmp::Ordering;

use super::response::{Answer, Question};

/// Answers keyed by owning question id. Only ids that received at least one
/// answer have a key.
pub type AnswerGroups = IndexMap<u64, Vec<Answer>>;

pub struct ResultAggregator;

impl ResultAggregator {
    /// Groups answers by question, keys in first-seen order, each group
    /// ranked accepted-first then by descending score. The sort is stable so
    /// equally ranked answers keep their arrival order.
    pub fn group(answers: impl IntoIterator<Item = Answer>) -> AnswerGroups {
        let mut groups = AnswerGroups::new();
        for answer in answers {
            groups.entry(answer.question_id).or_default().push(answer);
        }
        for answers in groups.values_mut() {
            answers.sort_by(rank);
        }
        groups
    }

    /// Re-keys `groups` into the order `questions` are listed. Groups whose
    /// question is not listed follow in their original order.
    pub fn order_by_questions(mut groups: AnswerGroups, questions: &[Question]) -> AnswerGroups {
        let mut ordered = AnswerGroups::with_capacity(groups.len());
        for question in questions {
            if let Some(answers) = groups.shift_remove(&question.id) {
                ordered.insert(question.id, answers);
            }
        }
        ordered.extend(groups);
        ordered
    }
}

fn rank(a: &Answer, b: &Answer) -> Ordering {
    b.is_accepted
        .cmp(&a.is_accepted)
        .then_with(|| b.score.cmp(&a.score))
}
