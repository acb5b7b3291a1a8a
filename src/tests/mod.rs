use crate::search::{Answer, Owner, Question};
use serde_json::{json, Value};


// Test utilities and helpers
pub(crate) struct TestUtils;

impl TestUtils {
    pub fn question(id: u64, score: i64) -> Question {
        Question {
            id,
            title: format!("How do I fix error {id}?"),
            link: format!("https://stackoverflow.com/questions/{id}"),
            score,
            view_count: 100 * id,
            answer_count: 2,
            is_answered: true,
            tags: vec!["javascript".to_string()],
            body: None,
            owner: Some(Owner {
                display_name: "asker".to_string(),
                reputation: Some(10),
            }),
        }
    }

    pub fn answer(id: u64, question_id: u64, score: i64, is_accepted: bool) -> Answer {
        Answer {
            id,
            question_id,
            score,
            is_accepted,
            body: format!("<p>Answer {id}</p><pre><code>const fixed = value ?? fallback;</code></pre>"),
            owner: None,
        }
    }

    pub fn questions_json(questions: &[Question]) -> Value {
        json!({ "items": questions, "has_more": false, "quota_remaining": 299 })
    }

    pub fn answers_json(answers: &[Answer]) -> Value {
        json!({ "items": answers, "has_more": false, "quota_remaining": 298 })
    }
}
