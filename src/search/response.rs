use serde::{Deserialize, Serialize};

/// Envelope every Stack Exchange API response is wrapped in.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    pub quota_remaining: Option<u32>,
    pub error_id: Option<u32>,
    pub error_name: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub display_name: String,
    pub reputation: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question_id")]
    pub id: u64,
    pub title: String,
    pub link: String,
    pub score: i64,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub answer_count: u64,
    #[serde(default)]
    pub is_answered: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub body: Option<String>,
    pub owner: Option<Owner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "answer_id")]
    pub id: u64,
    pub question_id: u64,
    pub score: i64,
    #[serde(default)]
    pub is_accepted: bool,
    #[serde(default)]
    pub body: String,
    pub owner: Option<Owner>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_stack_exchange_payload() {
        let payload = json!({
            "items": [{
                "question_id": 11,
                "title": "Why is &quot;this&quot; undefined?",
                "link": "https://stackoverflow.com/q/11",
                "score": 42,
                "view_count": 1000,
                "answer_count": 3,
                "is_answered": true,
                "tags": ["javascript", "this"],
                "owner": { "display_name": "someone", "reputation": 99, "user_type": "registered" },
                "creation_date": 1_600_000_000
            }],
            "has_more": false,
            "quota_remaining": 290
        });

        let response: ApiResponse<Question> = serde_json::from_value(payload).unwrap();
        assert_eq!(response.quota_remaining, Some(290));
        let question = &response.items[0];
        assert_eq!(question.id, 11);
        assert_eq!(question.tags, vec!["javascript", "this"]);
        assert_eq!(question.owner.as_ref().map(|o| o.reputation), Some(Some(99)));
        assert!(question.body.is_none());
    }

    #[test]
    fn test_parses_error_envelope() {
        let payload = json!({
            "error_id": 502,
            "error_name": "throttle_violation",
            "error_message": "too many requests from this IP"
        });
        let response: ApiResponse<Answer> = serde_json::from_value(payload).unwrap();
        assert!(response.items.is_empty());
        assert_eq!(response.error_id, Some(502));
    }

    #[test]
    fn test_answer_from_deleted_user() {
        let payload = json!({
            "answer_id": 5,
            "question_id": 11,
            "score": -1,
            "is_accepted": false,
            "body": "<p>try this</p>",
            "owner": { "user_type": "does_not_exist", "display_name": "user123" }
        });
        let answer: Answer = serde_json::from_value(payload).unwrap();
        assert_eq!(answer.owner.unwrap().reputation, None);
        assert_eq!(answer.score, -1);
    }
}
