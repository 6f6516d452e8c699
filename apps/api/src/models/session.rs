use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Question count used when the submitted value is missing, non-numeric or non-positive.
pub const DEFAULT_NUM_QUESTIONS: u32 = 5;

/// What the candidate is interviewing for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewMeta {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub extra: String,
    #[serde(default = "default_num_questions")]
    pub num_questions: u32,
}

fn default_num_questions() -> u32 {
    DEFAULT_NUM_QUESTIONS
}

/// Parses a submitted question count, falling back to the default.
pub fn parse_num_questions(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(DEFAULT_NUM_QUESTIONS)
}

/// One answered question, in the order it was presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
}

/// Unparsed evaluator reply, already checked for the required headings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub raw_evaluation: String,
}

/// One interview attempt as persisted in the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub meta: InterviewMeta,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Outcome of recording one answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// More questions remain; carries the next question.
    Next(String),
    /// Every question has been answered.
    Finished,
}

impl Session {
    pub fn new(meta: InterviewMeta, questions: Vec<String>) -> Self {
        Self {
            meta,
            questions,
            answers: Vec::new(),
            current_index: 0,
            evaluation: None,
            created_at: Some(Utc::now()),
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// The question at `current_index`, or an empty string once past the end.
    pub fn current_question(&self) -> &str {
        self.questions
            .get(self.current_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Appends `answer` against the current question and advances the index.
    /// The index saturates at `total()`; repeated submissions at the end append again.
    pub fn record_answer(&mut self, answer: String) -> Advance {
        let question = self.current_question().to_string();
        self.answers.push(AnswerRecord { question, answer });
        self.current_index = (self.current_index + 1).min(self.total());

        if self.current_index < self.total() {
            Advance::Next(self.current_question().to_string())
        } else {
            Advance::Finished
        }
    }
}
