// src/models/exam.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the four answer letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "A" => Some(OptionKey::A),
            "B" => Some(OptionKey::B),
            "C" => Some(OptionKey::C),
            "D" => Some(OptionKey::D),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
        }
    }
}

/// A stored question, including its answer key.
/// Persisted as part of the exam's `quiz_list` JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Per-exam ordinal, unique within the exam.
    pub sno: i64,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: OptionKey,
}

/// Represents the 'exams' table in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: Uuid,
    pub name: String,
    /// Questions in stored order.
    pub quiz_list: Vec<Question>,
    /// Owning admin.
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload for the exam repository. Already validated.
#[derive(Debug, Clone)]
pub struct NewExam {
    pub name: String,
    pub quiz_list: Vec<Question>,
    pub created_by: Uuid,
}

/// A question as submitted by the admin client.
/// Every field defaults so that missing values surface as validation errors
/// rather than deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[serde(default)]
    pub sno: Option<i64>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub option_a: String,
    #[serde(default)]
    pub option_b: String,
    #[serde(default)]
    pub option_c: String,
    #[serde(default)]
    pub option_d: String,
    #[serde(default)]
    pub correct_option: String,
}

/// DTO for creating a new exam.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quiz_list: Vec<QuestionInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamResponse {
    pub message: &'static str,
    pub exam_id: Uuid,
}

/// DTO for sending a question to the taker. Has no answer key field at all.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub sno: i64,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            sno: q.sno,
            question: q.question.clone(),
            option_a: q.option_a.clone(),
            option_b: q.option_b.clone(),
            option_c: q.option_c.clone(),
            option_d: q.option_d.clone(),
        }
    }
}

/// Redacted exam, safe to hand to a student.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamView {
    pub exam_id: Uuid,
    pub name: String,
    pub total_questions: usize,
    pub quiz_list: Vec<PublicQuestion>,
}

impl From<&Exam> for ExamView {
    fn from(exam: &Exam) -> Self {
        let quiz_list: Vec<PublicQuestion> = exam.quiz_list.iter().map(PublicQuestion::from).collect();
        Self {
            exam_id: exam.id,
            name: exam.name.clone(),
            total_questions: quiz_list.len(),
            quiz_list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_key_parses_only_the_four_letters() {
        assert_eq!(OptionKey::parse("A"), Some(OptionKey::A));
        assert_eq!(OptionKey::parse(" d "), None);
        assert_eq!(OptionKey::parse("D"), Some(OptionKey::D));
        assert_eq!(OptionKey::parse("E"), None);
        assert_eq!(OptionKey::parse(""), None);
    }

    #[test]
    fn question_document_uses_client_field_names() {
        let q = Question {
            sno: 1,
            question: "2 + 2".to_string(),
            option_a: "3".to_string(),
            option_b: "4".to_string(),
            option_c: "5".to_string(),
            option_d: "6".to_string(),
            correct_option: OptionKey::B,
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["optionA"], "3");
        assert_eq!(json["correctOption"], "B");
    }

    #[test]
    fn public_question_has_no_answer_key() {
        let q = Question {
            sno: 7,
            question: "Capital of France?".to_string(),
            option_a: "Paris".to_string(),
            option_b: "Rome".to_string(),
            option_c: "Berlin".to_string(),
            option_d: "Madrid".to_string(),
            correct_option: OptionKey::A,
        };
        let json = serde_json::to_value(PublicQuestion::from(&q)).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("correctOption"));
        assert_eq!(obj["sno"], 7);
    }
}
