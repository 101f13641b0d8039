//! In-memory row shapes produced by the generators before insertion.

use kindergrove_models::assessments::{AgeBand, Dimension, QuestionType};
use kindergrove_models::todos::TodoStatus;
use kindergrove_models::{AssessmentConfigId, UserId};

/// Seed data for one assessment config (one age band).
pub struct ConfigSeed {
    pub id: AssessmentConfigId,
    pub band: AgeBand,
    pub name: String,
    pub description: String,
}

/// Seed data for one assessment question.
pub struct QuestionSeed {
    pub config_id: AssessmentConfigId,
    pub dimension: Dimension,
    pub band: AgeBand,
    pub question_type: QuestionType,
    pub title: String,
    pub content: serde_json::Value,
    pub game_config: Option<serde_json::Value>,
    pub difficulty: i16,
    pub score: i32,
    pub sort_order: i32,
}

/// The full generated question bank.
pub struct AssessmentBank {
    pub configs: Vec<ConfigSeed>,
    pub questions: Vec<QuestionSeed>,
}

/// Seed data for creating a parent account.
pub struct ParentSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Seed data for creating a todo.
pub struct TodoSeed {
    pub user_id: UserId,
    pub title: String,
    pub status: TodoStatus,
    pub due_on: Option<chrono::NaiveDate>,
}
