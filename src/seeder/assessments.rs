//! Assessment question-bank generation and seeding.
//!
//! One config per age band, every config covering all six dimensions with
//! four questions each: one interactive game plus three guided questions.
//! Generation is deterministic so re-seeding produces the same bank.

use anyhow::{Context, Result, bail};
use kindergrove_models::assessments::{AgeBand, Dimension, QuestionType};
use kindergrove_models::{AssessmentConfigId, AssessmentQuestionId};
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{AssessmentBank, ConfigSeed, QuestionSeed};

/// Questions generated per (config, dimension).
pub const QUESTIONS_PER_DIMENSION: usize = 4;

struct QaTemplate {
    title: &'static str,
    question: &'static str,
    description: &'static str,
    options: [&'static str; 4],
    correct: usize,
}

struct GameTemplate {
    title: &'static str,
    description: &'static str,
    game_type: &'static str,
}

fn game_template(dimension: Dimension) -> GameTemplate {
    match dimension {
        Dimension::Attention => GameTemplate {
            title: "Spot the difference",
            description: "Look carefully at the two pictures and find what is different",
            game_type: "spot_difference",
        },
        Dimension::Memory => GameTemplate {
            title: "Card pairs",
            description: "Flip the cards and remember where the matching pictures hide",
            game_type: "card_pairs",
        },
        Dimension::Logic => GameTemplate {
            title: "Shape sorter",
            description: "Drag each shape into the hole where it belongs",
            game_type: "shape_sorter",
        },
        Dimension::Language => GameTemplate {
            title: "Sound and picture",
            description: "Listen to the word and tap the picture it names",
            game_type: "sound_picture",
        },
        Dimension::Motor => GameTemplate {
            title: "Follow the line",
            description: "Trace the dotted line without lifting your finger",
            game_type: "trace_line",
        },
        Dimension::Social => GameTemplate {
            title: "Feelings match",
            description: "Match each face with how the child in the story feels",
            game_type: "feelings_match",
        },
    }
}

fn qa_templates(dimension: Dimension) -> [QaTemplate; 3] {
    match dimension {
        Dimension::Attention => [
            QaTemplate {
                title: "Which animal is biggest?",
                question: "Which of these animals is the biggest?",
                description: "Name the four animals out loud, then let the child answer",
                options: ["Elephant", "Cat", "Bird", "Fish"],
                correct: 0,
            },
            QaTemplate {
                title: "Find the matching item",
                question: "Which item appears in both pictures?",
                description: "Show both picture cards side by side before asking",
                options: ["Apple", "Banana", "Orange", "Grape"],
                correct: 0,
            },
            QaTemplate {
                title: "What changed?",
                question: "One toy was taken off the table. Which one is missing?",
                description: "Let the child study the table for ten seconds, then cover it and remove one toy",
                options: ["Ball", "Block", "Doll", "Car"],
                correct: 2,
            },
        ],
        Dimension::Memory => [
            QaTemplate {
                title: "What did you just see?",
                question: "Which picture did I show you a moment ago?",
                description: "Show one picture card for five seconds, put it away, then ask",
                options: ["Dog", "House", "Tree", "Sun"],
                correct: 0,
            },
            QaTemplate {
                title: "Remember the order",
                question: "Which color came first?",
                description: "Point at red, yellow, then blue cards in order, then ask",
                options: ["Red", "Yellow", "Blue", "Green"],
                correct: 0,
            },
            QaTemplate {
                title: "Who was in the story?",
                question: "Who helped the rabbit in the story?",
                description: "Read the short story card once before asking",
                options: ["The turtle", "The fox", "The bear", "The bird"],
                correct: 0,
            },
        ],
        Dimension::Logic => [
            QaTemplate {
                title: "What comes next?",
                question: "Circle, square, circle, square... what comes next?",
                description: "Lay the pattern cards out left to right while naming them",
                options: ["Circle", "Square", "Triangle", "Star"],
                correct: 0,
            },
            QaTemplate {
                title: "Which one does not belong?",
                question: "Three of these go together. Which one does not?",
                description: "Name all four items before asking",
                options: ["Apple", "Banana", "Pear", "Chair"],
                correct: 3,
            },
            QaTemplate {
                title: "Sort by size",
                question: "Which block is the smallest?",
                description: "Place the three blocks in mixed order in front of the child",
                options: ["The red block", "The blue block", "The green block", "They are the same"],
                correct: 1,
            },
        ],
        Dimension::Language => [
            QaTemplate {
                title: "Animal sounds",
                question: "What sound does a dog make?",
                description: "Ask the child to make or pick the sound",
                options: ["Woof", "Meow", "Moo", "Quack"],
                correct: 0,
            },
            QaTemplate {
                title: "Name the picture",
                question: "What is this a picture of?",
                description: "Show the picture card of a bus",
                options: ["A bus", "A train", "A boat", "A plane"],
                correct: 0,
            },
            QaTemplate {
                title: "Opposites",
                question: "The sun is hot. Ice is...?",
                description: "Speak slowly and repeat the prompt once if needed",
                options: ["Cold", "Big", "Loud", "Soft"],
                correct: 0,
            },
        ],
        Dimension::Motor => [
            QaTemplate {
                title: "Stacking blocks",
                question: "Can the child stack five blocks into a tower?",
                description: "Hand over five blocks and demonstrate once",
                options: ["Yes, easily", "Yes, with help", "Only two or three", "Not yet"],
                correct: 0,
            },
            QaTemplate {
                title: "Catch the ball",
                question: "Can the child catch a large ball from two steps away?",
                description: "Use the soft ball and throw gently",
                options: ["Catches most throws", "Catches some", "Traps it against the body", "Not yet"],
                correct: 0,
            },
            QaTemplate {
                title: "Drawing shapes",
                question: "Which shape can the child copy on paper?",
                description: "Draw the shape first, then let the child try",
                options: ["A circle", "A straight line", "A scribble", "None yet"],
                correct: 0,
            },
        ],
        Dimension::Social => [
            QaTemplate {
                title: "Saying thanks",
                question: "What do we say when someone gives us a gift?",
                description: "Act out handing the child a small toy",
                options: ["Thank you", "Go away", "Mine", "Nothing"],
                correct: 0,
            },
            QaTemplate {
                title: "Taking turns",
                question: "Your friend wants the toy you are playing with. What can you do?",
                description: "There is no single right answer; score generously",
                options: ["Take turns", "Hide the toy", "Cry", "Walk away"],
                correct: 0,
            },
            QaTemplate {
                title: "Reading faces",
                question: "The child in the picture is crying. How do they feel?",
                description: "Show the crying-child picture card",
                options: ["Sad", "Happy", "Sleepy", "Angry"],
                correct: 0,
            },
        ],
    }
}

const OPTION_KEYS: [&str; 4] = ["a", "b", "c", "d"];

fn qa_content(template: &QaTemplate, band: AgeBand) -> serde_json::Value {
    let options: Vec<serde_json::Value> = template
        .options
        .iter()
        .zip(OPTION_KEYS)
        .map(|(text, key)| json!({ "label": format!("{}. {}", key.to_uppercase(), text), "value": key }))
        .collect();
    json!({
        "question": template.question,
        "description": format!("{} (ages {})", template.description, band.label()),
        "options": options,
        "correctAnswer": OPTION_KEYS[template.correct],
    })
}

fn band_difficulty(band: AgeBand) -> i16 {
    match band {
        AgeBand::Months24To36 => 1,
        AgeBand::Months36To48 => 2,
        AgeBand::Months48To60 => 3,
        AgeBand::Months60To72 => 3,
    }
}

/// Generate the full question bank: one config per age band, four questions
/// per dimension per config.
pub fn generate_bank() -> AssessmentBank {
    let mut configs = Vec::with_capacity(AgeBand::ALL.len());
    let mut questions = Vec::new();

    for band in AgeBand::ALL {
        let (min, max) = band.months();
        let config_id = AssessmentConfigId::new();
        configs.push(ConfigSeed {
            id: config_id,
            band,
            name: format!("Developmental assessment, {}", band.label()),
            description: format!("For children between {min} and {max} months"),
        });

        let difficulty = band_difficulty(band);
        for dimension in Dimension::ALL {
            let game = game_template(dimension);
            questions.push(QuestionSeed {
                config_id,
                dimension,
                band,
                question_type: QuestionType::Game,
                title: game.title.to_string(),
                content: json!({
                    "description": format!("{} (ages {})", game.description, band.label()),
                }),
                game_config: Some(json!({
                    "gameType": game.game_type,
                    "rounds": 2 + i32::from(difficulty),
                    "difficulty": difficulty,
                })),
                difficulty,
                score: 10,
                sort_order: 10,
            });

            for (i, template) in qa_templates(dimension).iter().enumerate() {
                questions.push(QuestionSeed {
                    config_id,
                    dimension,
                    band,
                    question_type: QuestionType::Qa,
                    title: template.title.to_string(),
                    content: qa_content(template, band),
                    game_config: None,
                    difficulty,
                    score: 10,
                    sort_order: 20 + (i as i32) * 10,
                });
            }
        }
    }

    AssessmentBank { configs, questions }
}

/// Seeds the question bank. Refuses to touch a non-empty bank unless
/// `replace` is set, in which case the existing bank is dropped first.
pub async fn seed_assessments(db: &PgPool, replace: bool) -> Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assessment_configs")
        .fetch_one(db)
        .await
        .context("failed to count assessment configs")?;

    if existing > 0 && !replace {
        bail!("assessment bank already present ({existing} configs); re-run with --replace to rebuild it");
    }

    let start_time = Instant::now();
    let bank = generate_bank();
    println!(
        "📝 Seeding assessment bank: {} configs, {} questions...",
        bank.configs.len(),
        bank.questions.len()
    );

    let mut tx = db.begin().await?;

    if existing > 0 {
        let dropped: u64 = sqlx::query("DELETE FROM assessment_questions")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM assessment_configs").execute(&mut *tx).await?;
        println!("   ✓ Dropped previous bank ({dropped} questions)");
    }

    for config in &bank.configs {
        let (min, max) = config.band.months();
        let dimensions: Vec<&str> = Dimension::ALL.iter().map(|d| d.as_str()).collect();
        sqlx::query(
            "INSERT INTO assessment_configs (id, name, description, min_age_months, max_age_months, dimensions)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(config.id)
        .bind(&config.name)
        .bind(&config.description)
        .bind(min)
        .bind(max)
        .bind(serde_json::json!(dimensions))
        .execute(&mut *tx)
        .await?;
    }

    // 11 params per question
    const BATCH_SIZE: usize = 600;
    for chunk in bank.questions.chunks(BATCH_SIZE) {
        insert_questions_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} questions in {:?}",
        bank.questions.len(),
        start_time.elapsed()
    );

    Ok(())
}

async fn insert_questions_chunk(
    tx: &mut Transaction<'_, Postgres>,
    questions: &[QuestionSeed],
) -> Result<()> {
    if questions.is_empty() {
        return Ok(());
    }

    let mut query = String::from(
        "INSERT INTO assessment_questions \
         (id, config_id, dimension, age_band, question_type, title, content, game_config, difficulty, score, sort_order) VALUES ",
    );

    for (i, _) in questions.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 11;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6,
            p + 7,
            p + 8,
            p + 9,
            p + 10,
            p + 11
        ));
    }

    let mut q = sqlx::query(&query);
    for question in questions {
        q = q
            .bind(AssessmentQuestionId::new())
            .bind(question.config_id)
            .bind(question.dimension.as_str())
            .bind(question.band.key())
            .bind(question.question_type.as_str())
            .bind(&question.title)
            .bind(&question.content)
            .bind(&question.game_config)
            .bind(question.difficulty)
            .bind(question.score)
            .bind(question.sort_order);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}
