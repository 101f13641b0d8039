use kindergrove_models::assessments::{AgeBand, Dimension, QuestionType};
use kindergrove_ops::seeder::assessments::{QUESTIONS_PER_DIMENSION, generate_bank};
use std::collections::{HashMap, HashSet};

#[test]
fn test_one_config_per_age_band() {
    let bank = generate_bank();
    assert_eq!(bank.configs.len(), AgeBand::ALL.len());

    let bands: HashSet<_> = bank.configs.iter().map(|c| c.band).collect();
    assert_eq!(bands.len(), AgeBand::ALL.len());
}

#[test]
fn test_every_band_covers_every_dimension() {
    let bank = generate_bank();

    let mut per_cell: HashMap<(AgeBand, Dimension), usize> = HashMap::new();
    for question in &bank.questions {
        *per_cell.entry((question.band, question.dimension)).or_default() += 1;
    }

    assert_eq!(per_cell.len(), AgeBand::ALL.len() * Dimension::ALL.len());
    for (&(band, dimension), &count) in &per_cell {
        assert_eq!(
            count, QUESTIONS_PER_DIMENSION,
            "band {band} dimension {dimension} has {count} questions"
        );
    }
    assert_eq!(
        bank.questions.len(),
        AgeBand::ALL.len() * Dimension::ALL.len() * QUESTIONS_PER_DIMENSION
    );
}

#[test]
fn test_sort_orders_unique_within_config_and_dimension() {
    let bank = generate_bank();
    let mut seen = HashSet::new();
    for question in &bank.questions {
        assert!(
            seen.insert((question.config_id, question.dimension, question.sort_order)),
            "duplicate sort_order {} in {}/{}",
            question.sort_order,
            question.band,
            question.dimension
        );
    }
}

#[test]
fn test_questions_link_to_a_generated_config() {
    let bank = generate_bank();
    let config_ids: HashSet<_> = bank.configs.iter().map(|c| c.id).collect();
    for question in &bank.questions {
        assert!(config_ids.contains(&question.config_id));
    }
}

#[test]
fn test_game_questions_carry_game_config() {
    let bank = generate_bank();
    for question in &bank.questions {
        match question.question_type {
            QuestionType::Game => {
                let config = question.game_config.as_ref().expect("game without config");
                assert!(config.get("gameType").is_some());
                assert!(config.get("difficulty").is_some());
            }
            QuestionType::Qa => assert!(question.game_config.is_none()),
        }
    }
}

#[test]
fn test_qa_content_shape() {
    let bank = generate_bank();
    for question in bank.questions.iter().filter(|q| q.question_type == QuestionType::Qa) {
        let options = question.content["options"].as_array().expect("options array");
        assert_eq!(options.len(), 4);

        let correct = question.content["correctAnswer"].as_str().expect("correctAnswer");
        assert!(
            options.iter().any(|o| o["value"].as_str() == Some(correct)),
            "correct answer {correct} not among option values"
        );
        assert!(question.content["question"].as_str().is_some());
    }
}

#[test]
fn test_difficulty_and_score_bounds() {
    let bank = generate_bank();
    for question in &bank.questions {
        assert!((1..=3).contains(&question.difficulty));
        assert!(question.score > 0);
        assert!(question.sort_order > 0);
    }
}

#[test]
fn test_generation_is_deterministic_in_shape() {
    let a = generate_bank();
    let b = generate_bank();

    let titles = |bank: &kindergrove_ops::seeder::models::AssessmentBank| {
        bank.questions
            .iter()
            .map(|q| (q.band, q.dimension, q.sort_order, q.title.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(titles(&a), titles(&b));
}
