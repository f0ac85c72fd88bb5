//! Canned text generation.
//!
//! The deterministic fallback behind the generation port: always
//! succeeds, never blocks, and produces plausible table talk. Used
//! directly when no language backend is wired up, and by the runtime as
//! the degradation path when one fails.

use async_trait::async_trait;
use outsider_application::ports::text_generation::{
    AnswerPrompt, GenerationError, QuestionPrompt, TextGenerator,
};

/// Questions an outsider asks while fishing for the location.
const OUTSIDER_QUESTIONS: [&str; 5] = [
    "what's your favorite thing about this place?",
    "what do you usually wear when you come here?",
    "what kind of people do you run into here?",
    "what's the first thing you do when you arrive?",
    "is there anything here you try to avoid?",
];

/// Questions an insider asks to probe for the outsider.
const INSIDER_QUESTIONS: [&str; 5] = [
    "how often do you find yourself here?",
    "what sound do you associate with this place?",
    "would you bring a friend here on a first visit?",
    "what's the busiest time of day here?",
    "how would you describe the smell of this place?",
];

/// Vague-but-confident answers for the outsider, bucketed by what the
/// question seems to be about.
const OUTSIDER_FIRST_IMPRESSIONS: [&str; 3] = [
    "The atmosphere definitely stands out to me.",
    "I always notice how people interact in spaces like this.",
    "The environment has a very distinctive feel.",
];

const OUTSIDER_PREPARATION: [&str; 3] = [
    "I think it depends on what you're planning to do.",
    "I usually just bring the basics and see what's needed.",
    "Common sense preparation is usually enough.",
];

const OUTSIDER_RULES: [&str; 3] = [
    "I think the usual social norms apply here.",
    "It's about being respectful and aware of your surroundings.",
    "I try to follow the lead of others who seem to know what they're doing.",
];

const OUTSIDER_DEFAULT: [&str; 3] = [
    "That's an interesting question - it really depends on the situation.",
    "I'd say it varies based on the context and what's happening.",
    "Good question - I think there are different ways to look at that.",
];

/// Generic answers for players who actually know the location.
const INSIDER_ANSWERS: [&str; 4] = [
    "From my experience, it's usually pretty straightforward.",
    "I think most people would agree it's fairly typical for places like this.",
    "It's generally what you'd expect in this kind of environment.",
    "That's definitely something to keep in mind here.",
];

/// Always-available generator with keyword-bucketed canned lines.
#[derive(Debug, Default)]
pub struct CannedTextGenerator;

impl CannedTextGenerator {
    pub fn new() -> Self {
        Self
    }

    fn pick<'a>(options: &'a [&str], seed: usize) -> &'a str {
        options[seed % options.len()]
    }
}

#[async_trait]
impl TextGenerator for CannedTextGenerator {
    async fn generate_question(&self, prompt: QuestionPrompt) -> Result<String, GenerationError> {
        let pool: &[&str] = if prompt.is_outsider {
            &OUTSIDER_QUESTIONS
        } else {
            &INSIDER_QUESTIONS
        };

        // Rotate with the conversation so consecutive turns differ.
        let seed = prompt.previous_questions.len() + prompt.target_name.len();
        let question = Self::pick(pool, seed);
        Ok(format!("{}, {}", prompt.target_name, question))
    }

    async fn generate_answer(&self, prompt: AnswerPrompt) -> Result<String, GenerationError> {
        let question = prompt.question.to_lowercase();
        let seed = prompt.question.len() + prompt.previous_context.len();

        let answer = if prompt.is_outsider {
            if ["first", "notice", "see", "arrive"]
                .iter()
                .any(|w| question.contains(w))
            {
                Self::pick(&OUTSIDER_FIRST_IMPRESSIONS, seed)
            } else if ["prepare", "bring", "need", "wear"]
                .iter()
                .any(|w| question.contains(w))
            {
                Self::pick(&OUTSIDER_PREPARATION, seed)
            } else if ["rules", "protocol", "behavior", "avoid"]
                .iter()
                .any(|w| question.contains(w))
            {
                Self::pick(&OUTSIDER_RULES, seed)
            } else {
                Self::pick(&OUTSIDER_DEFAULT, seed)
            }
        } else {
            Self::pick(&INSIDER_ANSWERS, seed)
        };
        Ok(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_prompt(is_outsider: bool) -> QuestionPrompt {
        QuestionPrompt {
            target_name: "Dana".to_string(),
            is_outsider,
            location_hint: (!is_outsider).then(|| "Museum".to_string()),
            previous_questions: vec![],
            personality: None,
        }
    }

    #[tokio::test]
    async fn test_questions_address_the_target_by_name() {
        let generator = CannedTextGenerator::new();
        let question = generator
            .generate_question(question_prompt(true))
            .await
            .unwrap();
        assert!(question.starts_with("Dana, "));
        assert!(question.ends_with('?'));
    }

    #[tokio::test]
    async fn test_outsider_answers_stay_vague_on_preparation_questions() {
        let generator = CannedTextGenerator::new();
        let answer = generator
            .generate_answer(AnswerPrompt {
                question: "What should I bring with me?".to_string(),
                asker_name: "Robin".to_string(),
                is_outsider: true,
                location: None,
                personality: None,
                previous_context: vec![],
            })
            .await
            .unwrap();
        assert!(OUTSIDER_PREPARATION.contains(&answer.as_str()));
    }

    #[tokio::test]
    async fn test_generation_never_fails() {
        let generator = CannedTextGenerator::new();
        for i in 0..20 {
            let mut prompt = question_prompt(i % 2 == 0);
            prompt.previous_questions = vec!["q".to_string(); i];
            let question = generator.generate_question(prompt).await.unwrap();
            assert!(!question.trim().is_empty());
            assert!(question.len() < 200);
        }
    }

    #[tokio::test]
    async fn test_same_inputs_give_the_same_line() {
        let generator = CannedTextGenerator::new();
        let a = generator
            .generate_question(question_prompt(true))
            .await
            .unwrap();
        let b = generator
            .generate_question(question_prompt(true))
            .await
            .unwrap();
        assert_eq!(a, b);
    }
}
