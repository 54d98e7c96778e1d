//! Quiz questions.
//!
//! Questions gate every placement and movement action. Only questions
//! with the active flag set participate in random selection; the admin
//! screens that edit the pool live outside this crate.

use rand::Rng;

/// A multiple-choice question (2 to 4 options).
#[derive(Debug, Clone)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub category: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct: usize,
    pub active: bool,
}

impl Question {
    pub fn new(
        id: i64,
        text: impl Into<String>,
        category: impl Into<String>,
        options: Vec<String>,
        correct: usize,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            category: category.into(),
            options,
            correct,
            active: true,
        }
    }

    /// Check an answer index against the correct option.
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct
    }

    /// Client-facing JSON. The correct index stays server-side.
    pub fn public_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "text": self.text,
            "category": self.category,
            "options": self.options,
        })
    }
}

/// The question pool.
#[derive(Debug, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn add(&mut self, question: Question) {
        self.questions.push(question);
    }

    /// Count of questions eligible for selection.
    pub fn active_count(&self) -> usize {
        self.questions.iter().filter(|q| q.active).count()
    }

    /// Draw a uniformly random active question.
    ///
    /// Returns `None` when no active questions exist; a match cannot
    /// progress in that case, which is a configuration error rather
    /// than a game rule.
    pub fn draw(&self, rng: &mut impl Rng) -> Option<&Question> {
        let active: Vec<&Question> = self.questions.iter().filter(|q| q.active).collect();
        if active.is_empty() {
            return None;
        }
        Some(active[rng.gen_range(0..active.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(id: i64, active: bool) -> Question {
        let mut q = Question::new(
            id,
            format!("Question {}", id),
            "general",
            vec!["a".to_string(), "b".to_string()],
            0,
        );
        q.active = active;
        q
    }

    #[test]
    fn test_is_correct() {
        let q = sample(1, true);
        assert!(q.is_correct(0));
        assert!(!q.is_correct(1));
    }

    #[test]
    fn test_public_json_hides_answer() {
        let q = sample(1, true);
        let json = q.public_json();
        assert_eq!(json["id"], 1);
        assert!(json.get("correct").is_none());
    }

    #[test]
    fn test_draw_only_active() {
        let bank = QuestionBank::new(vec![sample(1, false), sample(2, true), sample(3, false)]);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(bank.active_count(), 1);
        for _ in 0..20 {
            assert_eq!(bank.draw(&mut rng).unwrap().id, 2);
        }
    }

    #[test]
    fn test_draw_empty_pool() {
        let bank = QuestionBank::new(vec![sample(1, false)]);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(bank.draw(&mut rng).is_none());
    }
}
