pub mod bank;
pub mod graph;

use bank::{LevelBank, QuestionSpec, MAX_LEVEL};
use rand::seq::SliceRandom;
use rand::Rng;

pub const MAX_NAME_CHARS: usize = 12;
const QUESTIONS_PER_LEVEL_UP: u32 = 3;

/// One of the four multiple-choice graph options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    /// Parses a player reply like "A", " b " or "Option C" into a choice.
    pub fn parse(text: &str) -> Option<Choice> {
        let letter = text
            .trim()
            .trim_start_matches("Option ")
            .chars()
            .next()?;
        match letter.to_ascii_uppercase() {
            'A' => Some(Choice::A),
            'B' => Some(Choice::B),
            'C' => Some(Choice::C),
            'D' => Some(Choice::D),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Choice::A => 0,
            Choice::B => 1,
            Choice::C => 2,
            Choice::D => 3,
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
            Choice::D => "D",
        };
        write!(f, "{}", letter)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GameError {
    EmptyName,
    NameTooLong { len: usize },
    NoActiveQuestion,
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::EmptyName => write!(f, "player name must not be empty"),
            GameError::NameTooLong { len } => write!(
                f,
                "player name has {} characters, the maximum is {}",
                len, MAX_NAME_CHARS
            ),
            GameError::NoActiveQuestion => {
                write!(f, "no active question, generate one before answering")
            }
        }
    }
}

impl std::error::Error for GameError {}

/// What a single answer did to the session, for the presentation layer to
/// report back to the player.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub leveled_up: bool,
    pub new_level: u8,
    pub score_delta: u32,
    pub correct_choice: Choice,
}

/// Mutable per-session state. One value belongs to exactly one player at a
/// time; the bot keeps it inside the dialogue storage, tests hold it directly.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GameState {
    pub player_name: String,
    pub current_level: u8,
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub current_question: Option<QuestionSpec>,
    pub game_started: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::reset()
    }
}

impl GameState {
    /// A fresh, not-yet-started session with all counters zeroed.
    pub fn reset() -> Self {
        Self {
            player_name: String::new(),
            current_level: 1,
            score: 0,
            correct_answers: 0,
            total_questions: 0,
            current_question: None,
            game_started: false,
        }
    }

    /// Starts a session for the given player. The name must be non-empty and
    /// at most [`MAX_NAME_CHARS`] characters; otherwise the session stays
    /// unstarted and the caller re-prompts.
    pub fn start(name: &str) -> Result<Self, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyName);
        }
        let len = name.chars().count();
        if len > MAX_NAME_CHARS {
            return Err(GameError::NameTooLong { len });
        }

        Ok(Self {
            player_name: name.to_string(),
            game_started: true,
            ..Self::reset()
        })
    }

    /// Draws a question for the current level if none is active. Idempotent:
    /// an already active question is never reselected. The random source is
    /// injected so tests can seed it.
    pub fn ensure_question<R: Rng + ?Sized>(&mut self, bank: &LevelBank, rng: &mut R) {
        if self.current_question.is_none() {
            // questions_for never returns an empty slice
            let question = bank
                .questions_for(self.current_level)
                .choose(rng)
                .unwrap()
                .clone();
            log::debug!(
                "drew level {} question: {}",
                self.current_level,
                question.function
            );
            self.current_question = Some(question);
        }
    }

    /// Checks the player's choice against the active question, updates score,
    /// counters and level, and clears the question so the next
    /// [`ensure_question`](Self::ensure_question) draws a fresh one.
    ///
    /// Scoring: a correct answer is worth `100 + 75 * level` points. Every
    /// third answered question that is answered correctly advances the level,
    /// up to level 5 where progression stops.
    pub fn submit_answer(&mut self, choice: Choice) -> Result<AnswerOutcome, GameError> {
        let question = self
            .current_question
            .take()
            .ok_or(GameError::NoActiveQuestion)?;

        self.total_questions += 1;
        let correct = choice == question.correct_answer;
        let mut leveled_up = false;
        let mut score_delta = 0;

        if correct {
            self.correct_answers += 1;
            score_delta = 100 + 75 * u32::from(self.current_level);
            self.score += score_delta;

            if self.total_questions % QUESTIONS_PER_LEVEL_UP == 0 && self.current_level < MAX_LEVEL
            {
                self.current_level += 1;
                leveled_up = true;
            }
        }

        log::debug!(
            "{} answered {} ({}), score {}, level {}",
            self.player_name,
            choice,
            if correct { "correct" } else { "incorrect" },
            self.score,
            self.current_level
        );

        Ok(AnswerOutcome {
            correct,
            leveled_up,
            new_level: self.current_level,
            score_delta,
            correct_choice: question.correct_answer,
        })
    }

    /// Share of correct answers as a percentage. A session with no answers
    /// yet reports 0 rather than dividing by zero.
    pub fn accuracy(&self) -> f64 {
        (self.correct_answers as f64 / self.total_questions.max(1) as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started(name: &str) -> GameState {
        GameState::start(name).unwrap()
    }

    fn answer_correctly(game: &mut GameState, bank: &LevelBank, rng: &mut StdRng) -> AnswerOutcome {
        game.ensure_question(bank, rng);
        let correct = game.current_question.as_ref().unwrap().correct_answer;
        game.submit_answer(correct).unwrap()
    }

    #[test]
    fn start_initializes_a_level_one_session() {
        let game = started("Ava");
        assert_eq!(game.player_name, "Ava");
        assert_eq!(game.current_level, 1);
        assert_eq!(game.score, 0);
        assert_eq!(game.correct_answers, 0);
        assert_eq!(game.total_questions, 0);
        assert!(game.current_question.is_none());
        assert!(game.game_started);
    }

    #[test]
    fn start_rejects_empty_and_whitespace_names() {
        assert_eq!(GameState::start(""), Err(GameError::EmptyName));
        assert_eq!(GameState::start("   "), Err(GameError::EmptyName));
    }

    #[test]
    fn start_rejects_names_longer_than_twelve_chars() {
        assert_eq!(
            GameState::start("Bartholomew Q"),
            Err(GameError::NameTooLong { len: 13 })
        );
        assert!(GameState::start("Bartholomew8").is_ok());
    }

    #[test]
    fn ensure_question_is_idempotent() {
        let bank = LevelBank::standard();
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = started("Ava");

        game.ensure_question(&bank, &mut rng);
        let first = game.current_question.clone();
        game.ensure_question(&bank, &mut rng);
        assert_eq!(game.current_question, first);
    }

    #[test]
    fn seeded_draws_are_deterministic() {
        let bank = LevelBank::standard();
        let mut a = started("Ava");
        let mut b = started("Ava");
        a.ensure_question(&bank, &mut StdRng::seed_from_u64(42));
        b.ensure_question(&bank, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.current_question, b.current_question);
    }

    #[test]
    fn submit_without_a_question_is_an_error() {
        let mut game = started("Ava");
        assert_eq!(
            game.submit_answer(Choice::A),
            Err(GameError::NoActiveQuestion)
        );
        assert_eq!(game.total_questions, 0);
    }

    #[test]
    fn wrong_answer_counts_the_question_but_scores_nothing() {
        let bank = LevelBank::standard();
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = started("Ava");
        game.ensure_question(&bank, &mut rng);
        let correct = game.current_question.as_ref().unwrap().correct_answer;
        let wrong = Choice::ALL
            .into_iter()
            .find(|c| *c != correct)
            .unwrap();

        let outcome = game.submit_answer(wrong).unwrap();

        assert!(!outcome.correct);
        assert!(!outcome.leveled_up);
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(outcome.correct_choice, correct);
        assert_eq!(game.total_questions, 1);
        assert_eq!(game.correct_answers, 0);
        assert_eq!(game.score, 0);
        assert_eq!(game.current_level, 1);
        assert!(game.current_question.is_none());
    }

    #[test]
    fn correct_answer_scores_by_level() {
        let bank = LevelBank::standard();
        let mut rng = StdRng::seed_from_u64(2);
        let mut game = started("Ava");

        let outcome = answer_correctly(&mut game, &bank, &mut rng);

        assert!(outcome.correct);
        assert_eq!(outcome.score_delta, 175); // 100 + 75 * 1
        assert_eq!(game.score, 175);
        assert_eq!(game.correct_answers, 1);
        assert!(game.current_question.is_none());
    }

    #[test]
    fn three_correct_answers_level_up_with_score_525() {
        let bank = LevelBank::standard();
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = started("Ava");

        let first = answer_correctly(&mut game, &bank, &mut rng);
        let second = answer_correctly(&mut game, &bank, &mut rng);
        assert!(!first.leveled_up);
        assert!(!second.leveled_up);
        assert_eq!(game.score, 350);

        let third = answer_correctly(&mut game, &bank, &mut rng);
        assert!(third.leveled_up);
        assert_eq!(third.new_level, 2);
        assert_eq!(game.total_questions, 3);
        assert_eq!(game.current_level, 2);
        assert_eq!(game.score, 525);
    }

    #[test]
    fn level_up_requires_the_third_answer_to_be_correct() {
        let bank = LevelBank::standard();
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = started("Ava");

        answer_correctly(&mut game, &bank, &mut rng);
        answer_correctly(&mut game, &bank, &mut rng);

        // Third question answered wrong: the multiple-of-3 boundary passes
        // without a level up.
        game.ensure_question(&bank, &mut rng);
        let correct = game.current_question.as_ref().unwrap().correct_answer;
        let wrong = Choice::ALL.into_iter().find(|c| *c != correct).unwrap();
        let outcome = game.submit_answer(wrong).unwrap();

        assert!(!outcome.leveled_up);
        assert_eq!(game.current_level, 1);
        assert_eq!(game.total_questions, 3);
    }

    #[test]
    fn level_is_monotonic_and_capped_at_five() {
        let bank = LevelBank::standard();
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = started("Ava");

        let mut last_level = game.current_level;
        for round in 0..40 {
            game.ensure_question(&bank, &mut rng);
            let correct = game.current_question.as_ref().unwrap().correct_answer;
            // Mix in some wrong answers to exercise both branches.
            let choice = if round % 5 == 0 {
                Choice::ALL.into_iter().find(|c| *c != correct).unwrap()
            } else {
                correct
            };
            game.submit_answer(choice).unwrap();

            assert!(game.current_level >= last_level);
            assert!(game.current_level <= MAX_LEVEL);
            assert!(game.correct_answers <= game.total_questions);
            last_level = game.current_level;
        }
        assert_eq!(game.current_level, MAX_LEVEL);

        // Terminal at level 5: a correct answer on a multiple-of-3 boundary
        // no longer levels up.
        while game.total_questions % 3 != 2 {
            answer_correctly(&mut game, &bank, &mut rng);
        }
        let outcome = answer_correctly(&mut game, &bank, &mut rng);
        assert!(!outcome.leveled_up);
        assert_eq!(outcome.new_level, MAX_LEVEL);
        assert_eq!(outcome.score_delta, 475); // 100 + 75 * 5
    }

    #[test]
    fn accuracy_handles_the_empty_session() {
        let game = started("Ava");
        assert_eq!(game.accuracy(), 0.0);
    }

    #[test]
    fn accuracy_is_the_correct_share_in_percent() {
        let bank = LevelBank::standard();
        let mut rng = StdRng::seed_from_u64(6);
        let mut game = started("Ava");

        answer_correctly(&mut game, &bank, &mut rng);
        game.ensure_question(&bank, &mut rng);
        let correct = game.current_question.as_ref().unwrap().correct_answer;
        let wrong = Choice::ALL.into_iter().find(|c| *c != correct).unwrap();
        game.submit_answer(wrong).unwrap();

        assert_eq!(game.accuracy(), 50.0);
    }

    #[test]
    fn reset_discards_all_progress() {
        let bank = LevelBank::standard();
        let mut rng = StdRng::seed_from_u64(8);
        let mut game = started("Ava");
        for _ in 0..5 {
            answer_correctly(&mut game, &bank, &mut rng);
        }

        let fresh = GameState::reset();
        assert_eq!(fresh.player_name, "");
        assert_eq!(fresh.current_level, 1);
        assert_eq!(fresh.score, 0);
        assert_eq!(fresh.correct_answers, 0);
        assert_eq!(fresh.total_questions, 0);
        assert!(fresh.current_question.is_none());
        assert!(!fresh.game_started);
    }

    #[test]
    fn choice_parsing_accepts_letters_and_option_buttons() {
        assert_eq!(Choice::parse("A"), Some(Choice::A));
        assert_eq!(Choice::parse(" b "), Some(Choice::B));
        assert_eq!(Choice::parse("Option C"), Some(Choice::C));
        assert_eq!(Choice::parse("d"), Some(Choice::D));
    }

    #[test]
    fn choice_parsing_rejects_everything_else() {
        assert_eq!(Choice::parse(""), None);
        assert_eq!(Choice::parse("E"), None);
        assert_eq!(Choice::parse("42"), None);
    }
}
