use crate::game::Choice;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

/// One rational function problem: the display form of the function plus the
/// graph features the player is expected to identify on the correct option.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuestionSpec {
    pub function: String,
    pub vertical_asymptotes: Vec<f64>,
    pub horizontal_asymptote: Option<f64>,
    pub holes: Vec<f64>,
    pub x_intercepts: Vec<f64>,
    pub y_intercept: f64,
    pub correct_answer: Choice,
}

/// Static mapping from level (1-5) to its pool of questions. Built once at
/// startup and shared behind an `Arc`; never mutated afterwards.
pub struct LevelBank {
    levels: Vec<Vec<QuestionSpec>>,
}

impl LevelBank {
    pub fn standard() -> Self {
        let q = |function: &str,
                 vertical_asymptotes: Vec<f64>,
                 horizontal_asymptote: Option<f64>,
                 holes: Vec<f64>,
                 x_intercepts: Vec<f64>,
                 y_intercept: f64,
                 correct_answer: Choice| QuestionSpec {
            function: function.to_string(),
            vertical_asymptotes,
            horizontal_asymptote,
            holes,
            x_intercepts,
            y_intercept,
            correct_answer,
        };

        let levels = vec![
            // Level 1, beginner: basic linear over linear
            vec![
                q(
                    "f(x) = (x + 2) / (x - 1)",
                    vec![1.0],
                    Some(1.0),
                    vec![],
                    vec![-2.0],
                    -2.0,
                    Choice::A,
                ),
                q(
                    "f(x) = (x - 3) / (x + 1)",
                    vec![-1.0],
                    Some(1.0),
                    vec![],
                    vec![3.0],
                    -3.0,
                    Choice::B,
                ),
            ],
            // Level 2, apprentice: functions with holes
            vec![q(
                "f(x) = (x + 2)(x - 3) / [(x - 1)(x - 3)]",
                vec![1.0],
                Some(1.0),
                vec![3.0],
                vec![-2.0],
                2.0,
                Choice::A,
            )],
            // Level 3, skilled: linear over quadratic
            vec![q(
                "f(x) = (2x + 4) / (x² - 1)",
                vec![-1.0, 1.0],
                Some(0.0),
                vec![],
                vec![-2.0],
                -4.0,
                Choice::B,
            )],
            // Level 4, expert: quadratic over quadratic
            vec![q(
                "f(x) = (x² + 2x - 3) / (x² - 1)",
                vec![-1.0, 1.0],
                Some(1.0),
                vec![],
                vec![-3.0, 1.0],
                3.0,
                Choice::A,
            )],
            // Level 5, master: complex functions
            vec![q(
                "f(x) = (x² - 4)(x + 1) / [(x - 2)(x + 1)(x - 3)]",
                vec![2.0, 3.0],
                None,
                vec![-1.0],
                vec![-2.0, 2.0],
                4.0 / 3.0,
                Choice::B,
            )],
        ];

        Self { levels }
    }

    /// The question pool for a level. Levels outside 1-5 are clamped, so the
    /// returned slice is always non-empty.
    pub fn questions_for(&self, level: u8) -> &[QuestionSpec] {
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        &self.levels[(level - 1) as usize]
    }
}

pub fn level_name(level: u8) -> &'static str {
    match level {
        1 => "BEGINNER",
        2 => "APPRENTICE",
        3 => "SKILLED",
        4 => "EXPERT",
        5 => "MASTER",
        _ => "UNKNOWN",
    }
}

pub fn level_hint(level: u8) -> &'static str {
    match level {
        1 => "🎯 Look for where the denominator equals zero to find vertical asymptotes!",
        2 => "🕳 Common factors in numerator and denominator create holes!",
        3 => "📊 Linear over quadratic: multiple vertical asymptotes possible",
        4 => "🏆 Same degree polynomials: horizontal asymptote = ratio of leading coefficients",
        _ => "👑 MASTER LEVEL: Analyze complex rational functions step by step",
    }
}
