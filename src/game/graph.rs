//! Text renderer for the four graph options of a question.
//!
//! The curve is not parsed out of the function's display string. Instead it
//! is rebuilt from the question's stated features: numerator roots are the
//! x-intercepts plus the holes, denominator roots are the vertical asymptotes
//! plus the holes, and the leading scale is fixed so the curve passes through
//! the stated y-intercept. The correct option renders the features exactly as
//! stated; the other three render deterministic distortions of them, so the
//! four pictures differ and exactly one matches the question.

use crate::game::bank::QuestionSpec;
use crate::game::Choice;

const X_MIN: f64 = -8.0;
const X_MAX: f64 = 8.0;
const Y_MIN: f64 = -8.0;
const Y_MAX: f64 = 8.0;

const WIDTH: usize = 33;
const HEIGHT: usize = 17;

// How close a sample may get to a pole before the curve is cut.
const POLE_CUTOFF: f64 = 1e-3;

/// The plotted features of one graph option. For the correct option these are
/// the question's features verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphFeatures {
    pub vertical_asymptotes: Vec<f64>,
    pub horizontal_asymptote: Option<f64>,
    pub holes: Vec<f64>,
    pub x_intercepts: Vec<f64>,
    pub y_intercept: f64,
}

impl GraphFeatures {
    fn from_question(question: &QuestionSpec) -> Self {
        Self {
            vertical_asymptotes: question.vertical_asymptotes.clone(),
            horizontal_asymptote: question.horizontal_asymptote,
            holes: question.holes.clone(),
            x_intercepts: question.x_intercepts.clone(),
            y_intercept: question.y_intercept,
        }
    }
}

/// Features rendered for a given option letter. Variant 0 is the question as
/// stated and lands on the question's correct choice; the other variants are
/// distortions spread over the remaining letters.
pub fn option_features(question: &QuestionSpec, option: Choice) -> GraphFeatures {
    let stated = GraphFeatures::from_question(question);
    let variant = (4 + option.index() - question.correct_answer.index()) % 4;
    match variant {
        0 => stated,
        1 => GraphFeatures {
            // Asymptotes shifted right, curve mirrored through the x-axis.
            vertical_asymptotes: stated.vertical_asymptotes.iter().map(|x| x + 1.5).collect(),
            y_intercept: -stated.y_intercept,
            ..stated
        },
        2 => GraphFeatures {
            // Intercepts and holes mirrored through the y-axis.
            holes: stated.holes.iter().map(|x| -x).collect(),
            x_intercepts: stated.x_intercepts.iter().map(|x| -x).collect(),
            horizontal_asymptote: Some(stated.horizontal_asymptote.unwrap_or(0.0) + 2.0),
            ..stated
        },
        _ => GraphFeatures {
            // Asymptotes shifted left, intercepts nudged.
            vertical_asymptotes: stated.vertical_asymptotes.iter().map(|x| x - 1.5).collect(),
            x_intercepts: stated.x_intercepts.iter().map(|x| x + 1.0).collect(),
            y_intercept: stated.y_intercept + 2.0,
            ..stated
        },
    }
}

/// The rational curve rebuilt from a feature set, in factored form.
struct Curve {
    numerator_roots: Vec<f64>,
    denominator_roots: Vec<f64>,
    scale: f64,
}

impl Curve {
    fn from_features(features: &GraphFeatures) -> Self {
        let numerator_roots: Vec<f64> = features
            .x_intercepts
            .iter()
            .chain(features.holes.iter())
            .copied()
            .collect();
        let denominator_roots: Vec<f64> = features
            .vertical_asymptotes
            .iter()
            .chain(features.holes.iter())
            .copied()
            .collect();

        // Pin the scale so the curve passes through the stated y-intercept.
        // When a root sits at x=0 that is impossible, fall back to 1.
        let num0: f64 = numerator_roots.iter().map(|r| -r).product();
        let den0: f64 = denominator_roots.iter().map(|r| -r).product();
        let scale = if num0.abs() > f64::EPSILON {
            features.y_intercept * den0 / num0
        } else {
            1.0
        };

        Self {
            numerator_roots,
            denominator_roots,
            scale,
        }
    }

    fn eval(&self, x: f64) -> Option<f64> {
        let den: f64 = self.denominator_roots.iter().map(|r| x - r).product();
        if den.abs() < POLE_CUTOFF {
            return None;
        }
        let num: f64 = self.numerator_roots.iter().map(|r| x - r).product();
        Some(self.scale * num / den)
    }
}

fn col_of(x: f64) -> Option<usize> {
    if !(X_MIN..=X_MAX).contains(&x) {
        return None;
    }
    let col = ((x - X_MIN) / (X_MAX - X_MIN) * (WIDTH - 1) as f64).round() as usize;
    Some(col.min(WIDTH - 1))
}

fn row_of(y: f64) -> Option<usize> {
    if !(Y_MIN..=Y_MAX).contains(&y) {
        return None;
    }
    let row = ((Y_MAX - y) / (Y_MAX - Y_MIN) * (HEIGHT - 1) as f64).round() as usize;
    Some(row.min(HEIGHT - 1))
}

fn x_of_col(col: usize) -> f64 {
    X_MIN + (X_MAX - X_MIN) * col as f64 / (WIDTH - 1) as f64
}

fn fmt_value(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.2}", v)
    }
}

fn fmt_values(values: &[f64]) -> String {
    if values.is_empty() {
        return "none".to_string();
    }
    values
        .iter()
        .map(|v| fmt_value(*v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders one option of the question as a monospace plot with a legend,
/// ready to be wrapped in an HTML `<pre>` block.
pub fn render_option(question: &QuestionSpec, option: Choice) -> String {
    let features = option_features(question, option);
    let curve = Curve::from_features(&features);

    let mut grid = vec![vec![' '; WIDTH]; HEIGHT];

    // Axes first, everything else draws over them.
    if let Some(row) = row_of(0.0) {
        for col in 0..WIDTH {
            grid[row][col] = '-';
        }
    }
    if let Some(col) = col_of(0.0) {
        for row in 0..HEIGHT {
            grid[row][col] = if grid[row][col] == '-' { '+' } else { '|' };
        }
    }

    // Dashed asymptote lines.
    if let Some(h) = features.horizontal_asymptote {
        if let Some(row) = row_of(h) {
            for col in (0..WIDTH).step_by(2) {
                grid[row][col] = '=';
            }
        }
    }
    for va in &features.vertical_asymptotes {
        if let Some(col) = col_of(*va) {
            for row in (0..HEIGHT).step_by(2) {
                grid[row][col] = ':';
            }
        }
    }

    // The curve itself, sampled per column.
    for col in 0..WIDTH {
        let x = x_of_col(col);
        if let Some(y) = curve.eval(x) {
            if let Some(row) = row_of(y) {
                grid[row][col] = '*';
            }
        }
    }

    // Feature markers draw last so they stay visible.
    for hole in &features.holes {
        // A hole sits on the curve, at the limit value next to the
        // cancelled root.
        if let (Some(col), Some(y)) = (col_of(*hole), curve.eval(hole + 0.02)) {
            if let Some(row) = row_of(y) {
                grid[row][col] = 'o';
            }
        }
    }
    for xi in &features.x_intercepts {
        if let (Some(col), Some(row)) = (col_of(*xi), row_of(0.0)) {
            grid[row][col] = 'x';
        }
    }
    if let (Some(col), Some(row)) = (col_of(0.0), row_of(features.y_intercept)) {
        grid[row][col] = '@';
    }

    let mut out = String::new();
    out.push_str(&format!("Option {}\n", option));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&format!(
        "VA x: {} | HA y: {}\n",
        fmt_values(&features.vertical_asymptotes),
        features
            .horizontal_asymptote
            .map(fmt_value)
            .unwrap_or_else(|| "none".to_string()),
    ));
    out.push_str(&format!(
        "holes: {} | x-int: {} | y-int: {}",
        fmt_values(&features.holes),
        fmt_values(&features.x_intercepts),
        fmt_value(features.y_intercept),
    ));
    out
}
