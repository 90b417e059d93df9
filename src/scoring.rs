//! Grading of answers and the points and levels earned by them.

use crate::exercise::{Difficulty, Domain, Exercise};
use serde::{Deserialize, Serialize};

/// Scores at which levels 2 to 6 begin. Below the first threshold a user is on level 1.
pub const LEVEL_THRESHOLDS: [u64; 5] = [100, 300, 600, 1000, 1500];

/// Returns `true` if `user_answer` is the answer of `exercise`, ignoring case and surrounding
/// whitespace.
pub fn grade(user_answer: &str, exercise: &Exercise) -> bool {
    answers_match(user_answer, exercise.answer())
}

/// ```
/// use mantiq::scoring::answers_match;
///
/// assert!(answers_match(" P ", "p"));
/// assert!(!answers_match("q", "p"));
/// ```
pub fn answers_match(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// How many points an answer is worth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Points for a correct answer
    #[serde(default = "default_base_points")]
    pub base_points: u32,

    /// Bonus per difficulty tier
    #[serde(default = "default_bonus_per_tier")]
    pub bonus_per_tier: u32,

    /// Whether an incorrect answer still earns the difficulty bonus
    #[serde(default = "default_bonus_on_incorrect")]
    pub bonus_on_incorrect: bool,
}

fn default_base_points() -> u32 {
    10
}

fn default_bonus_per_tier() -> u32 {
    2
}

fn default_bonus_on_incorrect() -> bool {
    true
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_points: default_base_points(),
            bonus_per_tier: default_bonus_per_tier(),
            bonus_on_incorrect: default_bonus_on_incorrect(),
        }
    }
}

impl ScoringPolicy {
    /// Points for an answer to an exercise of the given difficulty. Every domain is scored
    /// the same way.
    ///
    /// ```
    /// use mantiq::{Difficulty, Domain, ScoringPolicy};
    ///
    /// let policy = ScoringPolicy::default();
    /// let hard = Difficulty::new(3).unwrap();
    /// assert_eq!(policy.points(hard, true, Domain::Logic), 16);
    /// assert_eq!(policy.points(hard, false, Domain::Logic), 6);
    /// ```
    pub fn points(&self, difficulty: Difficulty, is_correct: bool, _domain: Domain) -> u32 {
        let base = if is_correct { self.base_points } else { 0 };
        let bonus = if is_correct || self.bonus_on_incorrect {
            u32::from(difficulty.get()) * self.bonus_per_tier
        } else {
            0
        };
        base + bonus
    }
}

pub fn level_for_score(score: u64) -> u8 {
    1 + LEVEL_THRESHOLDS.iter().filter(|&&t| score >= t).count() as u8
}

/// Progress from the start of the current level to the next one, in percent.
///
/// Past the last threshold, progress is measured towards twice that threshold.
///
/// ```
/// use mantiq::scoring::level_progress;
///
/// assert_eq!(level_progress(50), 50.0);
/// assert_eq!(level_progress(200), 50.0);
/// assert_eq!(level_progress(2250), 50.0);
/// assert_eq!(level_progress(10_000), 100.0);
/// ```
pub fn level_progress(score: u64) -> f64 {
    let level = level_for_score(score) as usize;
    let last = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
    let current = match level {
        1 => 0,
        _ => LEVEL_THRESHOLDS[level - 2],
    };
    let next = LEVEL_THRESHOLDS.get(level - 1).copied().unwrap_or(last * 2);
    let progress = (score - current) as f64 / (next - current) as f64 * 100.0;
    progress.clamp(0.0, 100.0)
}

/// A cumulative score and the level derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    score: u64,
    level: u8,
}

impl Default for ScoreRecord {
    fn default() -> Self {
        ScoreRecord::new(0)
    }
}

impl ScoreRecord {
    pub fn new(score: u64) -> Self {
        ScoreRecord {
            score,
            level: level_for_score(score),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Adds `points` and returns `true` if that reached a new level
    pub fn apply(&mut self, points: u32) -> bool {
        let previous = self.level;
        self.score = self.score.saturating_add(u64::from(points));
        self.level = level_for_score(self.score);
        self.level > previous
    }
}
