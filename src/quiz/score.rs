use std::fmt;

/// Final tally of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    correct: usize,
    total: usize,
}

/// Qualitative band shown next to the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    KeepLearning,
}

impl Score {
    pub fn new(correct: usize, total: usize) -> Self {
        Self { correct, total }
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn incorrect(&self) -> usize {
        self.total.saturating_sub(self.correct)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `round(100 * correct / total)`, halves rounded up.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = (200 * self.correct + self.total) / (2 * self.total);
        pct as u32
    }

    pub fn band(&self) -> ScoreBand {
        match self.percentage() {
            70.. => ScoreBand::Excellent,
            50..=69 => ScoreBand::Good,
            _ => ScoreBand::KeepLearning,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}

impl ScoreBand {
    pub fn message(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent work! You've mastered this topic!",
            ScoreBand::Good => "Good effort! Review the material and try again to improve.",
            ScoreBand::KeepLearning => "Keep learning! Practice makes perfect.",
        }
    }
}
