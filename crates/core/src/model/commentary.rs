/// Encouragement band for a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    /// 0 to 3 correct answers.
    Beginning,
    /// 4 to 6.
    Fair,
    /// 7 to 9.
    Strong,
    /// A perfect 10.
    Perfect,
}

impl ScoreBand {
    /// Band for a final score. Each upper bound is inclusive.
    #[must_use]
    pub fn for_score(score: u32) -> Self {
        match score {
            0..=3 => Self::Beginning,
            4..=6 => Self::Fair,
            7..=9 => Self::Strong,
            _ => Self::Perfect,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Beginning => "It's a start! General knowledge takes practice, keep going.",
            Self::Fair => "Decent score! One more push and you'll be at the top.",
            Self::Strong => "Impressive! You know your stuff.",
            Self::Perfect => "PERFECT! Not a single mistake, you're a champion!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_are_inclusive_on_the_low_side() {
        assert_eq!(ScoreBand::for_score(0), ScoreBand::Beginning);
        assert_eq!(ScoreBand::for_score(3), ScoreBand::Beginning);
        assert_eq!(ScoreBand::for_score(4), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(6), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(7), ScoreBand::Strong);
        assert_eq!(ScoreBand::for_score(9), ScoreBand::Strong);
        assert_eq!(ScoreBand::for_score(10), ScoreBand::Perfect);
    }

    #[test]
    fn every_band_has_a_distinct_message() {
        let messages = [
            ScoreBand::for_score(3).message(),
            ScoreBand::for_score(4).message(),
            ScoreBand::for_score(9).message(),
            ScoreBand::for_score(10).message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
