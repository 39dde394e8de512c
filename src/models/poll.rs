// SPDX-License-Identifier: MIT

//! Homepage poll counters.

use serde::{Deserialize, Serialize};

/// A yes/no poll vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAnswer {
    Yes,
    No,
}

impl PollAnswer {
    /// Parse a submitted answer; anything but the two literals is invalid.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}

/// Poll counter document stored at `polls/{poll_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollCounts {
    #[serde(default)]
    pub yes_count: i64,
    #[serde(default)]
    pub no_count: i64,
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub updated_at: String,
}

impl PollCounts {
    /// Clamp negative counters and infer the total from the per-answer
    /// counts when the stored total lags behind them.
    pub fn normalized(&self) -> Self {
        let yes_count = self.yes_count.max(0);
        let no_count = self.no_count.max(0);
        let total_count = self.total_count.max(0).max(yes_count + no_count);

        Self {
            yes_count,
            no_count,
            total_count,
            updated_at: self.updated_at.clone(),
        }
    }

    /// Record one vote.
    pub fn record(&mut self, answer: PollAnswer, now: &str) {
        match answer {
            PollAnswer::Yes => self.yes_count += 1,
            PollAnswer::No => self.no_count += 1,
        }
        self.total_count += 1;
        self.updated_at = now.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps_negatives() {
        let counts = PollCounts {
            yes_count: -3,
            no_count: 5,
            total_count: -1,
            updated_at: String::new(),
        };

        let normalized = counts.normalized();
        assert_eq!(normalized.yes_count, 0);
        assert_eq!(normalized.no_count, 5);
        assert_eq!(normalized.total_count, 5);
    }

    #[test]
    fn test_normalized_infers_total() {
        let counts = PollCounts {
            yes_count: 4,
            no_count: 2,
            total_count: 3,
            updated_at: String::new(),
        };

        assert_eq!(counts.normalized().total_count, 6);
    }

    #[test]
    fn test_record_vote() {
        let mut counts = PollCounts::default();
        counts.record(PollAnswer::Yes, "2026-08-07T00:00:00Z");
        counts.record(PollAnswer::No, "2026-08-07T00:00:01Z");
        counts.record(PollAnswer::Yes, "2026-08-07T00:00:02Z");

        assert_eq!(counts.yes_count, 2);
        assert_eq!(counts.no_count, 1);
        assert_eq!(counts.total_count, 3);
        assert_eq!(counts.updated_at, "2026-08-07T00:00:02Z");
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(PollAnswer::parse("yes"), Some(PollAnswer::Yes));
        assert_eq!(PollAnswer::parse("no"), Some(PollAnswer::No));
        assert_eq!(PollAnswer::parse("maybe"), None);
        assert_eq!(PollAnswer::parse("YES"), None);
    }
}
