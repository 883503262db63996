// src/tier.rs
//! Ordinal relevance label derived from the numeric score.

use serde::{Deserialize, Serialize};

/// Relevance tier, S highest through D lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    /// Fixed thresholds, highest first. Total over the score axis: every
    /// score maps to exactly one tier.
    pub fn for_score(score: f32) -> Tier {
        if score >= 80.0 {
            Tier::S
        } else if score >= 65.0 {
            Tier::A
        } else if score >= 50.0 {
            Tier::B
        } else if score >= 35.0 {
            Tier::C
        } else {
            Tier::D
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        };
        f.write_str(s)
    }
}
