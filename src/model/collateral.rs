//! Sales collateral generated from provenance-bearing claims

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Audience an email draft is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persona {
    Exec,
    Buyer,
    Champion,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Exec, Persona::Buyer, Persona::Champion];

    /// Writing guidance handed to the model for this persona
    pub fn instructions(&self) -> &'static str {
        match self {
            Persona::Exec => {
                "Write for C-level executives. Focus on business impact, ROI, and strategic value."
            }
            Persona::Buyer => {
                "Write for decision makers. Focus on solution benefits, competitive advantages."
            }
            Persona::Champion => {
                "Write for internal advocates. Focus on technical benefits and team impact."
            }
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Persona::Exec => "Exec",
            Persona::Buyer => "Buyer",
            Persona::Champion => "Champion",
        };
        f.write_str(name)
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Persona::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Persona must be one of: Exec, Buyer, Champion (got '{}')", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub persona: Persona,
    pub subject: String,
    pub body: String,
    pub cta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchObjection {
    pub objection: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchOutline {
    pub agenda: Vec<String>,
    pub objections: Vec<PitchObjection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextStep {
    pub owner: String,
    pub task: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub summary: String,
    #[serde(default)]
    pub next_steps: Vec<NextStep>,
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default)]
    pub objections: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_parse() {
        assert_eq!("exec".parse::<Persona>().unwrap(), Persona::Exec);
        assert_eq!(" Champion ".parse::<Persona>().unwrap(), Persona::Champion);
        assert!("CFO".parse::<Persona>().is_err());
    }
}
