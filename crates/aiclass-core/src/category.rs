//! The fixed category table shared by the engine and the wire layer.
//!
//! Ids are stable and index 0 is always the catch-all. The table is closed:
//! no category is created or removed at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A classification label. Discriminants are the wire ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Category {
    /// Catch-all for text that is not about AI.
    Other = 0,
    GeneralAi = 1,
    GenerativeAi = 2,
    ComputerVision = 3,
    Robotics = 4,
    AutonomousDriving = 5,
    DataScience = 6,
    MedicalAi = 7,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category id {0}")]
pub struct UnknownCategory(pub i64);

impl Category {
    /// Every category in id order.
    pub const ALL: [Category; 8] = [
        Category::Other,
        Category::GeneralAi,
        Category::GenerativeAi,
        Category::ComputerVision,
        Category::Robotics,
        Category::AutonomousDriving,
        Category::DataScience,
        Category::MedicalAi,
    ];

    /// Number of categories, including the catch-all.
    pub const COUNT: usize = Self::ALL.len();

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Human-readable name, as sent on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::Other => "OTHER",
            Self::GeneralAi => "General AI",
            Self::GenerativeAi => "Generative AI",
            Self::ComputerVision => "Computer Vision",
            Self::Robotics => "AI Robotics",
            Self::AutonomousDriving => "Autonomous Driving",
            Self::DataScience => "Data Science",
            Self::MedicalAi => "Medical AI",
        }
    }

    /// Snake-case key used in config files and serde.
    pub fn key(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::GeneralAi => "general_ai",
            Self::GenerativeAi => "generative_ai",
            Self::ComputerVision => "computer_vision",
            Self::Robotics => "robotics",
            Self::AutonomousDriving => "autonomous_driving",
            Self::DataScience => "data_science",
            Self::MedicalAi => "medical_ai",
        }
    }

    /// Look up a category by display name or key, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name) || c.key().eq_ignore_ascii_case(name))
    }

    pub fn is_other(self) -> bool {
        self == Self::Other
    }
}

impl TryFrom<i64> for Category {
    type Error = UnknownCategory;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        u8::try_from(id)
            .ok()
            .and_then(Self::from_id)
            .ok_or(UnknownCategory(id))
    }
}

impl From<Category> for u8 {
    fn from(c: Category) -> u8 {
        c.id()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_table_positions() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.id() as usize, i);
            assert_eq!(Category::from_id(i as u8), Some(*c));
        }
        assert_eq!(Category::COUNT, 8);
    }

    #[test]
    fn index_zero_is_catch_all() {
        assert_eq!(Category::from_id(0), Some(Category::Other));
        assert!(Category::Other.is_other());
        assert_eq!(Category::Other.name(), "OTHER");
    }

    #[test]
    fn out_of_range_ids_rejected() {
        assert_eq!(Category::from_id(8), None);
        assert_eq!(Category::try_from(-1), Err(UnknownCategory(-1)));
        assert_eq!(Category::try_from(300), Err(UnknownCategory(300)));
        assert_eq!(Category::try_from(5), Ok(Category::AutonomousDriving));
    }

    #[test]
    fn from_name_accepts_display_name_and_key() {
        assert_eq!(Category::from_name("Generative AI"), Some(Category::GenerativeAi));
        assert_eq!(Category::from_name("generative_ai"), Some(Category::GenerativeAi));
        assert_eq!(Category::from_name("  medical ai "), Some(Category::MedicalAi));
        assert_eq!(Category::from_name("cooking"), None);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Category::ALL.iter().map(|c| c.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Category::COUNT);
    }

    #[test]
    fn serde_uses_snake_case_key() {
        let json = serde_json::to_string(&Category::ComputerVision).unwrap();
        assert_eq!(json, "\"computer_vision\"");
        let parsed: Category = serde_json::from_str("\"data_science\"").unwrap();
        assert_eq!(parsed, Category::DataScience);
    }
}
