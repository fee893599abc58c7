// 🏷️ Expense Categories - closed set, fixed display order
//
// The declaration order is the display order everywhere: totals, chart bars,
// filter cycling. Nothing sorts categories by value or name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Other,
}

impl ExpenseCategory {
    /// Every category, in declared order
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Utilities,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Other,
    ];

    /// Number of categories
    pub const COUNT: usize = Self::ALL.len();

    /// Position in the declared order
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Other => "Other",
        }
    }

    /// Next category in declared order, wrapping around
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    /// Previous category in declared order, wrapping around
    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::COUNT - 1) % Self::COUNT]
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PARSING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(pub String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown expense category: {:?}", self.0)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for ExpenseCategory {
    type Err = ParseCategoryError;

    /// Case-insensitive match on the display name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_order_matches_index() {
        for (i, category) in ExpenseCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert_eq!(ExpenseCategory::ALL[0], ExpenseCategory::Food);
        assert_eq!(ExpenseCategory::ALL[4], ExpenseCategory::Other);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        assert_eq!(ExpenseCategory::Food.next(), ExpenseCategory::Transport);
        assert_eq!(ExpenseCategory::Other.next(), ExpenseCategory::Food);
        assert_eq!(ExpenseCategory::Food.previous(), ExpenseCategory::Other);

        let mut category = ExpenseCategory::Utilities;
        for _ in 0..ExpenseCategory::COUNT {
            category = category.next();
        }
        assert_eq!(category, ExpenseCategory::Utilities);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("food".parse::<ExpenseCategory>(), Ok(ExpenseCategory::Food));
        assert_eq!(
            " ENTERTAINMENT ".parse::<ExpenseCategory>(),
            Ok(ExpenseCategory::Entertainment)
        );
        assert!("groceries".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for category in ExpenseCategory::ALL {
            assert_eq!(category.to_string().parse::<ExpenseCategory>(), Ok(category));
        }
    }
}
