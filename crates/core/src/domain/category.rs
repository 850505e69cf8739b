// Service Category

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service category a customer queues for.
///
/// The set is closed; each category owns its own ticket sequence and a one or
/// two letter code prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Withdraw,
    Saving,
    Loan,
    LoanReleasing,
    Insurance,
    Member,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Withdraw,
        Category::Saving,
        Category::Loan,
        Category::LoanReleasing,
        Category::Insurance,
        Category::Member,
    ];

    /// Ticket code prefix (W, S, L, LR, I, M)
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Withdraw => "W",
            Category::Saving => "S",
            Category::Loan => "L",
            Category::LoanReleasing => "LR",
            Category::Insurance => "I",
            Category::Member => "M",
        }
    }

    /// Wire / storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Withdraw => "withdraw",
            Category::Saving => "saving",
            Category::Loan => "loan",
            Category::LoanReleasing => "loan-releasing",
            Category::Insurance => "insurance",
            Category::Member => "member",
        }
    }

    /// Human-facing label for kiosks and boards
    pub fn label(&self) -> &'static str {
        match self {
            Category::Withdraw => "Withdraw",
            Category::Saving => "Saving",
            Category::Loan => "Loan",
            Category::LoanReleasing => "Loan Releasing",
            Category::Insurance => "Insurance",
            Category::Member => "Member",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}
