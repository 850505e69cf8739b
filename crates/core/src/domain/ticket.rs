// Ticket Domain Model

use crate::domain::category::Category;
use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticket ID (UUID v4)
pub type TicketId = String;

/// Service counter identifier
pub type CounterId = i32;

/// Ticket lifecycle status: waiting -> serving -> completed, never backwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Waiting,
    Serving,
    Completed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Waiting,
        TicketStatus::Serving,
        TicketStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::Serving => "serving",
            TicketStatus::Completed => "completed",
        }
    }

    /// Waiting and serving tickets still occupy their code
    pub fn is_outstanding(&self) -> bool {
        !matches!(self, TicketStatus::Completed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "waiting" => Ok(TicketStatus::Waiting),
            "serving" => Ok(TicketStatus::Serving),
            "completed" => Ok(TicketStatus::Completed),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Human-facing ticket label: category prefix + two-digit sequence ("W07", "LR12")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketCode(String);

impl TicketCode {
    pub fn new(category: Category, sequence: u32) -> Self {
        Self(format!("{}{:02}", category.prefix(), sequence))
    }

    /// Wrap a stored code without re-validating it
    pub fn from_raw(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix of the code, read relative to the category's prefix
    pub fn sequence(&self, category: Category) -> Option<u32> {
        self.0.strip_prefix(category.prefix())?.parse().ok()
    }
}

impl fmt::Display for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Customer contact details captured at the kiosk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub location: String,
}

impl ContactInfo {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            location: location.into(),
        }
    }

    /// All three fields are required by the kiosk form
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("location", &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::ValidationError(format!(
                "missing contact fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Ticket Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub code: TicketCode,
    pub category: Category,
    pub status: TicketStatus,

    pub created_at: i64, // epoch ms, sole ordering key
    pub served_at: Option<i64>,
    pub completed_at: Option<i64>,

    pub contact: Option<ContactInfo>,
    pub counter: Option<CounterId>,
}

impl Ticket {
    /// Create a waiting ticket
    ///
    /// # Arguments
    ///
    /// * `id` - Unique ticket ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    /// * `category` - Service category
    /// * `sequence` - Sequence number within the category
    /// * `contact` - Optional contact details
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        category: Category,
        sequence: u32,
        contact: Option<ContactInfo>,
    ) -> Self {
        Self {
            id: id.into(),
            code: TicketCode::new(category, sequence),
            category,
            status: TicketStatus::Waiting,
            created_at,
            served_at: None,
            completed_at: None,
            contact,
            counter: None,
        }
    }

    /// Create a test ticket with deterministic ID and timestamp.
    ///
    /// IDs are `test-1`, `test-2`, ... and timestamps step by 1000 so creation
    /// order matches ordering. Production code injects ID and time via providers.
    pub fn new_test(category: Category, sequence: u32) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self::new(
            format!("test-{}", counter),
            (counter * 1000) as i64,
            category,
            sequence,
            None,
        )
    }

    /// Transition to Serving at `counter`
    pub fn start_serving(&mut self, counter: CounterId, now_millis: i64) -> Result<()> {
        if self.status != TicketStatus::Waiting {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: TicketStatus::Serving.to_string(),
            });
        }
        self.status = TicketStatus::Serving;
        self.counter = Some(counter);
        self.served_at = Some(now_millis);
        Ok(())
    }

    /// Transition to Completed
    pub fn complete(&mut self, now_millis: i64) -> Result<()> {
        if self.status != TicketStatus::Serving {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: TicketStatus::Completed.to_string(),
            });
        }
        self.status = TicketStatus::Completed;
        self.completed_at = Some(now_millis);
        Ok(())
    }

    /// Sequence number encoded in the code, if it parses
    pub fn sequence(&self) -> Option<u32> {
        self.code.sequence(self.category)
    }
}
