//! Task model
//!
//! A task is a card on the board. It always belongs to exactly one list,
//! identified by `list_title`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// List used when a task is created without one
pub const DEFAULT_LIST: &str = "Backlog";

/// Task identifier
///
/// Server ids are opaque. Entries created locally before the store
/// confirms them carry a provisional id that can never equal a server id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskId {
    /// Assigned by the store
    Remote(String),
    /// Placeholder for an unconfirmed create
    Provisional(u64),
}

impl TaskId {
    /// Wrap a store-assigned id
    #[must_use]
    pub fn remote(id: impl Into<String>) -> Self {
        Self::Remote(id.into())
    }

    /// Whether this id belongs to an unconfirmed entry
    #[must_use]
    pub const fn is_provisional(&self) -> bool {
        matches!(self, Self::Provisional(_))
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(id) => write!(f, "{id}"),
            Self::Provisional(n) => write!(f, "provisional-{n}"),
        }
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::remote(id)
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self::Remote(id.to_string())
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Backends hand out serial integers
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Str(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Self::from(n),
            RawId::Str(s) => Self::Remote(s),
        })
    }
}

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    /// Not finished yet
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    /// Completed
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    /// The other status
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::ToDo => Self::Done,
            Self::Done => Self::ToDo,
        }
    }

    /// Parse the exact wire representation
    ///
    /// Unlike [`FromStr`](std::str::FromStr), which also takes loose command
    /// line spellings such as `todo`, only `To Do` and `Done` are accepted.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "To Do" => Some(Self::ToDo),
            "Done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::Done => "Done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "todo" => Ok(Self::ToDo),
            "done" => Ok(Self::Done),
            _ => Err(format!("Invalid status: {s}. Use: 'To Do' or 'Done'")),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Needs attention first
    #[serde(alias = "alta")]
    High,
    /// Regular work
    Normal,
    /// Can wait
    #[serde(alias = "baixa")]
    Low,
}

impl Priority {
    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "alta" => Ok(Self::High),
            "normal" => Ok(Self::Normal),
            "low" | "baixa" => Ok(Self::Low),
            _ => Err(format!("Invalid priority: {s}. Use: high, normal, low")),
        }
    }
}

/// A task on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// What needs to be done
    pub title: String,

    /// Optional longer text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Title of the list this task belongs to
    pub list_title: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Optional priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Optional due date
    #[serde(default, with = "delivery_date", skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,

    /// When the store created this task
    #[serde(
        default,
        rename = "criada_em",
        alias = "created_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task with the given id, title and list
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, list_title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            list_title: list_title.into(),
            status: TaskStatus::default(),
            priority: None,
            delivery_date: None,
            created_at: None,
        }
    }

    /// Whether the task is finished
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// Fields accepted when creating a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title (required, non-empty)
    pub title: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Target list; the fallback list is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_title: Option<String>,

    /// Optional due date
    #[serde(default, with = "delivery_date", skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,

    /// Optional priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl NewTask {
    /// Start a new task with a title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            list_title: None,
            delivery_date: None,
            priority: None,
        }
    }

    /// Place the task in a list
    #[must_use]
    pub fn in_list(mut self, list_title: impl Into<String>) -> Self {
        self.list_title = Some(list_title.into());
        self
    }

    /// Attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the due date
    #[must_use]
    pub const fn due_on(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Some(date);
        self
    }

    /// List the task will land in
    #[must_use]
    pub fn target_list<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.list_title.as_deref().filter(|l| !l.trim().is_empty()).unwrap_or(fallback)
    }
}

/// Parse a due date sent either as a plain date or a full timestamp
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
}

/// Serde helpers for `delivery_date`
///
/// The backend may send a `DATE` column as a full timestamp, so both shapes
/// are accepted. Dates are always written as `YYYY-MM-DD`.
mod delivery_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_date(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
        }
    }
}
