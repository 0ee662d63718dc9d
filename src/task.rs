use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Completion state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Done,
}

impl Status {
    pub fn checkbox(self) -> &'static str {
        match self {
            Status::Pending => "[ ]",
            Status::Done => "[x]",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Pending => "pending",
            Status::Done => "done",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u32,
    pub item: String,
    pub status: Status,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// A fresh pending task, both timestamps stamped with the current time.
    pub fn new(id: u32, item: String) -> Self {
        let now = Local::now().to_rfc3339();
        Self {
            id,
            item,
            status: Status::Pending,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Replaces the text and moves `updated_at`; status and `created_at`
    /// are untouched.
    pub fn rewrite(&mut self, item: String) {
        self.item = item;
        self.updated_at = Local::now().to_rfc3339();
    }
}
