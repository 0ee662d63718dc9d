//! JSON-backed task storage.
//!
//! The store owns the backing file path and the in-memory task list.
//! Insertion order is display order, ids stay contiguous from 1, and
//! every mutation rewrites the whole file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TodoError};
use crate::task::{Status, Task};

/// Name of the backing file, created in the working directory.
pub const DEFAULT_FILE: &str = "todo.json";

#[derive(Debug)]
pub struct TodoStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TodoStore {
    /// Loads the store from `path`.
    ///
    /// A missing file is created empty; a present-but-empty file is an
    /// empty store. Malformed JSON aborts the load, never a partial one.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            fs::write(&path, "")?;
            debug!(path = %path.display(), "created empty task file");
            return Ok(Self {
                path,
                tasks: Vec::new(),
            });
        }
        let data = fs::read_to_string(&path)?;
        let tasks: Vec<Task> = if data.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&data)?
        };
        debug!(path = %path.display(), count = tasks.len(), "loaded task file");
        Ok(Self { path, tasks })
    }

    /// Rewrites the whole file with the current task list.
    ///
    /// The in-memory list stays valid when the write fails, so callers may
    /// report the error and keep going.
    pub fn save(&self) -> Result<()> {
        let body = serde_json::to_string_pretty(&self.tasks)?;
        fs::write(&self.path, body)?;
        debug!(count = self.tasks.len(), "saved task file");
        Ok(())
    }

    /// All tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Gets a task by id.
    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Tasks matching a status filter; `None` means everything.
    pub fn filtered(&self, filter: Option<Status>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| filter.map_or(true, |f| t.status == f))
            .collect()
    }

    /// Appends a new pending task, persists, and returns its id.
    pub fn add(&mut self, item: String) -> Result<u32> {
        let id = self.tasks.len() as u32 + 1;
        self.tasks.push(Task::new(id, item));
        self.save()?;
        Ok(id)
    }

    /// Replaces the text of the task with the given id and persists.
    pub fn edit(&mut self, id: u32, item: String) -> Result<()> {
        let task = self.get_mut(id).ok_or(TodoError::NotFound(id))?;
        task.rewrite(item);
        self.save()
    }

    /// Marks the task done and persists. Returns `false` when it was
    /// already done, in which case nothing changes and nothing is written.
    pub fn mark_done(&mut self, id: u32) -> Result<bool> {
        let task = self.get_mut(id).ok_or(TodoError::NotFound(id))?;
        if task.status == Status::Done {
            return Ok(false);
        }
        task.status = Status::Done;
        self.save()?;
        Ok(true)
    }

    /// Removes the task with the given id, renumbers the rest, persists.
    pub fn delete(&mut self, id: u32) -> Result<()> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))?;
        self.tasks.remove(index);
        self.renumber();
        self.save()
    }

    /// Drops every task and persists the empty list.
    pub fn clear(&mut self) -> Result<()> {
        self.tasks.clear();
        self.save()
    }

    // Ids double as display positions; deletions open gaps that this closes.
    fn renumber(&mut self) {
        for (i, task) in self.tasks.iter_mut().enumerate() {
            task.id = i as u32 + 1;
        }
    }
}
