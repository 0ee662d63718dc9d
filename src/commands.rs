//! The interactive command loop.
//!
//! Reads one line at a time, dispatches on the first token, and prompts
//! for any follow-up input a command needs. Every error is reported at
//! this boundary and the loop re-prompts; only `exit` or end of input
//! terminates it.

use std::io::{BufRead, Write};

use tracing::warn;

use crate::error::{Result, TodoError};
use crate::store::TodoStore;
use crate::task::Status;
use crate::timer;

pub const MENU: &str =
    "Available commands: add | edit | list [pending|done] | timer [minutes] | delete [-all] | done | help | exit";

pub struct CommandLoop {
    store: TodoStore,
}

impl CommandLoop {
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }

    /// Runs the loop until `exit` or end of input.
    pub fn run(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> std::io::Result<()> {
        loop {
            write!(out, "\n> ")?;
            out.flush()?;
            let Some(line) = read_line(input)? else {
                writeln!(out, "\nGoodbye!")?;
                return Ok(());
            };
            let lower = line.to_lowercase();
            let mut words = lower.split_whitespace();
            let Some(command) = words.next() else {
                continue;
            };
            let rest: Vec<&str> = words.collect();

            let outcome = match command {
                "add" => self.handle_add(input, out),
                "edit" => self.handle_edit(input, out),
                "list" => self.handle_list(&rest, out),
                "timer" => timer::handle_timer(&rest, out),
                "delete" => match rest.as_slice() {
                    [] => self.handle_delete(input, out),
                    ["-all"] => self.handle_delete_all(input, out),
                    _ => Err(TodoError::InvalidUsage(
                        "try: delete or delete -all".into(),
                    )),
                },
                "done" => self.handle_done(input, out),
                "help" => {
                    writeln!(out, "{MENU}")?;
                    Ok(())
                }
                "exit" => {
                    writeln!(out, "Goodbye!")?;
                    return Ok(());
                }
                other => Err(TodoError::InvalidUsage(format!(
                    "unknown command \"{other}\", type help for the list"
                ))),
            };

            if let Err(err) = outcome {
                if matches!(err, TodoError::Persist(_)) {
                    warn!("write failed, keeping in-memory state: {err}");
                }
                writeln!(out, "{err}")?;
            }
        }
    }

    fn handle_add(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
        let text = prompt(input, out, "Enter the task to add:")?;
        if text.is_empty() {
            writeln!(out, "Task cannot be empty")?;
            return Ok(());
        }
        self.store.add(text.clone())?;
        writeln!(out, "Task added: \"{text}\"")?;
        Ok(())
    }

    fn handle_edit(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
        let id = parse_id(&prompt(input, out, "Enter the id of the task to edit:")?)?;
        let current = self
            .store
            .get(id)
            .ok_or(TodoError::NotFound(id))?
            .item
            .clone();
        writeln!(out, "Current task: {current}")?;
        let text = prompt(input, out, "Enter the new task content:")?;
        if text.is_empty() {
            writeln!(out, "Task cannot be empty")?;
            return Ok(());
        }
        self.store.edit(id, text.clone())?;
        writeln!(out, "Task {id} edited: {text}")?;
        Ok(())
    }

    fn handle_list(&self, rest: &[&str], out: &mut impl Write) -> Result<()> {
        let filter = match rest {
            [] => None,
            ["pending"] => Some(Status::Pending),
            ["done"] => Some(Status::Done),
            _ => {
                return Err(TodoError::InvalidUsage(
                    "try: list, list pending, or list done".into(),
                ))
            }
        };
        if self.store.is_empty() {
            writeln!(out, "No items in the list.")?;
        }
        match filter {
            None => writeln!(out, "All items in the list:")?,
            Some(status) => writeln!(out, "Listing tasks (filter: {status}):")?,
        }
        for task in self.store.filtered(filter) {
            writeln!(out, "{}. {} {}", task.id, task.status.checkbox(), task.item)?;
        }
        Ok(())
    }

    fn handle_delete(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
        let id = parse_id(&prompt(input, out, "Enter the id of the task to delete:")?)?;
        self.store.delete(id)?;
        writeln!(out, "Task deleted.")?;
        Ok(())
    }

    fn handle_delete_all(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
        let answer = prompt(input, out, "Delete ALL tasks? [y/n]:")?.to_lowercase();
        match answer.as_str() {
            "y" => {
                self.store.clear()?;
                writeln!(out, "All tasks deleted.")?;
                Ok(())
            }
            "n" => {
                writeln!(out, "Delete all canceled.")?;
                Ok(())
            }
            _ => Err(TodoError::InvalidUsage("only y or n are accepted".into())),
        }
    }

    fn handle_done(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
        let id = parse_id(&prompt(input, out, "Enter the id of the task to mark as done:")?)?;
        if self.store.mark_done(id)? {
            writeln!(out, "Task {id} marked as done.")?;
        } else {
            writeln!(out, "Task {id} is already done.")?;
        }
        Ok(())
    }
}

/// Reads one trimmed line; `None` on end of input.
fn read_line(input: &mut impl BufRead) -> std::io::Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

fn prompt(input: &mut impl BufRead, out: &mut impl Write, message: &str) -> Result<String> {
    writeln!(out, "{message}")?;
    write!(out, "> ")?;
    out.flush()?;
    match read_line(input)? {
        Some(line) => Ok(line),
        None => Err(TodoError::InvalidUsage("unexpected end of input".into())),
    }
}

fn parse_id(raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(TodoError::InvalidId(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_FILE;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_session(store: TodoStore, script: &str) -> (CommandLoop, String) {
        let mut repl = CommandLoop::new(store);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        repl.run(&mut input, &mut out).unwrap();
        (repl, String::from_utf8(out).unwrap())
    }

    fn store_in(tmp: &TempDir) -> TodoStore {
        TodoStore::load(tmp.path().join(DEFAULT_FILE)).unwrap()
    }

    #[test]
    fn test_add_flow() {
        let tmp = TempDir::new().unwrap();
        let (repl, out) = run_session(store_in(&tmp), "add\nbuy milk\nexit\n");
        assert!(out.contains("Task added: \"buy milk\""));
        assert_eq!(repl.store.tasks().len(), 1);
        assert_eq!(repl.store.tasks()[0].item, "buy milk");
        assert_eq!(repl.store.tasks()[0].status, Status::Pending);
    }

    #[test]
    fn test_add_rejects_empty_text() {
        let tmp = TempDir::new().unwrap();
        let (repl, out) = run_session(store_in(&tmp), "add\n   \nexit\n");
        assert!(out.contains("Task cannot be empty"));
        assert!(repl.store.is_empty());
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        let (repl, _) = run_session(store_in(&tmp), "ADD\nread a book\nEXIT\n");
        assert_eq!(repl.store.tasks().len(), 1);
    }

    #[test]
    fn test_unknown_command_reports_and_continues() {
        let tmp = TempDir::new().unwrap();
        let (repl, out) = run_session(store_in(&tmp), "frobnicate\nadd\nstill works\nexit\n");
        assert!(out.contains("unknown command \"frobnicate\""));
        assert_eq!(repl.store.tasks().len(), 1);
    }

    #[test]
    fn test_eof_terminates_like_exit() {
        let tmp = TempDir::new().unwrap();
        let (_, out) = run_session(store_in(&tmp), "");
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn test_list_empty_store_notice() {
        let tmp = TempDir::new().unwrap();
        let (_, out) = run_session(store_in(&tmp), "list\nexit\n");
        assert!(out.contains("No items in the list."));
    }

    #[test]
    fn test_list_done_filter() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("pending task".to_string()).unwrap();
        store.add("finished task".to_string()).unwrap();
        store.mark_done(2).unwrap();

        let (_, out) = run_session(store, "list done\nexit\n");
        assert!(out.contains("2. [x] finished task"));
        assert!(!out.contains("pending task"));
    }

    #[test]
    fn test_list_invalid_filter() {
        let tmp = TempDir::new().unwrap();
        let (_, out) = run_session(store_in(&tmp), "list banana\nexit\n");
        assert!(out.contains("try: list, list pending, or list done"));
    }

    #[test]
    fn test_edit_flow() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("old text".to_string()).unwrap();

        let (repl, out) = run_session(store, "edit\n1\nnew text\nexit\n");
        assert!(out.contains("Current task: old text"));
        assert!(out.contains("Task 1 edited: new text"));
        assert_eq!(repl.store.tasks()[0].item, "new text");
    }

    #[test]
    fn test_done_rejects_non_numeric_id() {
        let tmp = TempDir::new().unwrap();
        let (_, out) = run_session(store_in(&tmp), "done\nabc\nexit\n");
        assert!(out.contains("invalid id \"abc\""));
    }

    #[test]
    fn test_done_already_done_warns() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("task".to_string()).unwrap();
        store.mark_done(1).unwrap();

        let (repl, out) = run_session(store, "done\n1\nexit\n");
        assert!(out.contains("Task 1 is already done."));
        assert_eq!(repl.store.tasks()[0].status, Status::Done);
    }

    #[test]
    fn test_delete_missing_id_reports_not_found() {
        let tmp = TempDir::new().unwrap();
        let (_, out) = run_session(store_in(&tmp), "delete\n9\nexit\n");
        assert!(out.contains("no task with id 9"));
    }

    #[test]
    fn test_delete_all_confirmed() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("a".to_string()).unwrap();
        store.add("b".to_string()).unwrap();

        let (repl, out) = run_session(store, "delete -all\ny\nexit\n");
        assert!(out.contains("All tasks deleted."));
        assert!(repl.store.is_empty());
    }

    #[test]
    fn test_delete_all_canceled() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("a".to_string()).unwrap();

        let (repl, out) = run_session(store, "delete -all\nn\nexit\n");
        assert!(out.contains("Delete all canceled."));
        assert_eq!(repl.store.tasks().len(), 1);
    }

    #[test]
    fn test_delete_all_rejects_other_answers() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("a".to_string()).unwrap();

        let (repl, out) = run_session(store, "delete -all\nmaybe\nexit\n");
        assert!(out.contains("only y or n are accepted"));
        assert_eq!(repl.store.tasks().len(), 1);
    }

    #[test]
    fn test_delete_with_stray_argument() {
        let tmp = TempDir::new().unwrap();
        let (_, out) = run_session(store_in(&tmp), "delete -everything\nexit\n");
        assert!(out.contains("try: delete or delete -all"));
    }
}
