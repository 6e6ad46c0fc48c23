//! Task board Model (`dashboard_tasks`)
//!
//! Phases hold tasks; a task may hold one level of subtasks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Task>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// The `dashboard_tasks` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskBoard {
    #[serde(default)]
    pub phases: Vec<Phase>,
}

impl TaskBoard {
    /// Find a task or subtask by id
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        for phase in &mut self.phases {
            for task in &mut phase.tasks {
                if task.id == id {
                    return Some(task);
                }
                if let Some(sub) = task
                    .subtasks
                    .as_mut()
                    .and_then(|subs| subs.iter_mut().find(|s| s.id == id))
                {
                    return Some(sub);
                }
            }
        }
        None
    }

    /// Remove a task or subtask by id, returning it
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        for phase in &mut self.phases {
            if let Some(idx) = phase.tasks.iter().position(|t| t.id == id) {
                return Some(phase.tasks.remove(idx));
            }
            for task in &mut phase.tasks {
                if let Some(subs) = task.subtasks.as_mut() {
                    if let Some(idx) = subs.iter().position(|s| s.id == id) {
                        return Some(subs.remove(idx));
                    }
                }
            }
        }
        None
    }
}

/// Fields a task update may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Done,
    Text,
    Owner,
}

impl TaskField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "done" => Some(Self::Done),
            "text" => Some(Self::Text),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Set this field on `task`. Returns `false` when `value` has the wrong
    /// JSON type for the field (bool for `done`, string otherwise).
    pub fn apply(self, task: &mut Task, value: &Value) -> bool {
        match (self, value) {
            (Self::Done, Value::Bool(b)) => task.done = *b,
            (Self::Text, Value::String(s)) => task.text = s.clone(),
            (Self::Owner, Value::String(s)) => task.owner = s.clone(),
            _ => return false,
        }
        true
    }
}

/// Task fields accepted when adding a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub text: Option<String>,
    pub owner: Option<String>,
    pub done: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn board() -> TaskBoard {
        serde_json::from_value(json!({
            "phases": [{
                "id": "phase_1",
                "title": "Membership Pipeline",
                "description": "",
                "tasks": [
                    { "id": "task_1", "text": "Import roster", "owner": "tech", "done": false,
                      "subtasks": [
                        { "id": "sub_1", "text": "Build CSV import", "owner": "tech", "done": true }
                      ] },
                    { "id": "task_2", "text": "Welcome mail", "owner": "board", "done": false }
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_find_task_and_subtask() {
        let mut b = board();
        assert_eq!(b.find_mut("task_2").unwrap().owner, "board");
        assert!(b.find_mut("sub_1").unwrap().done);
        assert!(b.find_mut("missing").is_none());
    }

    #[test]
    fn test_remove_subtask_keeps_parent() {
        let mut b = board();
        let removed = b.remove("sub_1").unwrap();
        assert_eq!(removed.text, "Build CSV import");
        let parent = b.find_mut("task_1").unwrap();
        assert!(parent.subtasks.as_ref().unwrap().is_empty());
        assert!(b.remove("sub_1").is_none());
    }

    #[test]
    fn test_field_type_check() {
        let mut b = board();
        let task = b.find_mut("task_1").unwrap();
        assert!(TaskField::Done.apply(task, &json!(true)));
        assert!(task.done);
        assert!(!TaskField::Done.apply(task, &json!("yes")));
        assert!(!TaskField::Text.apply(task, &json!(3)));
        assert!(TaskField::Owner.apply(task, &json!("treasurer")));
        assert_eq!(task.owner, "treasurer");
        assert_eq!(TaskField::parse("id"), None);
    }

    #[test]
    fn test_subtasks_omitted_when_absent() {
        let b = board();
        let json = serde_json::to_value(&b).unwrap();
        assert!(json["phases"][0]["tasks"][1].get("subtasks").is_none());
    }
}
