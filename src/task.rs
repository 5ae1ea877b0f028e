//! Completed task handle / 同步完成的任务句柄
//!
//! Every native operation finishes before the call returns. A `SyncTask` is
//! only handed out when the caller asks for one, so that callers written
//! against an asynchronous-capable interface still get a handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-call options / 调用选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOptions {
    /// Return a completed task handle / 是否返回任务句柄
    #[serde(default)]
    pub return_slow_promise_result: bool,
}

impl TaskOptions {
    pub fn with_task() -> Self {
        Self {
            return_slow_promise_result: true,
        }
    }

    /// Build options from a loose JSON mapping, unknown keys are ignored / 从JSON解析选项
    pub fn from_value(value: &serde_json::Value) -> Self {
        Self {
            return_slow_promise_result: value
                .get("return_slow_promise_result")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        }
    }

    /// Completed handle if requested / 按需返回已完成的任务
    pub fn completed(&self) -> Option<SyncTask> {
        self.return_slow_promise_result.then(SyncTask::completed)
    }
}

/// Already completed task / 已完成的任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTask {
    pub completed_at: DateTime<Utc>,
}

impl SyncTask {
    pub fn completed() -> Self {
        Self {
            completed_at: Utc::now(),
        }
    }

    /// Nothing is outstanding, waiting returns immediately / 等待（立即返回）
    pub async fn wait(&self) {}

    pub fn is_completed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_only_when_requested() {
        assert!(TaskOptions::default().completed().is_none());
        let task = TaskOptions::with_task().completed().unwrap();
        assert!(task.is_completed());
    }

    #[test]
    fn test_options_from_value() {
        assert!(TaskOptions::from_value(&json!({"return_slow_promise_result": true})).return_slow_promise_result);
        assert!(!TaskOptions::from_value(&json!({"return_slow_promise_result": "yes"})).return_slow_promise_result);
        assert!(!TaskOptions::from_value(&json!({"other": true})).return_slow_promise_result);
    }

    #[tokio::test]
    async fn test_wait_returns() {
        let task = SyncTask::completed();
        task.wait().await;
        assert!(task.completed_at <= Utc::now());
    }
}
