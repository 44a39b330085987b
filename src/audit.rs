//! Audit trail of pipeline outcomes
//!
//! Every cache update and module generation appends one JSON object per line
//! to `<cache_dir>/audit.log`, successful or not. Writing is best-effort: a
//! broken log never fails the command that produced the event.

use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// File name of the audit log inside the cache directory
pub const AUDIT_FILE: &str = "audit.log";

#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    timestamp: DateTime<Utc>,
    event: &'a str,
    data: &'a Value,
}

/// Appends pipeline events to the cache's audit log
pub struct AuditLog {
    enabled: bool,
    path: PathBuf,
}

impl AuditLog {
    pub fn new(config: &Config, cache_dir: &Path) -> Self {
        Self {
            enabled: config.general.audit_log,
            path: cache_dir.join(AUDIT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record `event` with its payload; a no-op when `general.audit_log` is off
    pub async fn log(&self, event: &str, data: &Value) {
        if !self.enabled {
            return;
        }

        let entry = AuditEntry {
            timestamp: Utc::now(),
            event,
            data,
        };
        let line = match serde_json::to_string(&entry) {
            Ok(json) => json + "\n",
            Err(e) => {
                warn!("Audit event {} not serializable: {}", event, e);
                return;
            }
        };

        match self.append(line.as_bytes()).await {
            Ok(()) => debug!("Audit: {}", event),
            Err(e) => warn!("Could not append to {}: {}", self.path.display(), e),
        }
    }

    async fn append(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn audit_in(dir: &TempDir, enabled: bool) -> AuditLog {
        let mut config = Config::default();
        config.general.audit_log = enabled;
        AuditLog::new(&config, dir.path())
    }

    fn entries(audit: &AuditLog) -> Vec<Value> {
        std::fs::read_to_string(audit.path())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn generated_module_is_recorded() {
        let dir = TempDir::new().unwrap();
        let audit = audit_in(&dir, true);

        audit
            .log(
                "module.generated",
                &json!({"module": "myco_tool", "template": "app_template"}),
            )
            .await;

        let entries = entries(&audit);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["event"], "module.generated");
        assert_eq!(entries[0]["data"]["module"], "myco_tool");
        assert!(entries[0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn events_accumulate_in_order() {
        let dir = TempDir::new().unwrap();
        let audit = audit_in(&dir, true);

        audit.log("cache.updated", &json!({"modules": 3})).await;
        audit.log("cache.update_failed", &json!({"error": "exit code: 128"})).await;

        let events: Vec<Value> = entries(&audit).into_iter().map(|e| e["event"].clone()).collect();
        assert_eq!(events, vec![json!("cache.updated"), json!("cache.update_failed")]);
    }

    #[tokio::test]
    async fn disabled_log_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let audit = audit_in(&dir, false);

        audit.log("cache.updated", &json!({})).await;

        assert!(!audit.path().exists());
    }
}
