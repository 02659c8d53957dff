//! Audit entry data structures
//!
//! One entry per record-store mutation: what happened, to which entity, and
//! the entity's JSON state around the change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// A working set was consolidated into the ledger
    Finish,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Finish => write!(f, "FINISH"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    ItemGroup,
    GroupItem,
    ManpowerItem,
    LedgerEntry,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::ItemGroup => write!(f, "ItemGroup"),
            EntityType::GroupItem => write!(f, "GroupItem"),
            EntityType::ManpowerItem => write!(f, "ManpowerItem"),
            EntityType::LedgerEntry => write!(f, "LedgerEntry"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// ID of the affected entity ("grp-3", "itm-12", or the group name for ledger entries)
    pub entity_id: String,

    /// Human-readable label (group name, item description, manpower code)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// Changed fields, e.g. `unit_rate: "10.00" -> "12.50"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a newly created entity
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Create, entity_type, entity_id, entity_name)
        }
    }

    /// Entry for an update; the change summary is derived from both states
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => summarize_changes(b, a),
            _ => None,
        };
        Self {
            before,
            after,
            diff_summary,
            ..Self::new(Operation::Update, entity_type, entity_id, entity_name)
        }
    }

    /// Entry for a deleted entity
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Delete, entity_type, entity_id, entity_name)
        }
    }

    /// Entry for a group consolidated into the ledger
    pub fn finish<T: Serialize>(group_name: &str, summary: String, entry: &T) -> Self {
        Self {
            after: serde_json::to_value(entry).ok(),
            diff_summary: Some(summary),
            ..Self::new(
                Operation::Finish,
                EntityType::LedgerEntry,
                group_name,
                Some(group_name.to_string()),
            )
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

/// Top-level field changes between two JSON objects, ignoring `updated_at`
fn summarize_changes(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before), Value::Object(after)) = (before, after) else {
        return (before != after).then(|| format!("{} -> {}", before, after));
    };

    let changes: Vec<String> = before
        .iter()
        .filter(|(key, _)| key.as_str() != "updated_at")
        .filter_map(|(key, old)| {
            let new = after.get(key).unwrap_or(&Value::Null);
            (old != new).then(|| format!("{}: {} -> {}", key, short(old), short(new)))
        })
        .collect();

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn short(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Finish.to_string(), "FINISH");
        assert_eq!(EntityType::GroupItem.to_string(), "GroupItem");
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(
            EntityType::ItemGroup,
            "grp-1",
            Some("Scaffolding".to_string()),
            &json!({"name": "Scaffolding"}),
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }

    #[test]
    fn test_update_entry_summarizes_changed_fields() {
        let before = json!({"unit_rate": "10.00", "unit": "MH", "updated_at": "a"});
        let after = json!({"unit_rate": "12.50", "unit": "MH", "updated_at": "b"});

        let entry = AuditEntry::update(EntityType::GroupItem, "itm-4", None, &before, &after);

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("unit_rate: \"10.00\" -> \"12.50\"")
        );
    }

    #[test]
    fn test_update_without_changes_has_no_summary() {
        let state = json!({"name": "Civil"});
        let entry = AuditEntry::update(EntityType::ItemGroup, "grp-2", None, &state, &state);
        assert!(entry.diff_summary.is_none());
    }

    #[test]
    fn test_delete_entry() {
        let entry = AuditEntry::delete(
            EntityType::ManpowerItem,
            "mp-3",
            Some("WELD-01".to_string()),
            &json!({"code": "WELD-01"}),
        );

        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::finish("Electrical", "3 rows, 850.00".into(), &json!({}));

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"entity_type\":\"ledger_entry\""));
        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.operation, Operation::Finish);
        assert_eq!(deserialized.entity_id, "Electrical");
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(
            EntityType::ItemGroup,
            "grp-1",
            Some("Scaffolding".to_string()),
            &json!({"name": "Scaffolding"}),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE"));
        assert!(formatted.contains("ItemGroup"));
        assert!(formatted.contains("grp-1"));
        assert!(formatted.contains("Scaffolding"));
    }
}
