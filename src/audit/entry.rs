//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Types of operations that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Account,
    Category,
    Transaction,
    Settings,
}

impl EntityType {
    /// Parse an entity kind name (singular or plural, case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "account" | "accounts" => Some(Self::Account),
            "category" | "categories" => Some(Self::Category),
            "transaction" | "transactions" | "txn" => Some(Self::Transaction),
            "settings" => Some(Self::Settings),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Account => write!(f, "Account"),
            EntityType::Category => write!(f, "Category"),
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::Settings => write!(f, "Settings"),
        }
    }
}

/// A single line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable name of the entity (account name, category name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Entity state before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    /// Entity state after the operation (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// Changed top-level fields, e.g. `name: "Cash" -> "Wallet"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: None,
            changes: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Create, entity_type, entity_id.into(), entity_name);
        entry.after = serde_json::to_value(entity).ok();
        entry
    }

    /// An update entry; the change summary is computed from the two states
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Update, entity_type, entity_id.into(), entity_name);
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        entry.changes = match (&entry.before, &entry.after) {
            (Some(b), Some(a)) => summarize_changes(b, a),
            _ => None,
        };
        entry
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Delete, entity_type, entity_id.into(), entity_name);
        entry.before = serde_json::to_value(entity).ok();
        entry
    }

    /// Format the entry for terminal output
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

        if let Some(changes) = &self.changes {
            output.push_str(&format!("\n  Changes: {}", changes));
        }

        output
    }
}

/// Summarize top-level fields that differ between two JSON objects.
/// Timestamps are ignored.
fn summarize_changes(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(b), Value::Object(a)) = (before, after) else {
        return None;
    };

    let mut keys: Vec<&String> = b.keys().chain(a.keys()).collect();
    keys.sort();
    keys.dedup();

    let changes: Vec<String> = keys
        .into_iter()
        .filter(|k| k.as_str() != "updated_at")
        .filter_map(|k| {
            let old = b.get(k).unwrap_or(&Value::Null);
            let new = a.get(k).unwrap_or(&Value::Null);
            (old != new).then(|| format!("{}: {} -> {}", k, old, new))
        })
        .collect();

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_type_parse() {
        assert_eq!(EntityType::parse("Accounts"), Some(EntityType::Account));
        assert_eq!(EntityType::parse("txn"), Some(EntityType::Transaction));
        assert_eq!(EntityType::parse("settings"), Some(EntityType::Settings));
        assert_eq!(EntityType::parse("payee"), None);
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(
            EntityType::Category,
            "cat-12345678",
            Some("Food".to_string()),
            &json!({"name": "Food"}),
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
        assert!(entry.changes.is_none());
    }

    #[test]
    fn test_update_entry_summarizes_changes() {
        let before = json!({"name": "Cash", "amount": 1000, "updated_at": "a"});
        let after = json!({"name": "Wallet", "amount": 1000, "updated_at": "b"});

        let entry = AuditEntry::update(EntityType::Account, "acc-1", None, &before, &after);

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.changes.as_deref(), Some(r#"name: "Cash" -> "Wallet""#));
    }

    #[test]
    fn test_delete_entry() {
        let entry = AuditEntry::delete(
            EntityType::Transaction,
            "txn-12345678",
            None,
            &json!({"amount": 500}),
        );

        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(
            EntityType::Account,
            "acc-12345678",
            Some("Wallet".to_string()),
            &json!({"name": "Wallet"}),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE Account acc-12345678 (Wallet)"));
    }
}
