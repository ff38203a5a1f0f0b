//! Property scopes and clearing every scope at once.

use crate::store::{FilePropertyStore, MemoryPropertyStore};
use serde::{Deserialize, Serialize};
use sheetbridge_core::ports::PropertyStore;
use sheetbridge_core::{Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Visibility of a property store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyScope {
    Document,
    Script,
    User,
}

impl PropertyScope {
    pub const ALL: [PropertyScope; 3] = [
        PropertyScope::Script,
        PropertyScope::Document,
        PropertyScope::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyScope::Document => "document",
            PropertyScope::Script => "script",
            PropertyScope::User => "user",
        }
    }
}

impl fmt::Display for PropertyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PropertyScope {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "document" => Ok(PropertyScope::Document),
            "script" => Ok(PropertyScope::Script),
            "user" => Ok(PropertyScope::User),
            _ => Err(Error::Config(format!("Unknown property scope: {}", s))),
        }
    }
}

/// Properties removed per scope by `Properties::clear_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub script: usize,
    pub document: usize,
    pub user: usize,
}

/// The document, script, and user property stores of one context.
#[derive(Clone)]
pub struct Properties {
    document: Arc<dyn PropertyStore>,
    script: Arc<dyn PropertyStore>,
    user: Arc<dyn PropertyStore>,
}

impl Properties {
    pub fn new(
        document: Arc<dyn PropertyStore>,
        script: Arc<dyn PropertyStore>,
        user: Arc<dyn PropertyStore>,
    ) -> Self {
        Self {
            document,
            script,
            user,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryPropertyStore::new()),
            Arc::new(MemoryPropertyStore::new()),
            Arc::new(MemoryPropertyStore::new()),
        )
    }

    /// One JSON file per scope under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let store = |scope: PropertyScope| -> Arc<dyn PropertyStore> {
            Arc::new(FilePropertyStore::new(dir.join(format!("{}.json", scope))))
        };
        Self::new(
            store(PropertyScope::Document),
            store(PropertyScope::Script),
            store(PropertyScope::User),
        )
    }

    pub fn scope(&self, scope: PropertyScope) -> &Arc<dyn PropertyStore> {
        match scope {
            PropertyScope::Document => &self.document,
            PropertyScope::Script => &self.script,
            PropertyScope::User => &self.user,
        }
    }

    pub fn script(&self) -> &dyn PropertyStore {
        self.script.as_ref()
    }

    /// Delete every script, document, and user property.
    pub async fn clear_all(&self) -> Result<ClearReport> {
        let mut report = ClearReport::default();
        for scope in PropertyScope::ALL {
            let removed = self.scope(scope).delete_all().await?;
            info!(scope = %scope, removed, "Deleted properties");
            match scope {
                PropertyScope::Script => report.script = removed,
                PropertyScope::Document => report.document = removed,
                PropertyScope::User => report.user = removed,
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parse() {
        assert_eq!("Script".parse::<PropertyScope>().unwrap(), PropertyScope::Script);
        assert_eq!("user".parse::<PropertyScope>().unwrap(), PropertyScope::User);
        assert!("global".parse::<PropertyScope>().is_err());
    }

    #[tokio::test]
    async fn test_clear_all_scopes() {
        let props = Properties::in_memory();
        props.scope(PropertyScope::Script).set("a", "1").await.unwrap();
        props.scope(PropertyScope::Script).set("b", "2").await.unwrap();
        props.scope(PropertyScope::User).set("c", "3").await.unwrap();

        let report = props.clear_all().await.unwrap();
        assert_eq!(
            report,
            ClearReport {
                script: 2,
                document: 0,
                user: 1
            }
        );
        assert!(props.script().keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let props = Properties::in_memory();
        props.scope(PropertyScope::Document).set("k", "doc").await.unwrap();
        assert_eq!(props.scope(PropertyScope::User).get("k").await.unwrap(), None);
    }
}
