//! In-memory spreadsheet service.

use async_trait::async_trait;
use sheetbridge_core::ports::SpreadsheetService;
use sheetbridge_core::{Error, Result, Workbook};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Spreadsheets held in process, keyed by ID.
#[derive(Debug, Default)]
pub struct MemorySpreadsheets {
    workbooks: RwLock<HashMap<String, Workbook>>,
}

impl MemorySpreadsheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a spreadsheet.
    pub async fn insert(&self, workbook: Workbook) {
        self.workbooks
            .write()
            .await
            .insert(workbook.id.clone(), workbook);
    }

    /// Snapshot of a spreadsheet.
    pub async fn workbook(&self, id: &str) -> Option<Workbook> {
        self.workbooks.read().await.get(id).cloned()
    }
}

#[async_trait]
impl SpreadsheetService for MemorySpreadsheets {
    async fn open(&self, id: &str) -> Result<Workbook> {
        self.workbook(id)
            .await
            .ok_or_else(|| Error::SheetNotFound(format!("spreadsheet {}", id)))
    }

    async fn save(&self, workbook: &Workbook) -> Result<()> {
        self.insert(workbook.clone()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_unknown_spreadsheet() {
        let service = MemorySpreadsheets::new();
        let err = service.open("missing").await.unwrap_err();
        assert!(matches!(err, Error::SheetNotFound(_)));
    }

    #[tokio::test]
    async fn test_save_then_open() {
        let service = MemorySpreadsheets::new();
        let mut wb = Workbook::new("doc");
        wb.sheet_or_insert("Data");
        service.save(&wb).await.unwrap();
        assert_eq!(service.open("doc").await.unwrap(), wb);
    }
}
