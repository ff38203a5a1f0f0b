//! Spreadsheets stored as one JSON document per workbook.

use async_trait::async_trait;
use sheetbridge_core::ports::SpreadsheetService;
use sheetbridge_core::{Error, Result, Workbook};
use std::path::PathBuf;
use tracing::debug;

pub struct FileSpreadsheets {
    root_dir: PathBuf,
}

impl FileSpreadsheets {
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    fn path(&self, id: &str) -> PathBuf {
        let name: String = id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root_dir.join(format!("{}.json", name))
    }

    /// Open a workbook, starting an empty one when no file exists yet.
    pub async fn open_or_create(&self, id: &str) -> Result<Workbook> {
        match self.open(id).await {
            Err(Error::SheetNotFound(_)) => Ok(Workbook::new(id)),
            other => other,
        }
    }
}

#[async_trait]
impl SpreadsheetService for FileSpreadsheets {
    async fn open(&self, id: &str) -> Result<Workbook> {
        let path = self.path(id);
        match tokio::fs::read(&path).await {
            Ok(contents) => Ok(serde_json::from_slice(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::SheetNotFound(format!("spreadsheet {}", id)))
            }
            Err(e) => Err(Error::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn save(&self, workbook: &Workbook) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;
        let path = self.path(&workbook.id);
        tokio::fs::write(&path, serde_json::to_vec_pretty(workbook)?)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", path.display(), e)))?;
        debug!(spreadsheet = %workbook.id, path = %path.display(), "Saved workbook");
        Ok(())
    }
}
