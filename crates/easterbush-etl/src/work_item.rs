use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use treadle::WorkItem;

/// A data directory being processed through the pipeline.
///
/// This is the treadle `WorkItem` that flows through the scan → ingest
/// stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataDirJob {
    /// Unique ID for this work item.
    id: String,
    /// Directory holding the campus data exports.
    pub data_dir: PathBuf,
}

impl DataDirJob {
    #[must_use]
    pub fn new(id: impl Into<String>, data_dir: PathBuf) -> Self {
        Self {
            id: id.into(),
            data_dir,
        }
    }
}

impl WorkItem for DataDirJob {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DataDirJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data_dir.display())
    }
}
