use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::elements::{parse_records, ElementSetRecord};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub records: Arc<RwLock<Vec<ElementSetRecord>>>,
}

impl AppState {
    pub fn new(config: Config, records: Vec<ElementSetRecord>) -> Self {
        Self {
            config: Arc::new(config),
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Read and parse the configured element-set file.
    pub fn read_tle_file(&self) -> std::io::Result<Vec<ElementSetRecord>> {
        let text = std::fs::read_to_string(&self.config.tle_file)?;
        Ok(parse_records(&text))
    }

    /// Swap in a freshly parsed record set, returning its size.
    pub async fn replace_records(&self, records: Vec<ElementSetRecord>) -> usize {
        let count = records.len();
        *self.records.write().await = records;
        count
    }

    pub async fn record(&self, index: usize) -> Option<ElementSetRecord> {
        self.records.read().await.get(index).cloned()
    }
}
