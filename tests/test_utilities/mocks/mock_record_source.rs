use appsheet_deps::prelude::*;
use std::path::Path;

/// Mock RecordSource for testing
pub struct MockRecordSource {
    pub records: ComponentRecords,
    pub should_fail: bool,
}

impl MockRecordSource {
    pub fn new(records: ComponentRecords) -> Self {
        Self {
            records,
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            records: ComponentRecords::new(),
            should_fail: true,
        }
    }
}

impl RecordSource for MockRecordSource {
    fn load_records(&self, _path: &Path) -> Result<ComponentRecords> {
        if self.should_fail {
            anyhow::bail!("Mock record document read failure");
        }
        Ok(self.records.clone())
    }
}
