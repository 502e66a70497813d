use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::merge::{MailMerge, RecordBuilder};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub merge: Arc<MailMerge>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let builder =
            RecordBuilder::new().with_unsubscribe_base(settings.merge.unsubscribe_base.clone());
        let merge = Arc::new(MailMerge::with_builder(builder));

        Self {
            settings: Arc::new(settings),
            merge,
            started_at: Instant::now(),
        }
    }
}
