/// Counters for one run of the ingestion loop.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestionSession {
    total: u64,
    batch: u64,
    rejected: u64,
    connections: u64,
}

impl IngestionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_written(&mut self) {
        self.total += 1;
        self.batch += 1;
    }

    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    pub fn connection_opened(&mut self) {
        self.connections += 1;
    }

    /// Return the batch count and start a new batch.
    pub fn take_batch(&mut self) -> u64 {
        std::mem::take(&mut self.batch)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn batch(&self) -> u64 {
        self.batch
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Position of the next record seen, counting rejected ones.
    pub fn next_ordinal(&self) -> u64 {
        self.total + self.rejected + 1
    }

    pub fn summary(&self, termination: Termination) -> IngestionSummary {
        IngestionSummary {
            total: self.total,
            rejected: self.rejected,
            connections: self.connections,
            termination,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// File input read to EOF with polling disabled.
    Exhausted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionSummary {
    pub total: u64,
    pub rejected: u64,
    pub connections: u64,
    pub termination: Termination,
}
