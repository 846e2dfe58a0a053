/// Tunables for a `SemanticAnalyzer` run.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerConfig {
    /// Bucket count for every scope's hash table. The reference
    /// implementation hard-codes 200; kept configurable here mainly so
    /// property tests can exercise small table sizes without degenerating
    /// into `O(n)` buckets.
    pub table_size: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { table_size: 200 }
    }
}
