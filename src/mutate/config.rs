use std::sync::{Arc, Mutex};

use crate::audit::{MutationAudit, NullMutationAudit};
use crate::balance::RebalancePolicy;
use crate::logging::{LogLevel, Logger};
use crate::metrics::MutationMetrics;

/// Grid width used by dashboards unless configured otherwise.
pub const DEFAULT_COLUMNS: u32 = 12;

pub const DEFAULT_LOG_TARGET: &str = "grid::mutator";
pub const DEFAULT_METRICS_TARGET: &str = "grid::mutator.metrics";

/// Configuration knobs for [`LayoutMutator`](super::LayoutMutator).
#[derive(Clone)]
pub struct MutatorConfig {
    /// Total width units every row must sum to.
    pub columns: u32,
    /// Width policy applied when an item joins an existing row.
    pub add_policy: RebalancePolicy,
    /// Run the invariant validator on every result before returning it.
    pub validate_results: bool,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Level used for committed and rejected operations.
    pub level: LogLevel,
    /// Target field on mutation log events.
    pub log_target: String,
    /// Target field on metrics snapshot events.
    pub metrics_target: String,
    /// Counters shared with the caller.
    pub metrics: Option<Arc<Mutex<MutationMetrics>>>,
    /// Receives one record per committed operation.
    pub audit: Arc<dyn MutationAudit>,
}

impl Default for MutatorConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            add_policy: RebalancePolicy::default(),
            validate_results: cfg!(any(debug_assertions, feature = "runtime-validation")),
            logger: None,
            level: LogLevel::Debug,
            log_target: DEFAULT_LOG_TARGET.to_string(),
            metrics_target: DEFAULT_METRICS_TARGET.to_string(),
            metrics: None,
            audit: Arc::new(NullMutationAudit),
        }
    }
}

impl MutatorConfig {
    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_add_policy(mut self, policy: RebalancePolicy) -> Self {
        self.add_policy = policy;
        self
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_results = enabled;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_audit<A>(mut self, audit: A) -> Self
    where
        A: MutationAudit + 'static,
    {
        self.audit = Arc::new(audit);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(MutationMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<MutationMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

impl std::fmt::Debug for MutatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutatorConfig")
            .field("columns", &self.columns)
            .field("add_policy", &self.add_policy)
            .field("validate_results", &self.validate_results)
            .field("logger", &self.logger)
            .field("level", &self.level)
            .field("log_target", &self.log_target)
            .field("metrics_target", &self.metrics_target)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
