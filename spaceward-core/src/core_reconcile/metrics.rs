/*
    Metrics - reconciliation counters for monitoring

    Provides counters and histograms for:
    - Grant operations issued against the platform, by kind and result
    - Reconciliation passes and their planned operation counts

    Recording happens inside the reconciler; exporting is the embedding
    process's concern.
*/

use metrics::{describe_counter, describe_histogram};

/// Grant operations issued, labeled by kind (add, update_role, remove) and
/// result (ok, error)
pub const GRANT_OPS_TOTAL: &str = "spaceward_grant_ops_total";

/// Reconciliation passes completed, labeled by result (clean, partial)
pub const RECONCILE_RUNS_TOTAL: &str = "spaceward_reconcile_runs_total";

/// Number of operations planned per reconciliation pass
pub const RECONCILE_OPS_PLANNED: &str = "spaceward_reconcile_ops_planned";

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    describe_counter!(
        GRANT_OPS_TOTAL,
        "Total grant operations issued against the platform, labeled by kind (add, update_role, remove) and result (ok, error)"
    );

    describe_counter!(
        RECONCILE_RUNS_TOTAL,
        "Total reconciliation passes completed, labeled by result (clean, partial)"
    );

    describe_histogram!(
        RECONCILE_OPS_PLANNED,
        "Number of grant operations planned per reconciliation pass"
    );
}
