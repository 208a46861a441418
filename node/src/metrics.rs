//! Prometheus metrics for the Vigil node.
//!
//! Exposes counters and gauges covering both verification phases and
//! watcher fraud-flagging activity.  The [`NodeMetrics`] struct owns a
//! dedicated [`Registry`] that the RPC `/metrics` endpoint can encode into
//! the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, IntCounter, IntGauge,
    Opts, Registry,
};

/// Central collection of all node-level Prometheus metrics.
pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Total messages that passed pre-verification.
    pub pre_verifications: IntCounter,
    /// Total messages that passed final verification.
    pub verifications: IntCounter,
    /// Total fraud flags accepted from watchers.
    pub fraud_flags: IntCounter,
    /// Total submodules whose fraud flags reached the quorum threshold.
    pub fraud_quorums: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Current number of pre-verification records in the ledger.
    pub pre_verification_records: IntGauge,
    /// Current number of submodules with at least one fraud flag.
    pub flagged_submodules: IntGauge,
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let pre_verifications = register_int_counter_with_registry!(
            Opts::new(
                "vigil_pre_verifications_total",
                "Total messages that passed pre-verification"
            ),
            registry
        )
        .expect("failed to register pre_verifications counter");

        let verifications = register_int_counter_with_registry!(
            Opts::new(
                "vigil_verifications_total",
                "Total messages that passed final verification"
            ),
            registry
        )
        .expect("failed to register verifications counter");

        let fraud_flags = register_int_counter_with_registry!(
            Opts::new(
                "vigil_fraud_flags_total",
                "Total fraud flags accepted from watchers"
            ),
            registry
        )
        .expect("failed to register fraud_flags counter");

        let fraud_quorums = register_int_counter_with_registry!(
            Opts::new(
                "vigil_fraud_quorums_total",
                "Total submodules whose flags reached the quorum threshold"
            ),
            registry
        )
        .expect("failed to register fraud_quorums counter");

        let pre_verification_records = register_int_gauge_with_registry!(
            Opts::new(
                "vigil_pre_verification_records",
                "Current number of pre-verification ledger records"
            ),
            registry
        )
        .expect("failed to register pre_verification_records gauge");

        let flagged_submodules = register_int_gauge_with_registry!(
            Opts::new(
                "vigil_flagged_submodules",
                "Current number of submodules with at least one fraud flag"
            ),
            registry
        )
        .expect("failed to register flagged_submodules gauge");

        Self {
            registry,
            pre_verifications,
            verifications,
            fraud_flags,
            fraud_quorums,
            pre_verification_records,
            flagged_submodules,
        }
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_register_and_gather() {
        let metrics = NodeMetrics::new();
        metrics.pre_verifications.inc();
        metrics.fraud_flags.inc();
        metrics.fraud_flags.inc();
        metrics.pre_verification_records.set(7);

        let families = metrics.registry.gather();
        let names: Vec<_> = families.iter().map(|f| f.get_name().to_string()).collect();
        assert!(names.contains(&"vigil_pre_verifications_total".to_string()));
        assert!(names.contains(&"vigil_fraud_flags_total".to_string()));
        assert!(names.contains(&"vigil_pre_verification_records".to_string()));

        assert_eq!(metrics.pre_verifications.get(), 1);
        assert_eq!(metrics.fraud_flags.get(), 2);
        assert_eq!(metrics.pre_verification_records.get(), 7);
    }

    #[test]
    fn independent_instances_do_not_collide() {
        // Each NodeMetrics owns its own registry, so creating two in the
        // same process must not panic on duplicate registration.
        let a = NodeMetrics::new();
        let b = NodeMetrics::new();
        a.verifications.inc();
        assert_eq!(b.verifications.get(), 0);
    }
}
