//! Aggregated result sets

use serde::{Deserialize, Serialize};

use super::Scheduler;

/// Why an aggregated result is incomplete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A sub-query failed; the remaining results are still returned
    PartialAggregation,
}

/// A sub-query failure that was absorbed into a successful result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationWarning {
    pub kind: WarningKind,
    pub scheduler: Scheduler,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub message: String,
}

impl AggregationWarning {
    pub fn partial(scheduler: Scheduler, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PartialAggregation,
            scheduler,
            cluster: None,
            namespace: None,
            message: message.into(),
        }
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Items merged from one or more sub-queries, with the failures that were
/// absorbed along the way
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregated<T> {
    pub items: Vec<T>,
    pub warnings: Vec<AggregationWarning>,
}

impl<T> Default for Aggregated<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<T> Aggregated<T> {
    /// A complete result with no warnings
    pub fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            warnings: Vec::new(),
        }
    }

    /// Whether any sub-query failed
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn warn(&mut self, warning: AggregationWarning) {
        self.warnings.push(warning);
    }

    /// Append another result, keeping order
    pub fn merge(&mut self, other: Aggregated<T>) {
        self.items.extend(other.items);
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_serializes_as_empty_arrays() {
        let result: Aggregated<u32> = Aggregated::default();
        assert!(!result.is_partial());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "items": [], "warnings": [] })
        );
    }

    #[test]
    fn test_merge_keeps_order_and_warnings() {
        let mut a = Aggregated::complete(vec![1, 2]);
        let mut b = Aggregated::complete(vec![3]);
        b.warn(
            AggregationWarning::partial(Scheduler::Eks, "namespace failed")
                .with_cluster("blue")
                .with_namespace("kube-system"),
        );
        a.merge(b);

        assert_eq!(a.items, vec![1, 2, 3]);
        assert!(a.is_partial());
        let json = serde_json::to_value(&a.warnings[0]).unwrap();
        assert_eq!(json["kind"], "partial_aggregation");
        assert_eq!(json["scheduler"], "eks");
        assert_eq!(json["namespace"], "kube-system");
    }
}
