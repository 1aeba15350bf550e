//! Scheduler discriminator

use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Identifies which orchestration backend owns an entity.
///
/// Every backend-specific branch downstream switches on this value rather
/// than on the concrete type that produced the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduler {
    /// Managed task scheduler (Amazon ECS)
    Ecs,
    /// Managed Kubernetes control plane (Amazon EKS)
    Eks,
}

impl Scheduler {
    /// All known schedulers, in list-all registration order
    pub const ALL: [Scheduler; 2] = [Scheduler::Ecs, Scheduler::Eks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheduler::Ecs => "ecs",
            Scheduler::Eks => "eks",
        }
    }
}

impl std::fmt::Display for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scheduler {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ecs" => Ok(Scheduler::Ecs),
            "eks" => Ok(Scheduler::Eks),
            _ => Err(BackendError::InvalidScheduler(format!(
                "Unknown scheduler: '{}'",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ecs", Scheduler::Ecs)]
    #[case("eks", Scheduler::Eks)]
    fn test_parse_known(#[case] input: &str, #[case] expected: Scheduler) {
        let parsed: Scheduler = input.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("ECS")]
    #[case("kubernetes")]
    #[case("nomad")]
    fn test_parse_unknown_is_invalid_scheduler(#[case] input: &str) {
        let err = input.parse::<Scheduler>().unwrap_err();
        assert!(matches!(err, BackendError::InvalidScheduler(_)));
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Scheduler::Eks).unwrap(), "\"eks\"");
        let s: Scheduler = serde_json::from_str("\"ecs\"").unwrap();
        assert_eq!(s, Scheduler::Ecs);
    }
}
