//! Navigating and judging health-evaluation trees.

use tap::Pipe;

use super::{delta_threshold_violated, is_threshold_violated, HealthEvaluation, HealthEvaluationWrapper};

/// The policy an aggregating evaluation was checked against.
///
/// Unset percentages and counts on the wire default to 0, matching how the
/// cluster reports an unconfigured policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnhealthyPolicy {
    /// At most `max_percent` of `total_count` children may be unhealthy
    Percentage { max_percent: i32, total_count: i64 },
    /// The unhealthy ratio may grow by at most `max_delta_percent` points
    /// over the baseline
    Delta {
        max_delta_percent: i32,
        baseline_error_count: i64,
        baseline_total_count: i64,
        total_count: i64,
    },
}

impl UnhealthyPolicy {
    /// Whether `unhealthy_count` breaks this policy
    #[must_use]
    pub fn is_violated_by(self, unhealthy_count: i64) -> bool {
        match self {
            Self::Percentage {
                max_percent,
                total_count,
            } => is_threshold_violated(max_percent, total_count, unhealthy_count),
            Self::Delta {
                max_delta_percent,
                baseline_error_count,
                baseline_total_count,
                total_count,
            } => delta_threshold_violated(
                max_delta_percent,
                baseline_error_count,
                baseline_total_count,
                unhealthy_count,
                total_count,
            ),
        }
    }
}

fn percentage(max_percent: Option<i32>, total_count: Option<i64>) -> UnhealthyPolicy {
    UnhealthyPolicy::Percentage {
        max_percent: max_percent.unwrap_or(0),
        total_count: total_count.unwrap_or(0),
    }
}

impl HealthEvaluation {
    /// Unhealthy child evaluations, in wire order
    #[must_use]
    pub fn children(&self) -> impl ExactSizeIterator<Item = &Self> + '_ {
        self.record()
            .unhealthy_evaluations()
            .iter()
            .map(|wrapper| &wrapper.health_evaluation)
    }

    /// Depth-first, parent-before-children traversal yielding each node with
    /// its distance from `self`.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Number of levels in the tree rooted here; a leaf has depth 1
    #[must_use]
    pub fn depth(&self) -> usize {
        self.walk()
            .map(|(level, _)| level)
            .max()
            .unwrap_or_default()
            .pipe(|deepest| deepest + 1)
    }

    /// Number of unhealthy children reported directly under this node
    #[must_use]
    pub fn unhealthy_count(&self) -> i64 {
        i64::try_from(self.record().unhealthy_evaluations().len()).unwrap_or(i64::MAX)
    }

    /// The threshold policy of an aggregating evaluation, if it has one
    #[must_use]
    pub fn threshold(&self) -> Option<UnhealthyPolicy> {
        let policy = match self {
            Self::Replicas(r) => percentage(r.max_percent_unhealthy_replicas_per_partition, r.total_count),
            Self::Partitions(r) => {
                percentage(r.max_percent_unhealthy_partitions_per_service, r.total_count)
            }
            Self::DeployedApplications(r) => {
                percentage(r.max_percent_unhealthy_deployed_applications, r.total_count)
            }
            Self::Services(r) => percentage(r.max_percent_unhealthy_services, r.total_count),
            Self::Nodes(r) => percentage(r.max_percent_unhealthy_nodes, r.total_count),
            Self::Applications(r) => percentage(r.max_percent_unhealthy_applications, r.total_count),
            Self::UpgradeDomainDeployedApplications(r) => {
                percentage(r.max_percent_unhealthy_deployed_applications, r.total_count)
            }
            Self::UpgradeDomainNodes(r) => percentage(r.max_percent_unhealthy_nodes, r.total_count),
            Self::ApplicationTypeApplications(r) => {
                percentage(r.max_percent_unhealthy_applications, r.total_count)
            }
            Self::NodeTypeNodes(r) => percentage(r.max_percent_unhealthy_nodes, r.total_count),
            Self::DeltaNodesCheck(r) => UnhealthyPolicy::Delta {
                max_delta_percent: r.max_percent_delta_unhealthy_nodes.unwrap_or(0),
                baseline_error_count: r.baseline_error_count.unwrap_or(0),
                baseline_total_count: r.baseline_total_count.unwrap_or(0),
                total_count: r.total_count.unwrap_or(0),
            },
            Self::UpgradeDomainDeltaNodesCheck(r) => UnhealthyPolicy::Delta {
                max_delta_percent: r.max_percent_upgrade_domain_delta_unhealthy_nodes.unwrap_or(0),
                baseline_error_count: r.baseline_error_count.unwrap_or(0),
                baseline_total_count: r.baseline_total_count.unwrap_or(0),
                total_count: r.total_count.unwrap_or(0),
            },
            Self::Event(_)
            | Self::DeployedServicePackages(_)
            | Self::SystemApplication(_)
            | Self::Replica(_)
            | Self::Partition(_)
            | Self::DeployedServicePackage(_)
            | Self::DeployedApplication(_)
            | Self::Service(_)
            | Self::Node(_)
            | Self::Application(_) => return None,
        };
        Some(policy)
    }

    /// Whether this evaluation accounts for a Warning or Error state.
    ///
    /// An `Ok` (or unset) evaluation never does. One with a threshold policy
    /// does only when its unhealthy children break the policy; one without
    /// does by virtue of reporting the state.
    #[must_use]
    pub fn justifies_unhealthy_state(&self) -> bool {
        if !self.aggregated_health_state().is_unhealthy() {
            return false;
        }
        self.threshold()
            .map_or(true, |policy| policy.is_violated_by(self.unhealthy_count()))
    }
}

/// Iterator returned by [`HealthEvaluation::walk`].
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a HealthEvaluation)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a HealthEvaluation);

    fn next(&mut self) -> Option<Self::Item> {
        let (level, node) = self.stack.pop()?;
        let children = node.record().unhealthy_evaluations();
        self.stack
            .extend(children.iter().rev().map(|child| (level + 1, &child.health_evaluation)));
        Some((level, node))
    }
}

/// Wrap evaluations for a parent's `UnhealthyEvaluations`
#[must_use]
pub fn wrap_all(evaluations: impl IntoIterator<Item = HealthEvaluation>) -> Vec<HealthEvaluationWrapper> {
    evaluations.into_iter().map(HealthEvaluationWrapper::from).collect()
}
