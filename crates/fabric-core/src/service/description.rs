//! The `ServiceDescription` family: what a client sends to create a service.

use serde::{Deserialize, Serialize};

use super::{
    MoveCost, PartitionSchemeDescription, ScalingPolicyDescription, ServiceLoadMetricWeight,
    ServicePackageActivationMode, ServicePlacementPolicyDescription,
};
use crate::{
    identifiers::HierarchicalName,
    validation::{
        check_optional, require_at_least, require_at_most, require_percentage,
        require_wire_seconds, ValidationError,
    },
    variant::{variant_family, wire_record},
};

/// A metric the service reports load for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceLoadMetricDescription {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<ServiceLoadMetricWeight>,
    /// Stateful services only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_default_load: Option<i32>,
    /// Stateful services only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_default_load: Option<i32>,
    /// Stateless services only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_load: Option<i32>,
}

impl ServiceLoadMetricDescription {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: None,
            primary_default_load: None,
            secondary_default_load: None,
            default_load: None,
        }
    }

    #[must_use]
    pub const fn with_weight(mut self, weight: ServiceLoadMetricWeight) -> Self {
        self.weight = Some(weight);
        self
    }
}

wire_record! {
    /// Attributes shared by stateful and stateless service descriptions.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ServiceDescriptionCommon {
        optional_id application_name: Option<HierarchicalName> = "ApplicationName",
        id service_name: HierarchicalName = "ServiceName",
        required service_type_name: String = "ServiceTypeName",
        variant partition_description: PartitionSchemeDescription = "PartitionDescription",
        optional initialization_data: Option<Vec<u8>> = "InitializationData",
        optional placement_constraints: Option<String> = "PlacementConstraints",
        optional service_load_metrics: Option<Vec<ServiceLoadMetricDescription>> = "ServiceLoadMetrics",
        optional_variants service_placement_policies: Option<Vec<ServicePlacementPolicyDescription>> = "ServicePlacementPolicies",
        optional default_move_cost: Option<MoveCost> = "DefaultMoveCost",
        optional is_default_move_cost_specified: Option<bool> = "IsDefaultMoveCostSpecified",
        optional service_package_activation_mode: Option<ServicePackageActivationMode> = "ServicePackageActivationMode",
        optional service_dns_name: Option<String> = "ServiceDnsName",
        optional_records scaling_policies: Option<Vec<ScalingPolicyDescription>> = "ScalingPolicies",
    }
}

impl ServiceDescriptionCommon {
    /// Required attributes only; everything optional is unset
    #[must_use]
    pub fn new(
        service_name: HierarchicalName,
        service_type_name: impl Into<String>,
        partition_description: impl Into<PartitionSchemeDescription>,
    ) -> Self {
        Self {
            application_name: None,
            service_name,
            service_type_name: service_type_name.into(),
            partition_description: partition_description.into(),
            initialization_data: None,
            placement_constraints: None,
            service_load_metrics: None,
            service_placement_policies: None,
            default_move_cost: None,
            is_default_move_cost_specified: None,
            service_package_activation_mode: None,
            service_dns_name: None,
            scaling_policies: None,
        }
    }

    #[must_use]
    pub fn with_application_name(mut self, application_name: HierarchicalName) -> Self {
        self.application_name = Some(application_name);
        self
    }
}

wire_record! {
    /// A service whose replicas keep state.
    #[derive(Debug, Clone, PartialEq)]
    pub struct StatefulServiceDescription {
        flatten common: ServiceDescriptionCommon,
        required target_replica_set_size: i32 = "TargetReplicaSetSize",
        required min_replica_set_size: i32 = "MinReplicaSetSize",
        required has_persisted_state: bool = "HasPersistedState",
        /// Bit set telling which of the optional durations below are meaningful
        optional flags: Option<i32> = "Flags",
        optional_decimal replica_restart_wait_duration_seconds: Option<u64> = "ReplicaRestartWaitDurationSeconds",
        optional_decimal quorum_loss_wait_duration_seconds: Option<u64> = "QuorumLossWaitDurationSeconds",
        optional_decimal stand_by_replica_keep_duration_seconds: Option<u64> = "StandByReplicaKeepDurationSeconds",
        optional_decimal service_placement_time_limit_seconds: Option<u64> = "ServicePlacementTimeLimitSeconds",
    }
    validate = Self::validate;
}

impl StatefulServiceDescription {
    /// # Errors
    ///
    /// Returns `OutOfRange` if either set size is below 1 or the minimum
    /// exceeds the target.
    pub fn new(
        common: ServiceDescriptionCommon,
        target_replica_set_size: i32,
        min_replica_set_size: i32,
        has_persisted_state: bool,
    ) -> Result<Self, ValidationError> {
        let description = Self {
            common,
            target_replica_set_size,
            min_replica_set_size,
            has_persisted_state,
            flags: None,
            replica_restart_wait_duration_seconds: None,
            quorum_loss_wait_duration_seconds: None,
            stand_by_replica_keep_duration_seconds: None,
            service_placement_time_limit_seconds: None,
        };
        description.validate()?;
        Ok(description)
    }

    /// # Errors
    ///
    /// See [`Self::new`]; additionally `OutOfRange` for a duration above
    /// 4294967295 seconds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let target = require_at_least(self.target_replica_set_size, "TargetReplicaSetSize", 1)?;
        require_at_least(self.min_replica_set_size, "MinReplicaSetSize", 1)?;
        require_at_most(self.min_replica_set_size, "MinReplicaSetSize", target)?;
        for (seconds, name) in [
            (self.replica_restart_wait_duration_seconds, "ReplicaRestartWaitDurationSeconds"),
            (self.quorum_loss_wait_duration_seconds, "QuorumLossWaitDurationSeconds"),
            (self.stand_by_replica_keep_duration_seconds, "StandByReplicaKeepDurationSeconds"),
            (self.service_placement_time_limit_seconds, "ServicePlacementTimeLimitSeconds"),
        ] {
            check_optional(seconds, |s| require_wire_seconds(s, name))?;
        }
        Ok(())
    }
}

wire_record! {
    /// A service whose instances are interchangeable.
    #[derive(Debug, Clone, PartialEq)]
    pub struct StatelessServiceDescription {
        flatten common: ServiceDescriptionCommon,
        /// `-1` places one instance on every eligible node
        required instance_count: i32 = "InstanceCount",
        optional min_instance_count: Option<i32> = "MinInstanceCount",
        percent min_instance_percentage: Option<i32> = "MinInstancePercentage",
        optional flags: Option<i32> = "Flags",
        optional_decimal instance_close_delay_duration_seconds: Option<u64> = "InstanceCloseDelayDurationSeconds",
    }
    validate = Self::validate;
}

impl StatelessServiceDescription {
    /// # Errors
    ///
    /// Returns `OutOfRange` if `instance_count < -1`.
    pub fn new(common: ServiceDescriptionCommon, instance_count: i32) -> Result<Self, ValidationError> {
        let description = Self {
            common,
            instance_count,
            min_instance_count: None,
            min_instance_percentage: None,
            flags: None,
            instance_close_delay_duration_seconds: None,
        };
        description.validate()?;
        Ok(description)
    }

    /// # Errors
    ///
    /// Returns `OutOfRange` if `instance_count < -1`, the minimum percentage
    /// leaves `[0, 100]` or the close delay exceeds 4294967295 seconds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_at_least(self.instance_count, "InstanceCount", -1)?;
        check_optional(self.min_instance_percentage, |p| {
            require_percentage(p, "MinInstancePercentage")
        })?;
        check_optional(self.instance_close_delay_duration_seconds, |s| {
            require_wire_seconds(s, "InstanceCloseDelayDurationSeconds")
        })?;
        Ok(())
    }
}

variant_family! {
    /// A service creation request, selected by `ServiceKind`.
    pub enum ServiceDescription: ServiceKind {
        family = "ServiceDescription",
        field = "ServiceKind",
        Stateful(StatefulServiceDescription),
        Stateless(StatelessServiceDescription),
    }
}

impl ServiceDescription {
    #[must_use]
    pub fn common(&self) -> &ServiceDescriptionCommon {
        match self {
            Self::Stateful(description) => &description.common,
            Self::Stateless(description) => &description.common,
        }
    }

    #[must_use]
    pub fn service_name(&self) -> &HierarchicalName {
        &self.common().service_name
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        service::{
            AveragePartitionLoadScalingTrigger, NamedPartitionSchemeDescription,
            PartitionInstanceCountScaleMechanism, ServicePlacementRequireDomainPolicyDescription,
            SingletonPartitionSchemeDescription,
        },
        variant::{resolve_value, to_value, ResolutionError},
    };

    fn common(partition: impl Into<PartitionSchemeDescription>) -> crate::Result<ServiceDescriptionCommon> {
        Ok(ServiceDescriptionCommon::new(
            HierarchicalName::parse("fabric:/shop/cart")?,
            "CartType",
            partition,
        ))
    }

    #[test]
    fn test_stateful_round_trip_with_nested_families() -> crate::Result<()> {
        let mut common = common(NamedPartitionSchemeDescription::new(vec!["a".into(), "b".into()])?)?
            .with_application_name(HierarchicalName::parse("fabric:/shop")?);
        common.service_placement_policies = Some(vec![
            ServicePlacementRequireDomainPolicyDescription::new("fd:/dc1").into(),
        ]);
        common.service_load_metrics = Some(vec![
            ServiceLoadMetricDescription::new("MemoryInMB").with_weight(ServiceLoadMetricWeight::High),
        ]);
        common.scaling_policies = Some(vec![ScalingPolicyDescription::new(
            AveragePartitionLoadScalingTrigger::new("MemoryInMB", 0.0, 512.0, 60)?,
            PartitionInstanceCountScaleMechanism::new(1, 3, 1)?,
        )]);

        let mut stateful = StatefulServiceDescription::new(common, 3, 2, true)?;
        stateful.quorum_loss_wait_duration_seconds = Some(4_294_967_295);
        let description = ServiceDescription::from(stateful);

        let value = to_value(&description)?;
        assert_eq!(value["ServiceKind"], "Stateful");
        assert_eq!(value["QuorumLossWaitDurationSeconds"], "4294967295");
        assert_eq!(value["PartitionDescription"]["PartitionScheme"], "Named");
        assert_eq!(value["ServicePlacementPolicies"][0]["Type"], "RequireDomain");
        assert_eq!(value["ScalingPolicies"][0]["ScalingTrigger"]["Kind"], "AveragePartitionLoad");

        let resolved: ServiceDescription = resolve_value(&value)?;
        assert_eq!(resolved, description);
        Ok(())
    }

    #[test]
    fn test_stateless_with_optionals_absent() -> crate::Result<()> {
        let payload = json!({
            "ServiceKind": "Stateless",
            "ServiceName": "fabric:/web/front",
            "ServiceTypeName": "FrontType",
            "PartitionDescription": { "PartitionScheme": "Singleton" },
            "InstanceCount": -1,
        });
        let description: ServiceDescription = resolve_value(&payload)?;
        assert_eq!(description.kind(), ServiceKind::Stateless);
        assert_eq!(description.service_name().as_str(), "fabric:/web/front");
        assert_eq!(description.common().application_name, None);
        assert_eq!(to_value(&description)?, payload);
        Ok(())
    }

    #[test]
    fn test_replica_set_sizes_are_checked() -> crate::Result<()> {
        let common = common(SingletonPartitionSchemeDescription)?;
        assert!(StatefulServiceDescription::new(common.clone(), 0, 1, false).is_err());
        assert!(StatefulServiceDescription::new(common.clone(), 3, 0, false).is_err());
        assert!(StatefulServiceDescription::new(common.clone(), 2, 3, false)
            .is_err_and(|e| e.argument_name() == "MinReplicaSetSize"));
        assert!(StatefulServiceDescription::new(common, 3, 3, false).is_ok());
        Ok(())
    }

    #[test]
    fn test_stateless_constraints() -> crate::Result<()> {
        let common = common(SingletonPartitionSchemeDescription)?;
        assert!(StatelessServiceDescription::new(common.clone(), -2).is_err());

        let mut description = StatelessServiceDescription::new(common, 5)?;
        description.min_instance_percentage = Some(101);
        assert!(description.validate().is_err());
        description.min_instance_percentage = Some(100);
        description.instance_close_delay_duration_seconds = Some(4_294_967_296);
        assert!(description
            .validate()
            .is_err_and(|e| e.argument_name() == "InstanceCloseDelayDurationSeconds"));
        Ok(())
    }

    #[test]
    fn test_wire_duration_window_on_read() {
        let result = resolve_value::<ServiceDescription>(&json!({
            "ServiceKind": "Stateful",
            "ServiceName": "fabric:/a/b",
            "ServiceTypeName": "T",
            "PartitionDescription": { "PartitionScheme": "Singleton" },
            "TargetReplicaSetSize": 3,
            "MinReplicaSetSize": 2,
            "HasPersistedState": false,
            "ReplicaRestartWaitDurationSeconds": "4294967296",
        }));
        assert!(matches!(
            result,
            Err(ResolutionError::Validation(err)) if err.argument_name() == "ReplicaRestartWaitDurationSeconds"
        ));
    }

    #[test]
    fn test_bad_service_name_keeps_its_path() {
        let result = resolve_value::<ServiceDescription>(&json!({
            "ServiceKind": "Stateless",
            "ServiceName": "http://a/b",
            "ServiceTypeName": "T",
            "PartitionDescription": { "PartitionScheme": "Singleton" },
            "InstanceCount": 1,
        }));
        assert!(matches!(
            result,
            Err(ResolutionError::MalformedIdentifier { field, source }) if field == "ServiceName" && source.is_bad_scheme()
        ));
    }

    #[test]
    fn test_nested_partition_error_path() {
        let result = resolve_value::<ServiceDescription>(&json!({
            "ServiceKind": "Stateless",
            "ServiceName": "fabric:/a/b",
            "ServiceTypeName": "T",
            "PartitionDescription": { "PartitionScheme": "Ranged" },
            "InstanceCount": 1,
        }));
        assert_eq!(
            result,
            Err(ResolutionError::unknown_discriminator("PartitionSchemeDescription", "Ranged"))
        );
    }
}
