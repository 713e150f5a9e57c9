//! Auto-scaling: what triggers a scaling action and what the action does.

use crate::{
    validation::{require_at_least, require_at_most, require_wire_seconds, ValidationError},
    variant::{variant_family, wire_record},
};

// ============================================================================
// TRIGGERS
// ============================================================================

fn check_load_window(lower: f64, upper: f64, interval_seconds: u64) -> Result<(), ValidationError> {
    require_at_least(lower, "LowerLoadThreshold", 0.0)?;
    require_at_most(lower, "LowerLoadThreshold", upper)?;
    require_wire_seconds(interval_seconds, "ScaleIntervalInSeconds")?;
    Ok(())
}

wire_record! {
    /// Scale when the average load of a metric across a partition's
    /// instances leaves `[LowerLoadThreshold, UpperLoadThreshold]`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct AveragePartitionLoadScalingTrigger {
        required metric_name: String = "MetricName",
        decimal lower_load_threshold: f64 = "LowerLoadThreshold",
        decimal upper_load_threshold: f64 = "UpperLoadThreshold",
        decimal scale_interval_in_seconds: u64 = "ScaleIntervalInSeconds",
    }
    validate = Self::validate;
}

impl AveragePartitionLoadScalingTrigger {
    /// # Errors
    ///
    /// Returns `OutOfRange` if the lower threshold is negative or above the
    /// upper one, or the interval exceeds 4294967295 seconds.
    pub fn new(
        metric_name: impl Into<String>,
        lower_load_threshold: f64,
        upper_load_threshold: f64,
        scale_interval_in_seconds: u64,
    ) -> Result<Self, ValidationError> {
        let trigger = Self {
            metric_name: metric_name.into(),
            lower_load_threshold,
            upper_load_threshold,
            scale_interval_in_seconds,
        };
        trigger.validate()?;
        Ok(trigger)
    }

    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_load_window(
            self.lower_load_threshold,
            self.upper_load_threshold,
            self.scale_interval_in_seconds,
        )
    }
}

wire_record! {
    /// Scale when the average load of a metric across all partitions leaves
    /// `[LowerLoadThreshold, UpperLoadThreshold]`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct AverageServiceLoadScalingTrigger {
        required metric_name: String = "MetricName",
        decimal lower_load_threshold: f64 = "LowerLoadThreshold",
        decimal upper_load_threshold: f64 = "UpperLoadThreshold",
        decimal scale_interval_in_seconds: u64 = "ScaleIntervalInSeconds",
        /// Only primary replicas' load counts towards the average
        optional use_only_primary_load: Option<bool> = "UseOnlyPrimaryLoad",
    }
    validate = Self::validate;
}

impl AverageServiceLoadScalingTrigger {
    /// # Errors
    ///
    /// See [`AveragePartitionLoadScalingTrigger::new`].
    pub fn new(
        metric_name: impl Into<String>,
        lower_load_threshold: f64,
        upper_load_threshold: f64,
        scale_interval_in_seconds: u64,
    ) -> Result<Self, ValidationError> {
        let trigger = Self {
            metric_name: metric_name.into(),
            lower_load_threshold,
            upper_load_threshold,
            scale_interval_in_seconds,
            use_only_primary_load: None,
        };
        trigger.validate()?;
        Ok(trigger)
    }

    /// # Errors
    ///
    /// See [`AveragePartitionLoadScalingTrigger::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_load_window(
            self.lower_load_threshold,
            self.upper_load_threshold,
            self.scale_interval_in_seconds,
        )
    }
}

variant_family! {
    /// What makes a service scale, selected by `Kind`.
    pub enum ScalingTriggerDescription: ScalingTriggerKind {
        family = "ScalingTriggerDescription",
        field = "Kind",
        AveragePartitionLoad(AveragePartitionLoadScalingTrigger),
        AverageServiceLoad(AverageServiceLoadScalingTrigger),
    }
}

// ============================================================================
// MECHANISMS
// ============================================================================

wire_record! {
    /// Scale by changing the instance count of each partition.
    ///
    /// `-1` for a count means "one instance on every node".
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PartitionInstanceCountScaleMechanism {
        required min_instance_count: i32 = "MinInstanceCount",
        required max_instance_count: i32 = "MaxInstanceCount",
        required scale_increment: i32 = "ScaleIncrement",
    }
    validate = Self::validate;
}

impl PartitionInstanceCountScaleMechanism {
    /// # Errors
    ///
    /// Returns `OutOfRange` if the minimum is below -1, the maximum below the
    /// minimum, or the increment below 1.
    pub fn new(
        min_instance_count: i32,
        max_instance_count: i32,
        scale_increment: i32,
    ) -> Result<Self, ValidationError> {
        let mechanism = Self {
            min_instance_count,
            max_instance_count,
            scale_increment,
        };
        mechanism.validate()?;
        Ok(mechanism)
    }

    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let min = require_at_least(self.min_instance_count, "MinInstanceCount", -1)?;
        require_at_least(self.max_instance_count, "MaxInstanceCount", min)?;
        require_at_least(self.scale_increment, "ScaleIncrement", 1)?;
        Ok(())
    }
}

wire_record! {
    /// Scale by adding or removing named partitions.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AddRemoveIncrementalNamedPartitionScalingMechanism {
        required min_partition_count: i32 = "MinPartitionCount",
        required max_partition_count: i32 = "MaxPartitionCount",
        required scale_increment: i32 = "ScaleIncrement",
    }
    validate = Self::validate;
}

impl AddRemoveIncrementalNamedPartitionScalingMechanism {
    /// # Errors
    ///
    /// Returns `OutOfRange` if the minimum is below 1, the maximum below the
    /// minimum, or the increment below 1.
    pub fn new(
        min_partition_count: i32,
        max_partition_count: i32,
        scale_increment: i32,
    ) -> Result<Self, ValidationError> {
        let mechanism = Self {
            min_partition_count,
            max_partition_count,
            scale_increment,
        };
        mechanism.validate()?;
        Ok(mechanism)
    }

    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let min = require_at_least(self.min_partition_count, "MinPartitionCount", 1)?;
        require_at_least(self.max_partition_count, "MaxPartitionCount", min)?;
        require_at_least(self.scale_increment, "ScaleIncrement", 1)?;
        Ok(())
    }
}

variant_family! {
    /// What a scaling action does, selected by `Kind`.
    pub enum ScalingMechanismDescription: ScalingMechanismKind {
        family = "ScalingMechanismDescription",
        field = "Kind",
        PartitionInstanceCount(PartitionInstanceCountScaleMechanism),
        AddRemoveIncrementalNamedPartition(AddRemoveIncrementalNamedPartitionScalingMechanism),
    }
}

// ============================================================================
// POLICY
// ============================================================================

wire_record! {
    /// A trigger paired with the mechanism it fires.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ScalingPolicyDescription {
        variant scaling_trigger: ScalingTriggerDescription = "ScalingTrigger",
        variant scaling_mechanism: ScalingMechanismDescription = "ScalingMechanism",
    }
}

impl ScalingPolicyDescription {
    #[must_use]
    pub fn new(
        scaling_trigger: impl Into<ScalingTriggerDescription>,
        scaling_mechanism: impl Into<ScalingMechanismDescription>,
    ) -> Self {
        Self {
            scaling_trigger: scaling_trigger.into(),
            scaling_mechanism: scaling_mechanism.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        config::ResolverConfig,
        variant::{read_record, record_to_value, AttributeWriter, ResolutionError, WireRecord},
    };

    #[test]
    fn test_trigger_thresholds_travel_as_strings() -> Result<(), ResolutionError> {
        let trigger =
            AverageServiceLoadScalingTrigger::new("servicefabric:/_CpuCores", 0.5, 1.5, 600)?;
        let value = crate::variant::to_value(&ScalingTriggerDescription::from(trigger))?;
        assert_eq!(
            value,
            json!({
                "Kind": "AverageServiceLoad",
                "MetricName": "servicefabric:/_CpuCores",
                "LowerLoadThreshold": "0.5",
                "UpperLoadThreshold": "1.5",
                "ScaleIntervalInSeconds": "600",
            })
        );
        Ok(())
    }

    #[test]
    fn test_trigger_constraints() {
        assert!(AveragePartitionLoadScalingTrigger::new("m", -0.1, 1.0, 60)
            .is_err_and(|e| e.argument_name() == "LowerLoadThreshold"));
        assert!(AveragePartitionLoadScalingTrigger::new("m", 2.0, 1.0, 60).is_err());
        assert!(AveragePartitionLoadScalingTrigger::new("m", 0.0, 1.0, 4_294_967_296)
            .is_err_and(|e| e.argument_name() == "ScaleIntervalInSeconds"));
        assert!(AveragePartitionLoadScalingTrigger::new("m", 1.0, 1.0, 4_294_967_295).is_ok());
    }

    #[test]
    fn test_mechanism_constraints() {
        assert!(PartitionInstanceCountScaleMechanism::new(-1, -1, 1).is_ok());
        assert!(PartitionInstanceCountScaleMechanism::new(-2, 5, 1).is_err());
        assert!(PartitionInstanceCountScaleMechanism::new(3, 2, 1).is_err());
        assert!(PartitionInstanceCountScaleMechanism::new(1, 5, 0).is_err());
        assert!(AddRemoveIncrementalNamedPartitionScalingMechanism::new(0, 5, 1).is_err());
        assert!(AddRemoveIncrementalNamedPartitionScalingMechanism::new(1, 5, 1).is_ok());
    }

    #[test]
    fn test_invalid_record_is_not_written() {
        let mechanism = PartitionInstanceCountScaleMechanism {
            min_instance_count: 5,
            max_instance_count: 1,
            scale_increment: 1,
        };
        let mut writer = AttributeWriter::new();
        assert!(matches!(
            mechanism.write(&mut writer),
            Err(ResolutionError::Validation(_))
        ));
    }

    #[test]
    fn test_policy_nests_two_families() -> Result<(), ResolutionError> {
        let payload = json!({
            "ScalingTrigger": {
                "Kind": "AveragePartitionLoad",
                "MetricName": "MemoryInMB",
                "LowerLoadThreshold": "100",
                "UpperLoadThreshold": "800",
                "ScaleIntervalInSeconds": "300",
            },
            "ScalingMechanism": {
                "Kind": "PartitionInstanceCount",
                "MinInstanceCount": 1,
                "MaxInstanceCount": 10,
                "ScaleIncrement": 2,
            },
        });
        let policy: ScalingPolicyDescription = read_record(&payload, &ResolverConfig::default())?;
        assert_eq!(policy.scaling_mechanism.kind(), ScalingMechanismKind::PartitionInstanceCount);

        assert_eq!(record_to_value(&policy)?, payload);
        Ok(())
    }
}
