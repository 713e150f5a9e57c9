//! Placement policies constraining which fault or upgrade domains a
//! service's replicas may land in.

use crate::variant::{
    variant_family, wire_record, AttributeReader, AttributeWriter, ResolutionError, WireRecord,
};

macro_rules! domain_policy {
    ($(#[$meta:meta])* $name:ident) => {
        wire_record! {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq)]
            pub struct $name {
                required domain_name: String = "DomainName",
            }
        }

        impl $name {
            #[must_use]
            pub fn new(domain_name: impl Into<String>) -> Self {
                Self {
                    domain_name: domain_name.into(),
                }
            }
        }
    };
}

domain_policy! {
    /// Replicas must not be placed in the named domain.
    ServicePlacementInvalidDomainPolicyDescription
}

domain_policy! {
    /// Primaries should be placed in the named domain when possible.
    ServicePlacementPreferPrimaryDomainPolicyDescription
}

domain_policy! {
    /// Replicas must be placed in the named domain.
    ServicePlacementRequireDomainPolicyDescription
}

domain_policy! {
    /// No two replicas of a partition may share a domain under the named one.
    ServicePlacementRequireDomainDistributionPolicyDescription
}

/// All replicas of a partition are placed atomically or not at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServicePlacementNonPartiallyPlaceServicePolicyDescription;

impl WireRecord for ServicePlacementNonPartiallyPlaceServicePolicyDescription {
    fn read(_: &mut AttributeReader<'_>) -> Result<Self, ResolutionError> {
        Ok(Self)
    }

    fn write(&self, _: &mut AttributeWriter) -> Result<(), ResolutionError> {
        Ok(())
    }
}

variant_family! {
    /// A placement policy, selected by `Type`.
    pub enum ServicePlacementPolicyDescription: ServicePlacementPolicyType {
        family = "ServicePlacementPolicyDescription",
        field = "Type",
        InvalidDomain(ServicePlacementInvalidDomainPolicyDescription),
        NonPartiallyPlaceService(ServicePlacementNonPartiallyPlaceServicePolicyDescription),
        PreferPrimaryDomain(ServicePlacementPreferPrimaryDomainPolicyDescription),
        RequireDomain(ServicePlacementRequireDomainPolicyDescription),
        RequireDomainDistribution(ServicePlacementRequireDomainDistributionPolicyDescription),
    }
}

impl ServicePlacementPolicyDescription {
    /// The domain a policy refers to; `NonPartiallyPlaceService` names none
    #[must_use]
    pub fn domain_name(&self) -> Option<&str> {
        match self {
            Self::InvalidDomain(policy) => Some(&policy.domain_name),
            Self::PreferPrimaryDomain(policy) => Some(&policy.domain_name),
            Self::RequireDomain(policy) => Some(&policy.domain_name),
            Self::RequireDomainDistribution(policy) => Some(&policy.domain_name),
            Self::NonPartiallyPlaceService(_) => None,
        }
    }
}
