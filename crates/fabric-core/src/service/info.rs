//! The `ServiceInfo` family: a service as reported by a list query.

use super::ServiceStatus;
use crate::{
    health::HealthState,
    identifiers::HierarchicalName,
    variant::{variant_family, wire_record},
};

wire_record! {
    /// Attributes shared by stateful and stateless service info.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ServiceInfoCommon {
        /// Flattened form of `name`, as used in REST paths
        optional id: Option<String> = "Id",
        id name: HierarchicalName = "Name",
        required type_name: String = "TypeName",
        optional manifest_version: Option<String> = "ManifestVersion",
        optional health_state: Option<HealthState> = "HealthState",
        optional service_status: Option<ServiceStatus> = "ServiceStatus",
        optional is_service_group: Option<bool> = "IsServiceGroup",
    }
}

impl ServiceInfoCommon {
    /// Info for `name`, with `Id` derived from it
    #[must_use]
    pub fn new(name: HierarchicalName, type_name: impl Into<String>) -> Self {
        Self {
            id: Some(name.flat_id()),
            name,
            type_name: type_name.into(),
            manifest_version: None,
            health_state: None,
            service_status: None,
            is_service_group: None,
        }
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StatefulServiceInfo {
        flatten common: ServiceInfoCommon,
        optional has_persisted_state: Option<bool> = "HasPersistedState",
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StatelessServiceInfo {
        flatten common: ServiceInfoCommon,
    }
}

variant_family! {
    /// A listed service, selected by `ServiceKind`.
    pub enum ServiceInfo: ServiceInfoKind {
        family = "ServiceInfo",
        field = "ServiceKind",
        Stateful(StatefulServiceInfo),
        Stateless(StatelessServiceInfo),
    }
}

impl ServiceInfo {
    #[must_use]
    pub fn common(&self) -> &ServiceInfoCommon {
        match self {
            Self::Stateful(info) => &info.common,
            Self::Stateless(info) => &info.common,
        }
    }

    /// Health of the service; unset reads as `Unknown`
    #[must_use]
    pub fn health_state(&self) -> HealthState {
        self.common().health_state.unwrap_or(HealthState::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::variant::{registered_kinds, resolve_value, to_value};

    #[test]
    fn test_list_item_resolves() -> crate::Result<()> {
        let payload = json!({
            "ServiceKind": "Stateful",
            "Id": "shop~cart",
            "Name": "fabric:/shop/cart",
            "TypeName": "CartType",
            "ManifestVersion": "1.0.0",
            "HealthState": "Warning",
            "ServiceStatus": "Active",
            "IsServiceGroup": false,
            "HasPersistedState": true,
        });
        let info: ServiceInfo = resolve_value(&payload)?;
        assert_eq!(info.health_state(), HealthState::Warning);
        assert_eq!(info.common().service_status, Some(ServiceStatus::Active));
        assert_eq!(
            info.common().id.as_deref(),
            Some(info.common().name.flat_id().as_str())
        );
        assert_eq!(to_value(&info)?, payload);
        Ok(())
    }

    #[test]
    fn test_new_derives_flat_id() -> crate::Result<()> {
        let common = ServiceInfoCommon::new(HierarchicalName::parse("fabric:/web/front")?, "FrontType");
        assert_eq!(common.id.as_deref(), Some("web~front"));
        let info = ServiceInfo::from(StatelessServiceInfo { common });
        assert_eq!(info.health_state(), HealthState::Unknown);
        Ok(())
    }

    #[test]
    fn test_kinds_registered() {
        assert_eq!(
            registered_kinds::<ServiceInfo>(),
            vec![ServiceInfoKind::Stateful, ServiceInfoKind::Stateless]
        );
    }
}
