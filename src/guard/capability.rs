//! Capability contract to the identity layer

use std::sync::Arc;

/// Answers "does the current principal hold this role on this resource".
///
/// This is the only surface the guard needs from the identity client. It is
/// expected to be synchronous and side-effect-free: implementations answer
/// from already-acquired session state (for example the role claims of a
/// validated token), never from the network.
pub trait ResourceRoleSource: Send + Sync {
    fn has_resource_role(&self, role: &str, resource: &str) -> bool;
}

impl<T: ResourceRoleSource + ?Sized> ResourceRoleSource for &T {
    fn has_resource_role(&self, role: &str, resource: &str) -> bool {
        (**self).has_resource_role(role, resource)
    }
}

impl<T: ResourceRoleSource + ?Sized> ResourceRoleSource for Arc<T> {
    fn has_resource_role(&self, role: &str, resource: &str) -> bool {
        (**self).has_resource_role(role, resource)
    }
}

impl<T: ResourceRoleSource + ?Sized> ResourceRoleSource for Box<T> {
    fn has_resource_role(&self, role: &str, resource: &str) -> bool {
        (**self).has_resource_role(role, resource)
    }
}
