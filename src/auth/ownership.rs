use uuid::Uuid;

use crate::error::AuthError;

/// Allow a mutation only when the authenticated caller owns the resource.
///
/// Must run after authentication and before the mutating store call.
pub fn assert_owner(resource_owner: Uuid, caller: Uuid) -> Result<(), AuthError> {
    if resource_owner == caller {
        Ok(())
    } else {
        tracing::warn!(
            owner = %resource_owner,
            caller = %caller,
            "Ownership check failed"
        );
        Err(AuthError::Forbidden)
    }
}
