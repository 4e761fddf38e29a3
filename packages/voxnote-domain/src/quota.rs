//! Free-tier quota exemption rules.

/// The only subscription status with special meaning: it grants unlimited notes.
pub const SUBSCRIPTION_ACTIVE: &str = "active";

/// Role claim that bypasses per-user quotas and ownership checks.
pub const ADMIN_ROLE: &str = "admin";

pub fn is_admin_role(role: &str) -> bool {
	role == ADMIN_ROLE
}

pub fn has_active_subscription(subscription_status: &str) -> bool {
	subscription_status == SUBSCRIPTION_ACTIVE
}

/// Whether a caller creates notes without touching the free-tier counter.
pub fn bypasses_quota(role: &str, subscription_status: Option<&str>) -> bool {
	is_admin_role(role) || subscription_status.map(has_active_subscription).unwrap_or(false)
}
