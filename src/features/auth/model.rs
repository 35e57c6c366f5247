use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity extracted from a gateway-issued bearer token.
///
/// The identity gateway owns login/session handling; this service only sees
/// the signed subject and email. The caller's role is not trusted from the
/// token - it is resolved from the `user_profiles` table so that admin role
/// changes take effect immediately.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CallerIdentity {
    /// Stable subject identifier assigned by the identity gateway
    pub subject: String,
    pub email: Option<String>,
}
