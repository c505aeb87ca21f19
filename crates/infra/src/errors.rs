//! Conversions from external infrastructure errors into domain errors.

use profilesync_domain::ProfileSyncError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ProfileSyncError);

impl From<InfraError> for ProfileSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ProfileSyncError> for InfraError {
    fn from(value: ProfileSyncError) -> Self {
        InfraError(value)
    }
}

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let domain = if err.is_timeout() {
            ProfileSyncError::RemoteUnavailable("request timed out".into())
        } else if err.is_connect() {
            ProfileSyncError::RemoteUnavailable(format!("connection failed: {err}"))
        } else if err.is_decode() {
            ProfileSyncError::Internal(format!("failed to decode response body: {err}"))
        } else if err.is_builder() || err.is_request() {
            ProfileSyncError::Internal(format!("failed to build request: {err}"))
        } else {
            ProfileSyncError::RemoteUnavailable(err.to_string())
        };
        InfraError(domain)
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        InfraError(ProfileSyncError::Internal(format!("json error: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_newtype() {
        let original = ProfileSyncError::RemoteUnavailable("offline".into());
        let infra = InfraError::from(original.clone());
        assert_eq!(ProfileSyncError::from(infra), original);
    }
}
