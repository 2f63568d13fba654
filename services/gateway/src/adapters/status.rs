//! services/gateway/src/adapters/status.rs
//!
//! Translation of remote gRPC status codes into the local `PortError` taxonomy.
//! Each adapter method picks the translation that matches the call it made, so
//! handlers never look at a raw `tonic::Status`.

use gateway_core::PortError;
use tonic::{Code, Status};

/// Outcome of an auth backend call (`Auth`, `SignIn`, `SignOut`, `Refresh`).
///
/// An unknown identity (`NotFound`) is treated as unauthenticated: the caller
/// gets a 401 rather than learning whether the account exists.
pub fn auth_failure(status: Status) -> PortError {
    match status.code() {
        Code::Unauthenticated => PortError::Unauthorized(status.message().to_string()),
        Code::PermissionDenied => PortError::Forbidden(status.message().to_string()),
        Code::NotFound => PortError::Unauthorized(status.message().to_string()),
        Code::InvalidArgument => PortError::InvalidRequest(status.message().to_string()),
        _ => unexpected(status),
    }
}

/// Outcome of the reply of a client-streaming transfer (upload or analysis).
pub fn transfer_failure(status: Status) -> PortError {
    match status.code() {
        Code::InvalidArgument => PortError::InvalidPayload("invalid image".to_string()),
        _ => unexpected(status),
    }
}

/// Outcome of a lookup by id, where a missing record is a distinguished result.
pub fn lookup_failure(status: Status) -> PortError {
    match status.code() {
        Code::NotFound => PortError::NotFound(status.message().to_string()),
        Code::InvalidArgument => PortError::InvalidRequest(status.message().to_string()),
        _ => unexpected(status),
    }
}

/// Anything without a dedicated mapping.
pub fn unexpected(status: Status) -> PortError {
    PortError::Internal(format!("{:?}: {}", status.code(), status.message()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_codes_map_to_one_kind_each() {
        let cases = [
            (Code::Unauthenticated, PortError::Unauthorized("m".to_string())),
            (Code::PermissionDenied, PortError::Forbidden("m".to_string())),
            (Code::NotFound, PortError::Unauthorized("m".to_string())),
            (Code::InvalidArgument, PortError::InvalidRequest("m".to_string())),
        ];
        for (code, expected) in cases {
            assert_eq!(auth_failure(Status::new(code, "m")), expected, "code {code:?}");
        }
    }

    #[test]
    fn unknown_identity_is_unauthorized() {
        let err = auth_failure(Status::not_found("user not found"));
        assert_eq!(err, PortError::Unauthorized("user not found".to_string()));
    }

    #[test]
    fn unmapped_auth_codes_are_internal() {
        for code in [
            Code::Unknown,
            Code::Unavailable,
            Code::DeadlineExceeded,
            Code::Internal,
            Code::AlreadyExists,
            Code::ResourceExhausted,
        ] {
            assert!(
                matches!(auth_failure(Status::new(code, "boom")), PortError::Internal(_)),
                "code {code:?}"
            );
        }
    }

    #[test]
    fn rejected_image_is_invalid_payload() {
        assert_eq!(
            transfer_failure(Status::invalid_argument("cannot decode jpeg")),
            PortError::InvalidPayload("invalid image".to_string())
        );
        assert!(matches!(
            transfer_failure(Status::unavailable("connection reset")),
            PortError::Internal(_)
        ));
    }

    #[test]
    fn lookup_keeps_not_found() {
        assert_eq!(
            lookup_failure(Status::not_found("no ticket")),
            PortError::NotFound("no ticket".to_string())
        );
        assert!(matches!(
            lookup_failure(Status::unknown("?")),
            PortError::Internal(_)
        ));
    }
}
