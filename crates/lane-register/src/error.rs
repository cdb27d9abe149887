//! # Error Types
//!
//! Controller and settlement errors for lane-register.
//!
//! All of these are recoverable: a failed operation leaves the
//! transaction exactly as it was, and the caller decides how to present
//! the failure. The controller never panics on a domain failure.

use thiserror::Error;

use lane_core::CoreError;

/// Errors surfaced by the transaction controller.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// Settlement attempted with no items in the cart.
    #[error("no items in cart")]
    EmptyCart,

    /// A settlement is already outstanding; cart mutation and further
    /// settlement attempts are rejected until it resolves.
    #[error("settlement already in progress")]
    SettlementInFlight,

    /// Cash tender below the amount due. The cart is preserved unchanged
    /// for retry.
    #[error("insufficient cash: {tendered_cents} tendered, {required_cents} required")]
    InsufficientTender {
        required_cents: i64,
        tendered_cents: i64,
    },

    /// The settlement gateway declined or its result channel closed.
    /// The cart is preserved unchanged for retry.
    #[error("settlement failed: {reason}")]
    SettlementFailed { reason: String },

    /// Cart/domain rule violation (wraps lane-core errors).
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for Results with RegisterError.
pub type RegisterResult<T> = Result<T, RegisterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(RegisterError::EmptyCart.to_string(), "no items in cart");

        let err = RegisterError::InsufficientTender {
            required_cents: 3741,
            tendered_cents: 3000,
        };
        assert_eq!(
            err.to_string(),
            "insufficient cash: 3000 tendered, 3741 required"
        );
    }

    #[test]
    fn test_core_error_converts() {
        let core = CoreError::CartTooLarge { max: 100 };
        let err: RegisterError = core.into();
        assert!(matches!(err, RegisterError::Core(_)));
    }
}
