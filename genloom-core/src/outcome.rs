//! Identifier-tagged outcomes and the never-panicking [`wrap`] boundary.
//!
//! Every fallible external call the pipeline makes — rendering, directory
//! creation, file writes — goes through [`wrap`], which turns raised errors
//! (and panics) into plain [`Outcome`] values. Phases then communicate only
//! via outcome collections, so a single bad unit can never take down the
//! whole fan-out.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{BoxError, PanicError};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The outcome of one fallible operation, tagged with its identifier.
///
/// Exactly one branch is populated; the identifier is present on both, so a
/// caller can attribute any outcome regardless of completion order.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The operation completed normally.
    Success { id: String, value: T },
    /// The operation failed (returned an error or panicked).
    Failure { id: String, error: BoxError },
}

impl<T> Outcome<T> {
    /// Construct a success.
    pub fn success(id: impl Into<String>, value: T) -> Self {
        Outcome::Success { id: id.into(), value }
    }

    /// Construct a failure.
    pub fn failure(id: impl Into<String>, error: impl Into<BoxError>) -> Self {
        Outcome::Failure { id: id.into(), error: error.into() }
    }

    /// The identifier, independent of which branch this is.
    pub fn id(&self) -> &str {
        match self {
            Outcome::Success { id, .. } | Outcome::Failure { id, .. } => id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    /// The value, when this is a success.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success { value, .. } => Some(value),
            Outcome::Failure { .. } => None,
        }
    }

    /// Split into `(id, value)` / `(id, error)` pairs for gating.
    pub fn into_result(self) -> Result<(String, T), (String, BoxError)> {
        match self {
            Outcome::Success { id, value } => Ok((id, value)),
            Outcome::Failure { id, error } => Err((id, error)),
        }
    }
}

impl<T> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success { id, .. } => write!(f, "{id}: ok"),
            Outcome::Failure { id, error } => write!(f, "{id}: {error}"),
        }
    }
}

// ---------------------------------------------------------------------------
// wrap
// ---------------------------------------------------------------------------

/// Run `op` and capture its result as an [`Outcome`] tagged with `id`.
///
/// This function never panics and never returns an error: an `Err` from `op`
/// becomes [`Outcome::Failure`], and a panic inside `op` is caught and
/// becomes a failure carrying a [`PanicError`]. It is the boundary that makes
/// arbitrary fallible calls safe inside a parallel fan-out.
pub fn wrap<T, E, F>(id: impl Into<String>, op: F) -> Outcome<T>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<BoxError>,
{
    let id = id.into();
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(value)) => Outcome::Success { id, value },
        Ok(Err(error)) => Outcome::Failure { id, error: error.into() },
        Err(payload) => Outcome::Failure {
            id,
            error: Box::new(PanicError { message: panic_message(payload) }),
        },
    }
}

/// Adapt a unary fallible function into one returning [`Outcome`].
///
/// The identifier defaults to the input's `Display` form; use [`wrap`]
/// directly to supply an explicit identifier.
pub fn wrap_fn<T, U, E, F>(f: F) -> impl Fn(&T) -> Outcome<U>
where
    T: fmt::Display,
    F: Fn(&T) -> Result<U, E>,
    E: Into<BoxError>,
{
    move |input| wrap(input.to_string(), || f(input))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ok_op() -> Result<u32, BoxError> {
        Ok(7)
    }

    fn err_op() -> Result<u32, BoxError> {
        Err(Box::from("boom".to_string()))
    }

    #[test]
    fn wrap_success_carries_value_and_id() {
        let outcome = wrap("unit-1", ok_op);
        assert!(outcome.is_success());
        assert_eq!(outcome.id(), "unit-1");
        assert_eq!(outcome.value(), Some(&7));
    }

    #[test]
    fn wrap_error_carries_id() {
        let outcome = wrap("unit-2", err_op);
        assert!(outcome.is_failure());
        assert_eq!(outcome.id(), "unit-2");
        assert!(outcome.to_string().contains("boom"));
    }

    #[rstest]
    #[case::str_payload(false)]
    #[case::string_payload(true)]
    fn wrap_catches_panics(#[case] as_string: bool) {
        let outcome: Outcome<u32> = wrap("unit-3", || -> Result<u32, BoxError> {
            if as_string {
                panic::panic_any("boom".to_string())
            } else {
                panic::panic_any("boom")
            }
        });
        let (id, error) = outcome.into_result().unwrap_err();
        assert_eq!(id, "unit-3");
        assert!(error.to_string().contains("boom"), "got: {error}");
        assert!(error.downcast_ref::<PanicError>().is_some());
    }

    #[test]
    fn wrap_fn_derives_identifier_from_display() {
        let double = wrap_fn(|n: &u32| -> Result<u32, BoxError> { Ok(n * 2) });
        let outcome = double(&21);
        assert_eq!(outcome.id(), "21");
        assert_eq!(outcome.value(), Some(&42));
    }

    #[test]
    fn wrap_fn_failure_keeps_input_identifier() {
        let fail = wrap_fn(|n: &u32| -> Result<u32, BoxError> {
            Err(Box::from(format!("no {n}")))
        });
        let outcome = fail(&9);
        assert_eq!(outcome.id(), "9");
        assert!(outcome.is_failure());
    }
}
