//! PII-safe wrapper for sensitive values.
//!
//! The `Pii<T>` type is a generic wrapper for any value that may contain
//! personally identifiable information (PII) or other sensitive data.
//! When the `pii` feature is enabled, any value wrapped in `Pii` will be
//! redacted (displayed as `REDACTED`) when formatted with `Display`.
//! Otherwise, the inner value is shown as normal. This helps prevent
//! accidental leakage of sensitive information in logs or user-facing
//! output.
//!
//! Stream labels are chosen by the participants and frequently embed user
//! ids or display names, so they are wrapped when logged.
//!
//! This wrapper should be used for debug, info, warn, and error logs.
//! It is not intended for trace-level logs, as trace logs are typically
//! disabled in production environments.

use core::fmt;
use core::ops::Deref;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pii<T>(pub T);

impl<T: fmt::Display> fmt::Display for Pii<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "pii")]
        {
            write!(f, "{{REDACTED}}")
        }
        #[cfg(not(feature = "pii"))]
        {
            write!(f, "{}", self.0)
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pii<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "pii")]
        {
            write!(f, "{{REDACTED}}")
        }
        #[cfg(not(feature = "pii"))]
        {
            write!(f, "{:?}", self.0)
        }
    }
}

impl<T> Deref for Pii<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
