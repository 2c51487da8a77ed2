//! Ordered fallback strategies
//!
//! Both model selection and speech synthesis walk an ordered list of
//! candidates and keep the first one that works. Each candidate reports an
//! [`Attempt`]; [`first_success`] drives the list.

use std::future::Future;

/// Outcome of trying a single candidate
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T> {
    Success(T),
    /// The candidate could not produce a result; carries the reason for logging
    Unavailable(String),
}

impl<T> Attempt<T> {
    pub fn unavailable(reason: impl std::fmt::Display) -> Self {
        Attempt::Unavailable(reason.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Attempt::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Attempt::Success(value) => Some(value),
            Attempt::Unavailable(_) => None,
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Attempt<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Attempt::Success(value),
            Err(e) => Attempt::unavailable(e),
        }
    }
}

/// Try candidates in order, returning the first success.
///
/// Candidates after the first success are never attempted.
pub async fn first_success<C, T, F, Fut>(
    candidates: impl IntoIterator<Item = C>,
    mut attempt: F,
) -> Option<T>
where
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    for candidate in candidates {
        match attempt(candidate).await {
            Attempt::Success(value) => return Some(value),
            Attempt::Unavailable(reason) => {
                log::debug!("Candidate unavailable: {}", reason);
            }
        }
    }
    None
}
