use thiserror::Error;

use crate::catalog::StarId;

/// Convenient result alias for the starnav library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Raised when a catalog subset contains the same identifier twice.
    #[error("duplicate star identifier in catalog subset: {id}")]
    DuplicateNode { id: StarId },

    /// Raised when a route request references a star absent from the graph.
    #[error("unknown star: {id}{}", format_suggestions(.suggestions))]
    UnknownNode {
        id: StarId,
        suggestions: Vec<String>,
    },

    /// Raised when no route satisfies the requested constraints.
    #[error("no route found between {start} and {goal}")]
    NoRoute { start: StarId, goal: StarId },

    /// Raised when a computed route plan lacks any stops.
    #[error("route plan was empty")]
    EmptyRoutePlan,

    /// Raised when a requested routing option cannot be combined with the call.
    #[error("route option {option} is not supported here")]
    UnsupportedRouteOption { option: String },

    /// Raised when a catalog subset exceeds the configured graph size.
    #[error("too many stars ({count}) to build a navigation graph; maximum is {limit}")]
    TooManyStars { count: usize, limit: usize },

    /// Raised when a numeric parameter is negative or not finite.
    #[error("invalid value for {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },
}

impl Error {
    /// Returns true for the recoverable "nothing connects these stars" outcome.
    pub fn is_no_route(&self) -> bool {
        matches!(self, Error::NoRoute { .. })
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// Reject negative or NaN distance thresholds. Positive infinity means unbounded.
pub(crate) fn check_distance(name: &'static str, value: f64) -> Result<()> {
    if value.is_nan() || value < 0.0 {
        return Err(Error::InvalidParameter {
            name,
            message: format!("expected a non-negative distance, got {value}"),
        });
    }
    Ok(())
}
