//! Keys a transition can be registered under.

use std::fmt;

use switchyard_events::{EventConstructor, Kind};

use crate::error::{CompileError, Result};

/// Joins the members of a combined key when displayed.
pub const COMBINED_DELIMITER: &str = "||";

/// Names an empty combined key in errors.
const EMPTY_COMBINED_KEY: &str = "<empty combined key>";

/// A transition key: one kind, or several kinds sharing one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerKey {
    Kind(Kind),
    Combined(Vec<Kind>),
}

impl HandlerKey {
    /// The kinds this key expands to in the lookup table.
    pub(crate) fn normalize(self) -> Result<Vec<Kind>> {
        let kinds = match self {
            HandlerKey::Kind(kind) => vec![kind],
            HandlerKey::Combined(kinds) if kinds.is_empty() => {
                return Err(CompileError::InvalidHandlerMap {
                    key: EMPTY_COMBINED_KEY.into(),
                    reason: "combined key lists no kinds".into(),
                });
            }
            HandlerKey::Combined(kinds) => kinds,
        };
        if kinds.iter().any(Kind::is_empty) {
            return Err(CompileError::InvalidKind);
        }
        Ok(kinds)
    }
}

/// Register one handler for several kinds at once.
pub fn combine_kinds<I, K>(kinds: I) -> HandlerKey
where
    I: IntoIterator<Item = K>,
    K: Into<Kind>,
{
    HandlerKey::Combined(kinds.into_iter().map(Into::into).collect())
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerKey::Kind(kind) => fmt::Display::fmt(kind, f),
            HandlerKey::Combined(kinds) => {
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(COMBINED_DELIMITER)?;
                    }
                    fmt::Display::fmt(kind, f)?;
                }
                Ok(())
            }
        }
    }
}

impl From<Kind> for HandlerKey {
    fn from(kind: Kind) -> Self {
        HandlerKey::Kind(kind)
    }
}

impl From<&Kind> for HandlerKey {
    fn from(kind: &Kind) -> Self {
        HandlerKey::Kind(kind.clone())
    }
}

impl From<&str> for HandlerKey {
    fn from(name: &str) -> Self {
        HandlerKey::Kind(Kind::from(name))
    }
}

impl From<String> for HandlerKey {
    fn from(name: String) -> Self {
        HandlerKey::Kind(Kind::from(name))
    }
}

impl From<&EventConstructor> for HandlerKey {
    fn from(constructor: &EventConstructor) -> Self {
        HandlerKey::Kind(constructor.kind().clone())
    }
}

impl From<EventConstructor> for HandlerKey {
    fn from(constructor: EventConstructor) -> Self {
        HandlerKey::Kind(Kind::from(constructor))
    }
}
