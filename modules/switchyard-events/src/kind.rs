//! Event kinds: the identifier a reducer dispatches on.
//!
//! A kind is either a plain name or a process-unique token. Tokens compare by
//! identity only, so a named kind that happens to print like a token never
//! matches it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// A process-unique identity with an optional human-readable description.
#[derive(Debug, Clone)]
pub struct Token {
    id: u64,
    description: Option<Arc<str>>,
}

impl Token {
    /// Mint a fresh token. Two calls never return equal tokens, even with the
    /// same description.
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: NEXT_TOKEN.fetch_add(1, Ordering::Relaxed),
            description: description.map(Arc::from),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or_default())
    }
}

/// The discriminating identifier of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Named(String),
    Unique(Token),
}

impl Kind {
    pub fn named(name: impl Into<String>) -> Self {
        Kind::Named(name.into())
    }

    /// A kind no other kind can ever equal.
    pub fn unique(description: &str) -> Self {
        Kind::Unique(Token::new(Some(description)))
    }

    pub fn anonymous() -> Self {
        Kind::Unique(Token::new(None))
    }

    /// The name of a named kind. Unique kinds have none.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Kind::Named(name) => Some(name),
            Kind::Unique(_) => None,
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, Kind::Unique(_))
    }

    /// An empty name is the only kind that identifies nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Kind::Named(name) if name.is_empty())
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Named(name) => f.write_str(name),
            Kind::Unique(token) => fmt::Display::fmt(token, f),
        }
    }
}

impl From<&str> for Kind {
    fn from(name: &str) -> Self {
        Kind::Named(name.to_string())
    }
}

impl From<String> for Kind {
    fn from(name: String) -> Self {
        Kind::Named(name)
    }
}

impl From<&String> for Kind {
    fn from(name: &String) -> Self {
        Kind::Named(name.clone())
    }
}

impl From<Token> for Kind {
    fn from(token: Token) -> Self {
        Kind::Unique(token)
    }
}

impl From<&Kind> for Kind {
    fn from(kind: &Kind) -> Self {
        kind.clone()
    }
}

impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Tokens cannot cross a serialization boundary; anything read back is a name.
impl<'de> Deserialize<'de> for Kind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Kind::Named)
    }
}
