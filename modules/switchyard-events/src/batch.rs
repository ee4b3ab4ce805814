//! Many event constructors at once, addressed by camel-cased accessor names.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::config::{CollisionPolicy, ConstructorConfig};
use crate::constructor::{EventConstructor, MetaShaper, PayloadShaper};
use crate::error::{EventError, Result};
use crate::kind::Kind;

/// How one key of a batch mapping should be built.
#[derive(Clone)]
pub enum Blueprint {
    /// Default shapers.
    Default,
    Payload(PayloadShaper),
    PayloadAndMeta(PayloadShaper, MetaShaper),
    /// A nested mapping. Leaf kinds below it are prefixed with this key.
    Namespace(Blueprints),
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blueprint::Default => f.write_str("Default"),
            Blueprint::Payload(_) => f.write_str("Payload(..)"),
            Blueprint::PayloadAndMeta(..) => f.write_str("PayloadAndMeta(..)"),
            Blueprint::Namespace(nested) => f.debug_tuple("Namespace").field(nested).finish(),
        }
    }
}

/// An ordered mapping of kind keys to blueprints.
#[derive(Debug, Clone, Default)]
pub struct Blueprints {
    entries: Vec<(String, Blueprint)>,
}

impl Blueprints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, blueprint: Blueprint) {
        self.entries.push((key.into(), blueprint));
    }

    pub fn kind(mut self, key: impl Into<String>) -> Self {
        self.insert(key, Blueprint::Default);
        self
    }

    pub fn payload(mut self, key: impl Into<String>, shape: PayloadShaper) -> Self {
        self.insert(key, Blueprint::Payload(shape));
        self
    }

    pub fn payload_and_meta(
        mut self,
        key: impl Into<String>,
        payload: PayloadShaper,
        meta: MetaShaper,
    ) -> Self {
        self.insert(key, Blueprint::PayloadAndMeta(payload, meta));
        self
    }

    pub fn namespace(mut self, key: impl Into<String>, nested: Blueprints) -> Self {
        self.insert(key, Blueprint::Namespace(nested));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One argument to [`create_event_constructors`].
#[derive(Debug, Clone)]
pub enum BatchInput {
    Kind(String),
    Map(Blueprints),
}

impl From<&str> for BatchInput {
    fn from(kind: &str) -> Self {
        BatchInput::Kind(kind.to_string())
    }
}

impl From<String> for BatchInput {
    fn from(kind: String) -> Self {
        BatchInput::Kind(kind)
    }
}

impl From<Blueprints> for BatchInput {
    fn from(map: Blueprints) -> Self {
        BatchInput::Map(map)
    }
}

#[derive(Debug, Clone)]
pub enum ConstructorEntry {
    Constructor(EventConstructor),
    Namespace(ConstructorSet),
}

#[derive(Debug, Clone)]
struct Slot {
    /// The key the entry was built from, kept for collision reports.
    key: String,
    entry: ConstructorEntry,
}

/// Constructors keyed by accessor name, nested the way the input was.
#[derive(Debug, Clone, Default)]
pub struct ConstructorSet {
    slots: BTreeMap<String, Slot>,
}

impl ConstructorSet {
    pub fn get(&self, accessor: &str) -> Option<&EventConstructor> {
        match self.entry(accessor)? {
            ConstructorEntry::Constructor(constructor) => Some(constructor),
            ConstructorEntry::Namespace(_) => None,
        }
    }

    pub fn namespace(&self, accessor: &str) -> Option<&ConstructorSet> {
        match self.entry(accessor)? {
            ConstructorEntry::Namespace(nested) => Some(nested),
            ConstructorEntry::Constructor(_) => None,
        }
    }

    pub fn entry(&self, accessor: &str) -> Option<&ConstructorEntry> {
        self.slots.get(accessor).map(|slot| &slot.entry)
    }

    /// Resolve a dotted accessor path such as `app.counter.increment`.
    pub fn path(&self, dotted: &str) -> Option<&EventConstructor> {
        let mut segments = dotted.split('.').peekable();
        let mut level = self;
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                return level.get(segment);
            }
            level = level.namespace(segment)?;
        }
        None
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstructorEntry)> {
        self.slots
            .iter()
            .map(|(accessor, slot)| (accessor.as_str(), &slot.entry))
    }

    /// Every leaf kind, depth first in accessor order.
    pub fn kinds(&self) -> Vec<Kind> {
        let mut kinds = Vec::new();
        self.collect_kinds(&mut kinds);
        kinds
    }

    fn collect_kinds(&self, out: &mut Vec<Kind>) {
        for slot in self.slots.values() {
            match &slot.entry {
                ConstructorEntry::Constructor(constructor) => out.push(constructor.kind().clone()),
                ConstructorEntry::Namespace(nested) => nested.collect_kinds(out),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn insert(
        &mut self,
        key: &str,
        entry: ConstructorEntry,
        policy: CollisionPolicy,
    ) -> Result<()> {
        let accessor = accessor_name(key);
        if let Some(existing) = self.slots.get(&accessor) {
            match policy {
                CollisionPolicy::Reject => {
                    return Err(EventError::AccessorCollision {
                        accessor,
                        first: existing.key.clone(),
                        second: key.to_string(),
                    });
                }
                CollisionPolicy::LastWriteWins => {
                    warn!(
                        accessor = accessor.as_str(),
                        replaced = existing.key.as_str(),
                        by = key,
                        "Accessor collision, keeping the later constructor"
                    );
                }
            }
        }
        self.slots.insert(
            accessor,
            Slot {
                key: key.to_string(),
                entry,
            },
        );
        Ok(())
    }

    fn extend_from(
        &mut self,
        blueprints: Blueprints,
        prefix: Option<&str>,
        config: &ConstructorConfig,
    ) -> Result<()> {
        for (key, blueprint) in blueprints.entries {
            if key.is_empty() {
                return Err(EventError::InvalidKind);
            }
            let full = match prefix {
                Some(prefix) => format!("{prefix}{}{key}", config.namespace_separator),
                None => key.clone(),
            };

            let entry = match blueprint {
                Blueprint::Default => ConstructorEntry::Constructor(EventConstructor::new(full)?),
                Blueprint::Payload(payload) => ConstructorEntry::Constructor(
                    EventConstructor::with_shapers(full, Some(payload), None)?,
                ),
                Blueprint::PayloadAndMeta(payload, meta) => ConstructorEntry::Constructor(
                    EventConstructor::with_shapers(full, Some(payload), Some(meta))?,
                ),
                Blueprint::Namespace(nested) => {
                    let mut level = ConstructorSet::default();
                    level.extend_from(nested, Some(&full), config)?;
                    ConstructorEntry::Namespace(level)
                }
            };
            self.insert(&key, entry, config.collision_policy)?;
        }
        Ok(())
    }
}

/// Build constructors for a mix of bare kinds and blueprint mappings,
/// using the default [`ConstructorConfig`].
pub fn create_event_constructors<I, T>(inputs: I) -> Result<ConstructorSet>
where
    I: IntoIterator<Item = T>,
    T: Into<BatchInput>,
{
    create_event_constructors_with(inputs, &ConstructorConfig::default())
}

pub fn create_event_constructors_with<I, T>(
    inputs: I,
    config: &ConstructorConfig,
) -> Result<ConstructorSet>
where
    I: IntoIterator<Item = T>,
    T: Into<BatchInput>,
{
    let mut set = ConstructorSet::default();
    for input in inputs {
        match input.into() {
            BatchInput::Kind(kind) => {
                let constructor = EventConstructor::new(kind.as_str())?;
                set.insert(
                    &kind,
                    ConstructorEntry::Constructor(constructor),
                    config.collision_policy,
                )?;
            }
            BatchInput::Map(blueprints) => set.extend_from(blueprints, None, config)?,
        }
    }
    debug!(
        accessors = set.len(),
        kinds = set.kinds().len(),
        "Built event constructors"
    );
    Ok(set)
}

/// `SET_USER_NAME` → `setUserName`, `HTTPRequest` → `httpRequest`.
/// Falls back to the key itself when it has no alphanumeric characters.
pub fn accessor_name(key: &str) -> String {
    let camel = camel_case(key);
    if camel.is_empty() {
        key.to_string()
    } else {
        camel
    }
}

fn camel_case(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    let mut prev_upper = false;
    let mut chars = key.chars().peekable();

    while let Some(ch) = chars.next() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            prev_upper = false;
            continue;
        }
        // `fetchData` splits at `D`; `HTTPRequest` splits before `R`.
        let acronym_end = prev_upper && chars.peek().is_some_and(|next| next.is_lowercase());
        if ch.is_uppercase() && (prev_lower || acronym_end) && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev_lower = ch.is_lowercase() || ch.is_numeric();
        prev_upper = ch.is_uppercase();
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
