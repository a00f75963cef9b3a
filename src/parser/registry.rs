//! Token registry and dispatch
//!
//! Handlers are registered once; each trigger character maps to its candidate
//! handlers ordered by ascending priority. Equal priorities keep registration
//! order. When no candidate claims a position, the fallback handler does.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::FormatError;
use crate::types::{Builtin, HandlerId, Step, StepKind, weight};

/// A registered token handler.
///
/// `claim` inspects the format string at `pos` (a byte offset of the trigger
/// character) and either declines with `Ok(None)`, emits a step, or aborts
/// compilation with a malformed-format error.
pub trait TokenHandler: Send + Sync + fmt::Debug {
    /// Characters that trigger this handler
    fn triggers(&self) -> &str;

    /// Lower priorities are tried first
    fn priority(&self) -> i32 {
        0
    }

    fn claim(
        &self,
        id: HandlerId,
        state: &CompileState<'_>,
        input: &str,
        pos: usize,
    ) -> Result<Option<Step>, FormatError>;
}

/// What the fallback handler does with unclaimed input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Echo the longest run of characters that start no trigger
    #[default]
    Echo,
    /// Swallow one character and render nothing
    Skip,
}

/// Per-compilation record of which handlers have claimed
#[derive(Debug)]
pub struct CompileState<'r> {
    registry: &'r TokenRegistry,
    fired: HashMap<HandlerId, usize>,
}

impl<'r> CompileState<'r> {
    pub fn new(registry: &'r TokenRegistry) -> Self {
        Self {
            registry,
            fired: HashMap::new(),
        }
    }

    /// Whether `id` has claimed at least once during this compilation
    pub fn is_consumed(&self, id: HandlerId) -> bool {
        self.times_consumed(id) > 0
    }

    /// How many times `id` has claimed during this compilation
    pub fn times_consumed(&self, id: HandlerId) -> usize {
        self.fired.get(&id).copied().unwrap_or(0)
    }

    /// Whether the built-in handler of `kind` has claimed
    pub fn builtin_fired(&self, kind: Builtin) -> bool {
        self.registry
            .builtin_id(kind)
            .is_some_and(|id| self.is_consumed(id))
    }

    pub(crate) fn inc_consumed(&mut self, id: HandlerId) {
        *self.fired.entry(id).or_insert(0) += 1;
    }
}

/// A successful dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct Claimed {
    pub handler: HandlerId,
    pub step: Step,
}

struct Entry {
    id: HandlerId,
    handler: Arc<dyn TokenHandler>,
}

/// Maps trigger characters to ordered candidate handlers
pub struct TokenRegistry {
    next_id: u32,
    entries: Vec<Entry>,
    triggers: HashMap<char, Vec<usize>>,
    builtins: HashMap<Builtin, HandlerId>,
    kinds: HashMap<HandlerId, Builtin>,
    fallback_id: HandlerId,
    fallback: FallbackMode,
}

impl fmt::Debug for TokenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRegistry")
            .field("handlers", &self.entries.len())
            .field("triggers", &self.triggers.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::with_builtins(FallbackMode::Echo)
    }
}

impl TokenRegistry {
    /// A registry holding only the fallback handler
    pub fn new(fallback: FallbackMode) -> Self {
        Self {
            // The fallback handler takes the first id.
            next_id: 2,
            entries: Vec::new(),
            triggers: HashMap::new(),
            builtins: HashMap::new(),
            kinds: HashMap::new(),
            fallback_id: HandlerId(1),
            fallback,
        }
    }

    /// A registry with every built-in handler registered
    pub fn with_builtins(fallback: FallbackMode) -> Self {
        let mut registry = Self::new(fallback);
        for kind in Builtin::ALL {
            let id = registry.register(Arc::new(kind));
            registry.builtins.insert(kind, id);
            registry.kinds.insert(id, kind);
        }
        registry
    }

    /// Register a handler under each of its trigger characters
    pub fn register(&mut self, handler: Arc<dyn TokenHandler>) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;

        let index = self.entries.len();
        let triggers: Vec<char> = handler.triggers().chars().collect();
        debug!(handler = ?handler, %id, "registering token handler");
        self.entries.push(Entry { id, handler });

        let entries = &self.entries;
        for c in triggers {
            let candidates = self.triggers.entry(c).or_default();
            if !candidates.contains(&index) {
                candidates.push(index);
            }
            // Stable: equal priorities stay in registration order.
            candidates.sort_by_key(|&i| entries[i].handler.priority());
        }
        id
    }

    pub fn builtin_id(&self, kind: Builtin) -> Option<HandlerId> {
        self.builtins.get(&kind).copied()
    }

    /// The built-in kind registered under `id`, if any
    pub fn builtin_kind(&self, id: HandlerId) -> Option<Builtin> {
        self.kinds.get(&id).copied()
    }

    pub fn fallback_id(&self) -> HandlerId {
        self.fallback_id
    }

    pub fn fallback_mode(&self) -> FallbackMode {
        self.fallback
    }

    pub fn set_fallback_mode(&mut self, mode: FallbackMode) {
        self.fallback = mode;
    }

    pub fn is_trigger(&self, c: char) -> bool {
        self.triggers.contains_key(&c)
    }

    /// Ids of the candidates for `c`, in the order they are tried
    pub fn candidates(&self, c: char) -> Vec<HandlerId> {
        self.triggers
            .get(&c)
            .map(|list| list.iter().map(|&i| self.entries[i].id).collect())
            .unwrap_or_default()
    }

    /// Let the candidates for the character at `pos` claim it, falling back
    /// when none does. The claiming handler is marked fired in `state`.
    pub fn dispatch(
        &self,
        state: &mut CompileState<'_>,
        input: &str,
        pos: usize,
    ) -> Result<Claimed, FormatError> {
        let Some(c) = input[pos..].chars().next() else {
            return Err(FormatError::malformed(input, pos, "cursor past end of input"));
        };

        if let Some(candidates) = self.triggers.get(&c) {
            for &index in candidates {
                let entry = &self.entries[index];
                if let Some(step) = entry.handler.claim(entry.id, state, input, pos)? {
                    state.inc_consumed(entry.id);
                    return Ok(Claimed {
                        handler: entry.id,
                        step,
                    });
                }
            }
        }

        let step = self.fallback_claim(input, pos, c);
        state.inc_consumed(self.fallback_id);
        Ok(Claimed {
            handler: self.fallback_id,
            step,
        })
    }

    fn fallback_claim(&self, input: &str, pos: usize, first: char) -> Step {
        match self.fallback {
            FallbackMode::Echo => {
                let rest = &input[pos + first.len_utf8()..];
                let run = rest
                    .char_indices()
                    .find(|&(_, c)| self.is_trigger(c))
                    .map_or(rest.len(), |(i, _)| i);
                let text = &input[pos..pos + first.len_utf8() + run];
                let extra = rest[..run].chars().count();
                Step::new(StepKind::Literal(text.to_string()), weight::LITERAL).consuming(extra)
            }
            FallbackMode::Skip => Step::new(StepKind::Noop, weight::LITERAL),
        }
    }
}
