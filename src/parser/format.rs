use tracing::debug;

use crate::error::FormatError;
use crate::parser::registry::{CompileState, TokenRegistry};
use crate::types::*;

/// Compile a format string into an executable step program
///
/// This is the main entry point of the compiler. The string is scanned once,
/// left to right; at every cursor position the registry's candidates for the
/// current character get a chance to claim it. Option fragments are merged as
/// they are discovered, then steps are stably sorted by weight while keeping
/// their textual index as output slot.
///
/// # Arguments
/// * `registry` - The registered token handlers
/// * `input` - The format string to compile
///
/// # Returns
/// * `Result<CompiledFormat, FormatError>` - The compiled format, or the
///   malformed-format error raised by a handler
///
/// # Examples
/// ```
/// use numeral_format::parser::{compile, TokenRegistry};
/// use numeral_format::{LocaleSettings, round_half_up};
///
/// let registry = TokenRegistry::default();
/// let compiled = compile(&registry, "0,0.00").unwrap();
/// let result = compiled.run(10000.236, round_half_up, &LocaleSettings::default());
/// assert_eq!(result, "10,000.24");
/// ```
pub fn compile(registry: &TokenRegistry, input: &str) -> Result<CompiledFormat, FormatError> {
    let positions: Vec<usize> = input.char_indices().map(|(i, _)| i).collect();
    let mut state = CompileState::new(registry);
    let mut options = FormatOptions::default();
    let mut claimed = Vec::new();

    let mut cursor = 0;
    while cursor < positions.len() {
        let claim = registry.dispatch(&mut state, input, positions[cursor])?;
        if let Some(fragment) = &claim.step.options {
            options.merge(fragment);
        }
        cursor += 1 + claim.step.consumed;
        claimed.push(claim);
    }

    let mut slots = SlotTable::default();
    for (slot, claim) in claimed.iter().enumerate() {
        slots.handlers.entry(claim.handler).or_insert(slot);
        if let Some(kind) = registry.builtin_kind(claim.handler) {
            slots.builtins.entry(kind).or_insert(slot);
        }
    }

    let mut ordered: Vec<(usize, _)> = claimed.into_iter().enumerate().collect();
    ordered.sort_by_key(|(_, claim)| claim.step.weight);

    let mut steps = Vec::with_capacity(ordered.len());
    for (slot, claim) in ordered {
        slots.ordered.push(slot);
        steps.push(CompiledStep {
            kind: claim.step.kind,
            weight: claim.step.weight,
            handler: claim.handler,
        });
    }

    debug!(format = input, steps = steps.len(), "compiled format");

    Ok(CompiledFormat {
        source: input.to_string(),
        steps,
        options,
        slots,
    })
}
