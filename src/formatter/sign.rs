//! Sign placement: parentheses, explicit plus and minus, and the currency symbol

use crate::formatter::{Output, RunState};
use crate::types::Builtin;

fn strip_placed_sign(state: &RunState<'_>, output: &mut Output) {
    if let Some(slot) = state.sign_slot {
        output.strip_sign(slot);
    }
}

pub(super) fn left_paren(state: &RunState<'_>, output: &mut Output, slot: usize) {
    if state.num < 0.0 {
        output.set(slot, "(");
    }
}

pub(super) fn plus(state: &mut RunState<'_>, output: &mut Output, slot: usize) {
    if state.num > 0.0 {
        state.sign_slot = Some(slot);
        output.set(slot, "+");
    }
}

pub(super) fn right_paren(state: &mut RunState<'_>, output: &mut Output, slot: usize) {
    if state.num < 0.0 {
        strip_placed_sign(state, output);
        state.sign_slot = None;
        output.set(slot, ")");
    }
}

pub(super) fn currency(
    place_sign: bool,
    state: &mut RunState<'_>,
    output: &mut Output,
    slot: usize,
) {
    let wrapped = state
        .builtin_slot(Builtin::RightParen)
        .is_some_and(|paren| output.is_filled(paren));

    if state.num < 0.0 && place_sign && !wrapped {
        strip_placed_sign(state, output);
        state.sign_slot = Some(slot);
        output.set(slot, format!("-{}", state.locale.currency_symbol));
    } else {
        output.set(slot, state.locale.currency_symbol.as_str());
    }
}

pub(super) fn minus(state: &mut RunState<'_>, output: &mut Output, slot: usize) {
    if state.num < 0.0 {
        strip_placed_sign(state, output);
        state.sign_slot = Some(slot);
        output.set(slot, "-");
    }
}
