//! Scaling steps: percentage, byte units and abbreviations

use crate::formatter::{Output, RunState};
use crate::types::{Abbreviation, Magnitude};

const BYTE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

pub(super) fn percentage(state: &mut RunState<'_>, output: &mut Output, slot: usize) {
    output.set(slot, "%");
    state.rescale(state.num * 100.0);
}

pub(super) fn byte_unit(state: &mut RunState<'_>, output: &mut Output, slot: usize) {
    let abs = state.num.abs();
    for (power, unit) in BYTE_UNITS.iter().enumerate() {
        let upper = if power + 1 == BYTE_UNITS.len() {
            f64::INFINITY
        } else {
            1024f64.powi(power as i32 + 1)
        };
        if abs < upper {
            output.set(slot, *unit);
            state.rescale(state.num / 1024f64.powi(power as i32));
            return;
        }
    }
}

pub(super) fn abbreviation(
    mode: Abbreviation,
    state: &mut RunState<'_>,
    output: &mut Output,
    slot: usize,
) {
    let abs = state.num.abs();
    let magnitude = match mode {
        Abbreviation::BestFit if abs >= Magnitude::Thousand.divisor() => {
            Magnitude::ALL.into_iter().find(|m| abs < m.upper_bound())
        }
        Abbreviation::BestFit => None,
        Abbreviation::Forced(magnitude) => (abs >= magnitude.divisor()).then_some(magnitude),
    };

    if let Some(magnitude) = magnitude {
        output.set(slot, state.locale.abbreviations.word(magnitude));
        state.rescale(state.num / magnitude.divisor());
    }
}
