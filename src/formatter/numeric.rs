//! Integer part, grouping and decimal rendering

use crate::formatter::{Output, RoundingFn, RunState};
use crate::types::Builtin;

/// Most fraction digits ever rendered
pub(crate) const MAX_FRACTION_DIGITS: usize = 100;

/// Round `value` to `precision` decimals and split it at the point.
///
/// Returns the integer part (with its sign) and the fraction digits. The
/// precision is capped at [`MAX_FRACTION_DIGITS`].
pub(crate) fn to_fixed(value: f64, precision: usize, round: RoundingFn) -> (String, String) {
    let precision = precision.min(MAX_FRACTION_DIGITS);
    let power = 10f64.powi(precision as i32);
    let scaled = value * power;
    // A value this large has no fraction left to round.
    let rounded = if scaled.is_finite() {
        round(scaled) / power
    } else {
        value
    };
    // Adding zero turns a negative zero into a positive one.
    let rounded = rounded + 0.0;
    let fixed = format!("{rounded:.precision$}");
    match fixed.rsplit_once('.') {
        Some((int, frac)) => (int.to_string(), frac.to_string()),
        None => (fixed, String::new()),
    }
}

/// Insert `separator` between every group of three digits in each digit run
pub(crate) fn group_thousands(text: &str, separator: &str) -> String {
    let mut grouped = String::with_capacity(text.len() + separator.len() * (text.len() / 3));
    let mut rest = text;
    while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
        grouped.push_str(&rest[..start]);
        let run = &rest[start..];
        let end = run.find(|c: char| !c.is_ascii_digit()).unwrap_or(run.len());
        for (i, digit) in run[..end].char_indices() {
            if i > 0 && (end - i) % 3 == 0 {
                grouped.push_str(separator);
            }
            grouped.push(digit);
        }
        rest = &run[end..];
    }
    grouped.push_str(rest);
    grouped
}

pub(super) fn integer(state: &mut RunState<'_>, output: &mut Output, slot: usize) {
    let text = match state.options.decimal_precision {
        Some(precision) if precision > 0 => {
            let (int, frac) = to_fixed(state.num, precision, state.round);
            state.fraction_digits = Some(frac);
            int
        }
        _ => format!("{}", (state.round)(state.num) + 0.0),
    };

    if state.num < 0.0 {
        state.sign_slot = Some(slot);
    }
    output.set(slot, text);
}

pub(super) fn grouping(state: &RunState<'_>, output: &mut Output) {
    let Some(slot) = state.builtin_slot(Builtin::Integer) else {
        return;
    };
    if let Some(text) = output.get(slot) {
        let grouped = group_thousands(text, &state.locale.thousands_separator);
        output.set(slot, grouped);
    }
}

pub(super) fn decimal_point(
    optional: bool,
    state: &mut RunState<'_>,
    output: &mut Output,
    slot: usize,
) {
    if optional {
        if state.right == 0.0 {
            return;
        }
        state.optional_point = true;
    }

    let point = &state.locale.decimal_point;
    if state.num < 0.0 && state.sign_slot.is_none() {
        output.set(slot, format!("-{point}"));
        state.sign_slot = Some(slot);
    } else {
        output.set(slot, point.as_str());
    }
}

pub(super) fn decimal_digits(
    precision: usize,
    optional_tail: usize,
    state: &mut RunState<'_>,
    output: &mut Output,
    slot: usize,
) {
    let Some(point) = state
        .builtin_slot(Builtin::DecimalPoint)
        .filter(|&point| output.is_filled(point))
    else {
        return;
    };

    let mut digits = match &state.fraction_digits {
        Some(cached) if !cached.is_empty() => cached.clone(),
        _ => to_fixed(state.right, precision, state.round).1,
    };

    let trailing = digits
        .bytes()
        .rev()
        .take(optional_tail)
        .take_while(|&b| b == b'0')
        .count();
    digits.truncate(digits.len() - trailing);

    let significant = !state.optional_point || digits.bytes().any(|b| b != b'0');
    if !digits.is_empty() && significant {
        output.set(slot, digits);
    } else {
        output.clear(point);
    }
}
