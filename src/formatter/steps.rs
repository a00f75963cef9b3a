use crate::formatter::{Output, RunState, duration, numeric, scale, sign};
use crate::types::StepKind;

/// Execute one step against the run state, writing into `slot`
pub(super) fn execute(kind: &StepKind, state: &mut RunState<'_>, output: &mut Output, slot: usize) {
    match kind {
        StepKind::Literal(text) => output.set(slot, text.as_str()),
        StepKind::Noop => {}
        StepKind::Percentage => scale::percentage(state, output, slot),
        StepKind::ByteUnit => scale::byte_unit(state, output, slot),
        StepKind::Abbreviation(mode) => scale::abbreviation(*mode, state, output, slot),
        StepKind::LeftParen => sign::left_paren(state, output, slot),
        StepKind::Plus => sign::plus(state, output, slot),
        StepKind::Integer => numeric::integer(state, output, slot),
        StepKind::Ordinal => {
            let number = (state.round)(state.num) as i64;
            output.set(slot, state.locale.ordinal.suffix(number));
        }
        StepKind::Time => duration::clock(state, output, slot),
        StepKind::Grouping => numeric::grouping(state, output),
        StepKind::DecimalPoint { optional } => {
            numeric::decimal_point(*optional, state, output, slot)
        }
        StepKind::DecimalDigits {
            precision,
            optional_tail,
        } => numeric::decimal_digits(*precision, *optional_tail, state, output, slot),
        StepKind::RightParen => sign::right_paren(state, output, slot),
        StepKind::Currency { place_sign } => sign::currency(*place_sign, state, output, slot),
        StepKind::Minus => sign::minus(state, output, slot),
        StepKind::Custom(step) => step.run(state, output, slot),
    }
}
