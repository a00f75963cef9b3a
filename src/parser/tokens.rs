use crate::error::FormatError;
use crate::parser::combinators::*;
use crate::parser::registry::{CompileState, TokenHandler};
use crate::types::*;

impl TokenHandler for Builtin {
    fn triggers(&self) -> &str {
        match self {
            Builtin::Percentage => "%",
            Builtin::ByteUnit => "b",
            Builtin::Abbreviation => "a",
            Builtin::LeftParen => "(",
            Builtin::Plus => "+",
            Builtin::Integer => "0",
            Builtin::Ordinal => "o",
            Builtin::Time => "0",
            Builtin::Grouping => ",",
            Builtin::DecimalPoint => ".[",
            Builtin::DecimalDigits => "0[",
            Builtin::RightParen => ")",
            Builtin::Currency => "$",
            Builtin::Minus => "-",
        }
    }

    fn priority(&self) -> i32 {
        match self {
            Builtin::Time => -10,
            Builtin::DecimalDigits => 10,
            _ => 0,
        }
    }

    fn claim(
        &self,
        id: HandlerId,
        state: &CompileState<'_>,
        input: &str,
        pos: usize,
    ) -> Result<Option<Step>, FormatError> {
        let unfired = !state.is_consumed(id);
        let step = match self {
            Builtin::Percentage => (state.times_consumed(id) < 1)
                .then(|| Step::new(StepKind::Percentage, weight::SCALE)),
            Builtin::ByteUnit => Some(Step::new(StepKind::ByteUnit, weight::SCALE)),
            Builtin::Abbreviation => Some(claim_abbreviation(input, pos)),
            Builtin::LeftParen => {
                unfired.then(|| Step::new(StepKind::LeftParen, weight::LEADING_SIGN))
            }
            Builtin::Plus => unfired.then(|| Step::new(StepKind::Plus, weight::LEADING_SIGN)),
            Builtin::Integer => (unfired && !state.builtin_fired(Builtin::DecimalPoint))
                .then(|| Step::new(StepKind::Integer, weight::INTEGER)),
            Builtin::Ordinal => Some(Step::new(StepKind::Ordinal, weight::INTEGER)),
            Builtin::Time => {
                let mut rest = &input[pos..];
                parse_time_template(&mut rest).ok().map(|()| {
                    Step::new(StepKind::Time, weight::INTEGER).consuming(TIME_TEMPLATE.len() - 1)
                })
            }
            Builtin::Grouping => (unfired && state.builtin_fired(Builtin::Integer)).then(|| {
                // A grouping comma swallows the integer placeholder that follows it.
                let consumed = usize::from(input[pos + 1..].starts_with('0'));
                Step::new(StepKind::Grouping, weight::DELIMITER).consuming(consumed)
            }),
            Builtin::DecimalPoint if unfired => claim_decimal_point(input, pos)?,
            Builtin::DecimalPoint => None,
            Builtin::DecimalDigits if unfired && state.builtin_fired(Builtin::DecimalPoint) => {
                claim_decimal_digits(input, pos)?
            }
            Builtin::DecimalDigits => None,
            Builtin::RightParen => (unfired && state.builtin_fired(Builtin::LeftParen))
                .then(|| Step::new(StepKind::RightParen, weight::TRAILING_SIGN)),
            Builtin::Currency => unfired.then(|| {
                // Only a symbol that precedes every other sign-bearing token may carry the sign.
                let place_sign = !state.builtin_fired(Builtin::Integer)
                    && !state.builtin_fired(Builtin::DecimalPoint)
                    && !state.builtin_fired(Builtin::Minus)
                    && !state.builtin_fired(Builtin::LeftParen);
                Step::new(StepKind::Currency { place_sign }, weight::CURRENCY)
            }),
            Builtin::Minus => unfired.then(|| Step::new(StepKind::Minus, weight::MINUS)),
        };
        Ok(step)
    }
}

fn claim_abbreviation(input: &str, pos: usize) -> Step {
    let mut rest = &input[pos + 1..];
    match parse_magnitude_modifier(&mut rest) {
        Ok(magnitude) => Step::new(
            StepKind::Abbreviation(Abbreviation::Forced(magnitude)),
            weight::SCALE,
        )
        .consuming(1),
        Err(_) => Step::new(StepKind::Abbreviation(Abbreviation::BestFit), weight::SCALE),
    }
}

fn claim_decimal_point(input: &str, pos: usize) -> Result<Option<Step>, FormatError> {
    let text = &input[pos..];
    if text.starts_with('.') {
        return Ok(Some(Step::new(
            StepKind::DecimalPoint { optional: false },
            weight::DELIMITER,
        )));
    }

    let mut rest = text;
    if parse_optional_point(&mut rest).is_ok() {
        return Ok(Some(
            Step::new(StepKind::DecimalPoint { optional: true }, weight::DELIMITER).consuming(2),
        ));
    }
    if text.starts_with("[.") {
        return Err(FormatError::malformed(
            input,
            pos,
            "expected ']' to close the optional decimal point",
        ));
    }
    Ok(None)
}

fn claim_decimal_digits(input: &str, pos: usize) -> Result<Option<Step>, FormatError> {
    let text = &input[pos..];
    let mut rest = text;
    let mandatory = parse_zero_run(&mut rest).unwrap_or(0);

    let mut attempt = rest;
    let optional = if let Ok(zeros) = parse_optional_zeros(&mut attempt) {
        rest = attempt;
        zeros
    } else {
        let mut probe = rest;
        if parse_unterminated_zeros(&mut probe).is_ok() {
            return Err(FormatError::malformed(
                input,
                pos + (text.len() - rest.len()),
                "expected ']' to close the optional decimals",
            ));
        }
        0
    };

    let precision = mandatory + optional;
    if precision == 0 {
        return Ok(None);
    }

    // Every matched character is ASCII, so bytes and characters agree.
    let matched = text.len() - rest.len();
    let options = FormatOptions {
        decimal_precision: Some(precision),
        optional_precision: Some(optional),
    };
    Ok(Some(
        Step::new(
            StepKind::DecimalDigits {
                precision,
                optional_tail: optional,
            },
            weight::FRACTION,
        )
        .consuming(matched - 1)
        .with_options(options),
    ))
}
