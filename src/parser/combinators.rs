use winnow::combinator::{alt, delimited, eof, not};
use winnow::token::{any, literal, take_while};
use winnow::{ModalResult, Parser};

use crate::types::Magnitude;

/// The literal time template
pub const TIME_TEMPLATE: &str = "00:00:00";

/// Match the full `00:00:00` template
pub fn parse_time_template(input: &mut &str) -> ModalResult<()> {
    literal(TIME_TEMPLATE).void().parse_next(input)
}

/// Match an optional decimal point, `[.]`
pub fn parse_optional_point(input: &mut &str) -> ModalResult<()> {
    literal("[.]").void().parse_next(input)
}

/// Count a (possibly empty) run of `0`
pub fn parse_zero_run(input: &mut &str) -> ModalResult<usize> {
    take_while(0.., '0').map(str::len).parse_next(input)
}

/// Count the zeros of a bracketed optional tail, `[00]`
pub fn parse_optional_zeros(input: &mut &str) -> ModalResult<usize> {
    delimited('[', take_while(1.., '0'), ']')
        .map(str::len)
        .parse_next(input)
}

/// Match an optional tail that never closes: `[` then zeros without `]`,
/// or a bare `[` at end of input
pub fn parse_unterminated_zeros(input: &mut &str) -> ModalResult<()> {
    alt((
        ('[', take_while(1.., '0'), not(']')).void(),
        ('[', eof).void(),
    ))
    .parse_next(input)
}

/// Match the magnitude letter of a forced abbreviation
pub fn parse_magnitude_modifier(input: &mut &str) -> ModalResult<Magnitude> {
    any.verify_map(Magnitude::from_modifier).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_zeros_requires_closing_bracket() {
        let mut input = "[000]x";
        assert_eq!(parse_optional_zeros(&mut input).ok(), Some(3));
        assert_eq!(input, "x");

        let mut input = "[000";
        assert!(parse_optional_zeros(&mut input).is_err());
        let mut input = "[000";
        assert!(parse_unterminated_zeros(&mut input).is_ok());

        let mut input = "[0x]";
        assert!(parse_unterminated_zeros(&mut input).is_ok());
        let mut input = "[00 ";
        assert!(parse_unterminated_zeros(&mut input).is_ok());

        let mut input = "[x0";
        assert!(parse_unterminated_zeros(&mut input).is_err());
        let mut input = "[]";
        assert!(parse_unterminated_zeros(&mut input).is_err());
    }

    #[test]
    fn zero_run_may_be_empty() {
        let mut input = "00[0]";
        assert_eq!(parse_zero_run(&mut input).ok(), Some(2));
        assert_eq!(input, "[0]");

        let mut input = "[0]";
        assert_eq!(parse_zero_run(&mut input).ok(), Some(0));
    }

    #[test]
    fn magnitude_modifier_letters() {
        let mut input = "M rest";
        assert_eq!(
            parse_magnitude_modifier(&mut input).ok(),
            Some(Magnitude::Million)
        );
        let mut input = "k";
        assert!(parse_magnitude_modifier(&mut input).is_err());
    }

    #[test]
    fn time_template_is_exact() {
        let mut input = "00:00:00";
        assert!(parse_time_template(&mut input).is_ok());
        let mut input = "00:00:0";
        assert!(parse_time_template(&mut input).is_err());
    }
}
