use crate::error::FormatError;
use crate::parser::*;
use crate::types::*;

fn compile_default(format: &str) -> CompiledFormat {
    compile(&TokenRegistry::default(), format).unwrap()
}

fn kinds(compiled: &CompiledFormat) -> Vec<StepKind> {
    compiled.steps().iter().map(|step| step.kind.clone()).collect()
}

#[test]
fn test_steps_run_in_weight_order() {
    let compiled = compile_default("-$0,0.00%");
    assert_eq!(
        kinds(&compiled),
        vec![
            StepKind::Percentage,
            StepKind::Integer,
            StepKind::Grouping,
            StepKind::DecimalPoint { optional: false },
            StepKind::DecimalDigits {
                precision: 2,
                optional_tail: 0
            },
            StepKind::Currency { place_sign: false },
            StepKind::Minus,
        ]
    );

    let weights: Vec<i32> = compiled.steps().iter().map(|step| step.weight).collect();
    let mut sorted = weights.clone();
    sorted.sort();
    assert_eq!(weights, sorted);
}

#[test]
fn test_slots_follow_textual_order() {
    let compiled = compile_default("($0,0.00)");
    // ( $ 0 ,0 . 00 )
    assert_eq!(compiled.slot_table().len(), 7);
    let slots: Vec<usize> = (0..compiled.steps().len())
        .map(|i| compiled.slot_table().slot_of_step(i).unwrap())
        .collect();
    // Left paren, integer, grouping, point, digits, right paren, currency
    assert_eq!(slots, vec![0, 2, 3, 4, 5, 6, 1]);
}

#[test]
fn test_grouping_claims_its_own_slot() {
    let compiled = compile_default("0,0");
    assert_eq!(compiled.slot_table().len(), 2);
    assert_eq!(compiled.slot_table().builtin_slot(Builtin::Integer), Some(0));
    assert_eq!(compiled.slot_table().builtin_slot(Builtin::Grouping), Some(1));
}

#[test]
fn test_equal_weights_keep_textual_order() {
    let compiled = compile_default("a%b");
    let slots: Vec<usize> = (0..3)
        .map(|i| compiled.slot_table().slot_of_step(i).unwrap())
        .collect();
    assert_eq!(slots, vec![0, 1, 2]);
}

#[test]
fn test_options_are_shared_with_earlier_steps() {
    let compiled = compile_default("0.00[0]");
    assert_eq!(
        compiled.options(),
        &FormatOptions {
            decimal_precision: Some(3),
            optional_precision: Some(1)
        }
    );
}

#[test]
fn test_currency_sign_placement_depends_on_position() {
    let leading = compile_default("$0");
    assert!(kinds(&leading).contains(&StepKind::Currency { place_sign: true }));

    for format in ["0$", ".0$", "-$0", "($0)"] {
        let compiled = compile_default(format);
        assert!(
            kinds(&compiled).contains(&StepKind::Currency { place_sign: false }),
            "{format}"
        );
    }
}

#[test]
fn test_handlers_claim_once() {
    let compiled = compile_default("0%%");
    assert_eq!(
        kinds(&compiled),
        vec![StepKind::Percentage, StepKind::Integer, StepKind::Literal("%".to_string())]
    );

    let compiled = compile_default("0 0");
    assert_eq!(
        kinds(&compiled),
        vec![
            StepKind::Integer,
            StepKind::Literal(" ".to_string()),
            StepKind::Literal("0".to_string())
        ]
    );
}

#[test]
fn test_right_paren_needs_left_paren() {
    let compiled = compile_default("0)");
    assert_eq!(
        kinds(&compiled),
        vec![StepKind::Integer, StepKind::Literal(")".to_string())]
    );
}

#[test]
fn test_time_template_takes_precedence() {
    let compiled = compile_default("00:00:00");
    assert_eq!(kinds(&compiled), vec![StepKind::Time]);
    assert_eq!(compiled.source(), "00:00:00");
}

#[test]
fn test_forced_abbreviation() {
    let compiled = compile_default("0aM");
    assert_eq!(
        kinds(&compiled)[0],
        StepKind::Abbreviation(Abbreviation::Forced(Magnitude::Million))
    );
    assert_eq!(compiled.slot_table().len(), 2);
}

#[test]
fn test_malformed_formats() {
    let registry = TokenRegistry::default();
    for format in ["0.00[0", "0.00[0x", "0.[0 ", "0.[", "0.[00", "0[.00"] {
        let err = compile(&registry, format).unwrap_err();
        assert!(
            matches!(err, FormatError::Malformed { .. }),
            "{format}: {err}"
        );
    }
}

#[test]
fn test_malformed_error_reports_position() {
    let err = compile(&TokenRegistry::default(), "0[.00").unwrap_err();
    assert_eq!(
        err,
        FormatError::malformed("0[.00", 1, "expected ']' to close the optional decimal point")
    );
}

#[test]
fn test_unclaimed_brackets_are_literals() {
    let compiled = compile_default("0.00[x]");
    assert_eq!(
        kinds(&compiled).last(),
        Some(&StepKind::Literal("[x]".to_string()))
    );

    // No zero directly after the bracket, so nothing expected a `]`
    let compiled = compile_default("0.00[x0");
    assert!(kinds(&compiled).contains(&StepKind::Literal("[x".to_string())));
}
