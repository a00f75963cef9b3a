use std::sync::Arc;
use std::thread;

use numeral_format::{
    CompileState, CustomStep, Engine, EngineConfig, FallbackMode, FormatError, HandlerId, Output,
    RunState, Step, StepKind, TokenHandler, round_half_up, weight,
};

/// `~` renders a tilde when rounding to an integer drops a fraction
#[derive(Debug)]
struct Approximate;

#[derive(Debug)]
struct ApproximateStep;

impl CustomStep for ApproximateStep {
    fn run(&self, state: &mut RunState<'_>, output: &mut Output, slot: usize) {
        if state.options.decimal_precision.is_none() && state.right != 0.0 {
            output.set(slot, "~");
        }
    }
}

impl TokenHandler for Approximate {
    fn triggers(&self) -> &str {
        "~"
    }

    fn claim(
        &self,
        id: HandlerId,
        state: &CompileState<'_>,
        _input: &str,
        _pos: usize,
    ) -> Result<Option<Step>, FormatError> {
        if state.is_consumed(id) {
            return Ok(None);
        }
        Ok(Some(Step::new(
            StepKind::Custom(Arc::new(ApproximateStep)),
            weight::SCALE - 100,
        )))
    }
}

#[test]
fn test_zero_format_override() {
    let mut engine = Engine::new();
    assert_eq!(engine.zero_format(), None);
    engine.set_zero_format(Some("N/A"));
    assert_eq!(engine.zero_format(), Some("N/A"));
    assert_eq!(engine.format(0.0, "0,0.00").unwrap(), "N/A");
    assert_eq!(engine.format(-0.0, "($0)").unwrap(), "N/A");
    assert_eq!(engine.format(0.001, "0,0.00").unwrap(), "0.00");
    // The override wins over any format string, even one that would not compile
    assert_eq!(engine.format(0.0, "0.00[0").unwrap(), "N/A");
    assert!(engine.format(1.0, "0.00[0").is_err());

    engine.set_zero_format(None);
    assert_eq!(engine.format(0.0, "0,0.00").unwrap(), "0.00");
}

#[test]
fn test_zero_format_still_checks_the_locale() {
    let mut engine = Engine::new();
    engine.set_zero_format(Some("zero"));
    assert_eq!(
        engine.format_with(0.0, "0", round_half_up, "xx"),
        Err(FormatError::UnknownLocale("xx".to_string()))
    );
}

#[test]
fn test_cache_is_transparent() {
    let mut engine = Engine::new();
    let formats = ["0,0.00", "($0,0)", "0.0a", "0b", "00:00:00", "0[.]00"];
    let values = [-1234567.891, 0.5, 1024.0, 10000.1];

    let cached: Vec<String> = formats
        .iter()
        .flat_map(|format| values.iter().map(|&value| engine.format(value, format).unwrap()))
        .collect();
    assert_eq!(engine.cached_formats(), formats.len());

    engine.set_cache_enabled(false);
    let uncached: Vec<String> = formats
        .iter()
        .flat_map(|format| values.iter().map(|&value| engine.format(value, format).unwrap()))
        .collect();
    assert_eq!(engine.cached_formats(), 0);
    assert_eq!(cached, uncached);
}

#[test]
fn test_malformed_format_is_reported() {
    let engine = Engine::new();
    let err = engine.format(1.0, "0.00[0").unwrap_err();
    assert_eq!(
        err,
        FormatError::malformed("0.00[0", 4, "expected ']' to close the optional decimals")
    );
    assert_eq!(
        err.to_string(),
        "malformed format '0.00[0' at byte 4: expected ']' to close the optional decimals"
    );
}

#[test]
fn test_custom_handler() {
    let mut engine = Engine::new();
    assert_eq!(engine.format(2.5, "~0").unwrap(), "~3");
    assert_eq!(engine.cached_formats(), 1);

    let id = engine.register_handler(Arc::new(Approximate));
    assert_eq!(engine.cached_formats(), 0);
    assert_eq!(engine.registry().candidates('~'), vec![id]);

    assert_eq!(engine.format(2.5, "~0").unwrap(), "~3");
    assert_eq!(engine.format(3.0, "~0").unwrap(), "3");
    assert_eq!(engine.format(2.5, "~0.0").unwrap(), "2.5");
    // Only the first tilde is claimed
    assert_eq!(engine.format(2.5, "~0~").unwrap(), "~3~");
}

#[test]
fn test_custom_handler_ids_are_unique() {
    let mut engine = Engine::new();
    let first = engine.register_handler(Arc::new(Approximate));
    let second = engine.register_handler(Arc::new(Approximate));
    assert_ne!(first, second);
    assert!(first < second);
    assert_eq!(engine.registry().candidates('~'), vec![first, second]);
}

#[test]
fn test_skip_fallback() {
    let mut engine = Engine::new();
    assert_eq!(engine.format(5.0, "0 units").unwrap(), "5 units");
    assert_eq!(engine.registry().fallback_mode(), FallbackMode::Echo);
    engine.set_fallback_mode(FallbackMode::Skip);
    assert_eq!(engine.registry().fallback_mode(), FallbackMode::Skip);
    assert_eq!(engine.format(5.0, "0 units").unwrap(), "5");
}

#[test]
fn test_numeral_wrapper() {
    let engine = Engine::new();
    let mut numeral = engine.numeral(10000.23);
    assert_eq!(numeral.value(), 10000.23);
    assert_eq!(numeral.format("0,0").unwrap(), "10,000");
    assert_eq!(numeral.format_rounded("0,0", f64::ceil).unwrap(), "10,001");

    numeral.set(-1.5);
    assert_eq!(numeral.format("").unwrap(), "-1.5");
}

#[test]
fn test_engine_from_config() {
    let config = EngineConfig::from_toml_str(
        r#"
        default_format = "0,0.00"
        zero_format = "-"
        locale = "de"
        cache = false

        [locales.de]
        decimal = ","
        group = "."
        currency = "€"
        ordinal = { suffix = "." }
        abbreviations = { thousand = "Tsd.", million = "Mio.", billion = "Mrd.", trillion = "Bio." }
        "#,
    )
    .unwrap();

    let engine = Engine::from_config(&config).unwrap();
    assert_eq!(engine.locale(), "de");
    assert!(!engine.cache_enabled());
    assert_eq!(engine.format(1234.5, "").unwrap(), "1.234,50");
    assert_eq!(engine.format(0.0, "").unwrap(), "-");
    assert_eq!(engine.format(2500000.0, "0.0 a").unwrap(), "2,5 Mio.");
    assert_eq!(engine.format(-12.0, "$ 0").unwrap(), "-€ 12");
    assert_eq!(engine.cached_formats(), 0);
}

#[test]
fn test_engine_is_shared_across_threads() {
    let engine = Engine::new();
    let expected = engine.format(-1234567.891, "($0,0.00 a)").unwrap();
    engine.clear_cache();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.format(-1234567.891, "($0,0.00 a)").unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
    assert_eq!(engine.cached_formats(), 1);
}
