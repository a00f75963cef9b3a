//! Format execution module
//!
//! This module runs compiled formats against numeric values.
//! The main entry point is `CompiledFormat::run`: steps execute in weight
//! order against a fresh `RunState`, each filling or clearing output slots,
//! and the slots are joined back in textual order.

mod duration;
mod numeric;
mod scale;
mod sign;
mod steps;

use std::fmt;

use crate::types::{Builtin, CompiledFormat, FormatOptions, HandlerId, LocaleSettings, SlotTable};

/// Rounding applied wherever a value is cut to a fixed number of digits
pub type RoundingFn = fn(f64) -> f64;

/// Round to nearest, ties toward positive infinity
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// A step contributed by a user-registered handler
pub trait CustomStep: Send + Sync + fmt::Debug {
    fn run(&self, state: &mut RunState<'_>, output: &mut Output, slot: usize);
}

/// The output buffer, one slot per claimed token
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Output {
    slots: Vec<Option<String>>,
}

impl Output {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).and_then(|s| s.as_deref())
    }

    pub fn is_filled(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    pub fn set(&mut self, slot: usize, text: impl Into<String>) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = Some(text.into());
        }
    }

    pub fn clear(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = None;
        }
    }

    /// Remove a leading minus sign from `slot`
    pub fn strip_sign(&mut self, slot: usize) {
        if let Some(Some(text)) = self.slots.get_mut(slot) {
            if text.starts_with('-') {
                text.remove(0);
            }
        }
    }

    /// Concatenate the filled slots in textual order
    pub fn join(&self) -> String {
        self.slots.iter().flatten().map(String::as_str).collect()
    }
}

/// Mutable state threaded through the steps of one run
#[derive(Debug)]
pub struct RunState<'a> {
    /// Value being rendered, rescaled by scale steps
    pub num: f64,
    /// Fractional remainder of `num`
    pub right: f64,
    /// Fraction digits produced while rendering the integer part
    pub fraction_digits: Option<String>,
    /// An optional decimal point was rendered
    pub optional_point: bool,
    /// Slot currently carrying the sign, if any
    pub sign_slot: Option<usize>,
    pub round: RoundingFn,
    pub locale: &'a LocaleSettings,
    pub options: &'a FormatOptions,
    slots: &'a SlotTable,
}

impl<'a> RunState<'a> {
    fn new(
        value: f64,
        round: RoundingFn,
        locale: &'a LocaleSettings,
        options: &'a FormatOptions,
        slots: &'a SlotTable,
    ) -> Self {
        Self {
            num: value,
            right: value % 1.0,
            fraction_digits: None,
            optional_point: false,
            sign_slot: None,
            round,
            locale,
            options,
            slots,
        }
    }

    /// Replace the running value and recompute its remainder
    pub fn rescale(&mut self, num: f64) {
        self.num = num;
        self.right = num % 1.0;
    }

    /// First slot claimed by `handler`
    pub fn slot_of(&self, handler: HandlerId) -> Option<usize> {
        self.slots.slot_of(handler)
    }

    pub fn builtin_slot(&self, kind: Builtin) -> Option<usize> {
        self.slots.builtin_slot(kind)
    }
}

impl CompiledFormat {
    /// Format a number with this compiled format
    ///
    /// # Arguments
    /// * `value` - The numeric value to format
    /// * `round` - Rounding applied to integer and fraction digits
    /// * `locale` - Locale table for delimiters, words and symbols
    ///
    /// # Returns
    /// * `String` - The formatted number string
    ///
    /// # Examples
    /// ```
    /// use numeral_format::parser::{compile, TokenRegistry};
    /// use numeral_format::LocaleSettings;
    ///
    /// let compiled = compile(&TokenRegistry::default(), "0,0").unwrap();
    /// let locale = LocaleSettings::default();
    /// assert_eq!(compiled.run(10000.23, f64::floor, &locale), "10,000");
    /// assert_eq!(compiled.run(10000.23, f64::ceil, &locale), "10,001");
    /// ```
    pub fn run(&self, value: f64, round: RoundingFn, locale: &LocaleSettings) -> String {
        let mut state = RunState::new(value, round, locale, &self.options, &self.slots);
        let mut output = Output::new(self.slots.len());

        for (index, step) in self.steps.iter().enumerate() {
            if let Some(slot) = self.slots.slot_of_step(index) {
                steps::execute(&step.kind, &mut state, &mut output, slot);
            }
        }

        output.join()
    }
}
