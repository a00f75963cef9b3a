//! Type definitions for the format compiler and execution engine
//!
//! This module defines the data shared by the compiler and the executor:
//! handler identities, the step variants emitted by handlers, the compiled
//! artifact with its slot table, and the locale table consumed at run time.

use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::sync::Arc;

use crate::formatter::CustomStep;

/// Identity assigned to a handler at registration, in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(pub(crate) u32);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Execution weights of the built-in steps.
///
/// Lower weights run first. Steps sharing a weight run in textual order.
pub mod weight {
    /// Percentage, abbreviation and byte-unit scaling
    pub const SCALE: i32 = -900;
    /// Left parenthesis and explicit plus
    pub const LEADING_SIGN: i32 = -100;
    /// Integer part, ordinal suffix and time template
    pub const INTEGER: i32 = 0;
    /// Decimal point and thousands grouping
    pub const DELIMITER: i32 = 300;
    /// Decimal digits
    pub const FRACTION: i32 = 600;
    /// Right parenthesis
    pub const TRAILING_SIGN: i32 = 700;
    /// Currency symbol
    pub const CURRENCY: i32 = 900;
    /// Explicit minus
    pub const MINUS: i32 = 1200;
    /// Literal text from the fallback handler
    pub const LITERAL: i32 = 2000;
}

/// The built-in handler kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `%`
    Percentage,
    /// `b`
    ByteUnit,
    /// `a`, `aK`, `aM`, `aB`, `aT`
    Abbreviation,
    /// `(`
    LeftParen,
    /// `+`
    Plus,
    /// First `0` before any decimal point
    Integer,
    /// `o`
    Ordinal,
    /// `00:00:00`
    Time,
    /// `,` after the integer placeholder
    Grouping,
    /// `.` or `[.]`
    DecimalPoint,
    /// Zero run after the decimal point, with an optional `[0…]` tail
    DecimalDigits,
    /// `)` after a left parenthesis
    RightParen,
    /// `$`
    Currency,
    /// `-`
    Minus,
}

impl Builtin {
    /// Every built-in kind, in registration order
    pub const ALL: [Builtin; 14] = [
        Builtin::Percentage,
        Builtin::ByteUnit,
        Builtin::Abbreviation,
        Builtin::LeftParen,
        Builtin::Plus,
        Builtin::Integer,
        Builtin::Ordinal,
        Builtin::Time,
        Builtin::Grouping,
        Builtin::DecimalPoint,
        Builtin::DecimalDigits,
        Builtin::RightParen,
        Builtin::Currency,
        Builtin::Minus,
    ];
}

/// Abbreviation magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Thousand,
    Million,
    Billion,
    Trillion,
}

impl Magnitude {
    /// All magnitudes, smallest first
    pub const ALL: [Magnitude; 4] = [
        Magnitude::Thousand,
        Magnitude::Million,
        Magnitude::Billion,
        Magnitude::Trillion,
    ];

    /// The value divided out when this magnitude is applied
    pub fn divisor(self) -> f64 {
        match self {
            Magnitude::Thousand => 1e3,
            Magnitude::Million => 1e6,
            Magnitude::Billion => 1e9,
            Magnitude::Trillion => 1e12,
        }
    }

    /// Exclusive upper bound of the best-fit range
    pub fn upper_bound(self) -> f64 {
        match self {
            Magnitude::Thousand => 1e6,
            Magnitude::Million => 1e9,
            Magnitude::Billion => 1e12,
            Magnitude::Trillion => f64::INFINITY,
        }
    }

    /// Maps the letter following `a` (`K`, `M`, `B`, `T`) to a magnitude
    pub fn from_modifier(c: char) -> Option<Self> {
        match c {
            'K' => Some(Magnitude::Thousand),
            'M' => Some(Magnitude::Million),
            'B' => Some(Magnitude::Billion),
            'T' => Some(Magnitude::Trillion),
            _ => None,
        }
    }
}

/// How the abbreviation step picks its magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abbreviation {
    /// The range containing the value's magnitude
    BestFit,
    /// Exactly this magnitude, or nothing when the value is below it
    Forced(Magnitude),
}

/// Options shared by every step of one compiled format.
///
/// Fragments emitted by handlers are merged during the scan, so a value
/// discovered late (the decimal precision) is visible to steps that run
/// earlier (the integer part).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    /// Total number of decimal digits, mandatory plus optional
    pub decimal_precision: Option<usize>,
    /// Number of trailing decimal digits that may be trimmed when zero
    pub optional_precision: Option<usize>,
}

impl FormatOptions {
    /// Merge a fragment into this option set; set fields win
    pub fn merge(&mut self, fragment: &FormatOptions) {
        if let Some(precision) = fragment.decimal_precision {
            self.decimal_precision = Some(precision);
        }
        if let Some(optional) = fragment.optional_precision {
            self.optional_precision = Some(optional);
        }
    }
}

/// What a step does when executed
#[derive(Debug, Clone)]
pub enum StepKind {
    /// Echo text verbatim
    Literal(String),
    /// Swallowed input, renders nothing
    Noop,
    Percentage,
    ByteUnit,
    Abbreviation(Abbreviation),
    LeftParen,
    Plus,
    Integer,
    Ordinal,
    Time,
    Grouping,
    DecimalPoint {
        optional: bool,
    },
    DecimalDigits {
        precision: usize,
        optional_tail: usize,
    },
    RightParen,
    Currency {
        /// Whether the currency symbol may carry the minus sign itself
        place_sign: bool,
    },
    Minus,
    /// Step provided by a user-registered handler
    Custom(Arc<dyn CustomStep>),
}

impl PartialEq for StepKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StepKind::Literal(a), StepKind::Literal(b)) => a == b,
            (StepKind::Abbreviation(a), StepKind::Abbreviation(b)) => a == b,
            (StepKind::DecimalPoint { optional: a }, StepKind::DecimalPoint { optional: b }) => {
                a == b
            }
            (
                StepKind::DecimalDigits {
                    precision: p1,
                    optional_tail: t1,
                },
                StepKind::DecimalDigits {
                    precision: p2,
                    optional_tail: t2,
                },
            ) => p1 == p2 && t1 == t2,
            (StepKind::Currency { place_sign: a }, StepKind::Currency { place_sign: b }) => a == b,
            (StepKind::Custom(a), StepKind::Custom(b)) => Arc::ptr_eq(a, b),
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

/// A deferred transformation emitted by a handler claim
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub kind: StepKind,
    /// Execution order key
    pub weight: i32,
    /// Characters consumed beyond the trigger character
    pub consumed: usize,
    /// Fragment merged into the format's shared options
    pub options: Option<FormatOptions>,
}

impl Step {
    pub fn new(kind: StepKind, weight: i32) -> Self {
        Self {
            kind,
            weight,
            consumed: 0,
            options: None,
        }
    }

    pub fn consuming(mut self, consumed: usize) -> Self {
        self.consumed = consumed;
        self
    }

    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// A step of a compiled format, in execution order
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStep {
    pub kind: StepKind,
    pub weight: i32,
    /// Handler that claimed the step
    pub handler: HandlerId,
}

/// Maps steps to the output slots of their textual claim positions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlotTable {
    /// Output slot of each step, indexed like the ordered steps
    pub(crate) ordered: Vec<usize>,
    /// First slot claimed by each handler
    pub(crate) handlers: HashMap<HandlerId, usize>,
    /// First slot claimed by each built-in kind
    pub(crate) builtins: HashMap<Builtin, usize>,
}

impl SlotTable {
    /// Number of output slots
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Output slot of the step at `index` in execution order
    pub fn slot_of_step(&self, index: usize) -> Option<usize> {
        self.ordered.get(index).copied()
    }

    /// First output slot claimed by `handler`
    pub fn slot_of(&self, handler: HandlerId) -> Option<usize> {
        self.handlers.get(&handler).copied()
    }

    /// First output slot claimed by a built-in handler kind
    pub fn builtin_slot(&self, kind: Builtin) -> Option<usize> {
        self.builtins.get(&kind).copied()
    }
}

/// The immutable result of compiling one format string
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFormat {
    pub(crate) source: String,
    pub(crate) steps: Vec<CompiledStep>,
    pub(crate) options: FormatOptions,
    pub(crate) slots: SlotTable,
}

impl CompiledFormat {
    /// The format string this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[CompiledStep] {
        &self.steps
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn slot_table(&self) -> &SlotTable {
        &self.slots
    }
}

/// Words appended by the abbreviation step
#[derive(Debug, Clone, PartialEq)]
pub struct Abbreviations {
    pub thousand: String,
    pub million: String,
    pub billion: String,
    pub trillion: String,
}

impl Abbreviations {
    pub fn word(&self, magnitude: Magnitude) -> &str {
        match magnitude {
            Magnitude::Thousand => &self.thousand,
            Magnitude::Million => &self.million,
            Magnitude::Billion => &self.billion,
            Magnitude::Trillion => &self.trillion,
        }
    }
}

impl Default for Abbreviations {
    fn default() -> Self {
        Self {
            thousand: "k".to_string(),
            million: "m".to_string(),
            billion: "b".to_string(),
            trillion: "t".to_string(),
        }
    }
}

/// Ordinal suffix rules
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrdinalRule {
    /// st, nd, rd, th with the 11–13 exception
    #[default]
    English,
    /// er for 1, e otherwise
    French,
    /// er, do, mo, vo, no, to by last digit
    Spanish,
    /// ste or de
    BelgianDutch,
    /// Apostrophe suffixes by last digit, tens digit, then hundreds
    Turkish,
    /// The same suffix for every number
    Fixed(String),
}

impl OrdinalRule {
    /// Ordinal suffix for an integer
    pub fn suffix(&self, number: i64) -> String {
        let n = number.unsigned_abs();
        let last = n % 10;
        let suffix = match self {
            OrdinalRule::English => {
                if (n % 100) / 10 == 1 {
                    "th"
                } else {
                    match last {
                        1 => "st",
                        2 => "nd",
                        3 => "rd",
                        _ => "th",
                    }
                }
            }
            OrdinalRule::French => {
                if n == 1 {
                    "er"
                } else {
                    "e"
                }
            }
            OrdinalRule::Spanish => match last {
                1 | 3 => "er",
                2 => "do",
                7 | 0 => "mo",
                8 => "vo",
                9 => "no",
                _ => "to",
            },
            OrdinalRule::BelgianDutch => {
                let rem = n % 100;
                if (n != 0 && rem <= 1) || rem == 8 || rem >= 20 {
                    "ste"
                } else {
                    "de"
                }
            }
            OrdinalRule::Turkish => turkish_suffix(n),
            OrdinalRule::Fixed(suffix) => return suffix.clone(),
        };
        suffix.to_string()
    }
}

fn turkish_suffix(n: u64) -> &'static str {
    fn by_key(key: u64) -> Option<&'static str> {
        match key {
            1 | 5 | 8 | 70 | 80 => Some("'inci"),
            2 | 7 | 20 | 50 => Some("'nci"),
            3 | 4 | 100 => Some("'üncü"),
            6 => Some("'ncı"),
            9 | 10 | 30 => Some("'uncu"),
            60 | 90 => Some("'ıncı"),
            _ => None,
        }
    }

    if n == 0 {
        return "'ıncı";
    }
    let ones = n % 10;
    let tens = n % 100 - ones;
    by_key(ones)
        .or_else(|| by_key(tens))
        .or_else(|| if n >= 100 { by_key(100) } else { None })
        .unwrap_or("")
}

/// Locale table consulted by the executor
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleSettings {
    pub decimal_point: String,
    pub thousands_separator: String,
    pub abbreviations: Abbreviations,
    pub ordinal: OrdinalRule,
    pub currency_symbol: String,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            decimal_point: ".".to_string(),
            thousands_separator: ",".to_string(),
            abbreviations: Abbreviations::default(),
            ordinal: OrdinalRule::English,
            currency_symbol: "$".to_string(),
        }
    }
}

impl LocaleSettings {
    pub fn with_decimal_point(mut self, point: impl Into<String>) -> Self {
        self.decimal_point = point.into();
        self
    }

    pub fn with_thousands_separator(mut self, separator: impl Into<String>) -> Self {
        self.thousands_separator = separator.into();
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn with_abbreviations(mut self, abbreviations: Abbreviations) -> Self {
        self.abbreviations = abbreviations;
        self
    }

    pub fn with_ordinal(mut self, ordinal: OrdinalRule) -> Self {
        self.ordinal = ordinal;
        self
    }
}
