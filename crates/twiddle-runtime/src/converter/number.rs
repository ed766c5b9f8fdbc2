#![forbid(unsafe_code)]

//! Number conversion, parsing and display helpers.

use crate::unknown::Unknown;

/// Lower bound for auto-selected decimal digits.
pub const MIN_SUITABLE_DECIMAL_DIGITS: usize = 2;

/// Deepest nesting of signs and parentheses [`parse_number`] accepts.
pub const MAX_EXPRESSION_DEPTH: usize = 64;

/// Read a number from a raw value: numbers as-is, numeric strings by their
/// leading number, everything else as `0`.
#[must_use]
pub fn number_from_unknown(value: &Unknown) -> f64 {
    match value {
        Unknown::Number(n) => n.as_f64().unwrap_or(0.0),
        Unknown::String(s) => leading_number(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Raw value for a number. Integral values are stored as integers so that
/// `3.0` and `3` read back identically.
#[must_use]
pub fn number_to_unknown(value: f64) -> Unknown {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        #[allow(clippy::cast_possible_truncation)]
        let int = value as i64;
        Unknown::from(int)
    } else {
        Unknown::from(value)
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    while end < bytes.len() {
        let c = bytes[end];
        match c {
            b'0'..=b'9' => seen_digit = true,
            b'+' | b'-' if end == 0 => {}
            b'+' | b'-' if matches!(bytes[end - 1], b'e' | b'E') => {}
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end += 1;
    }
    // Back off a dangling exponent or sign.
    while end > 0 {
        if let Ok(v) = text[..end].parse::<f64>() {
            return Some(v);
        }
        end -= 1;
    }
    None
}

// ---------------------------------------------------------------------------
// Expression parsing
// ---------------------------------------------------------------------------

/// Parse user text as a number. Accepts arithmetic on numeric literals:
/// `+ - * / %`, unary signs and parentheses. Returns `None` when the text is
/// not a complete expression or nests deeper than [`MAX_EXPRESSION_DEPTH`].
///
/// ```
/// use twiddle_runtime::converter::parse_number;
///
/// assert_eq!(parse_number("3.14"), Some(3.14));
/// assert_eq!(parse_number("(1 + 2) * 4"), Some(12.0));
/// assert_eq!(parse_number("foobar"), None);
/// ```
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let mut parser = ExprParser {
        src: text.as_bytes(),
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    parser.skip_ws();
    (parser.pos == parser.src.len() && value.is_finite()).then_some(value)
}

struct ExprParser<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
}

impl ExprParser<'_> {
    fn skip_ws(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: u8) -> bool {
        self.skip_ws();
        if self.src.get(self.pos) == Some(&c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Option<f64> {
        let mut lhs = self.term()?;
        loop {
            if self.eat(b'+') {
                lhs += self.term()?;
            } else if self.eat(b'-') {
                lhs -= self.term()?;
            } else {
                return Some(lhs);
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut lhs = self.unary()?;
        loop {
            if self.eat(b'*') {
                lhs *= self.unary()?;
            } else if self.eat(b'/') {
                lhs /= self.unary()?;
            } else if self.eat(b'%') {
                lhs %= self.unary()?;
            } else {
                return Some(lhs);
            }
        }
    }

    /// Run `f` one nesting level deeper; `None` past the depth limit.
    fn nested(&mut self, f: impl FnOnce(&mut Self) -> Option<f64>) -> Option<f64> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            return None;
        }
        self.depth += 1;
        let value = f(self);
        self.depth -= 1;
        value
    }

    fn unary(&mut self) -> Option<f64> {
        if self.eat(b'-') {
            return self.nested(Self::unary).map(|v| -v);
        }
        if self.eat(b'+') {
            return self.nested(Self::unary);
        }
        self.primary()
    }

    fn primary(&mut self) -> Option<f64> {
        if self.eat(b'(') {
            let v = self.nested(Self::expr)?;
            return self.eat(b')').then_some(v);
        }
        self.skip_ws();
        self.literal()
    }

    fn literal(&mut self) -> Option<f64> {
        let rest = &self.src[self.pos..];
        if rest.len() > 2 && rest[0] == b'0' {
            let radix = match rest[1] {
                b'x' | b'X' => Some(16),
                b'b' | b'B' => Some(2),
                b'o' | b'O' => Some(8),
                _ => None,
            };
            if let Some(radix) = radix {
                let len = rest[2..]
                    .iter()
                    .take_while(|c| (**c as char).is_digit(radix))
                    .count();
                let digits = std::str::from_utf8(&rest[2..2 + len]).ok()?;
                let v = u64::from_str_radix(digits, radix).ok()?;
                self.pos += 2 + len;
                #[allow(clippy::cast_precision_loss)]
                let v = v as f64;
                return Some(v);
            }
        }

        let mut len = 0;
        let mut seen_exp = false;
        while len < rest.len() {
            match rest[len] {
                b'0'..=b'9' | b'.' => {}
                b'e' | b'E' if !seen_exp && len > 0 => seen_exp = true,
                b'+' | b'-' if len > 0 && matches!(rest[len - 1], b'e' | b'E') => {}
                _ => break,
            }
            len += 1;
        }
        let text = std::str::from_utf8(&rest[..len]).ok()?;
        let v = text.parse::<f64>().ok()?;
        self.pos += len;
        Some(v)
    }
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Number of significant decimal digits of `value`, up to ten.
#[must_use]
pub fn get_decimal_digits(value: f64) -> usize {
    let text = format!("{value:.10}");
    text.split_once('.')
        .map_or(0, |(_, frac)| frac.trim_end_matches('0').len())
}

/// Digits for displaying a number input: the step's digits when a step is
/// set, otherwise the value's digits but at least two.
#[must_use]
pub fn get_suitable_decimal_digits(step: Option<f64>, raw_value: f64) -> usize {
    match step {
        Some(step) => get_decimal_digits(step),
        None => get_decimal_digits(raw_value).max(MIN_SUITABLE_DECIMAL_DIGITS),
    }
}

/// Arrow-key increment.
#[must_use]
pub fn get_suitable_key_scale(step: Option<f64>) -> f64 {
    step.unwrap_or(1.0)
}

/// Per-pixel increment when dragging.
#[must_use]
pub fn get_suitable_pointer_scale(step: Option<f64>, raw_value: f64) -> f64 {
    let base = step.unwrap_or(raw_value).abs();
    if base == 0.0 || !base.is_finite() {
        0.1
    } else {
        10f64.powf(base.log10().floor() - 1.0)
    }
}

/// Linearly map `value` from `[start1, end1]` onto `[start2, end2]`.
#[must_use]
pub fn map_range(value: f64, start1: f64, end1: f64, start2: f64, end2: f64) -> f64 {
    let p = (value - start1) / (end1 - start1);
    start2 + p * (end2 - start2)
}

/// Clamp `value` to `[min, max]`.
#[must_use]
pub fn constrain_range(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
