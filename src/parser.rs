// src/parser.rs
//! Turns freeform set text like "80kg x 10" into a weight and a rep count.

/// A weight×reps pair typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetInput {
    pub weight: u32,
    pub reps: u32,
}

/// Every maximal run of ASCII digits in `text`, in order.
/// Runs too large for a `u64` saturate at `u64::MAX`.
pub fn extract_set(text: &str) -> Vec<u64> {
    let mut numbers = Vec::new();
    let mut current: Option<u64> = None;
    for c in text.chars() {
        match c.to_digit(10) {
            Some(digit) => {
                let value = current.unwrap_or(0);
                current = Some(
                    value
                        .saturating_mul(10)
                        .saturating_add(u64::from(digit)),
                );
            }
            None => {
                if let Some(value) = current.take() {
                    numbers.push(value);
                }
            }
        }
    }
    if let Some(value) = current {
        numbers.push(value);
    }
    numbers
}

/// Accepts the text only when exactly two numbers were typed and both fit.
pub fn parse_set(text: &str) -> Option<SetInput> {
    match extract_set(text).as_slice() {
        [weight, reps] => Some(SetInput {
            weight: u32::try_from(*weight).ok()?,
            reps: u32::try_from(*reps).ok()?,
        }),
        _ => None,
    }
}

/// History label shown next to an exercise, e.g. `(80kg x 10)`.
pub fn format_set(weight: u32, reps: u32) -> String {
    format!("({weight}kg x {reps})")
}
