//! Numbered list labels.

/// Per-nesting-level counters for numbered list runs.
///
/// Each level holds the position within the current run of numbered siblings.
/// Any non-numbered sibling ends the run and resets the counter.
#[derive(Debug, Default)]
pub(crate) struct ListNumbering {
    counters: Vec<u32>,
}

impl ListNumbering {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start a new sibling sequence one level deeper.
    pub(crate) fn enter(&mut self) {
        self.counters.push(0);
    }

    /// Leave the current sibling sequence.
    pub(crate) fn exit(&mut self) {
        self.counters.pop();
    }

    /// Advance past a sibling; returns its position if it is numbered.
    pub(crate) fn advance(&mut self, numbered: bool) -> Option<u32> {
        let counter = self.counters.last_mut()?;
        if numbered {
            *counter += 1;
            Some(*counter)
        } else {
            *counter = 0;
            None
        }
    }
}

/// Label for position `n` (1-based) at nesting depth `depth`.
///
/// Depths cycle decimal, lowercase letters, lowercase roman numerals.
pub fn list_label(depth: usize, n: u32) -> String {
    match depth % 3 {
        0 => n.to_string(),
        1 => to_alpha(n),
        _ => to_roman(n).to_lowercase(),
    }
}

/// Bijective base-26 letters: a..z, aa, ab, ...
fn to_alpha(mut n: u32) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Convert number to Roman numerals.
fn to_roman(mut num: u32) -> String {
    let numerals = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut result = String::new();
    for (value, symbol) in numerals {
        while num >= value {
            result.push_str(symbol);
            num -= value;
        }
    }
    result
}
