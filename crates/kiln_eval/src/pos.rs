use std::fmt::Display;

/// Source position carried on diagnostics. The surrounding evaluation
/// machinery fills these in; primitives only pass them through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    /// expressions without a source location, e.g. values built by a
    /// primitive, line and column zero
    pub const NONE: Pos = Pos { line: 0, col: 0 };

    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    pub fn is_none(&self) -> bool {
        *self == Pos::NONE
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "«none»")
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Pos::new(3, 7).to_string(), "3:7");
        assert_eq!(Pos::NONE.to_string(), "«none»");
        assert_eq!(Pos::default(), Pos::NONE);
    }
}
