use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Display form of the reserved "no symbol" value.
pub const EPSILON: &str = "ε";

macro_rules! symbol_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Wraps exactly one grapheme cluster. Empty text, longer text and the
            /// reserved epsilon text are refused.
            pub fn new(text: &str) -> Option<Self> {
                let mut graphemes = text.graphemes(true);
                match (graphemes.next(), graphemes.next()) {
                    (Some(g), None) if g != EPSILON => Some(Self(Arc::from(g))),
                    _ => None,
                }
            }

            /// Splits text into one symbol per grapheme cluster.
            pub fn sequence(text: &str) -> Vec<Self> {
                text.graphemes(true).map(|g| Self(Arc::from(g))).collect()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<char> for $name {
            fn from(c: char) -> Self {
                Self(Arc::from(c.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

symbol_type!(
    /// A token of the input alphabet.
    Symbol
);

symbol_type!(
    /// A token of the stack alphabet.
    StackSymbol
);

/// Opaque state label. Cloning is a reference-count bump.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Arc<str>);

impl State {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transition-key condition: either epsilon or one concrete symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Guard<T> {
    Epsilon,
    Symbol(T),
}

impl<T> Guard<T> {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Guard::Epsilon)
    }

    pub fn as_symbol(&self) -> Option<&T> {
        match self {
            Guard::Epsilon => None,
            Guard::Symbol(symbol) => Some(symbol),
        }
    }
}

impl<T: PartialEq> Guard<T> {
    /// Epsilon matches anything, including "nothing there".
    pub fn admits(&self, symbol: Option<&T>) -> bool {
        match self {
            Guard::Epsilon => true,
            Guard::Symbol(expected) => symbol == Some(expected),
        }
    }
}

impl<T> From<Option<T>> for Guard<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Guard::Epsilon, Guard::Symbol)
    }
}

impl<T: fmt::Display> fmt::Display for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Epsilon => f.write_str(EPSILON),
            Guard::Symbol(symbol) => symbol.fmt(f),
        }
    }
}

/// Splits an input string into symbols, one per grapheme cluster.
pub fn tokenize(input: &str) -> Vec<Symbol> {
    Symbol::sequence(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_single_graphemes() {
        assert!(Symbol::new("a").is_some());
        assert!(Symbol::new("é").is_some());
        assert!(Symbol::new("ab").is_none());
        assert!(Symbol::new("").is_none());
        assert!(StackSymbol::new(EPSILON).is_none());
    }

    #[test]
    fn tokenize_keeps_combining_marks_together() {
        let symbols = tokenize("ae\u{301}b");
        assert_eq!(symbols.len(), 3);
        assert_eq!(symbols[1].as_str(), "e\u{301}");
    }

    #[test]
    fn epsilon_guard_admits_everything() {
        let z = StackSymbol::from('Z');
        assert!(Guard::<StackSymbol>::Epsilon.admits(None));
        assert!(Guard::<StackSymbol>::Epsilon.admits(Some(&z)));
        assert!(Guard::Symbol(z.clone()).admits(Some(&z)));
        assert!(!Guard::Symbol(z).admits(None));
    }
}
