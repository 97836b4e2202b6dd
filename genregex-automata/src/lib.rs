use std::fmt::{Display, Formatter};
use thiserror::Error;

mod closure;
mod compile;
mod expression;
mod matcher;
mod nfa;
mod predicate;

pub use closure::StateSet;
pub use compile::Compiler;
pub use expression::{Child, Expression, ExpressionKind};
pub use matcher::NfaMatcher;
pub use nfa::{Fragment, Label, Nfa, State, StateId, Transition};
pub use predicate::{ElementTest, Predicate};

/// Consumes a sequence of `A`s one at a time, tracking whether what was seen so far is accepted.
pub trait RegexMatcher<A> {
    /// accepts the specified element.
    ///
    /// If accepting failed, the new state is empty.
    fn accept(&mut self, inp: A);
    fn accept_many(&mut self, inp: impl IntoIterator<Item = A>) {
        for i in inp {
            self.accept(i);
        }
    }

    /// Returns true if the regular expression accepts the input iterator
    fn accepts(&mut self, iter: impl IntoIterator<Item = A>) -> bool {
        for i in iter {
            self.accept(i);
            if self.is_empty() {
                return false;
            }
        }

        self.is_accepting()
    }

    fn is_accepting(&self) -> bool;

    /// Returns true if no continuation of the input can be accepted anymore.
    fn is_empty(&self) -> bool;
}

/// Names a child slot of an [`Expression`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The first child of a union or concatenation.
    Left,
    /// The second child of a union or concatenation.
    Right,
    /// The only child of a Kleene star.
    Operand,
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Left => write!(f, "left-hand side"),
            Slot::Right => write!(f, "right-hand side"),
            Slot::Operand => write!(f, "operand"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("malformed expression: {kind} is missing its {missing}")]
    MalformedExpression { kind: ExpressionKind, missing: Slot },
    #[error("automaton exceeds the limit of {limit} states")]
    StateLimitExceeded { limit: usize },
}
