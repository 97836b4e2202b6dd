//! Contains the [`NfaMatcher`], which runs an [`Nfa`] over a sequence one element at a time.
//!
//! All live states are tracked at once, so matching never backtracks and takes time
//! proportional to the length of the input times the size of the automaton.

use crate::closure::StateSet;
use crate::nfa::Nfa;
use crate::RegexMatcher;
use std::borrow::Borrow;

/// Simulation of an [`Nfa`] over an input sequence.
///
/// The automaton is only borrowed, so any number of matchers can share it,
/// also across threads.
pub struct NfaMatcher<'a, T> {
    nfa: &'a Nfa<T>,
    current: StateSet,
    next: StateSet,
    consumed: usize,
}

impl<T> Nfa<T> {
    /// A matcher positioned before the first element.
    pub fn matcher(&self) -> NfaMatcher<'_, T> {
        NfaMatcher::new(self)
    }

    /// Returns true if this automaton accepts the whole of `input`.
    ///
    /// Stops reading `input` as soon as no state is live anymore.
    pub fn is_match<I>(&self, input: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.matcher().accepts(input)
    }
}

impl<'a, T> NfaMatcher<'a, T> {
    /// Starts in the epsilon-closure of the start state.
    pub fn new(nfa: &'a Nfa<T>) -> Self {
        let mut matcher = Self {
            nfa,
            current: nfa.empty_set(),
            next: nfa.empty_set(),
            consumed: 0,
        };
        matcher.reset();
        matcher
    }

    /// Goes back to the state before any element was consumed.
    pub fn reset(&mut self) {
        self.current.clear();
        self.current.insert(self.nfa.start());
        self.nfa.close(&mut self.current);
        self.consumed = 0;
    }

    /// Consumes one element.
    pub fn step(&mut self, element: &T) {
        self.next.clear();
        for id in self.current.iter() {
            let Some(state) = self.nfa.state(id) else {
                continue;
            };
            for (predicate, target) in state.predicate_transitions() {
                if predicate.test(element) {
                    self.next.insert(target);
                }
            }
        }
        self.nfa.close(&mut self.next);
        std::mem::swap(&mut self.current, &mut self.next);

        self.consumed += 1;
        log::trace!(
            "element {} leaves {} live states",
            self.consumed,
            self.current.len()
        );
    }

    /// The states the automaton may be in after the elements consumed so far.
    pub fn live_states(&self) -> &StateSet {
        &self.current
    }

    /// Number of elements consumed since creation or the last [`reset`](Self::reset).
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Returns true if the input consumed so far is accepted.
    pub fn is_accepting(&self) -> bool {
        self.nfa.is_accepting(&self.current)
    }

    /// Returns true if no state is live: no continuation of the input can be accepted.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// The automaton being simulated.
    pub fn nfa(&self) -> &'a Nfa<T> {
        self.nfa
    }
}

impl<T, A: Borrow<T>> RegexMatcher<A> for NfaMatcher<'_, T> {
    fn accept(&mut self, inp: A) {
        self.step(inp.borrow())
    }

    fn is_accepting(&self) -> bool {
        NfaMatcher::is_accepting(self)
    }

    fn is_empty(&self) -> bool {
        NfaMatcher::is_empty(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Expression, Predicate, RegexMatcher};

    fn eq(v: i32) -> Expression<i32> {
        Expression::predicate(Predicate::new(move |x: &i32| *x == v))
    }

    #[test]
    fn test_nfa_matcher() {
        let nfa = Expression::concat(eq(1), Expression::star(eq(2)))
            .compile_accepting()
            .unwrap();

        assert!(nfa.matcher().accepts([1]));
        assert!(nfa.matcher().accepts([1, 2]));
        assert!(nfa.matcher().accepts([1, 2, 2, 2, 2, 2]));
        assert!(!nfa.matcher().accepts([2, 1]));
        assert!(!nfa.matcher().accepts(Vec::<i32>::new()));
    }

    #[test]
    fn incremental() {
        let nfa = Expression::concat(eq(1), eq(2)).compile_accepting().unwrap();
        let mut m = nfa.matcher();
        assert!(std::ptr::eq(m.nfa(), &nfa));
        assert!(!m.is_accepting());

        m.accept(&1);
        assert!(!m.is_accepting());
        assert!(!m.is_empty());

        m.accept(2);
        assert!(m.is_accepting());
        assert_eq!(m.consumed(), 2);

        m.accept(2);
        assert!(m.is_empty());
        assert!(!m.is_accepting());

        m.reset();
        assert_eq!(m.consumed(), 0);
        m.accept_many([1, 2]);
        assert!(m.is_accepting());
    }

    #[test]
    fn stops_reading_after_rejection() {
        let nfa = eq(1).compile_accepting().unwrap();
        let mut read = 0;
        let input = [3, 1, 1, 1].into_iter().inspect(|_| read += 1);
        assert!(!nfa.is_match(input));
        assert_eq!(read, 1);
    }

    #[test]
    fn nothing_accepting_rejects_everything() {
        let nfa = Expression::star(eq(1)).compile().unwrap();
        assert!(!nfa.is_match(Vec::<i32>::new()));
        assert!(!nfa.is_match([1]));
        assert!(!nfa.is_match([1, 1, 1]));
    }

    #[test]
    fn inner_accepting_state() {
        // accept after the first element of `1 2`
        let mut nfa = Expression::concat(eq(1), eq(2)).compile().unwrap();
        let after_one = nfa
            .states()
            .iter()
            .position(|s| s.epsilon_targets().count() == 1)
            .unwrap();
        nfa.mark_accepting(after_one);

        assert!(nfa.is_match([1]));
        assert!(!nfa.is_match([1, 2]));
    }
}
