use crate::predicate::Predicate;
use crate::StateSet;
use std::fmt::{Debug, Formatter};

/// Index of a [`State`] in the arena of an [`Nfa`].
pub type StateId = usize;

/// What a [`Transition`] needs to be taken.
pub enum Label<T> {
    /// Taken without consuming input.
    Epsilon,
    /// Consumes one element, and is only taken if the predicate holds for it.
    OnPredicate(Predicate<T>),
}

impl<T> Label<T> {
    /// Returns true for [`Label::Epsilon`].
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// The predicate guarding this label, if it is not an epsilon.
    pub fn predicate(&self) -> Option<&Predicate<T>> {
        match self {
            Label::Epsilon => None,
            Label::OnPredicate(p) => Some(p),
        }
    }
}

impl<T> Clone for Label<T> {
    fn clone(&self) -> Self {
        match self {
            Label::Epsilon => Label::Epsilon,
            Label::OnPredicate(p) => Label::OnPredicate(p.clone()),
        }
    }
}

impl<T> Debug for Label<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Epsilon => write!(f, "ε"),
            Label::OnPredicate(p) => write!(f, "{p:?}"),
        }
    }
}

/// A directed edge in an [`Nfa`].
pub struct Transition<T> {
    label: Label<T>,
    target: StateId,
}

impl<T> Transition<T> {
    pub(crate) fn new(label: Label<T>, target: StateId) -> Self {
        Self { label, target }
    }

    /// What this edge requires.
    pub fn label(&self) -> &Label<T> {
        &self.label
    }

    /// The state this edge leads to.
    pub fn target(&self) -> StateId {
        self.target
    }

    /// Returns true if following this edge consumes no input.
    pub fn is_epsilon(&self) -> bool {
        self.label.is_epsilon()
    }
}

impl<T> Debug for Transition<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "--{:?}--> {}", self.label, self.target)
    }
}

/// A node of the automaton.
///
/// Many transitions may lead to the same state, and repetition introduces cycles,
/// so states refer to each other only by [`StateId`].
pub struct State<T> {
    accept: bool,
    transitions: Vec<Transition<T>>,
}

impl<T> State<T> {
    pub(crate) fn new() -> Self {
        Self {
            accept: false,
            transitions: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, transition: Transition<T>) {
        self.transitions.push(transition);
    }

    /// Returns true if the input may end in this state.
    pub fn is_accepting(&self) -> bool {
        self.accept
    }

    /// Outgoing edges, in the order the compiler added them.
    pub fn transitions(&self) -> &[Transition<T>] {
        &self.transitions
    }

    /// Targets of the outgoing epsilon edges.
    pub fn epsilon_targets(&self) -> impl Iterator<Item = StateId> + '_ {
        self.transitions
            .iter()
            .filter(|t| t.is_epsilon())
            .map(Transition::target)
    }

    /// Outgoing edges that consume an element, with their predicate.
    pub fn predicate_transitions(&self) -> impl Iterator<Item = (&Predicate<T>, StateId)> + '_ {
        self.transitions
            .iter()
            .filter_map(|t| t.label.predicate().map(|p| (p, t.target)))
    }
}

impl<T> Debug for State<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("accept", &self.accept)
            .field("transitions", &self.transitions)
            .finish()
    }
}

/// The entry and exit of a compiled (sub-)expression.
///
/// The compiler never marks `end` as accepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// A compiled expression: an arena of [`State`]s and the [`Fragment`] of the whole expression.
///
/// Freshly compiled automata accept nothing. Mark a state as accepting, usually
/// [`Nfa::end`], before matching.
pub struct Nfa<T> {
    states: Vec<State<T>>,
    fragment: Fragment,
}

impl<T> Nfa<T> {
    pub(crate) fn from_parts(states: Vec<State<T>>, fragment: Fragment) -> Self {
        Self { states, fragment }
    }

    /// All states, indexed by [`StateId`].
    pub fn states(&self) -> &[State<T>] {
        &self.states
    }

    /// Looks up a state. `None` if `id` is not part of this automaton.
    pub fn state(&self, id: StateId) -> Option<&State<T>> {
        self.states.get(id)
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: every compiled automaton has at least a start and an end state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Start and end of the whole expression.
    pub fn fragment(&self) -> Fragment {
        self.fragment
    }

    /// Where matching begins.
    pub fn start(&self) -> StateId {
        self.fragment.start
    }

    /// The exit of the top-level fragment.
    pub fn end(&self) -> StateId {
        self.fragment.end
    }

    /// Sets whether input may end in state `id`.
    ///
    /// Returns false, and changes nothing, if `id` is not part of this automaton.
    pub fn set_accept(&mut self, id: StateId, accept: bool) -> bool {
        match self.states.get_mut(id) {
            Some(state) => {
                state.accept = accept;
                true
            }
            None => false,
        }
    }

    /// Marks state `id` as accepting. See [`Nfa::set_accept`].
    pub fn mark_accepting(&mut self, id: StateId) -> bool {
        self.set_accept(id, true)
    }

    /// Ids of all accepting states, in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_accepting())
            .map(|(id, _)| id)
    }

    /// Returns true if any state in `states` is accepting.
    pub fn is_accepting(&self, states: &StateSet) -> bool {
        states
            .iter()
            .any(|id| self.state(id).is_some_and(State::is_accepting))
    }

    /// All states reachable from `from` over any kind of edge, including `from` itself.
    pub fn reachable_from(&self, from: StateId) -> StateSet {
        let mut reachable = StateSet::new(self.len());
        reachable.insert(from);

        let mut index = 0;
        while let Some(id) = reachable.get(index) {
            for transition in self.state(id).map(State::transitions).unwrap_or_default() {
                reachable.insert(transition.target());
            }
            index += 1;
        }

        reachable
    }
}

impl<T> Debug for Nfa<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nfa")
            .field("fragment", &self.fragment)
            .field("states", &self.states)
            .finish()
    }
}
