//! Sets of automaton states and their epsilon-closure.

use crate::nfa::{Nfa, State, StateId};
use std::fmt::{Debug, Formatter};

/// A duplicate-free set of [`StateId`]s of one automaton.
///
/// Membership is a dense bitmap over the automaton's arena; the members are also kept
/// in insertion order, which doubles as the work list of the closure computation.
/// Ids outside the arena are never members.
#[derive(Clone)]
pub struct StateSet {
    members: Vec<bool>,
    order: Vec<StateId>,
}

impl StateSet {
    /// An empty set for an automaton with `size` states.
    pub fn new(size: usize) -> Self {
        Self {
            members: vec![false; size],
            order: Vec::new(),
        }
    }

    /// Adds `id`. Returns true if it was not yet a member.
    pub fn insert(&mut self, id: StateId) -> bool {
        match self.members.get_mut(id) {
            Some(member @ false) => {
                *member = true;
                self.order.push(id);
                true
            }
            _ => false,
        }
    }

    /// Returns true if `id` is a member.
    pub fn contains(&self, id: StateId) -> bool {
        self.members.get(id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The `index`-th member in insertion order.
    pub fn get(&self, index: usize) -> Option<StateId> {
        self.order.get(index).copied()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.order.iter().copied()
    }

    /// Removes all members, in time proportional to the number of members.
    pub fn clear(&mut self) {
        for id in self.order.drain(..) {
            self.members[id] = false;
        }
    }

    /// Members in ascending order.
    pub fn to_sorted_vec(&self) -> Vec<StateId> {
        let mut ids = self.order.clone();
        ids.sort_unstable();
        ids
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|id| other.contains(id))
    }
}

impl Eq for StateSet {}

impl Debug for StateSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.to_sorted_vec()).finish()
    }
}

impl<T> Nfa<T> {
    /// An empty [`StateSet`] sized for this automaton.
    pub fn empty_set(&self) -> StateSet {
        StateSet::new(self.len())
    }

    /// The epsilon-closure of `states`: every state reachable from one of them over
    /// zero or more epsilon edges.
    pub fn epsilon_closure(&self, states: impl IntoIterator<Item = StateId>) -> StateSet {
        let mut closure = self.empty_set();
        for id in states {
            closure.insert(id);
        }
        self.close(&mut closure);
        closure
    }

    /// Extends `states` to its epsilon-closure, in place.
    ///
    /// Members are visited in insertion order, and every newly found state is appended,
    /// so the loop ends once a full pass over the members discovers nothing new.
    /// The set only grows and is bounded by the arena, so cycles terminate.
    pub fn close(&self, states: &mut StateSet) {
        let mut index = 0;
        while let Some(id) = states.get(index) {
            for target in self.state(id).into_iter().flat_map(State::epsilon_targets) {
                states.insert(target);
            }
            index += 1;
        }
    }
}
