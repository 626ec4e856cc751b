//
//   Copyright 2016 Andrew Hunter
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.
//

//!
//! # Automata
//!
//! The shared representation of finite automata used by every conversion in this library. An
//! automaton is a set of states over an alphabet of single-character symbols, a transition
//! relation, one initial state and a set of final states.
//!
//! An `Nfa` maps a state and an optional symbol to a *set* of destinations — `None` is an
//! epsilon transition, which consumes no input. A `Dfa` maps a state and a symbol to *at most
//! one* destination and has no epsilon transitions at all; a missing entry is an implicit
//! reject. Both are plain data plus the two derived functions the conversions share:
//! `epsilon_closure` and `move_set`.
//!

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_derive::{Deserialize, Serialize};

///
/// Identifies a state in an automaton
///
/// Atomic states come from Thompson's construction or from a descriptor, and their identity is
/// just their label. Composite states are produced by the subset construction: their identity
/// is the set of atomic states they represent, held as a sorted, deduplicated vector so that
/// equal subsets compare equal however they were discovered. Generated display names are a
/// separate concern (see the `determinize` module); they are never part of a state's identity.
///
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum State {
    /// A state identified by a simple label
    Atomic(String),

    /// A state identified by the sorted set of atomic labels it represents
    Composite(Vec<String>),
}

impl State {
    ///
    /// Creates an atomic state with a particular label
    ///
    pub fn atomic<S: Into<String>>(label: S) -> State {
        State::Atomic(label.into())
    }

    ///
    /// Creates a composite state from the labels of a set of underlying states
    ///
    /// The labels are sorted and deduplicated, so two subsets that contain the same states
    /// produce equal composites regardless of the order they are supplied in.
    ///
    pub fn composite<I: IntoIterator<Item = String>>(labels: I) -> State {
        let mut labels: Vec<String> = labels.into_iter().collect();
        labels.sort();
        labels.dedup();

        State::Composite(labels)
    }

    ///
    /// Creates a composite state representing a set of existing states
    ///
    pub fn from_states<'a, I: IntoIterator<Item = &'a State>>(states: I) -> State {
        State::composite(states.into_iter().map(|state| state.label()))
    }

    ///
    /// Returns the display label for this state
    ///
    pub fn label(&self) -> String {
        match self {
            State::Atomic(label)     => label.clone(),
            State::Composite(labels) => format!("{{{}}}", labels.join(",")),
        }
    }

    ///
    /// For a composite state, the labels of the atomic states it represents
    ///
    pub fn members(&self) -> Option<&[String]> {
        match self {
            State::Atomic(_)         => None,
            State::Composite(labels) => Some(labels),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.label())
    }
}

///
/// A non-deterministic finite automaton
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nfa {
    /// Every state in the automaton
    states: BTreeSet<State>,

    /// The declared alphabet (epsilon is not a member: it is represented by `None` labels)
    alphabet: BTreeSet<char>,

    /// Maps a source state to its transitions; `None` labels an epsilon transition
    transitions: BTreeMap<State, BTreeMap<Option<char>, BTreeSet<State>>>,

    /// The state the automaton starts in
    initial: State,

    /// The accepting states
    finals: BTreeSet<State>,
}

impl Nfa {
    ///
    /// Creates a new NFA over an alphabet, containing only its initial state
    ///
    pub fn new<I: IntoIterator<Item = char>>(alphabet: I, initial: State) -> Nfa {
        let mut states = BTreeSet::new();
        states.insert(initial.clone());

        Nfa {
            states:      states,
            alphabet:    alphabet.into_iter().collect(),
            transitions: BTreeMap::new(),
            initial:     initial,
            finals:      BTreeSet::new(),
        }
    }

    ///
    /// Ensures that a state exists in this automaton
    ///
    pub fn add_state(&mut self, state: State) {
        self.states.insert(state);
    }

    ///
    /// Adds a transition on a symbol, or on epsilon when the symbol is `None`
    ///
    /// Both endpoints are added to the state set if they are not already present, so the
    /// invariant that every transition endpoint is a known state holds by construction.
    ///
    pub fn add_transition(&mut self, from: State, on: Option<char>, to: State) {
        self.states.insert(from.clone());
        self.states.insert(to.clone());

        self.transitions
            .entry(from)
            .or_insert_with(BTreeMap::new)
            .entry(on)
            .or_insert_with(BTreeSet::new)
            .insert(to);
    }

    ///
    /// Marks a state as accepting
    ///
    pub fn mark_final(&mut self, state: State) {
        self.states.insert(state.clone());
        self.finals.insert(state);
    }

    ///
    /// The states of this automaton
    ///
    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    ///
    /// The declared alphabet of this automaton
    ///
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    ///
    /// The initial state
    ///
    pub fn initial(&self) -> &State {
        &self.initial
    }

    ///
    /// The accepting states
    ///
    pub fn finals(&self) -> &BTreeSet<State> {
        &self.finals
    }

    ///
    /// The destinations reachable from one state on one label, if any
    ///
    pub fn targets(&self, state: &State, on: Option<char>) -> Option<&BTreeSet<State>> {
        self.transitions.get(state).and_then(|map| map.get(&on))
    }

    ///
    /// Iterates over every (source, label, destination) triple in this automaton
    ///
    pub fn transitions(&self) -> impl Iterator<Item = (&State, Option<char>, &State)> {
        self.transitions.iter().flat_map(|(from, by_label)| {
            by_label.iter().flat_map(move |(label, targets)| {
                targets.iter().map(move |to| (from, *label, to))
            })
        })
    }

    ///
    /// Computes the set of states reachable from a set via zero or more epsilon transitions
    ///
    /// This is a worklist traversal: every input state is pushed, and any state newly
    /// discovered along an epsilon edge is pushed in turn. Each state enters the closure at
    /// most once, so the traversal terminates, and applying the closure to its own result
    /// changes nothing.
    ///
    pub fn epsilon_closure(&self, states: &BTreeSet<State>) -> BTreeSet<State> {
        let mut closure: BTreeSet<State> = states.clone();
        let mut stack: Vec<State>        = states.iter().cloned().collect();

        while let Some(state) = stack.pop() {
            if let Some(targets) = self.targets(&state, None) {
                for target in targets {
                    if closure.insert(target.clone()) {
                        stack.push(target.clone());
                    }
                }
            }
        }

        closure
    }

    ///
    /// Computes the union of the symbol successors of a set of states
    ///
    /// Epsilon transitions are not followed; the result is empty when no state in the set has
    /// a transition on the symbol.
    ///
    pub fn move_set(&self, states: &BTreeSet<State>, symbol: char) -> BTreeSet<State> {
        let mut result = BTreeSet::new();

        for state in states {
            if let Some(targets) = self.targets(state, Some(symbol)) {
                result.extend(targets.iter().cloned());
            }
        }

        result
    }

    ///
    /// Simulates this automaton on an input string and reports whether it accepts it
    ///
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = BTreeSet::new();
        current.insert(self.initial.clone());
        current = self.epsilon_closure(&current);

        for symbol in input.chars() {
            let moved = self.move_set(&current, symbol);
            if moved.is_empty() {
                return false;
            }
            current = self.epsilon_closure(&moved);
        }

        current.iter().any(|state| self.finals.contains(state))
    }

    ///
    /// True if this automaton satisfies the structural invariants
    ///
    /// The initial state and every final state must be members of the state set, as must every
    /// transition endpoint. `add_transition` maintains these by construction; this check exists
    /// for automata assembled elsewhere (descriptors in particular).
    ///
    pub fn is_well_formed(&self) -> bool {
        if !self.states.contains(&self.initial) {
            return false;
        }

        if !self.finals.is_subset(&self.states) {
            return false;
        }

        self.transitions().all(|(from, _, to)| self.states.contains(from) && self.states.contains(to))
    }
}

///
/// A deterministic finite automaton
///
/// The transition function is partial: a (state, symbol) pair with no entry is an implicit
/// reject, not a transition to some padding error state. Epsilon transitions cannot be
/// represented at all.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dfa {
    /// Every state in the automaton
    states: BTreeSet<State>,

    /// The declared alphabet
    alphabet: BTreeSet<char>,

    /// Maps a source state and symbol to the single destination
    transitions: BTreeMap<State, BTreeMap<char, State>>,

    /// The state the automaton starts in
    initial: State,

    /// The accepting states
    finals: BTreeSet<State>,
}

impl Dfa {
    ///
    /// Creates a new DFA over an alphabet, containing only its initial state
    ///
    pub fn new<I: IntoIterator<Item = char>>(alphabet: I, initial: State) -> Dfa {
        let mut states = BTreeSet::new();
        states.insert(initial.clone());

        Dfa {
            states:      states,
            alphabet:    alphabet.into_iter().collect(),
            transitions: BTreeMap::new(),
            initial:     initial,
            finals:      BTreeSet::new(),
        }
    }

    ///
    /// Ensures that a state exists in this automaton
    ///
    pub fn add_state(&mut self, state: State) {
        self.states.insert(state);
    }

    ///
    /// Adds a transition on a symbol, replacing any existing transition on the same pair
    ///
    pub fn add_transition(&mut self, from: State, on: char, to: State) {
        self.states.insert(from.clone());
        self.states.insert(to.clone());

        self.transitions
            .entry(from)
            .or_insert_with(BTreeMap::new)
            .insert(on, to);
    }

    ///
    /// Marks a state as accepting
    ///
    pub fn mark_final(&mut self, state: State) {
        self.states.insert(state.clone());
        self.finals.insert(state);
    }

    ///
    /// The states of this automaton
    ///
    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    ///
    /// The declared alphabet of this automaton
    ///
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    ///
    /// The initial state
    ///
    pub fn initial(&self) -> &State {
        &self.initial
    }

    ///
    /// The accepting states
    ///
    pub fn finals(&self) -> &BTreeSet<State> {
        &self.finals
    }

    ///
    /// The destination for one state and symbol, if there is one
    ///
    pub fn transition(&self, state: &State, on: char) -> Option<&State> {
        self.transitions.get(state).and_then(|map| map.get(&on))
    }

    ///
    /// Iterates over every (source, symbol, destination) triple in this automaton
    ///
    pub fn transitions(&self) -> impl Iterator<Item = (&State, char, &State)> {
        self.transitions.iter().flat_map(|(from, by_symbol)| {
            by_symbol.iter().map(move |(symbol, to)| (from, *symbol, to))
        })
    }

    ///
    /// Runs this automaton on an input string and reports whether it accepts it
    ///
    /// A missing transition rejects immediately.
    ///
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = &self.initial;

        for symbol in input.chars() {
            match self.transition(current, symbol) {
                Some(next) => current = next,
                None       => return false,
            }
        }

        self.finals.contains(current)
    }

    ///
    /// True if this automaton satisfies the structural invariants
    ///
    /// Epsilon transitions and duplicate destinations are unrepresentable in the transition
    /// map, so only the state-membership invariants need checking.
    ///
    pub fn is_well_formed(&self) -> bool {
        if !self.states.contains(&self.initial) {
            return false;
        }

        if !self.finals.is_subset(&self.states) {
            return false;
        }

        self.transitions().all(|(from, _, to)| self.states.contains(from) && self.states.contains(to))
    }
}
