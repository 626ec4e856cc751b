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
//! # Determinization
//!
//! Converts an NFA into an equivalent DFA with the subset construction. Each DFA state is a
//! `State::Composite` standing for the set of NFA states the automaton could be in, starting
//! from the epsilon closure of the NFA's initial state; the composite's set identity — never a
//! generated name — is what decides whether a subset has been seen before.
//!
//! The worklist is processed first-in first-out, which fixes the order display names are
//! handed out in but has no bearing on the accepted language. Callers that need presentable
//! state names (the descriptor writer, for instance) can ask for the named variant, which
//! renames every composite to `D0, D1, …` in first-sight order.
//!

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::debug;

use crate::automaton::{Dfa, Nfa, State};

///
/// Performs the subset construction for one NFA
///
/// Owns the worklist and the lazily-populated map from composite identity to display name;
/// both live only as long as one conversion.
///
pub struct Determinizer<'a> {
    /// The automaton being determinized
    nfa: &'a Nfa,

    /// Display names, assigned to each composite state the first time its subset is seen
    names: HashMap<State, String>,
}

impl<'a> Determinizer<'a> {
    ///
    /// Creates a determinizer for an NFA
    ///
    pub fn new(nfa: &'a Nfa) -> Determinizer<'a> {
        Determinizer { nfa: nfa, names: HashMap::new() }
    }

    /// Assigns the next display name to a newly-discovered composite state
    fn name(&mut self, state: &State) {
        let name = format!("D{}", self.names.len());
        self.names.insert(state.clone(), name);
    }

    ///
    /// Runs the subset construction, producing a DFA whose states are composites
    ///
    pub fn determinize(mut self) -> Dfa {
        self.run().0
    }

    ///
    /// Runs the subset construction and renames the composite states to `D0, D1, …`
    ///
    /// Names follow first-sight order, so they are stable for a given NFA, but they are a
    /// display convenience only: nothing about the accepted language depends on them.
    ///
    pub fn determinize_named(mut self) -> Dfa {
        let (dfa, names) = self.run();

        let renamed = |state: &State| State::atomic(names[state].clone());

        let mut result = Dfa::new(dfa.alphabet().iter().cloned(), renamed(dfa.initial()));
        for state in dfa.states() {
            result.add_state(renamed(state));
        }
        for (from, symbol, to) in dfa.transitions() {
            result.add_transition(renamed(from), symbol, renamed(to));
        }
        for state in dfa.finals() {
            result.mark_final(renamed(state));
        }

        result
    }

    /// The construction proper; returns the DFA plus the display-name map
    fn run(&mut self) -> (Dfa, HashMap<State, String>) {
        let mut start_set = BTreeSet::new();
        start_set.insert(self.nfa.initial().clone());
        let start_set = self.nfa.epsilon_closure(&start_set);

        let start = State::from_states(&start_set);
        self.name(&start);

        let mut dfa = Dfa::new(self.nfa.alphabet().iter().cloned(), start.clone());
        if !start_set.is_disjoint(self.nfa.finals()) {
            dfa.mark_final(start.clone());
        }

        let mut seen: BTreeSet<State> = BTreeSet::new();
        seen.insert(start.clone());

        let mut worklist: VecDeque<(BTreeSet<State>, State)> = VecDeque::new();
        worklist.push_back((start_set, start));

        // The declared alphabet is authoritative here; it cannot contain epsilon, which only
        // exists as the `None` transition label
        let alphabet: Vec<char> = self.nfa.alphabet().iter().cloned().collect();

        while let Some((current_set, current)) = worklist.pop_front() {
            for &symbol in &alphabet {
                let moved = self.nfa.move_set(&current_set, symbol);
                if moved.is_empty() {
                    // Implicit reject: the DFA simply has no transition for this pair
                    continue;
                }

                let closure = self.nfa.epsilon_closure(&moved);
                let target  = State::from_states(&closure);

                if seen.insert(target.clone()) {
                    self.name(&target);
                    if !closure.is_disjoint(self.nfa.finals()) {
                        dfa.mark_final(target.clone());
                    }
                    worklist.push_back((closure, target.clone()));
                }

                dfa.add_transition(current.clone(), symbol, target);
            }
        }

        debug!(states = dfa.states().len(), "subset construction complete");
        (dfa, std::mem::take(&mut self.names))
    }
}

///
/// Converts an NFA into an equivalent DFA whose states are composite subsets
///
pub fn nfa_to_dfa(nfa: &Nfa) -> Dfa {
    Determinizer::new(nfa).determinize()
}

///
/// Converts an NFA into an equivalent DFA with generated `D0, D1, …` state names
///
pub fn nfa_to_named_dfa(nfa: &Nfa) -> Dfa {
    Determinizer::new(nfa).determinize_named()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::thompson::regex_to_nfa;

    fn probes() -> Vec<String> {
        // Every string over {a, b} up to length 4, including the empty string
        let mut probes = vec![String::new()];
        let mut last   = vec![String::new()];

        for _ in 0..4 {
            let mut next = vec![];
            for probe in &last {
                for symbol in ['a', 'b'] {
                    let mut extended = probe.clone();
                    extended.push(symbol);
                    next.push(extended);
                }
            }
            probes.extend(next.iter().cloned());
            last = next;
        }

        probes
    }

    #[test]
    fn dfa_accepts_the_same_language() {
        let nfa = regex_to_nfa("a(a|b)*b", ['a', 'b']).unwrap();
        let dfa = nfa_to_dfa(&nfa);

        for probe in probes() {
            assert!(nfa.accepts(&probe) == dfa.accepts(&probe), "disagree on '{}'", probe);
        }
    }

    #[test]
    fn named_dfa_accepts_the_same_language() {
        let nfa = regex_to_nfa("a*b|ba", ['a', 'b']).unwrap();
        let dfa = nfa_to_named_dfa(&nfa);

        for probe in probes() {
            assert!(nfa.accepts(&probe) == dfa.accepts(&probe), "disagree on '{}'", probe);
        }
    }

    #[test]
    fn produced_dfa_is_well_formed() {
        let nfa = regex_to_nfa("a(a|b)*b", ['a', 'b']).unwrap();

        assert!(nfa_to_dfa(&nfa).is_well_formed());
        assert!(nfa_to_named_dfa(&nfa).is_well_formed());
    }

    #[test]
    fn composite_states_are_subsets_of_nfa_states() {
        let nfa = regex_to_nfa("ab", ['a', 'b']).unwrap();
        let dfa = nfa_to_dfa(&nfa);

        let nfa_labels: Vec<String> = nfa.states().iter().map(|state| state.label()).collect();

        for state in dfa.states() {
            let members = state.members().expect("subset construction must produce composites");
            assert!(members.iter().all(|member| nfa_labels.contains(member)));
        }
    }

    #[test]
    fn unreachable_nfa_state_reaches_no_composite() {
        let mut nfa = regex_to_nfa("a", ['a', 'b']).unwrap();

        // An island state with transitions of its own, not reachable from the initial state
        nfa.add_transition(State::atomic("island"), Some('b'), State::atomic("island"));

        let dfa = nfa_to_dfa(&nfa);

        for state in dfa.states() {
            let members = state.members().unwrap();
            assert!(!members.contains(&"island".to_string()));
        }
    }

    #[test]
    fn names_map_one_to_one() {
        let nfa = regex_to_nfa("a(a|b)*b", ['a', 'b']).unwrap();
        let dfa = nfa_to_named_dfa(&nfa);

        let names: BTreeSet<&State> = dfa.states().iter().collect();
        assert!(names.len() == dfa.states().len());
        assert!(dfa.states().iter().all(|state| state.members().is_none()));
    }
}
