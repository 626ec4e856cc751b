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
//! # State elimination
//!
//! Converts a DFA into a regular expression by building a generalized transition graph and
//! removing its interior one state at a time. The graph has a node for every DFA state plus a
//! synthetic `start` and `accept` node, and its edges carry *sets of expression terms* rather
//! than symbols: an edge's language is the union of its terms, and the empty string stands for
//! epsilon. Removing a node `k` folds every path `i → k → j` (with `k`'s self-loop starred in
//! the middle) into a new term on the edge `i → j`.
//!
//! Every DFA-origin node is eliminated, the initial and final states included; only the two
//! synthetic nodes survive. The result is the label on `start → accept`, rendered as a
//! `|`-joined union in sorted order. No edge there at all means the automaton accepts nothing,
//! which is reported as `Language::Empty` — distinct from the empty *string*, which means the
//! automaton accepts only epsilon.
//!
//! Elimination order never changes the language described, only the spelling of the result.
//! Interior states go first and the initial state last, which lets self-loops fold into starred
//! terms before the synthetic epsilon edges can smear them into separate alternatives.
//!

use std::collections::BTreeSet;
use std::fmt;

use tracing::trace;

use crate::automaton::{Dfa, State};

///
/// The result of eliminating a DFA down to a single expression
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Language {
    /// The automaton accepts no string at all; there is no expression for this in the
    /// operator set this library supports, so it is reported as a sentinel
    Empty,

    /// An expression for the accepted language; the empty string denotes epsilon-only
    /// acceptance
    Expression(String),
}

impl Language {
    ///
    /// The expression for this language, if there is one
    ///
    pub fn as_expression(&self) -> Option<&str> {
        match self {
            Language::Empty              => None,
            Language::Expression(regex)  => Some(regex),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Language::Empty             => write!(formatter, "∅"),
            Language::Expression(regex) => write!(formatter, "{}", regex),
        }
    }
}

///
/// The generalized transition graph the eliminator works on
///
/// Nodes are indices: `0..n` are the DFA's states in sorted order, `n` is `start` and `n+1` is
/// `accept`. The label matrix is owned by the conversion and mutated in place as nodes are
/// removed; it never outlives the `dfa_to_re` call that created it.
///
struct Gnfa {
    nodes: usize,
    start: usize,
    accept: usize,
    labels: Vec<Vec<BTreeSet<String>>>,
}

impl Gnfa {
    ///
    /// Builds the generalized graph for a DFA
    ///
    fn from_dfa(dfa: &Dfa) -> (Gnfa, Vec<State>) {
        let states: Vec<State> = dfa.states().iter().cloned().collect();
        let nodes  = states.len() + 2;
        let start  = states.len();
        let accept = states.len() + 1;

        let mut gnfa = Gnfa {
            nodes:  nodes,
            start:  start,
            accept: accept,
            labels: vec![vec![BTreeSet::new(); nodes]; nodes],
        };

        let index_of = |state: &State| states.iter().position(|known| known == state).unwrap();

        // Symbols sharing an edge union into one label set
        for (from, symbol, to) in dfa.transitions() {
            gnfa.labels[index_of(from)][index_of(to)].insert(symbol.to_string());
        }

        gnfa.labels[start][index_of(dfa.initial())].insert(String::new());
        for state in dfa.finals() {
            gnfa.labels[index_of(state)][accept].insert(String::new());
        }

        (gnfa, states)
    }

    ///
    /// Removes node `k`, folding every path through it into the surrounding edges
    ///
    fn eliminate(&mut self, k: usize) {
        let loop_term = star(&self.labels[k][k]);

        for i in 0..self.nodes {
            if i == k {
                continue;
            }

            let from_choices = operand_choices(&self.labels[i][k]);
            if from_choices.is_empty() {
                continue;
            }

            for j in 0..self.nodes {
                if j == k {
                    continue;
                }

                let to_choices = operand_choices(&self.labels[k][j]);

                for from in &from_choices {
                    for to in &to_choices {
                        let term = format!("{}{}{}", from, loop_term.as_deref().unwrap_or(""), to);
                        self.labels[i][j].insert(term);
                    }
                }
            }
        }

        // Delete every edge touching k
        for i in 0..self.nodes {
            self.labels[i][k].clear();
            self.labels[k][i].clear();
        }
    }
}

/// Renders a self-loop label as a starred group, ignoring epsilon members (epsilon* is epsilon)
fn star(label: &BTreeSet<String>) -> Option<String> {
    let terms: Vec<&str> = label.iter().filter(|term| !term.is_empty()).map(|term| term.as_str()).collect();

    if terms.is_empty() {
        None
    } else {
        Some(format!("({})*", terms.join("|")))
    }
}

///
/// Renders a label set as the operands it can contribute to a concatenation
///
/// An empty set means there is no edge, so there is nothing to contribute. Otherwise the
/// result is at most two choices: the empty string, when epsilon is a member, and the
/// remaining terms as a single operand — parenthesized when there is more than one, since a
/// bare union would bind wrongly inside a concatenation.
///
fn operand_choices(label: &BTreeSet<String>) -> Vec<String> {
    let mut choices = vec![];

    if label.contains("") {
        choices.push(String::new());
    }

    let terms: Vec<&str> = label.iter().filter(|term| !term.is_empty()).map(|term| term.as_str()).collect();
    match terms.len() {
        0 => {}
        1 => choices.push(terms[0].to_string()),
        _ => choices.push(format!("({})", terms.join("|"))),
    }

    choices
}

///
/// Converts a DFA into a regular expression for the language it accepts
///
/// The spelling of the result depends on elimination order and is not canonical; two
/// equivalent DFAs can produce different expressions for the same language. Compare languages,
/// not strings.
///
pub fn dfa_to_re(dfa: &Dfa) -> Language {
    let (mut gnfa, states) = Gnfa::from_dfa(dfa);

    // Interior states first, then finals, then the initial state
    let mut order: Vec<usize> = vec![];
    for (index, state) in states.iter().enumerate() {
        if state != dfa.initial() && !dfa.finals().contains(state) {
            order.push(index);
        }
    }
    for (index, state) in states.iter().enumerate() {
        if state != dfa.initial() && dfa.finals().contains(state) {
            order.push(index);
        }
    }
    if let Some(index) = states.iter().position(|state| state == dfa.initial()) {
        order.push(index);
    }

    for k in order {
        trace!(node = %states[k], "eliminating");
        gnfa.eliminate(k);
    }

    let result = &gnfa.labels[gnfa.start][gnfa.accept];
    if result.is_empty() {
        Language::Empty
    } else {
        let rendered: Vec<&str> = result.iter().map(|term| term.as_str()).collect();
        Language::Expression(rendered.join("|"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::automaton::Nfa;
    use crate::determinize::nfa_to_dfa;
    use crate::thompson::regex_to_nfa;

    fn even_as_dfa() -> Dfa {
        // q0 -a-> q1 -a-> q0, accepting q0: an even number of 'a's
        let mut dfa = Dfa::new(['a'], State::atomic("q0"));
        dfa.add_transition(State::atomic("q0"), 'a', State::atomic("q1"));
        dfa.add_transition(State::atomic("q1"), 'a', State::atomic("q0"));
        dfa.mark_final(State::atomic("q0"));

        dfa
    }

    #[test]
    fn even_as_scenario_pins_its_expression() {
        let language = dfa_to_re(&even_as_dfa());

        assert!(language == Language::Expression("(aa)*".to_string()));
    }

    #[test]
    fn even_as_expression_describes_the_language() {
        let language = dfa_to_re(&even_as_dfa());
        let reparsed = regex_to_nfa(language.as_expression().unwrap(), ['a']).unwrap();

        assert!(reparsed.accepts(""));
        assert!(reparsed.accepts("aa"));
        assert!(reparsed.accepts("aaaa"));
        assert!(!reparsed.accepts("a"));
        assert!(!reparsed.accepts("aaa"));
    }

    #[test]
    fn unreachable_final_state_means_empty_language() {
        let mut dfa = Dfa::new(['a'], State::atomic("q0"));
        dfa.add_transition(State::atomic("q0"), 'a', State::atomic("q0"));
        dfa.add_state(State::atomic("q1"));
        dfa.mark_final(State::atomic("q1"));

        assert!(dfa_to_re(&dfa) == Language::Empty);
    }

    #[test]
    fn no_final_state_means_empty_language() {
        let mut dfa = Dfa::new(['a'], State::atomic("q0"));
        dfa.add_transition(State::atomic("q0"), 'a', State::atomic("q0"));

        assert!(dfa_to_re(&dfa) == Language::Empty);
    }

    #[test]
    fn epsilon_only_language_is_the_empty_expression() {
        let mut dfa = Dfa::new(['a'], State::atomic("q0"));
        dfa.mark_final(State::atomic("q0"));

        assert!(dfa_to_re(&dfa) == Language::Expression(String::new()));
    }

    #[test]
    fn elimination_round_trips_through_the_compiler() {
        let nfa = regex_to_nfa("a(a|b)*b", ['a', 'b']).unwrap();
        let dfa = nfa_to_dfa(&nfa);

        let language = dfa_to_re(&dfa);
        let reparsed = regex_to_nfa(language.as_expression().unwrap(), ['a', 'b']).unwrap();
        let redone   = nfa_to_dfa(&reparsed);

        let mut probes = vec![String::new()];
        for a in ['a', 'b'] {
            for b in ['a', 'b'] {
                for c in ['a', 'b'] {
                    probes.push(format!("{}", a));
                    probes.push(format!("{}{}", a, b));
                    probes.push(format!("{}{}{}", a, b, c));
                }
            }
        }

        for probe in probes {
            assert!(dfa.accepts(&probe) == redone.accepts(&probe), "disagree on '{}'", probe);
        }
    }

    #[test]
    fn multiple_symbols_between_two_states_union_onto_one_edge() {
        // q0 moves to q1 on either symbol; q1 accepts
        let mut dfa = Dfa::new(['a', 'b'], State::atomic("q0"));
        dfa.add_transition(State::atomic("q0"), 'a', State::atomic("q1"));
        dfa.add_transition(State::atomic("q0"), 'b', State::atomic("q1"));
        dfa.mark_final(State::atomic("q1"));

        let language = dfa_to_re(&dfa);
        let reparsed = regex_to_nfa(language.as_expression().unwrap(), ['a', 'b']).unwrap();

        assert!(reparsed.accepts("a"));
        assert!(reparsed.accepts("b"));
        assert!(!reparsed.accepts(""));
        assert!(!reparsed.accepts("ab"));
    }

    #[test]
    fn gnfa_owns_nothing_after_the_call() {
        // The conversion is a pure function of the DFA: run it twice, get the same answer
        let dfa = even_as_dfa();

        assert!(dfa_to_re(&dfa) == dfa_to_re(&dfa));
    }

    #[test]
    fn elimination_handles_nfa_sourced_composites() {
        let nfa = {
            let mut nfa = Nfa::new(['a'], State::atomic("n0"));
            nfa.add_transition(State::atomic("n0"), None, State::atomic("n1"));
            nfa.add_transition(State::atomic("n1"), Some('a'), State::atomic("n2"));
            nfa.mark_final(State::atomic("n2"));
            nfa
        };

        let language = dfa_to_re(&nfa_to_dfa(&nfa));
        let reparsed = regex_to_nfa(language.as_expression().unwrap(), ['a']).unwrap();

        assert!(reparsed.accepts("a"));
        assert!(!reparsed.accepts(""));
        assert!(!reparsed.accepts("aa"));
    }
}
