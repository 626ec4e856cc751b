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
//! # Thompson's construction
//!
//! The back half of the regular expression compiler: consumes the postfix token stream produced
//! by the `regular_expression` module and assembles an NFA from it. Construction works over an
//! operand stack of fragments, where a fragment is a (start, end) pair of states wired up so
//! that every path from start to end matches the sub-expression it was built from.
//!
//! Fragment states live in a single growable arena and refer to one another by index, which
//! sidesteps the ownership questions a graph of cross-referencing nodes would otherwise raise.
//! Once the last token is consumed the arena may contain states that no longer participate in
//! the result (nothing links to them), so a final breadth-first pass from the root collects
//! the reachable subset and assigns the stable `q0, q1, …` labels of the finished automaton.
//!

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use tracing::trace;

use crate::automaton::{Nfa, State};
use crate::error::Error;
use crate::regular_expression::{insert_concatenation, to_postfix, Token};

/// A state under construction: symbol transitions plus epsilon transitions, by arena index
#[derive(Clone, Debug, Default)]
struct FragmentState {
    transitions: BTreeMap<char, BTreeSet<usize>>,
    epsilon: BTreeSet<usize>,
}

/// A sub-automaton with one entry and one exit state
#[derive(Clone, Copy, Debug)]
struct Fragment {
    start: usize,
    end: usize,
}

/// Arena of every state allocated during one construction run
#[derive(Debug, Default)]
struct Arena {
    states: Vec<FragmentState>,
}

impl Arena {
    /// Allocates a fresh state and returns its index
    fn alloc(&mut self) -> usize {
        self.states.push(FragmentState::default());
        self.states.len() - 1
    }

    fn add_symbol(&mut self, from: usize, symbol: char, to: usize) {
        self.states[from].transitions.entry(symbol).or_insert_with(BTreeSet::new).insert(to);
    }

    fn add_epsilon(&mut self, from: usize, to: usize) {
        self.states[from].epsilon.insert(to);
    }
}

///
/// Compiles a regular expression into an equivalent NFA using Thompson's construction
///
/// The expression may use alternation (`|`), the Kleene star (`*`), parentheses and
/// concatenation by juxtaposition; the alphabet decides which characters are symbols. The
/// resulting NFA has a single accepting state and its states are labelled `q0, q1, …` in
/// breadth-first order from the initial state.
///
pub fn regex_to_nfa<I: IntoIterator<Item = char>>(expression: &str, alphabet: I) -> Result<Nfa, Error> {
    let alphabet: BTreeSet<char> = alphabet.into_iter().collect();

    let explicit = insert_concatenation(expression, &alphabet);
    let postfix  = to_postfix(&explicit, &alphabet)?;
    trace!(?postfix, expression, "compiled expression to postfix");

    let mut arena = Arena::default();
    let mut stack: Vec<Fragment> = vec![];

    for token in postfix {
        match token {
            Token::Symbol(symbol) => {
                let start = arena.alloc();
                let end   = arena.alloc();
                arena.add_symbol(start, symbol, end);

                stack.push(Fragment { start: start, end: end });
            }

            Token::Star => {
                let inner = stack.pop().ok_or(Error::MalformedExpression)?;
                let start = arena.alloc();
                let end   = arena.alloc();

                // Skip the body entirely, or loop back through it any number of times
                arena.add_epsilon(start, inner.start);
                arena.add_epsilon(start, end);
                arena.add_epsilon(inner.end, inner.start);
                arena.add_epsilon(inner.end, end);

                stack.push(Fragment { start: start, end: end });
            }

            Token::Concat => {
                let right = stack.pop().ok_or(Error::MalformedExpression)?;
                let left  = stack.pop().ok_or(Error::MalformedExpression)?;

                arena.add_epsilon(left.end, right.start);

                stack.push(Fragment { start: left.start, end: right.end });
            }

            Token::Union => {
                let second = stack.pop().ok_or(Error::MalformedExpression)?;
                let first  = stack.pop().ok_or(Error::MalformedExpression)?;
                let start  = arena.alloc();
                let end    = arena.alloc();

                arena.add_epsilon(start, first.start);
                arena.add_epsilon(start, second.start);
                arena.add_epsilon(first.end, end);
                arena.add_epsilon(second.end, end);

                stack.push(Fragment { start: start, end: end });
            }
        }
    }

    // Exactly one fragment must remain: it is the whole expression
    let root = stack.pop().ok_or(Error::MalformedExpression)?;
    if !stack.is_empty() {
        return Err(Error::MalformedExpression);
    }

    Ok(collect(&arena, root, alphabet))
}

///
/// Collects the states reachable from a fragment into a finished NFA
///
/// Walks forward over symbol and epsilon edges from the fragment's start, labelling each state
/// the first time it is seen. States the construction abandoned along the way are simply never
/// visited, so they do not appear in the result.
///
fn collect(arena: &Arena, root: Fragment, alphabet: BTreeSet<char>) -> Nfa {
    fn label_of(index: usize, labels: &mut HashMap<usize, State>, queue: &mut VecDeque<usize>) -> State {
        if let Some(existing) = labels.get(&index) {
            return existing.clone();
        }

        let state = State::atomic(format!("q{}", labels.len()));
        labels.insert(index, state.clone());
        queue.push_back(index);
        state
    }

    let mut labels: HashMap<usize, State> = HashMap::new();
    let mut queue: VecDeque<usize>        = VecDeque::new();

    let initial = label_of(root.start, &mut labels, &mut queue);
    let mut nfa = Nfa::new(alphabet, initial);

    while let Some(index) = queue.pop_front() {
        let from = labels[&index].clone();

        for (&symbol, targets) in &arena.states[index].transitions {
            for &target in targets {
                let to = label_of(target, &mut labels, &mut queue);
                nfa.add_transition(from.clone(), Some(symbol), to);
            }
        }

        for &target in &arena.states[index].epsilon {
            let to = label_of(target, &mut labels, &mut queue);
            nfa.add_transition(from.clone(), None, to);
        }
    }

    // The end of the root fragment is always reachable from its start, so its label exists
    nfa.mark_final(labels[&root.end].clone());
    trace!(states = nfa.states().len(), "collected reachable construction states");

    nfa
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_symbol_matches_itself_only() {
        let nfa = regex_to_nfa("a", ['a', 'b']).unwrap();

        assert!(nfa.accepts("a"));
        assert!(!nfa.accepts(""));
        assert!(!nfa.accepts("b"));
        assert!(!nfa.accepts("aa"));
    }

    #[test]
    fn star_matches_zero_or_more() {
        let nfa = regex_to_nfa("a*", ['a']).unwrap();

        assert!(nfa.accepts(""));
        assert!(nfa.accepts("a"));
        assert!(nfa.accepts("aaaa"));
    }

    #[test]
    fn union_matches_either_arm() {
        let nfa = regex_to_nfa("a|b", ['a', 'b']).unwrap();

        assert!(nfa.accepts("a"));
        assert!(nfa.accepts("b"));
        assert!(!nfa.accepts("ab"));
        assert!(!nfa.accepts(""));
    }

    #[test]
    fn concatenation_matches_in_order() {
        let nfa = regex_to_nfa("ab", ['a', 'b']).unwrap();

        assert!(nfa.accepts("ab"));
        assert!(!nfa.accepts("ba"));
        assert!(!nfa.accepts("a"));
    }

    #[test]
    fn construction_scenario_matches_specified_strings() {
        let nfa = regex_to_nfa("a(a|b)*b", ['a', 'b']).unwrap();

        assert!(nfa.accepts("ab"));
        assert!(nfa.accepts("aab"));
        assert!(nfa.accepts("aaab"));
        assert!(nfa.accepts("abbab"));

        assert!(!nfa.accepts("a"));
        assert!(!nfa.accepts("b"));
        assert!(!nfa.accepts("ba"));
    }

    #[test]
    fn single_accepting_state() {
        let nfa = regex_to_nfa("a(a|b)*b", ['a', 'b']).unwrap();

        assert!(nfa.finals().len() == 1);
        assert!(nfa.is_well_formed());
    }

    #[test]
    fn dangling_operator_is_malformed() {
        assert!(matches!(regex_to_nfa("a|", ['a', 'b']), Err(Error::MalformedExpression)));
        assert!(matches!(regex_to_nfa("*", ['a']), Err(Error::MalformedExpression)));
    }

    #[test]
    fn empty_expression_is_malformed() {
        assert!(matches!(regex_to_nfa("", ['a']), Err(Error::MalformedExpression)));
    }

    #[test]
    fn empty_alphabet_rejects_everything_in_expression() {
        assert!(matches!(
            regex_to_nfa("a", Vec::<char>::new()),
            Err(Error::UnrecognizedToken { token: 'a' })
        ));
    }
}
