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
//! # Descriptors
//!
//! The line-oriented text format automata and expressions are exchanged in. Blank lines and
//! lines starting with `#` are ignored everywhere. An automaton descriptor has four headers —
//! `alfabeto:`, `estados:`, `inicial:` and `finais:`, each followed by a comma-separated list
//! (a single token for `inicial:`) — then a line containing only `transicoes`, then one
//! `from,to,symbol` line per transition, where an empty symbol field denotes epsilon:
//!
//! ```text
//! alfabeto:a,b
//! estados:q0,q1
//! inicial:q0
//! finais:q1
//! transicoes
//! q0,q1,a
//! q1,q1,
//! ```
//!
//! An expression descriptor has just `alfabeto:` and `expressao:` headers. The declared
//! alphabet is authoritative: conversions iterate it as given, and a transition on a symbol
//! outside it is tolerated with a warning rather than rejected.
//!

use std::collections::BTreeSet;
use std::fmt::Write;

use tracing::warn;

use crate::automaton::{Dfa, Nfa, State};
use crate::error::Error;

/// Lines of a descriptor, with blanks and comments dropped
fn content_lines(source: &str) -> impl Iterator<Item = &str> {
    source
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Splits a comma-separated header list into trimmed entries
fn list_entries(list: &str) -> Vec<&str> {
    list.split(',').map(|entry| entry.trim()).filter(|entry| !entry.is_empty()).collect()
}

/// Reads a single-character alphabet entry
fn symbol_entry(entry: &str, line: &str) -> Result<char, Error> {
    let mut chars = entry.chars();

    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _                    => Err(Error::MalformedInput { line: line.to_string() }),
    }
}

///
/// Reads an automaton descriptor
///
/// The result is always an `Nfa`; a descriptor that happens to be deterministic can be fed to
/// the eliminator after determinization, which leaves it structurally unchanged. A transition
/// line without exactly three comma-separated fields is a fatal error.
///
pub fn parse_automaton(source: &str) -> Result<Nfa, Error> {
    let mut alphabet: BTreeSet<char> = BTreeSet::new();
    let mut states: Vec<String>      = vec![];
    let mut initial: Option<String>  = None;
    let mut finals: Vec<String>      = vec![];
    let mut transitions              = vec![];
    let mut reading_transitions      = false;

    for line in content_lines(source) {
        if line == "transicoes" {
            reading_transitions = true;
        } else if !reading_transitions {
            if let Some(list) = line.strip_prefix("alfabeto:") {
                for entry in list_entries(list) {
                    alphabet.insert(symbol_entry(entry, line)?);
                }
            } else if let Some(list) = line.strip_prefix("estados:") {
                states.extend(list_entries(list).into_iter().map(|entry| entry.to_string()));
            } else if let Some(token) = line.strip_prefix("inicial:") {
                initial = Some(token.trim().to_string());
            } else if let Some(list) = line.strip_prefix("finais:") {
                finals.extend(list_entries(list).into_iter().map(|entry| entry.to_string()));
            }
        } else {
            let fields: Vec<&str> = line.split(',').map(|field| field.trim()).collect();
            if fields.len() != 3 {
                return Err(Error::MalformedInput { line: line.to_string() });
            }

            let symbol = if fields[2].is_empty() {
                None
            } else {
                Some(symbol_entry(fields[2], line)?)
            };

            if let Some(symbol) = symbol {
                if !alphabet.contains(&symbol) {
                    warn!(%symbol, line, "transition on a symbol outside the declared alphabet");
                }
            }

            transitions.push((fields[0].to_string(), fields[1].to_string(), symbol));
        }
    }

    let initial = initial.ok_or(Error::MissingHeader { header: "inicial" })?;

    let mut nfa = Nfa::new(alphabet, State::atomic(initial));
    for state in states {
        nfa.add_state(State::atomic(state));
    }
    for (from, to, symbol) in transitions {
        nfa.add_transition(State::atomic(from), symbol, State::atomic(to));
    }
    for state in finals {
        nfa.mark_final(State::atomic(state));
    }

    Ok(nfa)
}

///
/// Reads an expression descriptor, returning the declared alphabet and the raw expression
///
pub fn parse_regex(source: &str) -> Result<(BTreeSet<char>, String), Error> {
    let mut alphabet: BTreeSet<char>   = BTreeSet::new();
    let mut expression: Option<String> = None;

    for line in content_lines(source) {
        if let Some(list) = line.strip_prefix("alfabeto:") {
            for entry in list_entries(list) {
                alphabet.insert(symbol_entry(entry, line)?);
            }
        } else if let Some(raw) = line.strip_prefix("expressao:") {
            expression = Some(raw.trim().to_string());
        }
    }

    let expression = expression.ok_or(Error::MissingHeader { header: "expressao" })?;

    Ok((alphabet, expression))
}

/// The four headers and the `transicoes` separator shared by both writers
fn write_headers(
    output: &mut String,
    alphabet: &BTreeSet<char>,
    states: Vec<String>,
    initial: String,
    finals: Vec<String>,
) {
    let alphabet: Vec<String> = alphabet.iter().map(|symbol| symbol.to_string()).collect();

    writeln!(output, "alfabeto:{}", alphabet.join(",")).unwrap();
    writeln!(output, "estados:{}", states.join(",")).unwrap();
    writeln!(output, "inicial:{}", initial).unwrap();
    writeln!(output, "finais:{}", finals.join(",")).unwrap();
    writeln!(output, "transicoes").unwrap();
}

///
/// Writes an NFA in descriptor form
///
/// A (state, symbol) pair with several destinations emits one line per destination, and an
/// epsilon transition leaves its symbol field empty.
///
pub fn write_nfa(nfa: &Nfa) -> String {
    let mut output = String::new();

    write_headers(
        &mut output,
        nfa.alphabet(),
        nfa.states().iter().map(|state| state.label()).collect(),
        nfa.initial().label(),
        nfa.finals().iter().map(|state| state.label()).collect(),
    );

    for (from, symbol, to) in nfa.transitions() {
        let symbol = symbol.map(|symbol| symbol.to_string()).unwrap_or_default();
        writeln!(output, "{},{},{}", from.label(), to.label(), symbol).unwrap();
    }

    output
}

///
/// Writes a DFA in descriptor form
///
pub fn write_dfa(dfa: &Dfa) -> String {
    let mut output = String::new();

    write_headers(
        &mut output,
        dfa.alphabet(),
        dfa.states().iter().map(|state| state.label()).collect(),
        dfa.initial().label(),
        dfa.finals().iter().map(|state| state.label()).collect(),
    );

    for (from, symbol, to) in dfa.transitions() {
        writeln!(output, "{},{},{}", from.label(), to.label(), symbol).unwrap();
    }

    output
}
