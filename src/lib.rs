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
//! # Kleene
//!
//! Kleene is a library for converting between the three classical representations of a regular
//! language: regular expressions, non-deterministic finite automata and deterministic finite
//! automata. It provides the three directed conversions:
//!
//! * regular expression → NFA, via Thompson's construction (`regex_to_nfa`)
//! * NFA → DFA, via the subset construction (`nfa_to_dfa`)
//! * DFA → regular expression, via state elimination (`dfa_to_re`)
//!
//! The first two can be chained to turn an expression into a DFA. Automata and expressions can
//! also be read from and written to a simple line-oriented descriptor format (see the
//! `descriptor` module).
//!

pub use self::automaton::*;
pub use self::determinize::*;
pub use self::eliminate::*;
pub use self::error::*;
pub use self::thompson::*;

pub mod automaton;
pub mod descriptor;
pub mod determinize;
pub mod eliminate;
pub mod error;
pub mod regular_expression;
pub mod thompson;
