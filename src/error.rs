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
//! # Errors
//!
//! Every failure in this library is fatal to the conversion that produced it: a failed
//! conversion returns no automaton or expression at all, and nothing is retried. There are two
//! families of failure. Malformed input covers descriptor lines and expressions that cannot be
//! read at all, while a malformed expression indicates that an expression passed the syntax
//! stage but could not be assembled into an automaton.
//!

use thiserror::Error;

///
/// Error produced when a conversion or a descriptor cannot be processed
///
#[derive(Debug, Error)]
pub enum Error {
    /// A descriptor transition line did not have exactly three comma-separated fields
    #[error("malformed transition line: '{line}'")]
    MalformedInput { line: String },

    /// A required descriptor header was missing
    #[error("descriptor is missing its '{header}' header")]
    MissingHeader { header: &'static str },

    /// An expression contained a character that is neither an operator nor part of the alphabet
    #[error("unrecognized token '{token}' in expression")]
    UnrecognizedToken { token: char },

    /// An expression contained a ')' with no matching '(' or left a '(' unclosed
    #[error("unbalanced parentheses in expression")]
    UnbalancedParens,

    /// An expression survived the syntax stage but the construction stack underflowed, or more
    /// than one fragment remained once every token was consumed
    #[error("malformed expression: cannot assemble a single automaton fragment")]
    MalformedExpression,

    /// A descriptor file could not be read
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
