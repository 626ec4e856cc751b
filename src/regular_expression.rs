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
//! # Regular expressions
//!
//! The syntax stages of the regular expression compiler. Source expressions are written in the
//! usual infix notation with `*` (Kleene star), `|` (alternation), parentheses for grouping and
//! concatenation by juxtaposition. Because the operator-precedence stage needs an explicit
//! token for every operator, the first stage rewrites the expression with an explicit `.`
//! concatenation operator; the second stage is a shunting-yard conversion to postfix.
//!
//! Precedence is `*` over `.` over `|`, and the binary operators associate to the left. The
//! postfix token stream this produces is consumed by the `thompson` module.
//!

use std::collections::BTreeSet;

use crate::error::Error;

///
/// A token of a postfix regular expression
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A symbol from the alphabet
    Symbol(char),

    /// The postfix Kleene star operator `*`
    Star,

    /// The binary concatenation operator `.`
    Concat,

    /// The binary alternation operator `|`
    Union,
}

/// Binding strength of an operator character; higher binds tighter
fn precedence(operator: char) -> u32 {
    match operator {
        '*' => 3,
        '.' => 2,
        '|' => 1,
        _   => 0,
    }
}

/// True for tokens that can end a sub-expression
fn ends_expression(token: char, alphabet: &BTreeSet<char>) -> bool {
    alphabet.contains(&token) || token == '*' || token == ')'
}

/// True for tokens that can begin a sub-expression
fn begins_expression(token: char, alphabet: &BTreeSet<char>) -> bool {
    alphabet.contains(&token) || token == '('
}

///
/// Rewrites an infix expression with explicit `.` concatenation operators
///
/// A `.` is inserted wherever a token that can end a sub-expression is immediately followed by
/// one that can begin one, so `a(a|b)*b` becomes `a.(a|b)*.b`. Characters the expression should
/// not contain are passed through untouched here; the shunting-yard stage rejects them.
///
pub fn insert_concatenation(expression: &str, alphabet: &BTreeSet<char>) -> String {
    let mut result   = String::with_capacity(expression.len() * 2);
    let mut previous = None;

    for current in expression.chars() {
        if let Some(previous) = previous {
            if ends_expression(previous, alphabet) && begins_expression(current, alphabet) {
                result.push('.');
            }
        }

        result.push(current);
        previous = Some(current);
    }

    result
}

///
/// Converts an infix expression (with explicit concatenation) to a postfix token stream
///
/// This is the shunting-yard algorithm: symbols go straight to the output, operators wait on a
/// stack until an operator of no higher precedence arrives, and parentheses flush the stack
/// down to their opening partner without ever being emitted themselves.
///
pub fn to_postfix(expression: &str, alphabet: &BTreeSet<char>) -> Result<Vec<Token>, Error> {
    let mut output: Vec<Token> = vec![];
    let mut stack: Vec<char>   = vec![];

    for token in expression.chars() {
        if alphabet.contains(&token) {
            output.push(Token::Symbol(token));
        } else if token == '(' {
            stack.push(token);
        } else if token == ')' {
            // Flush down to the matching '(' and discard it
            loop {
                match stack.pop() {
                    Some('(')      => break,
                    Some(operator) => output.push(operator_token(operator)),
                    None           => return Err(Error::UnbalancedParens),
                }
            }
        } else if token == '*' || token == '.' || token == '|' {
            while let Some(&top) = stack.last() {
                if top == '(' || precedence(token) > precedence(top) {
                    break;
                }
                stack.pop();
                output.push(operator_token(top));
            }
            stack.push(token);
        } else {
            return Err(Error::UnrecognizedToken { token: token });
        }
    }

    while let Some(operator) = stack.pop() {
        if operator == '(' {
            return Err(Error::UnbalancedParens);
        }
        output.push(operator_token(operator));
    }

    Ok(output)
}

/// Maps an operator character onto its token
fn operator_token(operator: char) -> Token {
    match operator {
        '*' => Token::Star,
        '.' => Token::Concat,
        _   => Token::Union,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn alphabet() -> BTreeSet<char> {
        vec!['a', 'b'].into_iter().collect()
    }

    #[test]
    fn inserts_concatenation_between_symbols() {
        assert!(insert_concatenation("ab", &alphabet()) == "a.b");
    }

    #[test]
    fn inserts_concatenation_around_groups() {
        assert!(insert_concatenation("a(a|b)*b", &alphabet()) == "a.(a|b)*.b");
    }

    #[test]
    fn no_concatenation_inside_alternation() {
        assert!(insert_concatenation("a|b", &alphabet()) == "a|b");
    }

    #[test]
    fn postfix_orders_by_precedence() {
        // a.b|c with the standard precedences is (a.b)|c
        let alphabet: BTreeSet<char> = vec!['a', 'b', 'c'].into_iter().collect();
        let postfix = to_postfix("a.b|c", &alphabet).unwrap();

        assert!(postfix == vec![Token::Symbol('a'), Token::Symbol('b'), Token::Concat, Token::Symbol('c'), Token::Union]);
    }

    #[test]
    fn star_binds_tighter_than_concatenation() {
        let postfix = to_postfix("a.b*", &alphabet()).unwrap();

        assert!(postfix == vec![Token::Symbol('a'), Token::Symbol('b'), Token::Star, Token::Concat]);
    }

    #[test]
    fn concatenation_is_left_associative() {
        let alphabet: BTreeSet<char> = vec!['a', 'b', 'c'].into_iter().collect();
        let postfix = to_postfix("a.b.c", &alphabet).unwrap();

        assert!(postfix == vec![Token::Symbol('a'), Token::Symbol('b'), Token::Concat, Token::Symbol('c'), Token::Concat]);
    }

    #[test]
    fn parentheses_group_and_vanish() {
        let postfix = to_postfix("a.(a|b)", &alphabet()).unwrap();

        assert!(postfix == vec![Token::Symbol('a'), Token::Symbol('a'), Token::Symbol('b'), Token::Union, Token::Concat]);
    }

    #[test]
    fn unclosed_parenthesis_is_rejected() {
        assert!(matches!(to_postfix("(a.b", &alphabet()), Err(Error::UnbalancedParens)));
    }

    #[test]
    fn stray_closing_parenthesis_is_rejected() {
        assert!(matches!(to_postfix("a.b)", &alphabet()), Err(Error::UnbalancedParens)));
    }

    #[test]
    fn unknown_character_is_rejected() {
        assert!(matches!(
            to_postfix("a.c", &alphabet()),
            Err(Error::UnrecognizedToken { token: 'c' })
        ));
    }
}
