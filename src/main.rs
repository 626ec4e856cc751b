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
//! Interactive converter between automaton and expression descriptors. Picks one of the three
//! conversions from a menu, reads a descriptor file and prints the result on stdout.
//!

use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

use kleene::descriptor;
use kleene::{dfa_to_re, nfa_to_dfa, nfa_to_named_dfa, regex_to_nfa, Error};

fn prompt(message: &str) -> Result<String, Error> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(answer.trim().to_string())
}

fn run() -> Result<(), Error> {
    println!("Regular language converter");
    println!("1. NFA to DFA");
    println!("2. DFA to regular expression");
    println!("3. Regular expression to NFA");

    match prompt("Option (1/2/3): ")?.as_str() {
        "1" => {
            let path = prompt("Automaton descriptor file: ")?;
            let nfa  = descriptor::parse_automaton(&fs::read_to_string(path)?)?;
            let dfa  = nfa_to_named_dfa(&nfa);

            print!("{}", descriptor::write_dfa(&dfa));
        }

        "2" => {
            let path = prompt("Automaton descriptor file: ")?;
            let nfa  = descriptor::parse_automaton(&fs::read_to_string(path)?)?;

            // A descriptor that is already deterministic passes through the subset
            // construction unchanged apart from its state identities
            let dfa = nfa_to_dfa(&nfa);

            println!("{}", dfa_to_re(&dfa));
        }

        "3" => {
            let path = prompt("Expression descriptor file: ")?;
            let (alphabet, expression) = descriptor::parse_regex(&fs::read_to_string(path)?)?;
            let nfa = regex_to_nfa(&expression, alphabet)?;

            print!("{}", descriptor::write_nfa(&nfa));
        }

        _ => {
            eprintln!("Invalid option");
            process::exit(1);
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(error) = run() {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}
