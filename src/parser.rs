//! Reader for the plain-text domain and problem descriptions.
//!
//! A domain description lists the proposition universe and the actions:
//!
//! ```text
//! Propositions:
//! p1 p2 p3
//! Actions:
//! Name: ACTION_NAME
//! pre: p1 p2
//! add: p3
//! delete: p1
//! ```
//!
//! A problem description names the initial state and the goal:
//!
//! ```text
//! Initial state: p1 p2
//! Goal state: p3
//! ```
//!
//! Proposition names are separated by whitespace. Blank lines are ignored
//! everywhere; the four lines of an action record must appear in order.
use std::iter::Peekable;

use crate::error::ParseError;
use crate::strips::{Action, Proposition};

const PROPOSITIONS: &str = "Propositions:";
const ACTIONS: &str = "Actions:";
const NAME: &str = "Name:";
const PRE: &str = "pre:";
const ADD: &str = "add:";
const DELETE: &str = "delete:";
const INITIAL_STATE: &str = "Initial state:";
const GOAL_STATE: &str = "Goal state:";

/// The contents of a domain description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainDescription {
    pub propositions: Vec<Proposition>,
    pub actions: Vec<Action>,
}

/// The contents of a problem description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemDescription {
    pub initial_state: Vec<Proposition>,
    pub goal: Vec<Proposition>,
}

// Non-blank lines, trimmed, paired with their 1-based line number.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn propositions_in(names: &str) -> impl Iterator<Item = Proposition> + '_ {
    names.split_whitespace().map(Proposition::from)
}

/// Parses a domain description.
///
/// # Returns
/// * `Ok(DomainDescription)` with propositions and actions in the order they appear.
/// * `Err(ParseError)` if the input is empty, a section header is missing, or an
///   action record is malformed or truncated.
///
/// # Examples
/// ```
/// use graphplan_search::parser::parse_domain;
///
/// let domain = parse_domain("Propositions:\na b\nActions:\nName: go\npre: a\nadd: b\ndelete: a\n").unwrap();
/// assert_eq!(domain.propositions.len(), 2);
/// assert_eq!(domain.actions[0].name(), "go");
/// assert!(parse_domain("Actions:\n").is_err());
/// ```
pub fn parse_domain(text: &str) -> Result<DomainDescription, ParseError> {
    let mut lines = content_lines(text).peekable();

    let (first_line, first) = lines.next().ok_or(ParseError::Empty)?;
    let declared = first
        .strip_prefix(PROPOSITIONS)
        .ok_or(ParseError::MissingSection {
            expected: PROPOSITIONS,
            line: first_line,
        })?;
    let mut propositions: Vec<Proposition> = propositions_in(declared).collect();

    let mut last_line = first_line;
    loop {
        let (line_number, line) = lines.next().ok_or(ParseError::MissingSection {
            expected: ACTIONS,
            line: last_line,
        })?;
        if let Some(rest) = line.strip_prefix(ACTIONS) {
            if !rest.trim().is_empty() {
                return Err(ParseError::UnexpectedLine {
                    line: line_number,
                    expected: ACTIONS,
                    found: line.to_string(),
                });
            }
            break;
        }
        propositions.extend(propositions_in(line));
        last_line = line_number;
    }

    let mut actions = Vec::new();
    while let Some((line_number, line)) = lines.next() {
        let name = line
            .strip_prefix(NAME)
            .ok_or_else(|| ParseError::UnexpectedLine {
                line: line_number,
                expected: NAME,
                found: line.to_string(),
            })?
            .trim();
        if name.is_empty() {
            return Err(ParseError::EmptyActionName { line: line_number });
        }

        let preconditions = action_field(&mut lines, PRE, line_number)?;
        let add = action_field(&mut lines, ADD, line_number)?;
        let delete = action_field(&mut lines, DELETE, line_number)?;
        actions.push(Action::new(name, preconditions, add, delete));
    }

    Ok(DomainDescription {
        propositions,
        actions,
    })
}

fn action_field<'a, I>(
    lines: &mut Peekable<I>,
    prefix: &'static str,
    record_line: usize,
) -> Result<Vec<Proposition>, ParseError>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    // A following `Name:` means this record stopped early.
    let starts_next_record = matches!(lines.peek(), Some((_, line)) if line.starts_with(NAME));
    if starts_next_record {
        return Err(ParseError::TruncatedAction {
            line: record_line,
            missing: prefix,
        });
    }
    let (line_number, line) = lines.next().ok_or(ParseError::TruncatedAction {
        line: record_line,
        missing: prefix,
    })?;
    let names = line
        .strip_prefix(prefix)
        .ok_or_else(|| ParseError::UnexpectedLine {
            line: line_number,
            expected: prefix,
            found: line.to_string(),
        })?;
    Ok(propositions_in(names).collect())
}

/// Parses a problem description: an `Initial state:` line followed by a `Goal state:` line.
pub fn parse_problem(text: &str) -> Result<ProblemDescription, ParseError> {
    let mut lines = content_lines(text);

    let (initial_line, initial) = lines.next().ok_or(ParseError::Empty)?;
    let initial_state = initial
        .strip_prefix(INITIAL_STATE)
        .ok_or_else(|| ParseError::UnexpectedLine {
            line: initial_line,
            expected: INITIAL_STATE,
            found: initial.to_string(),
        })?;

    let (goal_line, goal) = lines.next().ok_or(ParseError::MissingSection {
        expected: GOAL_STATE,
        line: initial_line,
    })?;
    let goal = goal
        .strip_prefix(GOAL_STATE)
        .ok_or_else(|| ParseError::UnexpectedLine {
            line: goal_line,
            expected: GOAL_STATE,
            found: goal.to_string(),
        })?;

    if let Some((line, extra)) = lines.next() {
        return Err(ParseError::UnexpectedLine {
            line,
            expected: "end of problem description",
            found: extra.to_string(),
        });
    }

    Ok(ProblemDescription {
        initial_state: propositions_in(initial_state).collect(),
        goal: propositions_in(goal).collect(),
    })
}
