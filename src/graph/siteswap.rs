//! Juggling state graphs and siteswap patterns.
//!
//! A state is a string of `max_throw` slots, `x` for a ball landing on that
//! beat and `-` for an empty beat. Each edge is one throw, labelled by its
//! height. A siteswap is a periodic sequence of throws, written one
//! character per throw (`0`-`9`, then `a` = 10 up to `z` = 35).

use std::collections::{HashSet, VecDeque};

use super::payload::{EdgeEntry, GraphPayload, NodeEntry};
use crate::error::PatternError;

const BALL: u8 = b'x';
const EMPTY: u8 = b'-';

pub fn ground_state(num_balls: usize, max_throw: usize) -> String {
    let mut state = "x".repeat(num_balls);
    state.push_str(&"-".repeat(max_throw.saturating_sub(num_balls)));
    state
}

fn throw(state: &[u8], height: usize) -> Vec<u8> {
    let mut next = state[1..].to_vec();
    next.push(EMPTY);
    if height > 0 {
        next[height - 1] = BALL;
    }
    next
}

fn valid_throws(state: &[u8], max_throw: usize) -> Vec<usize> {
    if state.first() != Some(&BALL) {
        return vec![0];
    }
    (1..=max_throw)
        .filter(|&height| height == max_throw || state[height] == EMPTY)
        .collect()
}

/// Breadth-first walk of every state reachable from the ground state.
pub fn build_state_graph(num_balls: usize, max_throw: usize) -> GraphPayload {
    if num_balls > max_throw || max_throw == 0 {
        return GraphPayload::default();
    }

    let start = ground_state(num_balls, max_throw).into_bytes();
    let mut visited = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);
    let mut nodes = vec![NodeEntry::Id(to_id(&start))];
    let mut edges = Vec::new();

    while let Some(state) = queue.pop_front() {
        let source = to_id(&state);
        for height in valid_throws(&state, max_throw) {
            let next = throw(&state, height);
            let target = to_id(&next);
            if visited.insert(next.clone()) {
                nodes.push(NodeEntry::Id(target.clone()));
                queue.push_back(next);
            }
            edges.push(EdgeEntry::Record {
                source: source.clone(),
                target,
                label: Some(height.to_string()),
            });
        }
    }

    GraphPayload {
        nodes,
        edges,
        tags: None,
    }
}

fn to_id(state: &[u8]) -> String {
    state.iter().map(|&slot| slot as char).collect()
}

pub fn parse_pattern(text: &str) -> Result<Vec<usize>, PatternError> {
    let pattern = text
        .chars()
        .filter(|symbol| !symbol.is_whitespace() && *symbol != ',')
        .map(|symbol| {
            symbol
                .to_digit(36)
                .map(|throw| throw as usize)
                .ok_or(PatternError::InvalidThrow(symbol))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    Ok(pattern)
}

pub fn format_pattern(pattern: &[usize]) -> String {
    pattern
        .iter()
        .map(|&throw| {
            u32::try_from(throw)
                .ok()
                .and_then(|throw| char::from_digit(throw, 36))
                .unwrap_or('?')
        })
        .collect()
}

/// Average throw height, when it is a whole number of balls.
pub fn num_balls(pattern: &[usize]) -> Option<usize> {
    let total = pattern.iter().sum::<usize>();
    (!pattern.is_empty() && total % pattern.len() == 0).then(|| total / pattern.len())
}

/// A pattern is juggleable when no two throws land on the same beat. With
/// `expected_balls`, the ball count must match as well.
pub fn is_valid(pattern: &[usize], expected_balls: Option<usize>) -> bool {
    let Some(balls) = num_balls(pattern) else {
        return false;
    };
    if expected_balls.is_some_and(|expected| expected != balls) {
        return false;
    }

    let period = pattern.len();
    let mut landed = vec![false; period];
    for (beat, &throw) in pattern.iter().enumerate() {
        let landing = (beat + throw) % period;
        if landed[landing] {
            return false;
        }
        landed[landing] = true;
    }
    true
}

/// Whether the pattern cannot be entered straight from the ground state.
pub fn is_excited(pattern: &[usize]) -> bool {
    let Some(balls) = num_balls(pattern) else {
        return false;
    };
    pattern
        .iter()
        .enumerate()
        .any(|(beat, &throw)| throw + beat < balls)
}

/// Splits a valid pattern into the throws each ball cycles through. Every
/// orbit keeps the full period, with `0` on the beats it does not use.
pub fn orbits(pattern: &[usize]) -> Vec<Vec<usize>> {
    if !is_valid(pattern, None) {
        return Vec::new();
    }

    let period = pattern.len();
    let mut claimed = vec![false; period];
    let mut result = Vec::new();
    for start in 0..period {
        if claimed[start] {
            continue;
        }

        let mut orbit = vec![0; period];
        let mut beat = start;
        loop {
            claimed[beat] = true;
            orbit[beat] = pattern[beat];
            beat = (beat + pattern[beat]) % period;
            if beat == start {
                break;
            }
        }
        result.push(orbit);
    }
    result
}

/// The state juggled at each beat of the pattern, as node ids of the
/// `max_throw` state graph. Entry `i` is the state before throw `i`, so
/// consecutive entries are joined by an edge labelled `pattern[i]`.
pub fn pattern_states(pattern: &[usize], max_throw: usize) -> Result<Vec<String>, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    if !is_valid(pattern, None) {
        return Err(PatternError::NotValid(format_pattern(pattern)));
    }
    let highest = pattern.iter().copied().max().unwrap_or(0);
    if highest > max_throw {
        return Err(PatternError::ThrowTooHigh {
            throw: highest,
            max_throw,
        });
    }

    let period = pattern.len();
    let states = (0..period)
        .map(|beat| {
            let slots = (0..max_throw)
                .map(|slot| {
                    // A ball thrown `ago` beats back lands `slot` beats ahead.
                    let occupied = (1..=highest).any(|ago| {
                        pattern[(beat + period * ago - ago) % period] == ago + slot
                    });
                    if occupied { BALL } else { EMPTY }
                })
                .collect::<Vec<_>>();
            to_id(&slots)
        })
        .collect();
    Ok(states)
}

/// A prime pattern visits no state twice within one period.
pub fn is_prime(pattern: &[usize]) -> Result<bool, PatternError> {
    let highest = pattern.iter().copied().max().unwrap_or(0);
    let states = pattern_states(pattern, highest)?;
    let distinct = states.iter().collect::<HashSet<_>>();
    Ok(distinct.len() == states.len())
}
