use crate::format::{apply_op, op_symbol, OPS};
use crate::state::GAME_SIZE;

/// One solver step: `(first, second, op)` against the current pad, using
/// the same fold rule as a play.
pub type Step = (usize, usize, char);

/// Result tolerance for the search. Looser than the display tolerance:
/// division detours accumulate more float error than a direct fold.
const SOLVE_EPSILON: f64 = 1e-4;

/// Operators worth trying for a mirrored pair. `a + b` and `a * b` already
/// cover `b + a` and `b * a`, so only the non-commutative pair remains.
const MIRRORED_OPS: [char; 2] = ['-', '/'];

/// Finds a sequence of four steps folding `numbers` into `target`, if one
/// exists. Depth-first over every ordered pair and operator, first hit
/// wins.
pub fn find_solution(numbers: &[u32; GAME_SIZE], target: u32) -> Option<Vec<Step>> {
    let mut pad: Vec<f64> = numbers.iter().map(|&n| f64::from(n)).collect();
    let mut steps = Vec::with_capacity(GAME_SIZE - 1);
    if search(&mut pad, f64::from(target), &mut steps) {
        Some(steps)
    } else {
        None
    }
}

/// Counts every step sequence folding `numbers` into `target`. Sequences
/// differing only in step order or operand order count separately; this
/// measures how forgiving a puzzle is, not how many "essentially
/// different" solutions it has.
pub fn count_solutions(numbers: &[u32; GAME_SIZE], target: u32) -> usize {
    let mut pad: Vec<f64> = numbers.iter().map(|&n| f64::from(n)).collect();
    count(&mut pad, f64::from(target))
}

fn candidate_ops(first: usize, second: usize) -> &'static [char] {
    if first < second {
        &OPS
    } else {
        &MIRRORED_OPS
    }
}

fn search(pad: &mut Vec<f64>, target: f64, steps: &mut Vec<Step>) -> bool {
    if pad.len() == 1 {
        return (pad[0] - target).abs() < SOLVE_EPSILON;
    }
    for first in 0..pad.len() {
        for second in 0..pad.len() {
            if first == second {
                continue;
            }
            for &op in candidate_ops(first, second) {
                if op == '/' && pad[second] == 0.0 {
                    continue;
                }
                let a = pad[first];
                let b = pad[second];
                pad[first] = apply_op(a, b, op);
                pad.remove(second);
                steps.push((first, second, op));
                if search(pad, target, steps) {
                    return true;
                }
                steps.pop();
                pad.insert(second, b);
                pad[first] = a;
            }
        }
    }
    false
}

fn count(pad: &mut Vec<f64>, target: f64) -> usize {
    if pad.len() == 1 {
        return usize::from((pad[0] - target).abs() < SOLVE_EPSILON);
    }
    let mut found = 0;
    for first in 0..pad.len() {
        for second in 0..pad.len() {
            if first == second {
                continue;
            }
            for &op in candidate_ops(first, second) {
                if op == '/' && pad[second] == 0.0 {
                    continue;
                }
                let a = pad[first];
                let b = pad[second];
                pad[first] = apply_op(a, b, op);
                pad.remove(second);
                found += count(pad, target);
                pad.insert(second, b);
                pad[first] = a;
            }
        }
    }
    found
}

/// Renders a step sequence as one fully parenthesized expression, folding a
/// pad of texts the same way the numbers fold.
pub fn describe_solution(numbers: &[u32; GAME_SIZE], steps: &[Step]) -> String {
    let mut pad: Vec<String> = numbers.iter().map(ToString::to_string).collect();
    for &(first, second, op) in steps {
        let combined = format!("({} {} {})", pad[first], op_symbol(op), pad[second]);
        pad[first] = combined;
        pad.remove(second);
    }
    pad.into_iter().next().unwrap_or_default()
}
