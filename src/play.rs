use crate::error::InvalidPlay;
use crate::format::{apply_op, OPS};

/// One fold step: two numbers at `first` and `second` are combined with an
/// operator, the result lands at `first`, and the slot at `second` closes
/// up (everything to its right shifts left by one).
///
/// A play snapshots the numbers it acted on, so the whole game history can
/// be replayed or reverted from the plays alone. Once constructed it never
/// changes; undoing a play means dropping it.
#[derive(Debug, Clone, PartialEq)]
pub struct Play {
    first: usize,
    second: usize,
    op: char,
    numbers_pre: Vec<f64>,
    numbers_post: Vec<f64>,
}

impl Play {
    /// Validates the triple against `numbers_pre` and computes the folded
    /// result.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlay` if the operator is not one of `+ - * /`, the
    /// indices are equal, or either index is out of bounds.
    pub fn new(
        first: usize,
        second: usize,
        op: char,
        numbers_pre: &[f64],
    ) -> Result<Self, InvalidPlay> {
        if !OPS.contains(&op) {
            return Err(InvalidPlay::Operator(op));
        }
        if first == second {
            return Err(InvalidPlay::SameIndex(first));
        }
        let len = numbers_pre.len();
        for index in [first, second] {
            if index >= len {
                return Err(InvalidPlay::OutOfBounds { index, len });
            }
        }

        let result = apply_op(numbers_pre[first], numbers_pre[second], op);
        let mut numbers_post = numbers_pre.to_vec();
        numbers_post[first] = result;
        numbers_post.remove(second);

        Ok(Self {
            first,
            second,
            op,
            numbers_pre: numbers_pre.to_vec(),
            numbers_post,
        })
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn second(&self) -> usize {
        self.second
    }

    pub fn op(&self) -> char {
        self.op
    }

    /// The numbers this play acted on.
    pub fn numbers_pre(&self) -> &[f64] {
        &self.numbers_pre
    }

    /// The numbers after the fold; one shorter than `numbers_pre`.
    pub fn numbers_post(&self) -> &[f64] {
        &self.numbers_post
    }

    /// The computed result of this play.
    pub fn result(&self) -> f64 {
        self.numbers_post[self.result_slot()]
    }

    /// Where the result sits in `numbers_post`: at `first`, unless removing
    /// `second` shifted it down by one.
    pub fn result_slot(&self) -> usize {
        if self.first < self.second {
            self.first
        } else {
            self.first - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_shrinks_by_one_for_every_valid_pair() {
        let numbers = [4.0, 6.0, 8.0, 3.0, 1.0];
        for first in 0..numbers.len() {
            for second in 0..numbers.len() {
                if first == second {
                    continue;
                }
                let play = Play::new(first, second, '+', &numbers)
                    .expect("valid pair must be accepted");
                assert_eq!(
                    play.numbers_post().len(),
                    play.numbers_pre().len() - 1,
                    "fold of ({first}, {second}) must shrink the sequence by one"
                );
            }
        }
    }

    #[test]
    fn test_fold_result_and_shift() {
        // first < second: result stays at `first`, tail shifts into `second`.
        let play = Play::new(1, 3, '*', &[4.0, 6.0, 8.0, 3.0, 1.0]).unwrap();
        assert_eq!(play.numbers_post(), &[4.0, 18.0, 8.0, 1.0]);
        assert_eq!(play.result_slot(), 1);
        assert_eq!(play.result(), 18.0);

        // first > second: removing `second` shifts the result down one slot.
        let play = Play::new(3, 0, '-', &[4.0, 6.0, 8.0, 3.0, 1.0]).unwrap();
        assert_eq!(play.numbers_post(), &[6.0, 8.0, -1.0, 1.0]);
        assert_eq!(play.result_slot(), 2);
        assert_eq!(play.result(), -1.0);
    }

    #[test]
    fn test_fold_down_to_two_numbers() {
        let play = Play::new(1, 0, '/', &[4.0, 6.0]).unwrap();
        assert_eq!(play.numbers_post(), &[1.5]);
        assert_eq!(play.result_slot(), 0);
    }

    #[test]
    fn test_rejects_bad_operator() {
        assert_eq!(
            Play::new(0, 1, '%', &[1.0, 2.0]),
            Err(InvalidPlay::Operator('%'))
        );
    }

    #[test]
    fn test_rejects_equal_indices() {
        assert_eq!(
            Play::new(2, 2, '+', &[1.0, 2.0, 3.0]),
            Err(InvalidPlay::SameIndex(2))
        );
    }

    #[test]
    fn test_rejects_out_of_bounds_indices() {
        assert_eq!(
            Play::new(0, 5, '+', &[1.0, 2.0, 3.0]),
            Err(InvalidPlay::OutOfBounds { index: 5, len: 3 })
        );
        assert_eq!(
            Play::new(4, 1, '+', &[1.0, 2.0, 3.0]),
            Err(InvalidPlay::OutOfBounds { index: 4, len: 3 })
        );
    }

    #[test]
    fn test_pre_numbers_are_snapshotted() {
        let mut numbers = vec![2.0, 3.0, 4.0];
        let play = Play::new(0, 1, '+', &numbers).unwrap();
        numbers[0] = 99.0;
        assert_eq!(play.numbers_pre(), &[2.0, 3.0, 4.0]);
    }
}
