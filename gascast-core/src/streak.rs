//! Streak analyzer: length and direction of the trailing same-sign run of returns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Up/down label shared by streaks and forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Trailing run of equal-sign returns ending at the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    /// Sign of the most recent return: -1, 0 or +1.
    pub sign: i8,
    /// 1 + the number of immediately preceding returns with the same sign.
    pub length: usize,
    /// `Up` iff `sign > 0`; a zero return counts as down.
    pub direction: Direction,
}

impl Streak {
    /// Signed contribution basis for scoring: `sign * length`.
    pub fn signed_length(&self) -> f64 {
        f64::from(self.sign) * self.length as f64
    }
}

fn sign_of(r: f64) -> i8 {
    if r > 0.0 {
        1
    } else if r < 0.0 {
        -1
    } else {
        0
    }
}

/// Analyze the last `chain_max` returns (or all of them if fewer).
///
/// Walks backward from the second-to-last return and stops at the first
/// return whose sign differs from the last one. A zero return has sign 0,
/// so a streak only extends across zeros when they are consecutive.
/// An empty slice yields a zero-length streak with sign 0.
pub fn analyze(returns: &[f64], chain_max: usize) -> Streak {
    let tail_start = returns.len().saturating_sub(chain_max.max(1));
    let tail = &returns[tail_start..];
    let Some((&last, earlier)) = tail.split_last() else {
        return Streak {
            sign: 0,
            length: 0,
            direction: Direction::Down,
        };
    };

    let sign = sign_of(last);
    let run = earlier
        .iter()
        .rev()
        .take_while(|&&r| sign_of(r) == sign)
        .count();

    Streak {
        sign,
        length: 1 + run,
        direction: if sign > 0 { Direction::Up } else { Direction::Down },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_streak_has_length_one() {
        let streak = analyze(&[1.0, 2.0, -1.0, 3.0], 14);
        assert_eq!(streak.sign, 1);
        assert_eq!(streak.length, 1);
        assert_eq!(streak.direction, Direction::Up);
    }

    #[test]
    fn full_up_streak() {
        let streak = analyze(&[1.0, 2.0, 3.0], 14);
        assert_eq!(streak.length, 3);
        assert_eq!(streak.direction, Direction::Up);
        assert_eq!(streak.signed_length(), 3.0);
    }

    #[test]
    fn down_streak() {
        let streak = analyze(&[0.5, -0.1, -0.2], 14);
        assert_eq!(streak.sign, -1);
        assert_eq!(streak.length, 2);
        assert_eq!(streak.direction, Direction::Down);
        assert_eq!(streak.signed_length(), -2.0);
    }

    #[test]
    fn chain_max_caps_lookback() {
        let streak = analyze(&[1.0; 20], 5);
        assert_eq!(streak.length, 5);
    }

    #[test]
    fn zero_return_is_down_with_zero_sign() {
        let streak = analyze(&[0.3, 0.0], 14);
        assert_eq!(streak.sign, 0);
        assert_eq!(streak.length, 1);
        assert_eq!(streak.direction, Direction::Down);
        assert_eq!(streak.signed_length(), 0.0);
    }

    #[test]
    fn consecutive_zeros_extend_streak() {
        let streak = analyze(&[1.0, 0.0, 0.0, 0.0], 14);
        assert_eq!(streak.length, 3);
    }

    #[test]
    fn empty_tail_is_zero_length() {
        let streak = analyze(&[], 14);
        assert_eq!(streak.length, 0);
        assert_eq!(streak.signed_length(), 0.0);
    }
}
