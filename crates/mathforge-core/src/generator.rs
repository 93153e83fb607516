//! Arithmetic problem generation.
//!
//! Each difficulty tier draws operators and operand ranges so that results
//! stay child-friendly: subtraction never goes negative and division always
//! yields an exact integer.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::model::{Difficulty, Operator, Problem};

/// Generates problems for a requested difficulty tier.
///
/// Deterministic under [`ProblemGenerator::seeded`], which the tests and the
/// `simulate` command rely on.
pub struct ProblemGenerator {
    rng: ChaCha20Rng,
}

impl ProblemGenerator {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Generator with a fixed seed, for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Produce one problem for the given tier.
    pub fn generate(&mut self, difficulty: Difficulty) -> Problem {
        match difficulty {
            Difficulty::Easy => self.generate_easy(),
            Difficulty::Medium => self.generate_medium(),
            Difficulty::Hard => self.generate_hard(),
        }
    }

    /// Easy: addition and subtraction over 1..=10, no negative results.
    fn generate_easy(&mut self) -> Problem {
        let operator = if self.rng.gen_bool(0.5) {
            Operator::Add
        } else {
            Operator::Sub
        };
        let mut a = self.rng.gen_range(1..=10);
        let mut b = self.rng.gen_range(1..=10);
        if operator == Operator::Sub && b > a {
            std::mem::swap(&mut a, &mut b);
        }
        Self::build(a, b, operator, Difficulty::Easy)
    }

    /// Medium: adds multiplication over the times-table range 2..=12;
    /// addition/subtraction use larger operands.
    fn generate_medium(&mut self) -> Problem {
        const OPS: [Operator; 3] = [Operator::Add, Operator::Sub, Operator::Mul];
        let operator = OPS[self.rng.gen_range(0..OPS.len())];
        let (mut a, mut b) = match operator {
            Operator::Mul => (self.rng.gen_range(2..=12), self.rng.gen_range(2..=12)),
            _ => (self.rng.gen_range(10..=20), self.rng.gen_range(1..=10)),
        };
        if operator == Operator::Sub && b > a {
            std::mem::swap(&mut a, &mut b);
        }
        Self::build(a, b, operator, Difficulty::Medium)
    }

    /// Hard: all four operators. Division is constructed from divisor and
    /// quotient so the dividend is always an exact multiple.
    fn generate_hard(&mut self) -> Problem {
        const OPS: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];
        let operator = OPS[self.rng.gen_range(0..OPS.len())];
        let (a, b) = match operator {
            Operator::Mul => (self.rng.gen_range(5..=15), self.rng.gen_range(5..=15)),
            Operator::Div => {
                let divisor = self.rng.gen_range(2..=12);
                let quotient = self.rng.gen_range(5..=15);
                (divisor * quotient, divisor)
            }
            Operator::Sub => {
                let mut a = self.rng.gen_range(20..=50);
                let mut b = self.rng.gen_range(5..=20);
                if b > a {
                    std::mem::swap(&mut a, &mut b);
                }
                (a, b)
            }
            Operator::Add => (self.rng.gen_range(20..=50), self.rng.gen_range(10..=30)),
        };
        Self::build(a, b, operator, Difficulty::Hard)
    }

    fn build(a: i32, b: i32, operator: Operator, difficulty: Difficulty) -> Problem {
        Problem {
            operand1: a,
            operand2: b,
            operator,
            answer: operator.apply(a, b),
            difficulty,
        }
    }
}

impl Default for ProblemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_matches_direct_evaluation() {
        let mut gen = ProblemGenerator::seeded(7);
        for difficulty in Difficulty::all() {
            for _ in 0..1000 {
                let p = gen.generate(difficulty);
                assert_eq!(
                    p.answer,
                    p.operator.apply(p.operand1, p.operand2),
                    "answer mismatch for {}",
                    p.text()
                );
                assert_eq!(p.difficulty, difficulty);
            }
        }
    }

    #[test]
    fn subtraction_never_negative() {
        let mut gen = ProblemGenerator::seeded(11);
        for difficulty in Difficulty::all() {
            for _ in 0..1000 {
                let p = gen.generate(difficulty);
                if p.operator == Operator::Sub {
                    assert!(p.answer >= 0.0, "negative result for {}", p.text());
                }
            }
        }
    }

    #[test]
    fn hard_division_is_exact() {
        let mut gen = ProblemGenerator::seeded(13);
        let mut seen_div = 0;
        for _ in 0..1000 {
            let p = gen.generate(Difficulty::Hard);
            if p.operator == Operator::Div {
                seen_div += 1;
                assert_eq!(p.operand1 % p.operand2, 0, "inexact division {}", p.text());
                assert_eq!(p.answer, (p.operand1 / p.operand2) as f64);
            }
        }
        assert!(seen_div > 100, "division should be drawn regularly");
    }

    #[test]
    fn easy_stays_in_range_with_easy_operators() {
        let mut gen = ProblemGenerator::seeded(17);
        for _ in 0..1000 {
            let p = gen.generate(Difficulty::Easy);
            assert!(matches!(p.operator, Operator::Add | Operator::Sub));
            assert!((1..=10).contains(&p.operand1.min(p.operand2)));
            assert!((1..=10).contains(&p.operand1.max(p.operand2)));
        }
    }

    #[test]
    fn medium_multiplication_uses_times_table_range() {
        let mut gen = ProblemGenerator::seeded(19);
        for _ in 0..1000 {
            let p = gen.generate(Difficulty::Medium);
            assert!(p.operator != Operator::Div);
            if p.operator == Operator::Mul {
                assert!((2..=12).contains(&p.operand1));
                assert!((2..=12).contains(&p.operand2));
            }
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let mut a = ProblemGenerator::seeded(42);
        let mut b = ProblemGenerator::seeded(42);
        for difficulty in Difficulty::all() {
            for _ in 0..50 {
                let pa = a.generate(difficulty);
                let pb = b.generate(difficulty);
                assert_eq!(pa.text(), pb.text());
                assert_eq!(pa.answer, pb.answer);
            }
        }
    }
}
