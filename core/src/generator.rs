//! Deterministic synthetic intake.
//!
//! RULE: nothing here calls a platform RNG. A seed fully determines the
//! stream, so load runs and randomized tests are reproducible.

use crate::types::ComplaintKind;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A seeded RNG for generating complaint submissions.
pub struct IntakeRng {
    inner: Pcg64Mcg,
}

impl IntakeRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.next_u64_below(items.len() as u64) as usize]
    }
}

/// One generated submission, ready for `DispatchEngine::submit`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticIntake {
    pub kind:        ComplaintKind,
    pub area:        String,
    pub description: String,
    pub severity:    u8,
}

const AREAS: &[&str] = &[
    "Clifton", "Saddar", "Gulshan-e-Iqbal", "Korangi", "Lyari",
    "North Nazimabad", "Malir", "Orangi", "DHA Phase 5", "Gulistan-e-Johar",
];

fn descriptions(kind: ComplaintKind) -> &'static [&'static str] {
    match kind {
        ComplaintKind::Water       => &["main line leak", "no supply since morning", "contaminated tap water"],
        ComplaintKind::Electricity => &["transformer sparking", "outage over 6 hours", "exposed wiring on pole"],
        ComplaintKind::Garbage     => &["bins not collected", "dumping on roadside", "burning waste smell"],
        ComplaintKind::Traffic     => &["signal not working", "open manhole on road", "illegal parking blocking lane"],
        ComplaintKind::Other       => &["stray dogs", "broken streetlight", "noise at night"],
    }
}

/// Draw a submission. Severity skews low: roughly a third land at or
/// above 4. `repeat_rate` is the chance of reusing the previous
/// (area, description) pair to provoke duplicate advisories.
pub fn synthetic_intake(
    rng: &mut IntakeRng,
    previous: Option<&SyntheticIntake>,
    repeat_rate: f64,
) -> SyntheticIntake {
    if let Some(prev) = previous {
        if rng.chance(repeat_rate) {
            return SyntheticIntake {
                severity: 1 + rng.next_u64_below(5) as u8,
                ..prev.clone()
            };
        }
    }

    let kind = ComplaintKind::ALL[rng.next_u64_below(ComplaintKind::ALL.len() as u64) as usize];
    let area = rng.pick(AREAS).to_string();
    let description = rng.pick(descriptions(kind)).to_string();
    let severity = match rng.next_u64_below(100) {
        0..=19  => 1,
        20..=44 => 2,
        45..=64 => 3,
        65..=84 => 4,
        _       => 5,
    };
    SyntheticIntake { kind, area, description, severity }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = IntakeRng::new(12345);
        let mut b = IntakeRng::new(12345);
        let mut prev_a: Option<SyntheticIntake> = None;
        let mut prev_b: Option<SyntheticIntake> = None;

        for _ in 0..50 {
            let x = synthetic_intake(&mut a, prev_a.as_ref(), 0.1);
            let y = synthetic_intake(&mut b, prev_b.as_ref(), 0.1);
            assert_eq!(x, y, "Same seed should produce the same intake");
            prev_a = Some(x);
            prev_b = Some(y);
        }
    }

    #[test]
    fn generated_fields_are_valid() {
        let mut rng = IntakeRng::new(7);
        let mut prev: Option<SyntheticIntake> = None;
        for _ in 0..200 {
            let s = synthetic_intake(&mut rng, prev.as_ref(), 0.2);
            assert!((1..=5).contains(&s.severity), "severity out of range: {}", s.severity);
            assert!(!s.area.trim().is_empty());
            assert!(!s.description.trim().is_empty());
            prev = Some(s);
        }
    }
}
