use tracing::info;

use crate::Rule;

/// Two rules and the progress of the switch from the first to the second.
#[derive(Debug, Clone)]
pub struct Blend {
    first: Rule,
    second: Rule,
    steps: u64,
    increment: f64,
}

impl Blend {
    pub fn new((first, second): (Rule, Rule), increment: f64) -> Self {
        Self {
            first,
            second,
            steps: 0,
            increment,
        }
    }

    /// progress through the current pair, in `[0, 1)`.
    pub fn factor(&self) -> f64 {
        self.steps as f64 * self.increment
    }

    pub fn effective(&self) -> &Rule {
        if self.factor() < 0.5 {
            &self.first
        } else {
            &self.second
        }
    }

    pub fn pair(&self) -> (&Rule, &Rule) {
        (&self.first, &self.second)
    }

    /// moves one increment forward, replacing the pair with `draw()` once the factor reaches 1.
    pub fn advance(&mut self, draw: impl FnOnce() -> (Rule, Rule)) {
        self.steps += 1;
        if self.factor() >= 1.0 {
            let (first, second) = draw();
            info!("transitioning to new rules: {first}, {second}");
            self.first = first;
            self.second = second;
            self.steps = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blend(increment: f64) -> Blend {
        Blend::new((Rule::wolfram(90), Rule::wolfram(110)), increment)
    }

    #[test]
    fn switches_rule_at_half_way() {
        let mut blend = blend(0.01);
        for step in 0..100 {
            let expected = if step < 50 { "rule90" } else { "rule110" };
            assert_eq!(blend.effective().name(), expected, "step {step}");
            if step < 99 {
                blend.advance(|| unreachable!("drawn before the cycle ended"));
            }
        }
        assert!(blend.factor() < 1.0);
    }

    #[test]
    fn redraws_after_a_full_cycle() {
        let mut blend = blend(0.25);
        for _ in 0..3 {
            blend.advance(|| unreachable!("drawn before the cycle ended"));
        }
        assert_eq!(blend.factor(), 0.75);
        blend.advance(|| (Rule::wolfram(30), Rule::wolfram(102)));
        assert_eq!(blend.factor(), 0.0);
        let (first, second) = blend.pair();
        assert_eq!((first.name(), second.name()), ("rule30", "rule102"));
        assert_eq!(blend.effective().name(), "rule30");
    }

    #[test]
    fn full_increment_redraws_every_step() {
        let mut blend = blend(1.0);
        let mut draws = 0;
        for _ in 0..5 {
            blend.advance(|| {
                draws += 1;
                (Rule::wolfram(30), Rule::wolfram(102))
            });
        }
        assert_eq!(draws, 5);
        assert_eq!(blend.factor(), 0.0);
    }

    #[test]
    fn tiny_increments_outlast_u32_steps() {
        let mut blend = Blend {
            steps: u32::MAX as u64,
            ..blend(1e-10)
        };
        blend.advance(|| unreachable!("drawn before the cycle ended"));
        assert_eq!(blend.steps, u32::MAX as u64 + 1);
        assert!(blend.factor() < 0.5);
        assert_eq!(blend.effective().name(), "rule90");
    }
}
