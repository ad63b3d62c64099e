use std::io;

use quick_error::quick_error;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Dimensions(cols: usize, rows: usize) {
            display("grid dimensions must be positive, got {cols}x{rows}")
        }
        RuleLength(name: String, len: usize) {
            display("rule {name} must have 8 entries, got {len}")
        }
        RuleValue(name: String, value: u8) {
            display("rule {name} contains {value}, entries must be 0 or 1")
        }
        NotEnoughRules(count: usize) {
            display("at least two rules are needed to blend, got {count}")
        }
        StepIncrement(step: f64) {
            display("step increment must be in (0, 1], got {step}")
        }
        Chance(name: &'static str, value: f64) {
            display("{name} must be in [0, 1], got {value}")
        }
        Io(err: io::Error) {
            from()
            display("{}", err)
        }
        Config(err: serde_yaml::Error) {
            from()
            display("invalid configuration: {}", err)
        }
    }
}
