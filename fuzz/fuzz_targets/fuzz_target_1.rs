#![no_main]

use arbitrary::Arbitrary;
use gnsketch::{Constraint, Variables};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|setup: Setup| {
    let mut vars = Variables::new();
    for guess in setup.guesses {
        vars.push(guess);
    }
    // Constraints must only refer to variables which exist.
    let in_range = |c: &Constraint| c.variables().iter().all(|id| (*id as usize) < vars.len());
    let constraints: Vec<_> = setup.constraints.into_iter().filter(in_range).collect();
    let _ = gnsketch::solve(&constraints, &mut vars, Default::default());
});

#[derive(Debug, Arbitrary)]
struct Setup {
    constraints: Vec<Constraint>,
    guesses: Vec<f64>,
}
