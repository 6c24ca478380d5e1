//! A basic example for how to use the constraint solver.
use gnsketch::{Config, Constraint, Variables, datatypes::DatumPoint, solve};

fn main() {
    // Define the geometry.
    // Each point's variables start at a rough guess of where it should be,
    // the solver will move them until every constraint holds.
    let mut vars = Variables::new();
    let p = DatumPoint::named(&mut vars, "p", 0.0, -0.02);
    let q = DatumPoint::named(&mut vars, "q", 4.39, 4.38);

    // Define constraints on the geometric entities (their dimensions and relation to each other).
    let constraints = [
        // Fix P to the origin
        Constraint::Fixed(p.id_x(), 0.0),
        Constraint::Fixed(p.id_y(), 0.0),
        // P and Q should be 4 units apart.
        Constraint::FixedDistance(p, q, 4.0),
    ];

    // Run the solver!
    let outcome = solve(&constraints, &mut vars, Config::default());

    // Check the outcome.
    match outcome {
        Ok(solution) => {
            println!("Solved in {} iterations", solution.iterations());
            for (_id, variable) in vars.iter() {
                println!("{variable}");
            }
        }
        Err(e) => {
            eprintln!("gnsketch could not solve this constraint system: {}", e.error);
        }
    }
}
