use proptest::prelude::*;

use crate::{
    Config, Constraint, EPSILON, Variables,
    datatypes::{DatumPoint, Point},
    solve,
    tests::assert_nearly_eq,
};

fn run(txt: &str) -> crate::textual::Outcome {
    let problem = crate::textual::Problem::parse(txt).unwrap();
    let mut system = problem.to_constraint_system().unwrap();
    system.solve().unwrap()
}

proptest! {
    #[test]
    fn scalar_eq(
        guess_x in -10.0..10.0,
        guess_y in -10.0..10.0,
    ) {
        // One constraint, that solver variables x and y should be equal.
        let mut vars = Variables::new();
        let x = vars.push(guess_x);
        let y = vars.push(guess_y);
        let constraints = [Constraint::Equal(x, y)];

        // Invariant: solve should succeed.
        let outcome = solve(&constraints, &mut vars, Config::default())
            .expect("this constraint system should converge and be solvable");
        // Invariant: it's linear, so one step is enough.
        assert!(outcome.iterations() <= 1);
        // Invariant: the shortest step meets in the middle.
        assert_nearly_eq(vars.value(x), (guess_x + guess_y) / 2.0);
        assert_nearly_eq(vars.value(y), (guess_x + guess_y) / 2.0);
    }

    #[test]
    fn horizontal_distance(
        bx in 0.5f64..100.0,
        by in -100.0f64..100.0,
        negate in any::<bool>(),
        dist in 0.5f64..50.0,
    ) {
        let bx = if negate { -bx } else { bx };
        let problem = format!(
            "# constraints
            point a
            point b
            a.x = 0
            a.y = 0
            horizontal(a, b)
            distance(a, b, {dist})

            # guesses
            a roughly (0, 0)
            b roughly ({bx}, {by})
            "
        );
        let solved = run(&problem);
        // Invariant: b ends up on the same side of a as it was guessed.
        let b = solved.get_point("b").unwrap();
        assert!((b.x - bx.signum() * dist).abs() < 1e-6, "b was {b}");
        assert!(b.y.abs() < 1e-6);
    }

    #[test]
    fn solved_systems_stay_solved(
        x0 in -50.0f64..50.0,
        y0 in -50.0f64..50.0,
        side in 1.0f64..20.0,
    ) {
        let mut vars = Variables::new();
        let a = DatumPoint::new(&mut vars, x0, y0);
        let b = DatumPoint::new(&mut vars, x0 + side, y0);
        let c = DatumPoint::new(&mut vars, x0 + side, y0 + side);
        let constraints = [
            Constraint::Fixed(a.id_x(), x0),
            Constraint::Fixed(a.id_y(), y0),
            Constraint::vertical([b, c]),
            Constraint::FixedDistance(a, b, side),
            Constraint::FixedDistance(b, c, side),
            Constraint::FixedDistance(c, a, side * std::f64::consts::SQRT_2),
        ];

        // Invariant: the guesses already satisfy every constraint, so nothing moves.
        let before = vars.values();
        let outcome = solve(&constraints, &mut vars, Config::default()).unwrap();
        assert_eq!(outcome.iterations(), 0);
        assert_eq!(vars.values(), before);
        assert!(constraints.iter().all(|c| c.is_satisfied_by(&vars, EPSILON)));
        let p = Point::from_datum(&c, &vars);
        assert_nearly_eq(
            p.euclidean_distance(Point { x: x0, y: y0 }),
            side * std::f64::consts::SQRT_2,
        );
    }
}
