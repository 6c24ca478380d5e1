//! Benchmarks for the gnsketch solver.
use std::{hint::black_box, str::FromStr};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gnsketch::{
    Config, Constraint, Variables,
    datatypes::{DatumLineSegment, DatumPoint},
    solve, solve_with_analysis,
    textual::Problem,
};

const RECTANGLES: &str = "\
# constraints
point a
point b
point c
point d
point e
point f
point g
point h
a.x = 1
a.y = 1
horizontal(a, b)
horizontal(c, d)
vertical(a, d)
vertical(b, c)
distance(a, b, 4)
distance(a, d, 3)
e.x = 2
e.y = 2
horizontal(e, f)
horizontal(g, h)
vertical(e, h)
vertical(f, g)
distance(e, f, 4)
distance(e, h, 4)

# guesses
a roughly (1, 1)
b roughly (4.5, 1.5)
c roughly (4, 3.5)
d roughly (1.5, 3)
e roughly (2, 2)
f roughly (5.5, 3.5)
g roughly (5, 4.5)
h roughly (2.5, 4)
";

fn solve_two_rectangles(c: &mut Criterion) {
    c.bench_function("solve_two_rectangles", |b| {
        let problem = Problem::from_str(RECTANGLES).unwrap();
        let system = problem.to_constraint_system().unwrap();
        b.iter(|| {
            let mut system = system.clone();
            let _actual = black_box(system.solve_no_metadata(Config::default()).unwrap());
        });
    });
}

/// A row of `n` squares, each sharing its left edge with the previous square's right edge,
/// so the whole thing is one connected component.
fn row_of_squares(n: usize) -> (Vec<Constraint>, Variables) {
    let mut vars = Variables::new();
    let mut bottom = DatumPoint::new(&mut vars, 0.0, 0.0);
    let mut top = DatumPoint::new(&mut vars, 0.2, 1.1);
    let mut constraints = vec![
        Constraint::Fixed(bottom.id_x(), 0.0),
        Constraint::Fixed(bottom.id_y(), 0.0),
        Constraint::vertical([bottom, top]),
        Constraint::FixedDistance(bottom, top, 1.0),
    ];
    for i in 1..=n {
        let x = i as f64;
        let next_bottom = DatumPoint::new(&mut vars, x + 0.1, -0.1);
        let next_top = DatumPoint::new(&mut vars, x - 0.1, 0.9);
        let left = DatumLineSegment::new(bottom, top);
        let base = DatumLineSegment::new(bottom, next_bottom);
        constraints.extend([
            Constraint::horizontal([bottom, next_bottom]),
            Constraint::horizontal([top, next_top]),
            Constraint::lines_perpendicular([base, left]),
            Constraint::CongruentLines(base, left),
            Constraint::Parallel(left, DatumLineSegment::new(next_bottom, next_top)),
        ]);
        bottom = next_bottom;
        top = next_top;
    }
    (constraints, vars)
}

fn solve_row_of_squares(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_of_squares");
    for n in [1, 4, 16] {
        let (constraints, vars) = row_of_squares(n);
        group.throughput(Throughput::Elements(constraints.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mut vars = vars.clone();
                let _actual = black_box(solve(&constraints, &mut vars, Config::default()).unwrap());
            });
        });
    }
    group.finish();
}

/// Lots of independent components.
fn solve_many_triangles(c: &mut Criterion) {
    let mut vars = Variables::new();
    let mut constraints = Vec::new();
    for i in 0..100 {
        let x = i as f64 * 20.0;
        let a = DatumPoint::new(&mut vars, x, 0.0);
        let b = DatumPoint::new(&mut vars, x + 10.0, 0.0);
        let c = DatumPoint::new(&mut vars, x + 10.0, 10.0);
        constraints.extend([
            Constraint::FixedDistance(a, b, 10.0),
            Constraint::FixedDistance(b, c, 10.0),
            Constraint::FixedDistance(c, a, 10.0),
        ]);
    }
    c.bench_function("solve_many_triangles", |b| {
        b.iter(|| {
            let mut vars = vars.clone();
            let _actual = black_box(solve(&constraints, &mut vars, Config::default()).unwrap());
        });
    });
}

fn solve_row_of_squares_analysis(c: &mut Criterion) {
    let (constraints, vars) = row_of_squares(8);
    c.bench_function("solve_row_of_squares_analysis", |b| {
        b.iter(|| {
            let mut vars = vars.clone();
            let _actual = black_box(
                solve_with_analysis(&constraints, &mut vars, Config::default()).unwrap(),
            );
        });
    });
}

criterion_group!(
    benches,
    solve_two_rectangles,
    solve_row_of_squares,
    solve_many_triangles,
    solve_row_of_squares_analysis,
);
criterion_main!(benches);
