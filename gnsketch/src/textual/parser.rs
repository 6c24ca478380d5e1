use winnow::{
    Result as WResult,
    ascii::{digit1, space0, space1},
    combinator::{alt, delimited, eof, opt, preceded},
    error::ContextError,
    prelude::*,
    token::{one_of, rest, take_while},
};

use super::{
    Label, PointGuess, Problem, ScalarGuess,
    instruction::{
        DeclarePoint, DeclareScalar, Distance, DistanceArg, FixPointComponent, FixScalar,
        Horizontal, Instruction, LinePair, Vertical,
    },
};
use crate::{
    TextualError,
    datatypes::{Component, Point},
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Section {
    Preamble,
    Constraints,
    Guesses,
}

enum Guess {
    Point(PointGuess),
    Scalar(ScalarGuess),
}

impl Problem {
    /// Parse a whole problem, line by line.
    pub fn parse(src: &str) -> Result<Self, TextualError> {
        let mut section = Section::Preamble;
        let mut instructions = Vec::new();
        let mut point_guesses = Vec::new();
        let mut scalar_guesses = Vec::new();

        for (line_idx, line) in src.lines().enumerate() {
            let line_num = line_idx + 1;
            let parse_err = |reason: String| TextualError::Parse {
                line: line_num,
                reason,
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            // Whole-line comments, and the section headers.
            if let Ok(text) = comment.parse(input) {
                match (text, section) {
                    ("constraints", Section::Preamble) => section = Section::Constraints,
                    ("guesses", Section::Constraints) => section = Section::Guesses,
                    ("constraints" | "guesses", _) => {
                        return Err(parse_err(format!("unexpected '# {text}' header")));
                    }
                    _ => {}
                }
                continue;
            }

            match section {
                Section::Preamble => {
                    return Err(parse_err("expected a '# constraints' header".to_owned()));
                }
                Section::Constraints => {
                    let instruction = (Instruction::parse, end_of_line)
                        .map(|(instruction, _)| instruction)
                        .parse(input)
                        .map_err(|e| parse_err(e.to_string()))?;
                    instructions.push(instruction);
                }
                Section::Guesses => {
                    let guess = (Guess::parse, end_of_line)
                        .map(|(guess, _)| guess)
                        .parse(input)
                        .map_err(|e| parse_err(e.to_string()))?;
                    match guess {
                        Guess::Point(pg) => point_guesses.push(pg),
                        Guess::Scalar(sg) => scalar_guesses.push(sg),
                    }
                }
            }
        }

        let mut inner_points = Vec::new();
        let mut inner_scalars = Vec::new();
        for instr in &instructions {
            match instr {
                Instruction::DeclarePoint(dp) => inner_points.push(dp.label.clone()),
                Instruction::DeclareScalar(ds) => inner_scalars.push(ds.label.clone()),
                _ => {}
            }
        }
        Ok(Self {
            instructions,
            inner_points,
            inner_scalars,
            point_guesses,
            scalar_guesses,
        })
    }
}

fn comment<'i>(i: &mut &'i str) -> WResult<&'i str> {
    preceded('#', rest).map(str::trim).parse_next(i)
}

/// Optional trailing comment, then nothing.
fn end_of_line(i: &mut &str) -> WResult<()> {
    (space0, opt(comment), eof).void().parse_next(i)
}

impl Guess {
    // p roughly (0, 0)
    // d roughly 4
    fn parse(i: &mut &str) -> WResult<Self> {
        let label = Label::parse(i)?;
        (space1, "roughly", space0).void().parse_next(i)?;
        alt((
            point.map(|guess| {
                Guess::Point(PointGuess {
                    point: label.clone(),
                    guess,
                })
            }),
            parse_number.map(|guess| {
                Guess::Scalar(ScalarGuess {
                    scalar: label.clone(),
                    guess,
                })
            }),
        ))
        .parse_next(i)
    }
}

impl Instruction {
    fn parse(i: &mut &str) -> WResult<Self> {
        alt((
            DeclarePoint::parse.map(Instruction::DeclarePoint),
            DeclareScalar::parse.map(Instruction::DeclareScalar),
            FixPointComponent::parse.map(Instruction::FixPointComponent),
            call("vertical", two_labels).map(|label| Instruction::Vertical(Vertical { label })),
            call("horizontal", two_labels)
                .map(|label| Instruction::Horizontal(Horizontal { label })),
            Distance::parse.map(Instruction::Distance),
            call("congruent", LinePair::parse).map(Instruction::Congruent),
            call("parallel", LinePair::parse).map(Instruction::Parallel),
            call("perpendicular", LinePair::parse).map(Instruction::Perpendicular),
            FixScalar::parse.map(Instruction::FixScalar),
        ))
        .parse_next(i)
    }
}

/// `name(args)`
fn call<'i, O>(
    name: &'static str,
    args: impl Parser<&'i str, O, ContextError>,
) -> impl Parser<&'i str, O, ContextError> {
    delimited((name, space0, '(', space0), args, (space0, ')'))
}

fn comma(i: &mut &str) -> WResult<()> {
    (space0, ',', space0).void().parse_next(i)
}

fn two_labels(i: &mut &str) -> WResult<(Label, Label)> {
    (Label::parse, comma, Label::parse)
        .map(|(a, _, b)| (a, b))
        .parse_next(i)
}

impl DeclarePoint {
    fn parse(i: &mut &str) -> WResult<Self> {
        ("point", space1, Label::parse)
            .map(|(_, _, label)| Self { label })
            .parse_next(i)
    }
}

impl DeclareScalar {
    fn parse(i: &mut &str) -> WResult<Self> {
        ("scalar", space1, Label::parse)
            .map(|(_, _, label)| Self { label })
            .parse_next(i)
    }
}

impl Distance {
    fn parse(i: &mut &str) -> WResult<Self> {
        call("distance", (two_labels, comma, DistanceArg::parse))
            .map(|(label, _, distance)| Self { label, distance })
            .parse_next(i)
    }
}

impl DistanceArg {
    fn parse(i: &mut &str) -> WResult<Self> {
        alt((
            Label::parse.map(Self::Scalar),
            parse_number.map(Self::Fixed),
        ))
        .parse_next(i)
    }
}

impl LinePair {
    fn parse(i: &mut &str) -> WResult<Self> {
        (two_labels, comma, two_labels)
            .map(|(line0, _, line1)| Self { line0, line1 })
            .parse_next(i)
    }
}

fn component(i: &mut &str) -> WResult<Component> {
    alt(('x'.map(|_| Component::X), 'y'.map(|_| Component::Y))).parse_next(i)
}

impl FixPointComponent {
    fn parse(i: &mut &str) -> WResult<FixPointComponent> {
        (
            Label::parse,
            '.',
            component,
            delimited(space0, '=', space0),
            parse_number,
        )
            .map(
                |(label, _dot, component, _equals, value)| FixPointComponent {
                    point: label,
                    component,
                    value,
                },
            )
            .parse_next(i)
    }
}

impl FixScalar {
    fn parse(i: &mut &str) -> WResult<FixScalar> {
        (Label::parse, delimited(space0, '=', space0), parse_number)
            .map(|(scalar, _equals, value)| FixScalar { scalar, value })
            .parse_next(i)
    }
}

impl Label {
    fn parse(i: &mut &str) -> WResult<Label> {
        (
            one_of(|c: char| c.is_alphabetic() || c == '_'),
            take_while(0.., |c: char| c.is_alphanumeric() || c == '_'),
        )
            .take()
            .map(|s: &str| Label(s.to_owned()))
            .parse_next(i)
    }
}

fn point(input: &mut &str) -> WResult<Point> {
    delimited(
        ('(', space0),
        (parse_number, comma, parse_number).map(|(x, _comma, y)| Point { x, y }),
        (space0, ')'),
    )
    .parse_next(input)
}

fn parse_number(i: &mut &str) -> WResult<f64> {
    fn myint(input: &mut &str) -> WResult<f64> {
        digit1
            .verify_map(|s: &str| s.parse::<f64>().ok())
            .parse_next(input)
    }

    fn myfloat(i: &mut &str) -> WResult<f64> {
        winnow::ascii::float.parse_next(i)
    }
    alt((myfloat, myint)).parse_next(i)
}
