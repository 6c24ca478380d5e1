use std::{
    hint::black_box,
    io::{self, Read},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use gnsketch::{
    Config, FailureOutcome, Warning,
    datatypes::Point,
    textual::{ConstraintSystem, Outcome, Problem},
};

const NUM_ITERS_BENCHMARK: u32 = 100;

#[derive(Parser)]
#[command(name = "gnsketch", version, about, long_about = None)]
struct Cli {
    /// Path to the problem file.
    /// Use '-' for stdin.
    #[arg(short = 'f', long)]
    filepath: PathBuf,

    /// Show the final values assigned to each point and scalar.
    #[arg(long = "show-points")]
    show_points: bool,

    /// Report which variables the constraints leave free to move.
    #[arg(long, default_value_t = false)]
    analysis: bool,

    /// Log solver progress to stderr. Repeat for more detail.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let soln = match main_inner(&cli) {
        Ok(soln) => soln,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };
    match soln {
        Ok(soln) => print_output(&soln, cli.show_points),
        Err(outcome) => {
            print_failure_output(&outcome);
            std::process::exit(1);
        }
    }
}

type RunResult = Result<(Outcome, Duration), FailureOutcome>;

fn main_inner(cli: &Cli) -> anyhow::Result<RunResult> {
    let constraint_txt = read_problem(cli)?;
    let parsed = Problem::from_str(&constraint_txt)?;
    let system = parsed.to_constraint_system()?;

    // Ensure problem can be solved
    let now = std::time::Instant::now();
    let solved = match solve_once(system.clone(), cli.analysis) {
        Ok(o) => o,
        Err(e) => return Ok(Err(e)),
    };

    // It succeeded. Benchmark its perf
    for _ in 0..NUM_ITERS_BENCHMARK {
        let mut system = system.clone();
        black_box(system.solve_no_metadata(Config::default()))
            .context("solve succeeded once but failed on a later run")?;
    }
    let duration_per_iter = now.elapsed() / (NUM_ITERS_BENCHMARK + 1);
    Ok(Ok((solved, duration_per_iter)))
}

fn solve_once(mut system: ConstraintSystem, analysis: bool) -> Result<Outcome, FailureOutcome> {
    if analysis {
        system.solve_with_analysis(Config::default())
    } else {
        system.solve()
    }
}

/// Prints the output nicely to stdout.
fn print_output((outcome, duration): &(Outcome, Duration), show_points: bool) {
    let Outcome {
        iterations,
        num_components,
        warnings,
        points,
        scalars,
        analysis,
        underconstrained,
        num_vars,
        num_eqs,
    } = outcome;
    print_warnings(warnings);
    print_problem_size(*num_vars, *num_eqs);
    println!("Components: {num_components}");
    println!("Iterations needed: {iterations}");
    print_performance(*duration);
    if let Some(analysis) = analysis {
        let dof = analysis.degrees_of_freedom();
        if dof == 0 {
            println!("Degrees of freedom: {}", dof.to_string().green());
        } else {
            println!("Degrees of freedom: {}", dof.to_string().yellow());
            println!("Free to move: {}", underconstrained.join(", "));
        }
        if !analysis.unanalyzed.is_empty() {
            let msg = format!("Could not analyse components {:?}", analysis.unanalyzed);
            println!("{}", msg.yellow());
        }
    }
    if show_points {
        println!("Points:");
        for (label, Point { x, y }) in points {
            println!("\t{label}: ({x:.2}, {y:.2})");
        }
        if !scalars.is_empty() {
            println!("Scalars:");
            for (label, value) in scalars {
                println!("\t{label}: {value:.2}");
            }
        }
    }
}

fn print_performance(duration: Duration) {
    let time = format!("{}μs", duration.as_micros());
    println!("Solved in {time} (mean over {NUM_ITERS_BENCHMARK} iterations)");
    let micros = duration.as_micros().max(1);
    let solves_per_second = Duration::from_secs(1).as_micros() / micros;
    let solves_per_second = if solves_per_second <= 60 {
        solves_per_second.to_string().red()
    } else {
        solves_per_second.to_string().normal()
    };
    println!("i.e. {solves_per_second} solves per second");
}

fn print_warnings(warnings: &[Warning]) {
    if !warnings.is_empty() {
        println!("Warnings:");
        for warning in warnings {
            println!("\t{}", warning.to_string().yellow());
        }
    }
}

fn print_problem_size(num_vars: usize, num_eqs: usize) {
    print!("Problem size: ");
    if num_vars != num_eqs {
        let l = format!("{num_eqs} rows, {num_vars} vars");
        println!("{}", l.yellow());
    } else {
        println!("{num_eqs} rows, {num_vars} vars");
    }
}

fn print_failure_output(outcome: &FailureOutcome) {
    print_warnings(outcome.warnings());
    if outcome.num_solved() > 0 {
        println!("Solved {} component(s) before failing", outcome.num_solved());
    }
    eprintln!("{}: {}", "Could not solve system".red(), outcome);
    eprintln!("You might have contradictory constraints.");
}

/// Read the problem text from a file or stdin, depending on user args.
/// They pass a filename, or '-' for stdin.
fn read_problem(cli: &Cli) -> anyhow::Result<String> {
    // Read from file
    if cli.filepath.as_os_str() != "-" {
        return std::fs::read_to_string(&cli.filepath)
            .with_context(|| format!("could not read {}", cli.filepath.display()));
    }

    // Read from stdin
    let mut constraint_txt = String::with_capacity(100);
    io::stdin()
        .read_to_string(&mut constraint_txt)
        .context("could not read stdin")?;
    Ok(constraint_txt)
}

#[cfg(test)]
mod tests {
    use std::process::{Command, Stdio};

    use super::*;

    fn cli(case: &str, analysis: bool) -> Cli {
        Cli {
            filepath: format!("../test_cases/{case}/problem.txt").into(),
            show_points: true,
            analysis,
            verbose: 0,
        }
    }

    #[test]
    fn test_tiny_inner() {
        let (soln, _duration) = main_inner(&cli("tiny", false)).unwrap().unwrap();
        assert_eq!(soln.num_vars, 4);
        assert_eq!(soln.num_eqs, 4);
        let q = soln.get_point("q").unwrap();
        assert!((q.x - 4.0).abs() < 1e-6);
        assert!(soln.analysis.is_none());
    }

    #[test]
    fn test_analysis_inner() {
        let (soln, _duration) = main_inner(&cli("underconstrained", true))
            .unwrap()
            .unwrap();
        let analysis = soln.analysis.unwrap();
        assert_eq!(analysis.degrees_of_freedom(), 1);
        assert!(soln.underconstrained.contains(&"b.x".to_owned()));
        assert!(soln.underconstrained.contains(&"b.y".to_owned()));
    }

    #[test]
    fn test_contradiction_inner() {
        let failure = main_inner(&cli("contradiction", false)).unwrap().unwrap_err();
        assert_eq!(failure.failed_component(), 0);
    }

    #[test]
    fn test_missing_file() {
        assert!(main_inner(&cli("does_not_exist", false)).is_err());
    }

    #[test]
    fn test_tiny() {
        let out = Command::new("cargo")
            .args([
                "run",
                "--quiet",
                "--",
                "-f",
                "../test_cases/tiny/problem.txt",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
            .wait_with_output()
            .unwrap();
        assert!(out.status.success());
        let stdout = String::from_utf8(out.stdout).unwrap();
        assert!(stdout.contains("Problem size: 4 rows, 4 vars"));
    }

    #[test]
    fn test_contradiction_exits_with_failure() {
        let out = Command::new("cargo")
            .args([
                "run",
                "--quiet",
                "--",
                "-f",
                "../test_cases/contradiction/problem.txt",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
            .wait_with_output()
            .unwrap();
        assert!(!out.status.success());
        let stderr = String::from_utf8(out.stderr).unwrap();
        assert!(stderr.contains("Could not solve system"));
    }
}
