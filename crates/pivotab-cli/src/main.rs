mod driver;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use pivotab_core::{Criterion, LpProblem, TableState};
use pivotab_display::{console, latex, NumberFormat};

use crate::driver::{Driver, Outcome, SolutionStatus};

#[derive(Parser)]
#[command(name = "pivotab")]
#[command(about = "Step through the tableau simplex method", long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Latex,
}

#[derive(clap::Args)]
struct DisplayArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,
    /// Show entries as fractions within this tolerance
    #[arg(short, long)]
    rational: Option<f64>,
    /// Decimal places when not showing fractions
    #[arg(short, long, default_value_t = 3)]
    decimals: usize,
}

impl DisplayArgs {
    fn render(&self, table: &TableState) -> String {
        let number = match self.rational {
            Some(tolerance) => NumberFormat::Rational(tolerance),
            None => NumberFormat::Decimal(self.decimals),
        };
        match self.format {
            Format::Text => console::render(table, number),
            Format::Latex => latex::render(table, number),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render a tableau file
    Show {
        /// JSON file with columns, variables and matrix
        file: PathBuf,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Pivot a tableau until optimal or unbounded, printing every step
    Pivot {
        /// JSON file with columns, variables and matrix
        file: PathBuf,
        /// Entering variable rule (most-negative, most-positive)
        #[arg(short, long, default_value = "most-negative")]
        criterion: String,
        /// Give up after this many pivots
        #[arg(short, long, default_value_t = 100)]
        max_iterations: usize,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Solve an LP problem with the two-phase method
    Solve {
        /// JSON file with variables, objective and constraints
        file: PathBuf,
        /// Print the tableau at every pivot
        #[arg(short, long)]
        steps: bool,
        /// Give up after this many pivots per phase
        #[arg(short, long, default_value_t = 10000)]
        max_iterations: usize,
        /// Phase-one residual still treated as feasible
        #[arg(short, long, default_value_t = 1e-9)]
        tolerance: f64,
        #[command(flatten)]
        display: DisplayArgs,
    },
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{:5} [{}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();
    if let Err(e) = result {
        eprintln!("Error setting up logging: {}", e);
    }
}

fn read_source(file: &Path) -> String {
    match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    }
}

fn read_table(file: &Path) -> TableState {
    match serde_json::from_str(&read_source(file)) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Invalid tableau in {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Show { file, display } => {
            let table = read_table(&file);
            println!("{}", display.render(&table));
        }
        Commands::Pivot {
            file,
            criterion,
            max_iterations,
            display,
        } => {
            let criterion: Criterion = match criterion.parse() {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            };
            let mut table = read_table(&file);
            println!("{}", display.render(&table));

            let driver = Driver::new()
                .with_criterion(criterion)
                .with_max_iterations(max_iterations);
            let mut step = 0;
            let outcome = driver.iterate(&mut table, &mut |t| {
                step += 1;
                println!();
                println!("Pivot {}: '{}' enters at row {}", step, pivot_label(t), t.pivot_row().unwrap_or(0));
                println!("{}", display.render(t));
            });

            match outcome {
                Ok(Outcome::Optimal { iterations }) => {
                    println!();
                    println!("Status: OPTIMAL after {} pivot(s)", iterations);
                    println!("{}", display.render(&table));
                    println!("{} = {}", table.objective_label(), table.objective_value());
                }
                Ok(Outcome::Unbounded { column }) => {
                    println!("Status: UNBOUNDED");
                    println!("No row limits '{}'; the objective has no finite optimum.", column);
                    std::process::exit(1);
                }
                Ok(Outcome::IterationLimit) => {
                    println!("Status: ITERATION LIMIT");
                    println!("No optimum after {} pivot(s).", max_iterations);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Pivot error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Solve {
            file,
            steps,
            max_iterations,
            tolerance,
            display,
        } => {
            let problem: LpProblem = match serde_json::from_str(&read_source(&file)) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Invalid problem in {}: {}", file.display(), e);
                    std::process::exit(1);
                }
            };

            let driver = Driver::new()
                .with_max_iterations(max_iterations)
                .with_tolerance(tolerance);
            let solution = match driver.solve(&problem, &mut |t| {
                if steps {
                    println!("{}", display.render(t));
                    println!();
                }
            }) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Solve error: {}", e);
                    std::process::exit(1);
                }
            };

            match solution.status {
                SolutionStatus::Optimal => {
                    println!("Status: OPTIMAL");
                    println!("Objective: {:.4}", solution.objective_value);
                    println!();
                    for (name, value) in problem.variables.iter().zip(&solution.values) {
                        println!("  {:20} {:12.4}", name, value);
                    }
                    if let Some(table) = solution.table.as_ref().filter(|_| steps) {
                        println!();
                        println!("{}", display.render(table));
                    }
                }
                SolutionStatus::Infeasible => {
                    println!("Status: INFEASIBLE");
                    println!("No solution exists that satisfies all constraints.");
                    std::process::exit(1);
                }
                SolutionStatus::Unbounded => {
                    println!("Status: UNBOUNDED");
                    println!("The problem has no finite optimal solution.");
                    std::process::exit(1);
                }
                SolutionStatus::IterationLimit => {
                    println!("Status: ITERATION LIMIT");
                    println!("No optimum after {} pivot(s) per phase.", max_iterations);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn pivot_label(table: &TableState) -> &str {
    table
        .pivot_column()
        .map(|j| table.columns()[j].as_str())
        .unwrap_or("?")
}
