use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spinverse::branching::trace::describe_transition;
use spinverse::prelude::*;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

/// Spin through a themed story sequence from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a theme file for structural problems
    Validate {
        /// Path to the theme JSON file
        theme_path: String,
    },
    /// Print the selection probability of every segment, step by step
    Odds {
        /// Path to the theme JSON file
        theme_path: String,
    },
    /// Run one or more complete sessions with random spins
    Simulate {
        /// Path to the theme JSON file
        theme_path: String,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of sessions to run
        #[arg(short, long, default_value_t = 1)]
        runs: usize,

        /// Wait for Enter before every spin
        #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
        human: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { theme_path } => {
            let theme = load_theme(&theme_path);
            println!(
                "Theme '{}' ({}) is valid: {} steps, start at '{}'",
                theme.name,
                theme.id,
                theme.steps.len(),
                theme.start_step().unwrap_or("<none>")
            );
        }
        Command::Odds { theme_path } => print_odds(&load_theme(&theme_path)),
        Command::Simulate {
            theme_path,
            seed,
            runs,
            human,
        } => {
            let theme = Arc::new(load_theme(&theme_path));
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_rng(&mut rand::rng()),
            };
            for run in 1..=runs {
                println!("\n=== Run {}/{} ===", run, runs);
                simulate(Arc::clone(&theme), &mut rng, human);
            }
        }
    }
}

fn load_theme(path: &str) -> SequenceTheme {
    SequenceTheme::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load theme: {}", e)))
}

fn print_odds(theme: &SequenceTheme) {
    for step in &theme.steps {
        println!("\n{} ({})", step.title, step.id);
        let probabilities = calculate_segment_probabilities(&step.wheel_config.segments)
            .unwrap_or_else(|e| exit_with_error(&format!("Step '{}': {}", step.id, e)));
        for (segment, p) in step.wheel_config.segments.iter().zip(probabilities) {
            let trigger = segment
                .multi_spin
                .map(|t| format!("  [+{} spins]", t.count))
                .unwrap_or_default();
            println!("  {:<24} {:>6.2}%{}", segment.text, p * 100.0, trigger);
        }
    }
}

fn simulate<R: Rng>(theme: Arc<SequenceTheme>, rng: &mut R, human: bool) {
    let start = Instant::now();
    let mut session = SequenceSession::new(theme);
    session
        .start()
        .unwrap_or_else(|e| exit_with_error(&format!("Could not start session: {}", e)));

    loop {
        let step = session
            .current_step()
            .cloned()
            .unwrap_or_else(|| exit_with_error("Session lost its current step"));
        println!("\n{}", step.title);

        loop {
            if human {
                prompt_for_enter("Press Enter to spin");
            }
            let spin = session
                .spin(rng)
                .unwrap_or_else(|e| exit_with_error(&format!("Spin failed: {}", e)));
            let label = spin.segment.text.clone();
            let completion = session
                .complete_step(spin)
                .unwrap_or_else(|e| exit_with_error(&format!("Could not record spin: {}", e)));
            match completion {
                StepCompletion::Recorded => {
                    println!("  -> {}", label);
                    break;
                }
                StepCompletion::MultiSpinStarted { total } => {
                    println!("  -> {} (spin {} more times!)", label, total)
                }
                StepCompletion::MultiSpinPending { remaining } => {
                    println!("  -> {} ({} to go)", label, remaining)
                }
                StepCompletion::MultiSpinFinished { recorded } => {
                    println!("  -> {} ({} outcomes kept)", label, recorded);
                    break;
                }
            }
        }

        let advance = session
            .next_step()
            .unwrap_or_else(|e| exit_with_error(&format!("Could not advance: {}", e)));
        match advance {
            StepAdvance::Moved { transition, .. } => {
                println!(
                    "  Reason: {}",
                    describe_transition(&step, &transition, session.results())
                );
                session
                    .settle()
                    .unwrap_or_else(|e| exit_with_error(&format!("Could not settle: {}", e)));
            }
            StepAdvance::Completed => break,
        }
    }

    let path = session
        .path()
        .unwrap_or_else(|e| exit_with_error(&format!("Path resolution failed: {}", e)));
    println!("\n--- Story ---");
    println!("{}", session.narrative());
    println!("\n--- Summary ---");
    println!(
        "Path:      {}",
        path.iter().map(|s| s.id.as_str()).collect::<Vec<_>>().join(" -> ")
    );
    println!("Spins:     {}", session.results().len());
    println!("Elapsed:   {:?}", start.elapsed());
}

fn prompt_for_enter(prompt_text: &str) {
    let mut line = String::new();
    print!("> {}: ", prompt_text);
    if io::stdout().flush().is_err() || io::stdin().read_line(&mut line).is_err() {
        exit_with_error("Failed to read from the terminal");
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
