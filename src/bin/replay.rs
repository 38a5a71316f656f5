// Standalone replay tool for checking the simulator against debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Verify every consecutive pair of logged turns
//   --turns <turn1,turn2>  Verify the transitions starting at these turns
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Sim.toml (default: Sim.toml)

use std::env;
use std::process;

use cube_paint::config::Config;
use cube_paint::replay::ReplayEngine;

fn print_usage() {
    eprintln!("cube-paint Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Verify all consecutive turns in the log");
    eprintln!("  --turns <T1,T2,...>     Verify transitions T -> T+1 (comma-separated)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Sim.toml (default: Sim.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay cube_paint_debug.jsonl --all");
    eprintln!("  replay cube_paint_debug.jsonl --turns 146,147 --verbose");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

enum Mode {
    All,
    Turns(Vec<i32>),
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Sim.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                mode = Some(Mode::All);
            }
            "--turns" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --turns requires an argument");
                    process::exit(1);
                }
                match parse_turns(&args[i + 1]) {
                    Ok(turns) => mode = Some(Mode::Turns(turns)),
                    Err(e) => {
                        eprintln!("Error parsing turns: {}", e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
                config_path = args[i + 1].clone();
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            eprintln!("Error: Must specify --all or --turns");
            print_usage();
            process::exit(1);
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    let results = match mode {
        Mode::All => {
            println!("Replaying all {} entries...\n", entries.len());
            engine.replay_all(&entries)
        }
        Mode::Turns(turns) => {
            println!("Replaying {} specific turn(s)...\n", turns.len());
            engine.replay_turns(&entries, &turns)
        }
    };

    match results {
        Ok(results) => {
            engine.print_report(&results);
            if results.iter().any(|r| !r.matches()) {
                process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("Error during replay: {}", e);
            process::exit(1);
        }
    }
}
