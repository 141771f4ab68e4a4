// Plant Growth Simulator - line-driven front-end
//
// Usage: cargo run --bin plant_sim
// Type `help` for the command list.

use anyhow::{Context, Result};
use plant_growth_sim::{GrowthEvaluator, Reading, Simulation, SimulatorConfig, SnapshotStore};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Commands:
  sim <plant> <water> <light> <temp>   step one plant
  set <plant> <water> <light> <temp>   change a plant's reading without stepping
  all                                  step every plant with its reading
  show                                 print the current session
  save                                 save the current session
  list                                 print every saved session
  reset                                reset the current session
  clear                                delete all saved sessions
  rules                                print the ideal ranges
  quit                                 exit";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Simulate(usize, Reading),
    Set(usize, Reading),
    All,
    Show,
    Save,
    List,
    Reset,
    Clear,
    Rules,
    Help,
    Quit,
}

/// Parse one input line. Plant numbers are 1-based on input and 0-based in
/// the returned command.
fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match head.to_lowercase().as_str() {
        "sim" => {
            let (plant, reading) = parse_plant_reading(args)?;
            Command::Simulate(plant, reading)
        }
        "set" => {
            let (plant, reading) = parse_plant_reading(args)?;
            Command::Set(plant, reading)
        }
        "all" => Command::All,
        "show" => Command::Show,
        "save" => Command::Save,
        "list" => Command::List,
        "reset" => Command::Reset,
        "clear" => Command::Clear,
        "rules" => Command::Rules,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{}'. Type `help`.", other)),
    };
    Ok(Some(command))
}

fn parse_plant_reading(args: &[&str]) -> Result<(usize, Reading), String> {
    let &[plant, water, light, temp] = args else {
        return Err("Expected: <plant> <water> <light> <temp>".to_string());
    };
    let plant: usize = plant
        .parse()
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| format!("Invalid plant number '{}'", plant))?;

    let number = |s: &str| -> Result<f64, String> {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| "Enter valid numbers only.".to_string())
    };

    Ok((plant - 1, Reading::new(number(water)?, number(light)?, number(temp)?)))
}

struct App {
    config: SimulatorConfig,
    store: SnapshotStore,
    session: Simulation,
    pending: Vec<Reading>,
}

impl App {
    fn new(config: SimulatorConfig) -> Self {
        let store = SnapshotStore::new(&config.data_file);
        let session = Simulation::with_evaluator(
            config.plant_count,
            config.initial_height,
            GrowthEvaluator::new(config.rules),
        );
        let pending = vec![Reading::default(); config.plant_count];
        Self {
            config,
            store,
            session,
            pending,
        }
    }

    /// Run one command; returns false when the loop should stop
    fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Simulate(plant, reading) => {
                match self.session.simulate_one(plant, reading) {
                    Ok(report) => {
                        self.pending[plant] = reading;
                        println!("{}", report.message());
                    }
                    Err(e) => println!("{}", e),
                }
            }
            Command::Set(plant, reading) => match self.pending.get_mut(plant) {
                Some(slot) => {
                    *slot = reading;
                    println!("Plant {} reading set", plant + 1);
                }
                None => println!("Plant {} does not exist", plant + 1),
            },
            Command::All => {
                let reports = self.session.simulate_all(&self.pending)?;
                for report in reports {
                    println!("{}", report.message());
                }
            }
            Command::Show => {
                println!("{}", self.session.snapshot().summary()?);
                println!(
                    "  {} of {} alive, tallest {:.1} cm",
                    self.session.alive_count(),
                    self.session.plants().len(),
                    self.session.tallest()
                );
            }
            Command::Save => match self.store.save(&self.session.snapshot()) {
                Ok(number) => {
                    self.session.set_number(number);
                    println!("Simulation saved as #{}", number);
                }
                Err(e) => {
                    tracing::warn!("Save failed: {}", e);
                    println!("Could not save simulation: {}", e);
                }
            },
            Command::List => {
                let snapshots = self.store.load_all();
                if snapshots.is_empty() {
                    println!("No saved simulations.");
                }
                for snapshot in snapshots {
                    match snapshot.summary() {
                        Ok(text) => println!("{}", text),
                        Err(e) => println!("Simulation #{}: {}", snapshot.number, e),
                    }
                }
            }
            Command::Reset => {
                self.session.reset();
                self.pending = vec![Reading::default(); self.pending.len()];
                println!("Session reset");
            }
            Command::Clear => {
                self.store.clear().context("Failed to clear saved simulations")?;
                println!("Saved simulations deleted");
            }
            Command::Rules => println!("{}", self.config.rules.describe()),
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

fn main() -> Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plant_growth_sim=info,plant_sim=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = SimulatorConfig::from_env()?;
    tracing::info!("Configuration:");
    tracing::info!("  PLANT_SIM_DATA: {:?}", config.data_file);
    tracing::info!("  PLANT_SIM_PLANTS: {}", config.plant_count);
    tracing::info!("  PLANT_SIM_INITIAL_HEIGHT: {}", config.initial_height);

    let mut app = App::new(config);
    println!("Plant growth simulator. Type `help` for commands.");
    println!("{}", app.config.rules.describe());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        match parse_command(&line?) {
            Ok(Some(command)) => {
                if !app.execute(command)? {
                    break;
                }
            }
            Ok(None) => {}
            Err(msg) => println!("{}", msg),
        }
    }

    Ok(())
}
