// Demonstration: solve the reactive policy on a small road network and compare
// it with the random baseline.
//
//   cargo run --example reactive_demo -- --discount 0.95 --episodes 20 --steps 200
//
// Set RUST_LOG=reactive_mdp=debug to watch the sweeps.

use std::env;

use reactive_mdp::behavior::{Behavior, RandomBehavior, ReactiveBehavior};
use reactive_mdp::mdp::SolverConfig;
use reactive_mdp::simulation::{EvaluationMetrics, Simulation};
use reactive_mdp::tasks::TableDistribution;
use reactive_mdp::topology::Topology;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let discount: f64 = arg_value(&args, "--discount")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.95);
    let episodes: usize = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);
    let steps: u64 = arg_value(&args, "--steps")
        .and_then(|s| s.parse().ok())
        .unwrap_or(200);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let topology = Topology::from_routes(&[
        ("Geneva", "Lausanne", 62.0),
        ("Lausanne", "Fribourg", 71.0),
        ("Lausanne", "Neuchatel", 73.0),
        ("Fribourg", "Bern", 34.0),
        ("Neuchatel", "Bern", 51.0),
        ("Neuchatel", "La-Chaux-de-Fonds", 20.0),
        ("La-Chaux-de-Fonds", "Delemont", 58.0),
        ("Delemont", "Basel", 44.0),
        ("Bern", "Thun", 30.0),
        ("Bern", "Luzern", 111.0),
        ("Basel", "Zurich", 87.0),
        ("Luzern", "Zurich", 51.0),
        ("Zurich", "St-Gallen", 85.0),
    ])?;
    println!("{}", topology);

    let tasks = TableDistribution::uniform(&topology, 0.6, 40.0)?;
    let cost = 5.0;
    let config = SolverConfig {
        discount,
        cost_per_distance_unit: cost,
        ..SolverConfig::default()
    };

    let reactive = ReactiveBehavior::setup(&topology, &tasks, config)?;
    println!("{}", reactive.policy());
    println!("Number of sweeps: {}", reactive.policy().sweeps());

    let start = topology.require("Bern")?;
    let mut behaviors: Vec<Box<dyn Behavior>> = vec![
        Box::new(reactive),
        Box::new(RandomBehavior::new(&topology, 0.85, seed)),
    ];
    for behavior in behaviors.iter_mut() {
        let mut sim = Simulation::new(&topology, &tasks, cost, start, seed)?;
        let metrics = EvaluationMetrics::evaluate(&mut sim, behavior.as_mut(), episodes, steps)?;
        println!("Behavior: {}", behavior.name());
        println!("{}", metrics);
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
