use std::time::Instant;

use gridworld_rl::{
    actions::Action,
    config::Config,
    gridworld::GridWorld,
    learning::{monte_carlo::MonteCarloAgent, policy::FixedPolicy},
    value_iteration::ValueIterationAgent,
};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

#[derive(Serialize)]
struct Summary {
    batch_sweeps: usize,
    inplace_sweeps: usize,
    batch_vs_inplace_max_diff: f64,
    prediction_avg_episode_len: f64,
    control_avg_episode_len: f64,
    control_vs_dp_max_diff: f64,
    control_vs_dp_mean_diff: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let env = GridWorld::new(config.grid.size)?;
    let terminal_value = config.grid.terminal_value;

    let mut dp = ValueIterationAgent::new(&env, &config.value_iteration, terminal_value)?;
    let t0 = Instant::now();
    let batch = dp.run_batch();
    info!("Batch value iteration took {:.1?}", t0.elapsed());
    let v_batch = dp.values().clone();
    println!("Optimal value function (batch, {} sweeps)\n{}", batch.sweeps, v_batch);

    dp.reset();
    let t0 = Instant::now();
    let inplace = dp.run_inplace();
    info!("In-place value iteration took {:.1?}", t0.elapsed());
    println!("Optimal value function (in-place, {} sweeps)\n{}", inplace.sweeps, dp.values());
    let dp_policy = dp.greedy_policy();
    println!("Greedy policy (value iteration)\n{}", dp_policy);

    let mc_config = &config.monte_carlo;
    let rng = &mut StdRng::seed_from_u64(mc_config.seed);
    let mut mc = MonteCarloAgent::new(&env, mc_config, terminal_value)?;

    let t0 = Instant::now();
    let always_up = FixedPolicy::always(env.size(), Action::Up);
    let v_pi = mc.predict(&always_up, mc_config.prediction_episodes, rng);
    println!("MC prediction, always Up ({} episodes)\n{}", mc_config.prediction_episodes, v_pi);
    info!("MC prediction took {:.1?}", t0.elapsed());
    let prediction = mc.prediction_stats();

    let t0 = Instant::now();
    let mc_policy = mc.control(mc_config.control_episodes, rng).clone();
    info!("MC control took {:.1?}", t0.elapsed());
    println!("MC control value function ({} episodes)\n{}", mc_config.control_episodes, mc.values());
    println!("Greedy policy (MC control)\n{}", mc_policy);
    let control = mc.control_stats();

    let summary = Summary {
        batch_sweeps: batch.sweeps,
        inplace_sweeps: inplace.sweeps,
        batch_vs_inplace_max_diff: v_batch.max_abs_diff(dp.values()),
        prediction_avg_episode_len: prediction.avg_episode_len(),
        control_avg_episode_len: control.avg_episode_len(),
        control_vs_dp_max_diff: mc.values().max_abs_diff(dp.values()),
        control_vs_dp_mean_diff: mc.values().mean_abs_diff(dp.values()),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
