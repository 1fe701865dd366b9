use float_eq::assert_float_eq;
use gridworld_rl::{
    config::{TerminalValue, ValueIterationConfig},
    gridworld::{GridWorld, State},
    learning::policy::PolicyEntry,
    value_iteration::ValueIterationAgent,
};
use rstest::rstest;

fn reference_config() -> ValueIterationConfig {
    ValueIterationConfig {
        gamma: 0.9,
        theta: 1e-9,
        max_sweeps: 10_000,
    }
}

#[test]
fn batch_and_inplace_agree() {
    let env = GridWorld::default();
    let config = reference_config();

    let mut batch = ValueIterationAgent::new(&env, &config, TerminalValue::Zero).unwrap();
    let batch_report = batch.run_batch();
    let mut inplace = ValueIterationAgent::new(&env, &config, TerminalValue::Zero).unwrap();
    let inplace_report = inplace.run_inplace();

    assert!(batch_report.converged);
    assert!(inplace_report.converged);
    assert!(batch.values().max_abs_diff(inplace.values()) <= config.theta);
    assert_eq!(batch.greedy_policy(), inplace.greedy_policy());
}

#[test]
fn batch_deltas_contract() {
    let env = GridWorld::default();
    let config = reference_config();
    let mut agent = ValueIterationAgent::new(&env, &config, TerminalValue::Zero).unwrap();
    let report = agent.run_batch();

    assert!(report.converged);
    assert!(report.final_delta().unwrap() <= config.theta);
    // The Bellman optimality operator is a gamma-contraction in the max norm.
    for w in report.deltas.windows(2) {
        assert!(w[1] <= config.gamma * w[0] + 1e-12, "{:?}", report.deltas);
    }
}

#[test]
fn reference_values() {
    let env = GridWorld::default();
    let mut agent = ValueIterationAgent::new(&env, &reference_config(), TerminalValue::Zero).unwrap();
    agent.run_inplace();
    let v = agent.values();

    assert_float_eq!(v[State::new(3, 4)], 10.0, abs <= 1e-9);
    assert_float_eq!(v[State::new(4, 3)], 10.0, abs <= 1e-9);
    assert_float_eq!(v[State::new(3, 3)], 8.0, abs <= 1e-9);
    assert_float_eq!(v[State::new(2, 4)], 8.0, abs <= 1e-9);
    assert_float_eq!(v[State::new(2, 3)], 6.2, abs <= 1e-9);
    assert_eq!(v[env.terminal_state()], 0.0);
}

#[rstest]
#[case(TerminalValue::Zero)]
#[case(TerminalValue::Reward)]
fn greedy_policy_reaches_goal_from_everywhere(#[case] terminal_value: TerminalValue) {
    let env = GridWorld::default();
    let mut agent = ValueIterationAgent::new(&env, &reference_config(), terminal_value).unwrap();
    assert!(agent.run_batch().converged);
    let policy = agent.greedy_policy();
    assert_eq!(policy.get(env.terminal_state()), PolicyEntry::Goal);

    let bound = env.n_states();
    for start in env.non_terminal_states() {
        let mut state = start;
        let mut steps = 0;
        while !env.is_terminal(state) {
            let action = policy
                .get(state)
                .action()
                .expect("only the goal has no action");
            state = env.step(state, action).next_state;
            steps += 1;
            assert!(steps <= bound, "greedy policy cycles from {start}");
        }
    }
}

#[test]
fn greedy_route_avoids_penalty_tiles() {
    let env = GridWorld::default();
    let mut agent = ValueIterationAgent::new(&env, &reference_config(), TerminalValue::Zero).unwrap();
    agent.run_batch();
    let policy = agent.greedy_policy();

    let mut state = State::new(0, 0);
    while !env.is_terminal(state) {
        let t = env.step(state, policy.get(state).action().unwrap());
        assert!(!env.penalty_states().contains(&t.next_state));
        state = t.next_state;
    }
}
