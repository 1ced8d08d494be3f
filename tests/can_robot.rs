use rand::{rngs::StdRng, SeedableRng};
use robby::{
    algo::{select_action, QTable},
    env::Environment,
    experiment::{self, EvalConfig, TrainConfig},
    gym::{
        can_field::{apply_action, reward},
        perception::{encode_state, state_row},
        Action, CanField, Grid, Pos,
    },
    Error,
};

#[test]
fn learned_policy_collects_cans_and_leaves_corners() {
    let mut rng = StdRng::seed_from_u64(99);
    let training = experiment::train(TrainConfig::new(1000, 200), &mut rng, &mut ()).unwrap();
    let q_table = &training.q_table;

    // A can underfoot in the middle of an otherwise empty field
    let mut grid = Grid::empty();
    let center = Pos::new(5, 5).unwrap();
    grid.set(center, true);
    let state = state_row(&encode_state(&grid, center));
    assert_eq!(q_table.best_action(state), Action::PickUp);
    assert!(q_table.get(state, Action::PickUp) > 0.0);

    // Empty top-left corner with empty tiles to the south and east
    let corner = Pos::new(0, 0).unwrap();
    let state = state_row(&encode_state(&Grid::empty(), corner));
    assert_eq!(state, 130);
    let best = select_action(q_table, state, 0.0, &mut rng);
    assert!(
        matches!(best, Action::South | Action::East),
        "Corner policy chose {best:?}"
    );
}

#[test]
fn manual_episode_matches_environment() {
    let mut grid = Grid::empty();
    grid.set(Pos::new(1, 0).unwrap(), true);
    let start = Pos::new(0, 0).unwrap();
    let mut env = CanField::new()
        .with_teleport_every(None)
        .unwrap()
        .with_world(grid.clone(), start);

    let mut rng = StdRng::seed_from_u64(0);
    let mut pos = start;
    for action in [Action::North, Action::South, Action::PickUp, Action::PickUp] {
        let expected_reward = reward(&grid, pos, action);
        pos = apply_action(&mut grid, pos, action);
        let (state, r) = env.step(action, &mut rng);

        assert_eq!(r, expected_reward as f32);
        assert_eq!(state, state_row(&encode_state(&grid, pos)));
        assert_eq!(env.pos(), pos);
    }
    assert_eq!(env.grid(), &grid);
    assert_eq!(env.report["reward"], -5.0 + 0.0 + 10.0 - 1.0);
}

#[test]
fn evaluation_leaves_table_untouched() {
    let mut rng = StdRng::seed_from_u64(5);
    let training = experiment::train(TrainConfig::new(50, 50), &mut rng, &mut ()).unwrap();
    let before = training.q_table.clone();
    experiment::evaluate(&training.q_table, &EvalConfig::new(20, 50), &mut rng).unwrap();
    assert_eq!(training.q_table, before);
    assert_ne!(before, QTable::new());
}

#[test]
fn invalid_inputs_fail_fast() {
    assert_eq!(Action::try_from(7), Err(Error::InvalidAction(7)));
    let mut cells = [[0; 10]; 10];
    cells[0][0] = 9;
    assert!(matches!(Grid::from_cells(cells), Err(Error::InvalidCell { value: 9, .. })));
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        experiment::evaluate(&QTable::new(), &EvalConfig::new(1, 0), &mut rng),
        Err(Error::InvalidCount { name: "steps", .. })
    ));
}
