use doomspire_core::{
    AdvanceStopReason, ContentPack, Game, GameConfig, GameSetup, Interrupt, PlayerAgent,
    RandomAgent,
};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

const NAMES: [&str; 4] = ["alice", "bob", "carol", "dave"];

fn remove_all(pool: &mut Vec<u8>, used: &[u8]) -> Result<(), String> {
    for die in used {
        let Some(index) = pool.iter().position(|candidate| candidate == die) else {
            return Err(format!("die {die} spent but not in {pool:?}"));
        };
        pool.remove(index);
    }
    Ok(())
}

fn run_random_game(
    game_seed: u64,
    agent_seed: u64,
    players: usize,
    max_steps: usize,
) -> Result<(), String> {
    let content = ContentPack::default();
    let names = &NAMES[..players];
    let setup = GameSetup::standard(names).map_err(|err| err.to_string())?;
    let mut game = Game::new(game_seed, &content, setup, GameConfig::default())
        .map_err(|err| err.to_string())?;
    let mut agents: Vec<RandomAgent> = names
        .iter()
        .enumerate()
        .map(|(index, name)| RandomAgent::new(*name, agent_seed.wrapping_add(index as u64)))
        .collect();

    for _ in 0..max_steps {
        match game.advance().stop_reason {
            AdvanceStopReason::Finished(victory) => {
                if game.view().winner.as_deref() != Some(victory.winner_name.as_str()) {
                    return Err("view disagrees about the winner".to_string());
                }
                return Ok(());
            }
            AdvanceStopReason::TurnEnded { .. } => {}
            AdvanceStopReason::Interrupted(Interrupt::DiceAction { prompt_id, context, .. }) => {
                let view = game.view();
                let Some(agent) = agents.iter_mut().find(|agent| agent.name() == context.player)
                else {
                    return Err(format!("no agent for {}", context.player));
                };
                let action = agent
                    .request_dice_action(&view, game.log(), &context)
                    .map_err(|err| err.to_string())?;
                let mut expected = context.dice_remaining.clone();
                remove_all(&mut expected, &action.dice())?;
                game.apply_action(prompt_id, action)
                    .map_err(|err| format!("action rejected: {err}"))?;

                if let Some(after) = game.turn_context() {
                    let mut remaining = after.dice_remaining.clone();
                    remaining.sort_unstable();
                    expected.sort_unstable();
                    if remaining != expected {
                        return Err(format!("dice not conserved: {remaining:?} vs {expected:?}"));
                    }
                }
            }
            AdvanceStopReason::Interrupted(Interrupt::Decision { prompt_id, requests }) => {
                let view = game.view();
                for request in requests {
                    let Some(agent) =
                        agents.iter_mut().find(|agent| agent.name() == request.player())
                    else {
                        return Err(format!("no agent for {}", request.player()));
                    };
                    let response =
                        agent.request_decision(&view, &request).map_err(|err| err.to_string())?;
                    game.apply_decision(prompt_id, request.player(), response)
                        .map_err(|err| format!("decision rejected: {err}"))?;
                }
            }
        }

        let view = game.view();
        for player in &view.players {
            if player.claims > player.max_claims as usize {
                return Err(format!("{} holds {} claims", player.name, player.claims));
            }
            for champion in &player.champions {
                let foreign_home = view
                    .players
                    .iter()
                    .any(|other| other.name != player.name && other.home == champion.pos);
                if foreign_home {
                    return Err(format!("{} champion stands on a foreign home", player.name));
                }
            }
        }
    }
    Ok(())
}

#[test]
fn random_games_keep_their_invariants() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(24));
    let inputs = (any::<u64>(), any::<u64>(), 1usize..=4);

    runner
        .run(&inputs, |(game_seed, agent_seed, players)| {
            run_random_game(game_seed, agent_seed, players, 1500).map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("random games should preserve invariants");
}
