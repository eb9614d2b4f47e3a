use super::test_support::*;
use super::*;
use crate::combat::DragonFight;
use crate::content::{GOBLIN, Monster, keys};
use crate::movement::{FerryOutcome, StopReason};
use crate::report::{
    ArrivalHalt, ArrivalStep, CardEffect, ClaimOutcome, ClaimRejection, DecisionOutcome,
    EventOutcome, ExplorationOutcome, SpecialAction, SpecialRejection, SpecialTileOutcome,
    TradeResult,
};
use crate::state::HealingCost;

fn alice_steps_east(game: &mut Game, intent: TileIntent) -> ChoicePromptId {
    let (prompt_id, _) = dice_prompt(game);
    game.apply_action(prompt_id, step_to(1, Pos::new(0, 1), intent)).unwrap();
    prompt_id
}

fn arrival_steps(game: &Game) -> Vec<ArrivalStep> {
    game.last_report()
        .and_then(|report| report.arrival())
        .map(|arrival| arrival.steps.clone())
        .unwrap()
}

#[test]
fn turn_rolls_one_die_per_champion_plus_one_and_passes_on() {
    let mut game = scripted_game(open_setup(), &[1, 1, 2, 2]);

    let (prompt_id, context) = dice_prompt(&mut game);
    assert_eq!(context.player, "alice");
    assert_eq!(context.dice_rolled, vec![1, 1]);
    game.apply_action(prompt_id, step_to(1, Pos::new(0, 1), TileIntent::default())).unwrap();
    let (prompt_id, context) = dice_prompt(&mut game);
    assert_eq!(context.dice_remaining, vec![1]);
    assert_eq!(context.actions_taken, 1);
    game.apply_action(prompt_id, step_to(1, Pos::new(0, 2), TileIntent::default())).unwrap();

    let ended = game.advance().stop_reason;
    assert!(matches!(ended, AdvanceStopReason::TurnEnded { round: 1, .. }));

    let (prompt_id, context) = dice_prompt(&mut game);
    assert_eq!(context.player, "bob");
    assert_eq!(context.dice_rolled, vec![2, 2]);
    game.apply_action(prompt_id, step_to(2, Pos::new(7, 6), TileIntent::default())).unwrap();
    let (prompt_id, _) = dice_prompt(&mut game);
    game.apply_action(prompt_id, step_to(2, Pos::new(7, 5), TileIntent::default())).unwrap();
    assert!(matches!(game.advance().stop_reason, AdvanceStopReason::TurnEnded { round: 1, .. }));
    assert_eq!(game.round(), 2);
    assert_eq!(player(&game, "alice").champions[0].pos, Pos::new(0, 2));
}

#[test]
fn die_missing_from_the_pool_is_rejected_without_changes() {
    let mut game = scripted_game(open_setup(), &[1, 2]);
    let (prompt_id, _) = dice_prompt(&mut game);
    let before = game.snapshot_hash();

    let err = game
        .apply_action(prompt_id, step_to(3, Pos::new(0, 1), TileIntent::default()))
        .unwrap_err();
    assert_eq!(err, GameError::Dice(DiceError::InvalidConsumption(3)));
    assert_eq!(game.snapshot_hash(), before);

    let (same_prompt, context) = dice_prompt(&mut game);
    assert_eq!(same_prompt, prompt_id);
    assert_eq!(context.dice_remaining, vec![1, 2]);
}

#[test]
fn stale_prompt_and_unknown_champion_are_contract_errors() {
    let mut game = scripted_game(open_setup(), &[1, 2]);
    let (prompt_id, _) = dice_prompt(&mut game);

    let stale = ChoicePromptId(prompt_id.0 + 5);
    assert_eq!(
        game.apply_action(stale, step_to(1, Pos::new(0, 1), TileIntent::default())),
        Err(GameError::PromptMismatch)
    );
    let ghost = Action::MoveChampion {
        die: 1,
        champion: 4,
        path: vec![Pos::new(0, 1)],
        intent: TileIntent::default(),
    };
    assert!(matches!(
        game.apply_action(prompt_id, ghost),
        Err(GameError::UnknownChampion { champion: 4, .. })
    ));
    let far = Action::Harvest { dice: vec![1], tiles: vec![Pos::new(40, 0)] };
    assert_eq!(game.apply_action(prompt_id, far), Err(GameError::UnknownTile(Pos::new(40, 0))));
}

#[test]
fn winning_against_a_tile_monster_pays_fame_and_clears_the_tile() {
    let mut setup = open_setup();
    setup.players[0].fame = 5;
    setup.players[0].might = 2;
    let mut game = scripted_game(setup, &[1, 2, 3]);
    game.state.board.tile_mut(Pos::new(0, 1)).unwrap().monster =
        Some(Monster { might: 5, fame: 3, ..GOBLIN });

    alice_steps_east(&mut game, TileIntent::default());

    let alice = player(&game, "alice");
    assert_eq!(alice.fame, 8);
    assert_eq!(alice.resources.gold, GOBLIN.reward.gold);
    assert_eq!(game.state.board.tile(Pos::new(0, 1)).unwrap().monster, None);
    assert!(
        arrival_steps(&game)
            .iter()
            .any(|step| matches!(step, ArrivalStep::TileMonster(fight) if fight.won))
    );
}

#[test]
fn losing_without_gold_costs_fame_and_sends_the_champion_home() {
    let mut setup = open_setup();
    setup.players[0].fame = 5;
    setup.players[0].might = 2;
    let mut game = scripted_game(setup, &[1, 2, 1]);
    game.state.board.tile_mut(Pos::new(0, 1)).unwrap().monster =
        Some(Monster { might: 9, ..GOBLIN });

    alice_steps_east(&mut game, TileIntent { claim_tile: true, ..TileIntent::default() });

    let alice = player(&game, "alice");
    assert_eq!(alice.fame, 4);
    assert_eq!(alice.champions[0].pos, Pos::new(0, 0));
    assert!(game.state.board.tile(Pos::new(0, 1)).unwrap().monster.is_some());
    let report = game.last_report().and_then(|report| report.arrival()).unwrap();
    assert_eq!(report.halted, Some(ArrivalHalt::ChampionDefeated));
    assert!(report.claim().is_none());
}

#[test]
fn champions_meeting_on_open_ground_duel() {
    let mut setup = open_setup();
    setup.players[1].champions = vec![Pos::new(0, 1)];
    let mut game = scripted_game(setup, &[1, 1, 3, 1]);

    alice_steps_east(&mut game, TileIntent::default());

    assert_eq!(player(&game, "alice").fame, 1);
    assert_eq!(player(&game, "bob").champions[0].pos, Pos::new(7, 7));
    let duel = arrival_steps(&game)
        .into_iter()
        .find_map(|step| match step {
            ArrivalStep::ChampionCombat(duel) => Some(duel),
            _ => None,
        })
        .unwrap();
    assert!(duel.attacker_won);
    assert_eq!(duel.ties(), 0);
}

#[test]
fn harvest_pays_only_within_the_dice_budget() {
    let mut game = scripted_game(open_setup(), &[2, 1]);
    let alice = game.state.turn_order[0];
    for x in 1..=3 {
        let tile = game.state.board.tile_mut(Pos::new(0, x)).unwrap();
        tile.kind = TileKind::Resource;
        tile.claimed_by = Some(alice);
        tile.yield_resources = ResourceBag::single(Resource::Food, 1);
    }
    let (prompt_id, _) = dice_prompt(&mut game);
    let tiles = vec![Pos::new(0, 1), Pos::new(0, 2), Pos::new(0, 3)];
    game.apply_action(prompt_id, Action::Harvest { dice: vec![2], tiles }).unwrap();

    assert_eq!(player(&game, "alice").resources.food, 2);
    let Some(ActionReport::Harvested(outcome)) = game.last_report() else {
        panic!("expected a harvest report");
    };
    assert_eq!(outcome.truncated, vec![Pos::new(0, 3)]);
    assert_eq!(dice_prompt(&mut game).1.dice_remaining, vec![1]);
}

#[test]
fn gold_threshold_on_the_doomspire_wins_without_a_roll() {
    let mut setup = open_setup();
    setup.players[0].resources = ResourceBag::new(0, 0, 0, 20);
    setup.board.tile_mut(Pos::new(0, 1)).unwrap().kind = TileKind::Doomspire;
    let mut game = scripted_game(setup, &[1, 1]);
    let prompt_id = alice_steps_east(&mut game, TileIntent::default());

    let victory = game.winner().cloned().unwrap();
    assert_eq!(victory.winner_name, "alice");
    assert_eq!(victory.kind, VictoryKind::Gold);
    let threshold = ArrivalStep::Doomspire(DragonFight::ThresholdMet(VictoryKind::Gold));
    assert!(arrival_steps(&game).contains(&threshold));
    assert!(matches!(game.advance().stop_reason, AdvanceStopReason::Finished(_)));
    assert_eq!(
        game.apply_action(prompt_id, step_to(1, Pos::new(0, 2), TileIntent::default())),
        Err(GameError::GameOver)
    );
}

#[test]
fn claiming_respects_owner_and_limit() {
    let mut setup = open_setup();
    setup.players[0].max_claims = Some(1);
    for x in 1..=2 {
        setup.board.tile_mut(Pos::new(0, x)).unwrap().kind = TileKind::Resource;
    }
    let mut game = scripted_game(setup, &[1, 1]);
    let claim = TileIntent { claim_tile: true, ..TileIntent::default() };

    alice_steps_east(&mut game, claim.clone());
    assert_eq!(
        game.last_report().and_then(|report| report.arrival()).and_then(|arrival| arrival.claim()),
        Some(&ClaimOutcome::Claimed(Pos::new(0, 1)))
    );

    let (prompt_id, _) = dice_prompt(&mut game);
    game.apply_action(prompt_id, step_to(1, Pos::new(0, 2), claim)).unwrap();
    assert_eq!(
        game.last_report().and_then(|report| report.arrival()).and_then(|arrival| arrival.claim()),
        Some(&ClaimOutcome::Rejected {
            pos: Pos::new(0, 2),
            reason: ClaimRejection::ClaimLimitReached { limit: 1 }
        })
    );
    assert_eq!(game.state.claims_of(game.state.turn_order[0]), 1);
}

#[test]
fn thief_waits_for_a_target_then_finishes_the_arrival() {
    let mut game = scripted_game(open_setup(), &[1, 1]);
    player_mut(&mut game, "bob").resources.gold = 5;
    rig_adventure(&mut game, Pos::new(0, 1), keys::EVENT_THIEF);
    alice_steps_east(&mut game, TileIntent::default());
    assert!(game.last_report().is_none());

    let (prompt_id, requests) = decision_prompt(&mut game);
    assert_eq!(
        requests,
        vec![DecisionRequest::TargetPlayer {
            player: "alice".to_string(),
            reason: TargetReason::Thief { gold_loss: 2 },
            candidates: vec!["bob".to_string()],
        }]
    );
    assert_eq!(
        game.apply_decision(
            prompt_id,
            "alice",
            DecisionResponse::TargetPlayer("alice".to_string())
        ),
        Err(GameError::InvalidChoice)
    );
    assert_eq!(
        game.apply_decision(prompt_id, "bob", DecisionResponse::TargetPlayer("bob".to_string())),
        Err(GameError::InvalidChoice)
    );
    game.apply_decision(prompt_id, "alice", DecisionResponse::TargetPlayer("bob".to_string()))
        .unwrap();

    assert_eq!(player(&game, "bob").resources.gold, 3);
    let steps = arrival_steps(&game);
    let requested =
        CardEffect::Event(EventOutcome::TargetRequested(TargetReason::Thief { gold_loss: 2 }));
    assert!(
        steps
            .iter()
            .any(|step| matches!(step, ArrivalStep::Card(card) if card.effect == requested))
    );
    assert!(steps.iter().any(|step| matches!(
        step,
        ArrivalStep::Decision(DecisionOutcome::PlayerTargeted { lost: 2, .. })
    )));
    assert_eq!(dice_prompt(&mut game).1.dice_remaining, vec![1]);
}

#[test]
fn market_day_collects_answers_in_any_order_and_settles_in_turn_order() {
    let mut game = scripted_game(open_setup(), &[1, 1]);
    player_mut(&mut game, "alice").resources.food = 2;
    player_mut(&mut game, "bob").resources.ore = 3;
    rig_adventure(&mut game, Pos::new(0, 1), keys::EVENT_MARKET_DAY);
    alice_steps_east(&mut game, TileIntent::default());

    let (prompt_id, requests) = decision_prompt(&mut game);
    assert_eq!(requests.len(), 2);
    let ore_for_gold = TradeOffer { give: Resource::Ore, receive: Resource::Gold };
    let trade = DecisionResponse::MarketDay(MarketDayChoice::Trade(ore_for_gold));
    game.apply_decision(prompt_id, "bob", trade).unwrap();
    assert_eq!(
        game.apply_decision(prompt_id, "bob", DecisionResponse::MarketDay(MarketDayChoice::Pass)),
        Err(GameError::InvalidChoice)
    );

    let (same_prompt, remaining) = decision_prompt(&mut game);
    assert_eq!(same_prompt, prompt_id);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].player(), "alice");
    let food_for_wood = TradeOffer { give: Resource::Food, receive: Resource::Wood };
    let trade = DecisionResponse::MarketDay(MarketDayChoice::Trade(food_for_wood));
    game.apply_decision(prompt_id, "alice", trade).unwrap();

    assert_eq!(player(&game, "alice").resources, ResourceBag::new(0, 1, 0, 0));
    assert_eq!(player(&game, "bob").resources, ResourceBag::new(0, 0, 1, 1));
    let trades = arrival_steps(&game)
        .into_iter()
        .find_map(|step| match step {
            ArrivalStep::Decision(DecisionOutcome::MarketDay { trades }) => Some(trades),
            _ => None,
        })
        .unwrap();
    let order: Vec<&str> = trades.iter().map(|trade| trade.player.as_str()).collect();
    assert_eq!(order, vec!["alice", "bob"]);
    assert!(
        trades.iter().all(|trade| matches!(trade.result, TradeResult::Traded { amount: 2, .. }))
    );
}

#[test]
fn full_inventory_asks_which_item_to_drop() {
    let mut game = scripted_game(open_setup(), &[1, 1]);
    player_mut(&mut game, "alice").champions[0].items =
        vec![keys::ITEM_IRON_SHIELD, keys::ITEM_RUNE_BLADE];
    rig_adventure(&mut game, Pos::new(0, 1), keys::ITEM_RUSTY_SWORD);
    alice_steps_east(&mut game, TileIntent::default());

    let (prompt_id, requests) = decision_prompt(&mut game);
    assert!(matches!(
        &requests[0],
        DecisionRequest::ItemToDrop { carried, .. } if carried.len() == 2
    ));
    assert_eq!(
        game.apply_decision(prompt_id, "alice", DecisionResponse::DropItem(ItemDrop::Carried(2))),
        Err(GameError::InvalidChoice)
    );
    game.apply_decision(prompt_id, "alice", DecisionResponse::DropItem(ItemDrop::Carried(0)))
        .unwrap();

    assert_eq!(
        player(&game, "alice").champions[0].items,
        vec![keys::ITEM_RUNE_BLADE, keys::ITEM_RUSTY_SWORD]
    );
    assert_eq!(game.state.board.tile(Pos::new(0, 1)).unwrap().items, vec![keys::ITEM_IRON_SHIELD]);
}

#[test]
fn landslide_sends_the_champion_home_and_stops_the_arrival() {
    let mut game = scripted_game(open_setup(), &[1, 1]);
    rig_adventure(&mut game, Pos::new(0, 1), keys::EVENT_LANDSLIDE);
    alice_steps_east(&mut game, TileIntent { claim_tile: true, ..TileIntent::default() });

    assert_eq!(player(&game, "alice").champions[0].pos, Pos::new(0, 0));
    let report = game.last_report().and_then(|report| report.arrival()).unwrap();
    assert_eq!(report.halted, Some(ArrivalHalt::ChampionDisplaced));
    assert!(report.claim().is_none());
    assert_eq!(game.state.board.tile(Pos::new(0, 1)).unwrap().adventure_tokens, 0);
}

#[test]
fn sudden_storm_drifts_every_boat_clockwise() {
    let mut game = scripted_game(open_setup(), &[1, 1]);
    rig_adventure(&mut game, Pos::new(0, 1), keys::EVENT_SUDDEN_STORM);
    alice_steps_east(&mut game, TileIntent::default());

    assert_eq!(player(&game, "alice").boats[0].zone, OceanZone::NorthEast);
    assert_eq!(player(&game, "bob").boats[0].zone, OceanZone::SouthWest);
}

#[test]
fn wandering_mercenary_joins_when_paid() {
    let mut game = scripted_game(open_setup(), &[1, 1]);
    player_mut(&mut game, "alice").resources.gold = 2;
    rig_adventure(&mut game, Pos::new(0, 1), keys::ENCOUNTER_WANDERING_MERCENARY);
    alice_steps_east(&mut game, TileIntent::default());

    let (prompt_id, _) = decision_prompt(&mut game);
    game.apply_decision(prompt_id, "alice", DecisionResponse::YesNo(true)).unwrap();

    let alice = player(&game, "alice");
    assert_eq!(alice.might, 2);
    assert_eq!(alice.resources.gold, 0);
}

#[test]
fn trader_swaps_at_the_configured_rate() {
    let mut setup = open_setup();
    setup.players[0].resources = ResourceBag::new(3, 0, 0, 0);
    setup.board.tile_mut(Pos::new(0, 1)).unwrap().kind = TileKind::Trader;
    let mut game = scripted_game(setup, &[1, 1]);
    let trade = TradeOffer { give: Resource::Food, receive: Resource::Ore };
    let intent = TileIntent { trade: Some(trade), visit_temple: true, ..TileIntent::default() };
    alice_steps_east(&mut game, intent);

    assert_eq!(player(&game, "alice").resources, ResourceBag::new(1, 0, 1, 0));
    let outcomes: Vec<SpecialTileOutcome> = arrival_steps(&game)
        .into_iter()
        .filter_map(|step| match step {
            ArrivalStep::SpecialTile(outcome) => Some(outcome),
            _ => None,
        })
        .collect();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0], SpecialTileOutcome::Traded { offer: trade, gave: 2 });
    assert!(matches!(
        outcomes[1],
        SpecialTileOutcome::Rejected { action: SpecialAction::VisitTemple, .. }
    ));
}

#[test]
fn same_inputs_give_the_same_snapshot() {
    let play = || {
        let mut game = scripted_game(open_setup(), &[1, 2, 3, 1, 2, 3]);
        let (prompt_id, _) = dice_prompt(&mut game);
        game.apply_action(prompt_id, step_to(2, Pos::new(1, 1), TileIntent::default())).unwrap();
        game.snapshot_hash()
    };
    assert_eq!(play(), play());
}

#[test]
fn champion_that_never_leaves_its_cell_triggers_nothing() {
    let mut setup = open_setup();
    setup.players[0].champions = vec![Pos::new(0, 1)];
    let mut game = scripted_game(setup, &[1, 1]);
    rig_adventure(&mut game, Pos::new(0, 1), keys::ENCOUNTER_OLD_SAGE);
    let claim = TileIntent { claim_tile: true, ..TileIntent::default() };

    let (prompt_id, _) = dice_prompt(&mut game);
    let stay = Action::MoveChampion { die: 1, champion: 0, path: vec![], intent: claim.clone() };
    game.apply_action(prompt_id, stay).unwrap();
    let Some(ActionReport::ChampionMoved { movement, arrival, .. }) = game.last_report() else {
        panic!("expected a champion report");
    };
    assert!(movement.visited.is_empty());
    assert!(arrival.is_none());

    let (prompt_id, context) = dice_prompt(&mut game);
    assert_eq!(context.dice_remaining, vec![1]);
    let diagonal =
        Action::MoveChampion { die: 1, champion: 0, path: vec![Pos::new(1, 2)], intent: claim };
    game.apply_action(prompt_id, diagonal).unwrap();
    let Some(ActionReport::ChampionMoved { movement, arrival, .. }) = game.last_report() else {
        panic!("expected a champion report");
    };
    assert_eq!(movement.stop, StopReason::InvalidMove);
    assert!(arrival.is_none());

    let alice = player(&game, "alice");
    assert_eq!(alice.fame, 0);
    assert_eq!(alice.champions[0].pos, Pos::new(0, 1));
    let tile = game.state.board.tile(Pos::new(0, 1)).unwrap();
    assert_eq!(tile.adventure_tokens, 1);
    assert_eq!(tile.claimed_by, None);
}

#[test]
fn exploring_reveals_the_whole_group_for_one_reward() {
    let mut setup = open_setup();
    let group = [Pos::new(0, 1), Pos::new(1, 1), Pos::new(1, 2)];
    for pos in group {
        let tile = setup.board.tile_mut(pos).unwrap();
        tile.explored = false;
        tile.group = Some(4);
    }
    setup.board.tile_mut(Pos::new(0, 2)).unwrap().explored = false;
    let mut game = scripted_game(setup, &[1, 1]);

    alice_steps_east(&mut game, TileIntent::default());

    assert_eq!(
        arrival_steps(&game)[0],
        ArrivalStep::Exploration(ExplorationOutcome::Explored { tiles: group.to_vec(), fame: 1 })
    );
    assert!(group.iter().all(|pos| game.state.board.tile(*pos).unwrap().explored));
    assert!(!game.state.board.tile(Pos::new(0, 2)).unwrap().explored);
    assert_eq!(player(&game, "alice").fame, 1);

    let (prompt_id, _) = dice_prompt(&mut game);
    game.apply_action(prompt_id, step_to(1, Pos::new(1, 1), TileIntent::default())).unwrap();
    assert_eq!(
        arrival_steps(&game)[0],
        ArrivalStep::Exploration(ExplorationOutcome::AlreadyExplored)
    );
    assert_eq!(player(&game, "alice").fame, 1);
}

#[test]
fn ferried_champion_lands_and_runs_the_arrival() {
    let mut game = scripted_game(open_setup(), &[1, 1]);
    rig_adventure(&mut game, Pos::new(2, 7), keys::ENCOUNTER_OLD_SAGE);
    let (prompt_id, _) = dice_prompt(&mut game);
    let ferry = Ferry { champion: 0, drop_at: Pos::new(2, 7), intent: TileIntent::default() };
    let path = vec![OceanZone::NorthEast];
    let action = Action::MoveBoat { die: 1, boat: 0, path, ferry: Some(ferry) };
    game.apply_action(prompt_id, action).unwrap();

    let alice = player(&game, "alice");
    assert_eq!(alice.champions[0].pos, Pos::new(2, 7));
    assert_eq!(alice.boats[0].zone, OceanZone::NorthEast);
    assert_eq!(alice.fame, 1);
    let Some(ActionReport::BoatMoved { ferry, arrival: Some(arrival), .. }) = game.last_report()
    else {
        panic!("expected a boat report with an arrival");
    };
    assert_eq!(
        *ferry,
        FerryOutcome::ChampionMoved { champion: 0, from: Pos::new(0, 0), to: Pos::new(2, 7) }
    );
    assert_eq!(arrival.card().map(|card| card.name.as_str()), Some("Old Sage"));
}

#[test]
fn refused_ferry_still_sails_the_boat_and_spends_the_die() {
    let mut setup = open_setup();
    setup.players[0].champions = vec![Pos::new(3, 3), Pos::new(0, 1)];
    let mut game = scripted_game(setup, &[1, 1, 1]);

    let (prompt_id, _) = dice_prompt(&mut game);
    let inland = Ferry { champion: 0, drop_at: Pos::new(2, 7), intent: TileIntent::default() };
    let path = vec![OceanZone::NorthEast];
    let action = Action::MoveBoat { die: 1, boat: 0, path, ferry: Some(inland) };
    game.apply_action(prompt_id, action).unwrap();
    assert!(matches!(
        game.last_report(),
        Some(ActionReport::BoatMoved {
            ferry: FerryOutcome::ChampionNotReachable { champion: 0, .. },
            arrival: None,
            ..
        })
    ));
    assert_eq!(player(&game, "alice").boats[0].zone, OceanZone::NorthEast);

    let (prompt_id, _) = dice_prompt(&mut game);
    let far = Ferry { champion: 1, drop_at: Pos::new(7, 2), intent: TileIntent::default() };
    let path = vec![OceanZone::NorthWest];
    let action = Action::MoveBoat { die: 1, boat: 0, path, ferry: Some(far) };
    game.apply_action(prompt_id, action).unwrap();
    assert!(matches!(
        game.last_report(),
        Some(ActionReport::BoatMoved {
            ferry: FerryOutcome::TargetNotReachable { champion: 1, .. },
            arrival: None,
            ..
        })
    ));

    let alice = player(&game, "alice");
    assert_eq!(alice.boats[0].zone, OceanZone::NorthWest);
    assert_eq!(alice.champions[0].pos, Pos::new(3, 3));
    assert_eq!(alice.champions[1].pos, Pos::new(0, 1));
    assert_eq!(dice_prompt(&mut game).1.dice_remaining, vec![1]);
}

#[test]
fn champions_share_peaceful_tiles_without_a_duel() {
    for kind in [TileKind::Home, TileKind::Temple, TileKind::Trader, TileKind::Mercenary] {
        let mut setup = open_setup();
        setup.players[1].champions = vec![Pos::new(0, 1)];
        setup.board.tile_mut(Pos::new(0, 1)).unwrap().kind = kind;
        let mut game = scripted_game(setup, &[1, 1]);

        alice_steps_east(&mut game, TileIntent::default());

        assert!(
            !arrival_steps(&game).iter().any(|step| matches!(step, ArrivalStep::ChampionCombat(_))),
            "duel fought on {kind:?}"
        );
        assert_eq!(player(&game, "alice").champions[0].pos, Pos::new(0, 1));
        assert_eq!(player(&game, "bob").champions[0].pos, Pos::new(0, 1));
        assert_eq!(player(&game, "alice").fame, 0);
    }
}

#[test]
fn slaying_the_dragon_ends_the_game() {
    let mut setup = open_setup();
    setup.players[0].might = 9;
    setup.board.tile_mut(Pos::new(0, 1)).unwrap().kind = TileKind::Doomspire;
    let mut game = scripted_game(setup, &[1, 1, 1, 1]);

    alice_steps_east(&mut game, TileIntent::default());

    let victory = game.winner().cloned().unwrap();
    assert_eq!(victory.winner_name, "alice");
    assert_eq!(victory.kind, VictoryKind::Combat);
    let report = game.last_report().and_then(|report| report.arrival()).unwrap();
    assert_eq!(report.halted, Some(ArrivalHalt::GameWon));
    assert!(matches!(game.advance().stop_reason, AdvanceStopReason::Finished(_)));
}

#[test]
fn losing_to_the_dragon_sends_the_champion_home_and_costs_healing() {
    let mut setup = open_setup();
    setup.players[0].resources = ResourceBag::new(0, 0, 0, 1);
    setup.board.tile_mut(Pos::new(0, 1)).unwrap().kind = TileKind::Doomspire;
    let mut game = scripted_game(setup, &[1, 1, 3, 1]);

    alice_steps_east(&mut game, TileIntent::default());

    assert!(game.winner().is_none());
    let alice = player(&game, "alice");
    assert_eq!(alice.champions[0].pos, Pos::new(0, 0));
    assert_eq!(alice.resources.gold, 0);
    let report = game.last_report().and_then(|report| report.arrival()).unwrap();
    assert_eq!(report.halted, Some(ArrivalHalt::ChampionDefeated));
    assert!(matches!(
        report.steps.last(),
        Some(ArrivalStep::Doomspire(DragonFight::Fought {
            won: false,
            dragon_might: 11,
            healing: Some(HealingCost::Gold),
            ..
        }))
    ));
}

#[test]
fn mercenary_camp_charges_gold_or_turns_the_champion_away() {
    let mut setup = open_setup();
    setup.players[0].resources = ResourceBag::new(0, 0, 0, 3);
    for x in 1..=2 {
        setup.board.tile_mut(Pos::new(0, x)).unwrap().kind = TileKind::Mercenary;
    }
    let mut game = scripted_game(setup, &[1, 1]);
    let hire = TileIntent { hire_mercenary: true, ..TileIntent::default() };

    alice_steps_east(&mut game, hire.clone());
    let hired = SpecialTileOutcome::MercenaryHired { gold_paid: 3 };
    assert!(arrival_steps(&game).contains(&ArrivalStep::SpecialTile(hired)));

    let (prompt_id, _) = dice_prompt(&mut game);
    game.apply_action(prompt_id, step_to(1, Pos::new(0, 2), hire)).unwrap();
    assert!(arrival_steps(&game).contains(&ArrivalStep::SpecialTile(SpecialTileOutcome::Rejected {
        action: SpecialAction::HireMercenary,
        reason: SpecialRejection::CannotAfford,
    })));
    let alice = player(&game, "alice");
    assert_eq!(alice.might, 2);
    assert_eq!(alice.resources.gold, 0);
}

#[test]
fn wandering_mercenary_walks_off_when_unpaid() {
    let mut game = scripted_game(open_setup(), &[1, 1]);
    rig_adventure(&mut game, Pos::new(0, 1), keys::ENCOUNTER_WANDERING_MERCENARY);
    alice_steps_east(&mut game, TileIntent::default());

    let (prompt_id, _) = decision_prompt(&mut game);
    game.apply_decision(prompt_id, "alice", DecisionResponse::YesNo(true)).unwrap();

    assert_eq!(player(&game, "alice").might, 1);
    assert!(arrival_steps(&game).iter().any(|step| matches!(
        step,
        ArrivalStep::Decision(DecisionOutcome::MercenaryUnaffordable { .. })
    )));
}
