use crate::battle::commands::{execute_command_batch, BattleCommand, ExecutionError};
use crate::battle::resolver::{resolve_action, validate_action, valid_actions};
use crate::battle::rng::BattleRng;
use crate::battle::runner::ActionSource;
use crate::battle::state::{
    BattleEvent, BattleKind, BattleOutcome, BattleState, EventBus, GameState,
};
use crate::battle::status::end_of_turn;
use crate::battle::turn_orchestrator::determine_action_order;
use crate::config::BattleConfig;
use crate::errors::{ActionError, BattleEngineError, BattleResult, BattleStateError};
use crate::player::{Bag, PlayerAction, Side};
use crate::pokemon::{Combatant, StatusCondition};
use crate::progression::{apply_experience, RewardCalculator};
use log::{debug, info, warn};
use schema::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the outside world needs once a battle is over.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub turns_taken: u32,
    pub final_hp: [u16; 2],
    pub status: [Option<StatusCondition>; 2],
    pub pp_remaining: [Vec<u8>; 2],
    pub experience_awarded: u32,
    pub level_after: u8,
    pub levels_gained: u8,
    /// Paid out for trainer victories only.
    pub prize_money: u32,
    pub caught_combatant: Option<Combatant>,
    /// Items the player used up, for the inventory.
    pub items_consumed: Vec<(Item, u8)>,
}

impl BattleReport {
    pub fn from_state(state: &BattleState) -> Self {
        let mut consumed: BTreeMap<Item, u8> = BTreeMap::new();
        for (side, item) in &state.items_used {
            if *side == Side::Player {
                *consumed.entry(*item).or_insert(0) += 1;
            }
        }

        let [player, opponent] = &state.combatants;
        Self {
            outcome: state.outcome,
            turns_taken: state.turn_number,
            final_hp: [player.current_hp, opponent.current_hp],
            status: [player.status, opponent.status],
            pp_remaining: [
                player.moves.iter().map(|m| m.pp).collect(),
                opponent.moves.iter().map(|m| m.pp).collect(),
            ],
            experience_awarded: state.experience_awarded,
            level_after: player.level,
            levels_gained: state.levels_gained,
            prize_money: state.prize_money,
            caught_combatant: (state.outcome == BattleOutcome::Caught).then(|| opponent.clone()),
            items_consumed: consumed.into_iter().collect(),
        }
    }
}

/// The battle state machine. Owns one encounter from the first action
/// selection to the terminal outcome.
#[derive(Debug, Clone)]
pub struct BattleEngine {
    state: BattleState,
    config: BattleConfig,
    report: Option<BattleReport>,
}

fn inconsistent(error: ExecutionError) -> BattleEngineError {
    BattleStateError::InconsistentState(error.to_string()).into()
}

impl BattleEngine {
    pub fn new(
        mut player: Combatant,
        mut opponent: Combatant,
        kind: BattleKind,
        config: BattleConfig,
    ) -> BattleResult<Self> {
        player.validate()?;
        opponent.validate()?;
        config.validate()?;
        if player.is_fainted() || opponent.is_fainted() {
            return Err(BattleStateError::InconsistentState(
                "a battle cannot start with a fainted combatant".to_string(),
            )
            .into());
        }
        player.stages.clear();
        opponent.stages.clear();
        Ok(Self {
            state: BattleState::new(player, opponent, kind),
            config,
            report: None,
        })
    }

    pub fn with_bags(mut self, player_bag: Bag, opponent_bag: Bag) -> Self {
        self.state.bags = [player_bag, opponent_bag];
        self
    }

    /// Resume from a saved state, e.g. one restored with
    /// [`BattleState::from_snapshot`].
    pub fn from_state(state: BattleState, config: BattleConfig) -> BattleResult<Self> {
        for combatant in &state.combatants {
            combatant.validate()?;
        }
        config.validate()?;
        let report = state.is_terminal().then(|| BattleReport::from_state(&state));
        Ok(Self {
            state,
            config,
            report,
        })
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn game_state(&self) -> GameState {
        self.state.game_state
    }

    pub fn outcome(&self) -> BattleOutcome {
        self.state.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn report(&self) -> Option<&BattleReport> {
        self.report.as_ref()
    }

    pub fn valid_actions(&self, side: Side) -> Vec<PlayerAction> {
        valid_actions(&self.state, side)
    }

    pub fn validate_action(&self, side: Side, action: &PlayerAction) -> BattleResult<()> {
        validate_action(&self.state, side, action)
    }

    /// Queue one side's action for this turn. Rejected actions leave the
    /// state untouched.
    pub fn submit_action(&mut self, side: Side, action: PlayerAction) -> BattleResult<()> {
        if self.state.is_terminal() {
            return Err(BattleEngineError::AlreadyTerminal(self.state.outcome));
        }
        if self.state.action_queue[side.to_index()].is_some() {
            warn!("{:?} already chose an action this turn", side);
            return Err(ActionError::AlreadySubmitted.into());
        }
        if let Err(error) = validate_action(&self.state, side, &action) {
            warn!("rejected {:?} for {:?}: {}", action, side, error);
            return Err(error);
        }

        self.state.action_queue[side.to_index()] = Some(action);
        if self.ready_for_turn_resolution() {
            self.state.game_state = GameState::ResolvingTurn;
        }
        Ok(())
    }

    pub fn ready_for_turn_resolution(&self) -> bool {
        !self.state.is_terminal()
            && self.state.action_queue[0].is_some()
            && self.state.action_queue[1].is_some()
    }

    /// Resolve the queued turn: ordered actions, the end-of-turn pass, then
    /// the end check. Returns the events in the order they happened.
    pub fn resolve_turn(&mut self, rng: &mut dyn BattleRng) -> BattleResult<EventBus> {
        if self.state.is_terminal() {
            return Err(BattleEngineError::AlreadyTerminal(self.state.outcome));
        }
        let (Some(player_action), Some(opponent_action)) =
            (self.state.action_queue[0], self.state.action_queue[1])
        else {
            return Err(BattleEngineError::NotReady);
        };
        let actions = [player_action, opponent_action];

        let mut bus = EventBus::new();
        self.state.game_state = GameState::ResolvingTurn;
        debug!("turn {} begins", self.state.turn_number);
        bus.push(BattleEvent::TurnStarted {
            turn_number: self.state.turn_number,
        });

        let order = determine_action_order(&self.state, &actions, &self.config, rng);
        let mut deciding_faint = None;

        for side in order {
            let commands = resolve_action(
                &self.state,
                side,
                &actions[side.to_index()],
                &self.config,
                rng,
            );
            if let Some(fainted) = self.run_step(commands, &mut bus)? {
                deciding_faint = Some(fainted);
                break;
            }
            if self.state.is_terminal() {
                break;
            }
        }

        if deciding_faint.is_none() && !self.state.is_terminal() {
            for side in [order[1], order[0]] {
                let commands = end_of_turn(side, self.state.combatant(side), &self.config);
                if let Some(fainted) = self.run_step(commands, &mut bus)? {
                    deciding_faint = Some(fainted);
                }
            }
        }

        self.check_end(deciding_faint, &mut bus);
        bus.push(BattleEvent::TurnEnded);
        self.state.action_queue = [None, None];

        if self.state.is_terminal() {
            self.finish(&mut bus);
        } else {
            self.state.turn_number += 1;
            self.state.game_state = GameState::SelectingAction;
        }
        debug!("turn resolved with {} events", bus.len());
        Ok(bus)
    }

    /// Execute one step. Returns which sides fainted during it, if any did.
    fn run_step(
        &mut self,
        commands: Vec<BattleCommand>,
        bus: &mut EventBus,
    ) -> BattleResult<Option<[bool; 2]>> {
        let before = self.fainted();
        execute_command_batch(commands, &mut self.state, bus).map_err(inconsistent)?;
        let after = self.fainted();
        let newly = [after[0] && !before[0], after[1] && !before[1]];
        Ok((newly[0] || newly[1]).then_some(newly))
    }

    fn fainted(&self) -> [bool; 2] {
        [
            self.state.combatants[0].is_fainted(),
            self.state.combatants[1].is_fainted(),
        ]
    }

    fn check_end(&mut self, deciding_faint: Option<[bool; 2]>, bus: &mut EventBus) {
        self.state.game_state = GameState::CheckEnd;
        if self.state.is_terminal() {
            return;
        }
        let outcome = match deciding_faint {
            Some([true, true]) => {
                bus.push(BattleEvent::DoubleFaint);
                BattleOutcome::Loss
            }
            Some([true, false]) => BattleOutcome::Loss,
            Some([false, true]) => BattleOutcome::Win,
            _ => return,
        };
        self.state.outcome = outcome;
        if outcome == BattleOutcome::Win {
            self.award_experience(bus);
            self.award_prize_money(bus);
        }
    }

    fn award_experience(&mut self, bus: &mut EventBus) {
        if self.state.combatant(Side::Player).is_fainted() {
            return;
        }
        let amount = RewardCalculator::new(&self.config.experience)
            .experience_for_defeat(self.state.combatant(Side::Opponent), self.state.kind);
        if amount == 0 {
            return;
        }

        bus.push(BattleEvent::ExperienceGained {
            side: Side::Player,
            amount,
        });
        let max_level = self.config.experience.max_level;
        let result = apply_experience(self.state.combatant_mut(Side::Player), amount, max_level);
        if result.levels_gained() > 0 {
            bus.push(BattleEvent::LeveledUp {
                side: Side::Player,
                new_level: result.new_level,
            });
        }
        self.state.experience_awarded += amount;
        self.state.levels_gained += result.levels_gained();
    }

    fn award_prize_money(&mut self, bus: &mut EventBus) {
        let amount = RewardCalculator::new(&self.config.experience)
            .prize_money(self.state.combatant(Side::Opponent), self.state.kind);
        if amount == 0 {
            return;
        }
        debug!("prize money awarded: {}", amount);
        bus.push(BattleEvent::PrizeMoneyAwarded { amount });
        self.state.prize_money += amount;
    }

    fn finish(&mut self, bus: &mut EventBus) {
        self.state.game_state = GameState::Finished;
        bus.push(BattleEvent::BattleEnded {
            outcome: self.state.outcome,
        });
        info!(
            "battle ended: {:?} after {} turns",
            self.state.outcome, self.state.turn_number
        );
        self.report = Some(BattleReport::from_state(&self.state));
    }

    /// Submit both actions and resolve the turn.
    pub fn play_turn(
        &mut self,
        player_action: PlayerAction,
        opponent_action: PlayerAction,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<EventBus> {
        self.submit_action(Side::Player, player_action)?;
        if let Err(error) = self.submit_action(Side::Opponent, opponent_action) {
            self.state.action_queue = [None, None];
            self.state.game_state = GameState::SelectingAction;
            return Err(error);
        }
        self.resolve_turn(rng)
    }

    /// Drive the battle to its end, asking each source for actions whenever
    /// the machine waits in action selection.
    pub fn run(
        &mut self,
        player_source: &mut dyn ActionSource,
        opponent_source: &mut dyn ActionSource,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<BattleReport> {
        while !self.state.is_terminal() {
            self.collect_action(Side::Player, player_source)?;
            self.collect_action(Side::Opponent, opponent_source)?;
            let bus = self.resolve_turn(rng)?;
            player_source.observe(&self.state, &bus);
            opponent_source.observe(&self.state, &bus);
        }
        self.report
            .clone()
            .ok_or(BattleEngineError::AlreadyTerminal(self.state.outcome))
    }

    fn collect_action(&mut self, side: Side, source: &mut dyn ActionSource) -> BattleResult<()> {
        let mut attempts = 0;
        loop {
            let action = source.choose_action(&self.state, side);
            match self.submit_action(side, action) {
                Ok(()) => return Ok(()),
                Err(error) => {
                    attempts += 1;
                    if attempts >= self.config.max_rejected_actions {
                        return Err(error);
                    }
                    source.on_rejected(&action, &error);
                }
            }
        }
    }
}
