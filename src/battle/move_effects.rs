use crate::battle::commands::BattleCommand;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleState};
use crate::battle::status::{is_immune_to_status, roll_condition};
use crate::config::BattleConfig;
use crate::moves::{Move, MoveEffect};
use crate::player::Side;
use schema::{StatType, StatusType, Target};

/// What the effect pass needs to know about the move that just connected.
/// HP and status here are projections that already include this action's
/// damage and earlier effects.
#[derive(Debug, Clone)]
pub struct EffectContext {
    pub user: Side,
    pub damage_dealt: u16,
    pub projected_hp: [u16; 2],
    pub status_pending: [bool; 2],
    /// Pure status moves report failed effects; secondary effects fail silently.
    pub reports_failure: bool,
}

impl EffectContext {
    pub fn new(state: &BattleState, user: Side, move_used: &Move) -> Self {
        Self {
            user,
            damage_dealt: 0,
            projected_hp: [
                state.combatants[0].current_hp,
                state.combatants[1].current_hp,
            ],
            status_pending: [false, false],
            reports_failure: !move_used.is_damaging(),
        }
    }

    fn recipient(&self, target: Target) -> Side {
        match target {
            Target::User => self.user,
            Target::Target => self.user.opponent(),
        }
    }

    pub fn record_damage(&mut self, target: Side, amount: u16) {
        let hp = &mut self.projected_hp[target.to_index()];
        let dealt = amount.min(*hp);
        *hp -= dealt;
        if target != self.user {
            self.damage_dealt = self.damage_dealt.saturating_add(dealt);
        }
    }

    fn is_down(&self, side: Side) -> bool {
        self.projected_hp[side.to_index()] == 0
    }
}

/// Resolve every effect of a connected move, in declaration order.
pub fn apply_move_effects(
    effects: &[MoveEffect],
    ctx: &mut EffectContext,
    state: &BattleState,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let mut commands = Vec::new();
    for effect in effects {
        commands.extend(apply_move_effect(effect, ctx, state, config, rng));
    }
    commands
}

fn apply_move_effect(
    effect: &MoveEffect,
    ctx: &mut EffectContext,
    state: &BattleState,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    match *effect {
        MoveEffect::InflictStatus {
            status,
            chance,
            target,
        } => inflict_status(status, chance, ctx.recipient(target), ctx, state, config, rng),
        MoveEffect::ChangeStat {
            stat,
            stages,
            chance,
            target,
        } => change_stat(stat, stages, chance, ctx.recipient(target), ctx, rng),
        MoveEffect::Recoil { percent } => recoil(percent, ctx),
        MoveEffect::Heal { percent } => heal(percent, ctx, state),
    }
}

fn failed(ctx: &EffectContext) -> Vec<BattleCommand> {
    if ctx.reports_failure {
        vec![BattleCommand::EmitEvent(BattleEvent::MoveFailed { side: ctx.user })]
    } else {
        Vec::new()
    }
}

fn inflict_status(
    status: StatusType,
    chance: u8,
    recipient: Side,
    ctx: &mut EffectContext,
    state: &BattleState,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let combatant = state.combatant(recipient);
    if ctx.is_down(recipient)
        || combatant.status.is_some()
        || ctx.status_pending[recipient.to_index()]
        || is_immune_to_status(combatant, status)
    {
        return failed(ctx);
    }
    if !rng.percent_check(chance, "status chance") {
        return Vec::new();
    }

    let condition = roll_condition(status, config, rng);
    ctx.status_pending[recipient.to_index()] = true;
    vec![
        BattleCommand::SetStatus {
            target: recipient,
            status: Some(condition),
        },
        BattleCommand::EmitEvent(BattleEvent::StatusApplied {
            target: recipient,
            status: condition,
        }),
    ]
}

fn change_stat(
    stat: StatType,
    stages: i8,
    chance: u8,
    recipient: Side,
    ctx: &mut EffectContext,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    if ctx.is_down(recipient) {
        return failed(ctx);
    }
    if !rng.percent_check(chance, "stat change chance") {
        return Vec::new();
    }
    vec![BattleCommand::ChangeStatStage {
        target: recipient,
        stat,
        delta: stages,
    }]
}

fn recoil(percent: u8, ctx: &mut EffectContext) -> Vec<BattleCommand> {
    if ctx.damage_dealt == 0 || ctx.is_down(ctx.user) {
        return Vec::new();
    }
    let amount = (ctx.damage_dealt as u32 * percent as u32 / 100).max(1) as u16;
    ctx.record_damage(ctx.user, amount);
    vec![
        BattleCommand::EmitEvent(BattleEvent::RecoilTaken { target: ctx.user }),
        BattleCommand::DealDamage {
            target: ctx.user,
            amount,
        },
    ]
}

fn heal(percent: u8, ctx: &mut EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let user = state.combatant(ctx.user);
    let current = ctx.projected_hp[ctx.user.to_index()];
    if current == 0 || current >= user.max_hp() {
        return failed(ctx);
    }
    let amount = (user.max_hp() as u32 * percent as u32 / 100).max(1) as u16;
    let restored = amount.min(user.max_hp() - current);
    ctx.projected_hp[ctx.user.to_index()] += restored;
    vec![BattleCommand::Heal {
        target: ctx.user,
        amount,
    }]
}
