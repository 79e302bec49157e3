//! Effect execution context.

use crate::env::BattleEnv;
use crate::state::{BattleState, PieceId, Position};

/// Everything an effect callback needs while one skill resolves.
///
/// Tracks accumulated values across the stages of a single use so the
/// pipeline can report them and run the death check afterwards.
pub struct EffectContext<'a> {
    /// The piece using the skill.
    pub user: PieceId,

    /// Index of the skill in the user's list.
    pub skill: usize,

    /// User anchor when the skill was started; pushes are measured from here.
    pub origin: Position,

    /// Resolved target cell.
    pub target: Position,

    pub power: u32,

    pub state: &'a mut BattleState,

    pub env: &'a BattleEnv<'a>,

    /// Total damage dealt so far.
    pub damage_dealt: u32,

    /// Total healing done so far.
    pub healing_done: u32,

    /// Pieces hurt outside the affected set (reactions), checked for death.
    pub collateral: Vec<PieceId>,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        user: PieceId,
        skill: usize,
        origin: Position,
        target: Position,
        power: u32,
        state: &'a mut BattleState,
        env: &'a BattleEnv<'a>,
    ) -> Self {
        Self {
            user,
            skill,
            origin,
            target,
            power,
            state,
            env,
            damage_dealt: 0,
            healing_done: 0,
            collateral: Vec::new(),
        }
    }
}
