//! Battle descriptors: already-parsed scene data handed in by an outer layer.

use crate::board::{Board, TerrainTable, TileCode};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    BattleState, DialogTrigger, PieceId, Position, PresentationIntent, Side, TurnLimits, UnitSpawn,
};

use super::{BattleEnv, UnitOracle, UnitTemplate};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleDescriptor {
    pub width: u32,
    pub height: u32,
    /// Row-major tile codes; missing rows or columns are open floor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub terrain: Vec<Vec<TileCode>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub deploy_cells: Vec<Position>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spawns: Vec<UnitSpawn>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub limits: TurnLimits,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_deploy: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dialogs: Vec<DialogTrigger>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DescriptorError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: u32, height: u32 },

    #[error("cell {0} lies outside the board")]
    CellOutOfBounds(Position),
}

impl GameError for DescriptorError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyBoard { .. } => "DESCRIPTOR_EMPTY_BOARD",
            Self::CellOutOfBounds(_) => "DESCRIPTOR_CELL_OUT_OF_BOUNDS",
        }
    }
}

impl BattleDescriptor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            terrain: Vec::new(),
            deploy_cells: Vec::new(),
            spawns: Vec::new(),
            limits: TurnLimits::default(),
            max_deploy: None,
            dialogs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_spawn(
        mut self,
        unit: impl Into<String>,
        at: Position,
        side: Side,
        turn: u32,
    ) -> Self {
        self.spawns.push(UnitSpawn {
            at,
            turn,
            unit: unit.into(),
            side,
        });
        self
    }

    fn validate(&self) -> Result<(), DescriptorError> {
        if self.width == 0 || self.height == 0 {
            return Err(DescriptorError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        let inside = |p: &Position| {
            p.x >= 0 && p.y >= 0 && p.x < self.width as i32 && p.y < self.height as i32
        };
        self.deploy_cells
            .iter()
            .chain(self.spawns.iter().map(|spawn| &spawn.at))
            .find(|p| !inside(p))
            .map_or(Ok(()), |p| Err(DescriptorError::CellOutOfBounds(*p)))
    }

    /// Builds the pre-battle state.
    ///
    /// Spawns due on turn 1 or earlier are placed now; when a deploy area
    /// exists, allied ones arrive as guests and `party` is put on the
    /// deployment roster. A spawn whose cells are blocked is retried as a
    /// turn-2 reinforcement. Unknown unit keys resolve to the base template.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] for an empty board or out-of-bounds cells.
    pub fn build(
        &self,
        env: &BattleEnv<'_>,
        party: &[UnitTemplate],
    ) -> Result<BattleState, DescriptorError> {
        self.validate()?;
        let standard;
        let table = match env.terrain() {
            Some(table) => table,
            None => {
                standard = TerrainTable::standard();
                &standard
            }
        };

        let mut state = BattleState::new(Board::from_codes(
            self.width,
            self.height,
            &self.terrain,
            table,
        ));
        state.limits = self.limits;
        state.dialogs = self.dialogs.clone();
        state.deploy_cells = self.deploy_cells.clone();
        state.max_deploy = self
            .max_deploy
            .unwrap_or(env.config().default_max_deploy);

        let deploying = !self.deploy_cells.is_empty();
        for spawn in &self.spawns {
            if spawn.turn > 1 {
                state.reinforcements.push(spawn.clone());
                continue;
            }
            let guest = deploying && spawn.side == Side::Ally;
            if state.spawn_unit(env.units(), spawn, guest).is_none() {
                state.reinforcements.push(UnitSpawn {
                    turn: 2,
                    ..spawn.clone()
                });
            }
        }

        if deploying {
            for template in party {
                state.add_party_piece(template.instantiate());
            }
        }
        Ok(state)
    }
}

impl BattleState {
    /// Builds a battle from `descriptor`; see [`BattleDescriptor::build`].
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] when the descriptor is malformed.
    pub fn from_descriptor(
        descriptor: &BattleDescriptor,
        env: &BattleEnv<'_>,
        party: &[UnitTemplate],
    ) -> Result<Self, DescriptorError> {
        descriptor.build(env, party)
    }

    /// Instantiates and places one scheduled unit.
    ///
    /// Returns `None`, creating nothing, when the unit's cells are not free.
    pub fn spawn_unit(
        &mut self,
        units: &dyn UnitOracle,
        spawn: &UnitSpawn,
        guest: bool,
    ) -> Option<PieceId> {
        let template = units.template_or_base(&spawn.unit);
        let mut piece = template.instantiate();
        if !self.is_free(spawn.at, piece.footprint) {
            return None;
        }
        piece.guest = guest;
        let team = match spawn.side {
            Side::Ally => self.player_team(),
            Side::Enemy => self.enemy_team(),
        };
        let id = self.add_piece(piece, Some(team));
        self.move_piece(id, spawn.at).ok()?;
        self.push_intent(PresentationIntent::Spawn {
            piece: id,
            at: spawn.at,
        });
        Some(id)
    }
}
