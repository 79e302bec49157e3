use super::{PieceId, Side, TeamId};

/// A named group of pieces fighting on one side.
///
/// Members are shared references into the battle's piece table; each piece
/// also records its team.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub side: Side,
    /// Turns for this team are chosen by the AI selector.
    pub auto_control: bool,
    members: Vec<PieceId>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, side: Side) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            auto_control: false,
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn auto_controlled(mut self, auto_control: bool) -> Self {
        self.auto_control = auto_control;
        self
    }

    pub fn members(&self) -> &[PieceId] {
        &self.members
    }

    pub fn contains(&self, piece: PieceId) -> bool {
        self.members.contains(&piece)
    }

    pub(crate) fn add_member(&mut self, piece: PieceId) {
        if !self.contains(piece) {
            self.members.push(piece);
        }
    }

    pub(crate) fn remove_member(&mut self, piece: PieceId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != piece);
        before != self.members.len()
    }
}
