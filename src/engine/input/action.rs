// Game action definitions

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Jump,
    Sprint,

    // Meta actions
    Pause,
}

impl Action {
    /// Every action, in declaration order
    pub const ALL: [Action; 7] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Sprint,
        Action::Pause,
    ];

    /// Human-readable name, used in logs and input scripts
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveForward => "move_forward",
            Self::MoveBack => "move_back",
            Self::MoveLeft => "move_left",
            Self::MoveRight => "move_right",
            Self::Jump => "jump",
            Self::Sprint => "sprint",
            Self::Pause => "pause",
        }
    }

    /// Look an action up by its [`Action::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}
