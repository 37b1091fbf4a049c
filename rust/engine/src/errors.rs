use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Deck exhausted: requested {requested} cards, {remaining} remaining")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Showdown needs 5 community cards, got {0}")]
    IncompleteBoard(usize),
    #[error("Player {0} does not hold exactly two hole cards")]
    InvalidHoleCards(String),
    #[error("At least {minimum} players required, got {actual}")]
    TooFewPlayers { minimum: usize, actual: usize },
    #[error("At most {maximum} players supported, got {actual}")]
    TooManyPlayers { maximum: usize, actual: usize },
    #[error("Duplicate player name: {0}")]
    DuplicatePlayer(String),
    #[error("{players} players with {chips} chips each exceed the table limit of {limit} chips per player")]
    TooManyChips { players: usize, chips: u32, limit: u32 },
    #[error("Match already over")]
    MatchOver,
    #[error("Failed to export round record: {0}")]
    Export(String),
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("No round in progress")]
    NoRound,
    #[error("No free file name for timestamp {0}")]
    NameExhausted(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<RecordError> for GameError {
    fn from(e: RecordError) -> Self {
        GameError::Export(e.to_string())
    }
}
