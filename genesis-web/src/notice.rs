//! Short-lived toast messages shown after session commands.
use genesis_game::{CommandOutcome, GameError, LoadOutcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: &str) -> Self {
        Self {
            level,
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn saved() -> Self {
        Self::new(NoticeLevel::Success, "Το παιχνίδι αποθηκεύτηκε! 💾")
    }

    #[must_use]
    pub fn save_failed() -> Self {
        Self::new(NoticeLevel::Error, "Σφάλμα αποθήκευσης! ❌")
    }

    #[must_use]
    pub fn nothing_to_load() -> Self {
        Self::new(
            NoticeLevel::Warning,
            "Δεν βρέθηκε αποθηκευμένο παιχνίδι! 📂",
        )
    }

    #[must_use]
    pub fn loaded() -> Self {
        Self::new(NoticeLevel::Success, "Το παιχνίδι φορτώθηκε! 📂")
    }

    #[must_use]
    pub fn load_failed() -> Self {
        Self::new(NoticeLevel::Error, "Σφάλμα φόρτωσης! ❌")
    }

    #[must_use]
    pub fn new_game() -> Self {
        Self::new(NoticeLevel::Success, "Νέο παιχνίδι ξεκίνησε! 🆕")
    }

    #[must_use]
    pub fn new_game_failed() -> Self {
        Self::new(NoticeLevel::Error, "Σφάλμα νέου παιχνιδιού! ❌")
    }

    #[must_use]
    pub fn resumed() -> Self {
        Self::new(
            NoticeLevel::Info,
            "Συνέχιση από αποθηκευμένο παιχνίδι 📂",
        )
    }

    /// Toast for a save, load or new-game result.
    #[must_use]
    pub fn for_command(result: &Result<CommandOutcome, GameError>) -> Option<Self> {
        match result {
            Ok(CommandOutcome::Saved) => Some(Self::saved()),
            Ok(CommandOutcome::Loaded(LoadOutcome::NothingToLoad)) => {
                Some(Self::nothing_to_load())
            }
            Ok(CommandOutcome::Loaded(LoadOutcome::Loaded { .. })) => Some(Self::loaded()),
            Ok(CommandOutcome::NewGame { clear_error: None }) => Some(Self::new_game()),
            Ok(CommandOutcome::NewGame {
                clear_error: Some(_),
            }) => Some(Self::new_game_failed()),
            Ok(CommandOutcome::Combined(_) | CommandOutcome::Hint(_)) => None,
            Err(GameError::PersistenceWriteFailure(_)) => Some(Self::save_failed()),
            Err(GameError::CorruptState(_) | GameError::PersistenceReadFailure(_)) => {
                Some(Self::load_failed())
            }
            Err(GameError::InvalidInput { .. }) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_results_map_to_toasts() {
        assert_eq!(
            Notice::for_command(&Ok(CommandOutcome::Saved)),
            Some(Notice::saved())
        );
        assert_eq!(
            Notice::for_command(&Ok(CommandOutcome::Loaded(LoadOutcome::NothingToLoad))),
            Some(Notice::nothing_to_load())
        );
        assert_eq!(
            Notice::for_command(&Err(GameError::CorruptState("bad".into()))),
            Some(Notice::load_failed())
        );
        assert_eq!(
            Notice::for_command(&Ok(CommandOutcome::NewGame {
                clear_error: Some(GameError::PersistenceWriteFailure("quota".into()))
            }))
            .map(|notice| notice.level),
            Some(NoticeLevel::Error)
        );
        assert!(Notice::for_command(&Ok(CommandOutcome::Hint(None))).is_none());
    }
}
