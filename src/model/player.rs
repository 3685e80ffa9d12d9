use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::NameError;

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Player {
    /// Stable token, generated once per install.
    pub id: String,
    pub name: String,
    pub is_name_editable: bool,
}

impl Player {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = format!("{:032x}", rng.r#gen::<u128>());
        let name = format!("Player-{}", id[..4].to_uppercase());
        Self { id, name, is_name_editable: true }
    }

    /// Sets the display name once; further renames need [`Player::unlock_name`].
    pub fn rename(&mut self, raw: &str) -> Result<(), NameError> {
        if !self.is_name_editable {
            return Err(NameError::Locked);
        }
        let trimmed = raw.trim();
        let chars = trimmed.chars().count();
        if chars < NAME_MIN_CHARS {
            return Err(NameError::TooShort { min: NAME_MIN_CHARS });
        }
        if chars > NAME_MAX_CHARS {
            return Err(NameError::TooLong { max: NAME_MAX_CHARS });
        }
        self.name = trimmed.to_string();
        self.is_name_editable = false;
        Ok(())
    }

    pub fn unlock_name(&mut self) {
        self.is_name_editable = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player() -> Player {
        Player::generate(&mut ChaCha8Rng::seed_from_u64(7))
    }

    #[test]
    fn generated_player_has_default_name() {
        let p = player();
        assert_eq!(p.id.len(), 32);
        assert!(p.name.starts_with("Player-"));
        assert!(p.is_name_editable);
    }

    #[test]
    fn rename_locks_after_first_success() {
        let mut p = player();
        assert_eq!(p.rename("  ab "), Err(NameError::TooShort { min: 3 }));
        assert!(p.is_name_editable);
        assert_eq!(p.rename(&"x".repeat(21)), Err(NameError::TooLong { max: 20 }));
        p.rename("  Merger  ").unwrap();
        assert_eq!(p.name, "Merger");
        assert_eq!(p.rename("Other"), Err(NameError::Locked));
        p.unlock_name();
        p.rename("Other").unwrap();
        assert_eq!(p.name, "Other");
    }
}
