//! Player commands and their key bindings.

/// Something the player asked for. Dispatched by [`super::Engine::handle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Click,
    /// Select the nth row (0-based) of the upgrade panel.
    Buy(usize),
    OfferPrestige,
    ConfirmPrestige,
    DeclinePrestige,
    Save,
    HardReset,
}

impl Command {
    /// Map a pressed key. `1`..`9` select upgrade rows; capital `R` wipes
    /// the save so it cannot be hit by accident while clicking.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'c' | 'C' | ' ' => Some(Command::Click),
            '1'..='9' => Some(Command::Buy(key as usize - '1' as usize)),
            'p' | 'P' => Some(Command::OfferPrestige),
            'y' | 'Y' => Some(Command::ConfirmPrestige),
            'n' | 'N' => Some(Command::DeclinePrestige),
            's' | 'S' => Some(Command::Save),
            'R' => Some(Command::HardReset),
            _ => None,
        }
    }

    /// Key shown in the help bar for an upgrade row, if it has one.
    pub fn key_for_row(row: usize) -> Option<char> {
        (row < 9).then(|| char::from(b'1' + row as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_select_rows() {
        assert_eq!(Command::from_key('1'), Some(Command::Buy(0)));
        assert_eq!(Command::from_key('9'), Some(Command::Buy(8)));
        assert_eq!(Command::from_key('0'), None);
    }

    #[test]
    fn row_keys_match_bindings() {
        for row in 0..9 {
            let key = Command::key_for_row(row).unwrap();
            assert_eq!(Command::from_key(key), Some(Command::Buy(row)));
        }
        assert_eq!(Command::key_for_row(9), None);
    }

    #[test]
    fn lowercase_r_does_not_reset() {
        assert_eq!(Command::from_key('r'), None);
        assert_eq!(Command::from_key('R'), Some(Command::HardReset));
    }

    #[test]
    fn prestige_keys() {
        assert_eq!(Command::from_key('p'), Some(Command::OfferPrestige));
        assert_eq!(Command::from_key('Y'), Some(Command::ConfirmPrestige));
        assert_eq!(Command::from_key('n'), Some(Command::DeclinePrestige));
    }
}
