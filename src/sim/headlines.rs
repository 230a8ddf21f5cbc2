//! News ticker headlines per stage, loaded from `content/headlines.json`.

use std::collections::BTreeMap;

use crate::logging;

use super::catalog::ContentError;

const BUILTIN_HEADLINES: &str = include_str!("../../content/headlines.json");

/// Used when the content file is missing a stage or cannot be read.
const FALLBACK: &[&str] = &[
    "Markets react to things happening",
    "Experts agree the numbers are going up",
    "Local simulation running as expected",
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Headlines {
    by_stage: BTreeMap<u8, Vec<String>>,
}

impl Headlines {
    /// Parse `{ "1": ["...", ...], "2": [...] }`.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let mut by_stage: BTreeMap<u8, Vec<String>> = serde_json::from_str(json)?;
        by_stage.retain(|_, lines| !lines.is_empty());
        Ok(Self { by_stage })
    }

    /// Shipped headlines, or the fallback set if they cannot be read.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_HEADLINES).unwrap_or_else(|e| {
            logging::warn(&format!("headlines unavailable, using fallback: {e}"));
            Self::default()
        })
    }

    /// Headline number `index` for `stage`, wrapping around.
    pub fn get(&self, stage: u8, index: u32) -> &str {
        match self.by_stage.get(&stage) {
            Some(lines) => &lines[index as usize % lines.len()],
            None => FALLBACK[index as usize % FALLBACK.len()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_stage() {
        let h = Headlines::builtin();
        for stage in 1..=6u8 {
            assert!(h.by_stage.contains_key(&stage), "stage {stage}");
        }
    }

    #[test]
    fn rotation_wraps() {
        let h = Headlines::from_json(r#"{"1": ["a", "b"]}"#).unwrap();
        assert_eq!(h.get(1, 0), "a");
        assert_eq!(h.get(1, 1), "b");
        assert_eq!(h.get(1, 2), "a");
    }

    #[test]
    fn missing_stage_falls_back() {
        let h = Headlines::from_json(r#"{"1": ["a"], "2": []}"#).unwrap();
        assert_eq!(h.get(2, 0), FALLBACK[0]);
        assert_eq!(h.get(5, 1), FALLBACK[1]);
    }

    #[test]
    fn unreadable_content_is_an_error() {
        assert!(Headlines::from_json("[]").is_err());
        assert_eq!(Headlines::default().get(1, 0), FALLBACK[0]);
    }
}
