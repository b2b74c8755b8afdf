use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckType {
    /// Standard deck: job piles hold Ace..5 per suit, one reveal per year.
    #[serde(rename = "52")]
    Full52,
    /// Reduced deck: a single Ace per suit marks each job pile; jobs pay no
    /// card reward.
    #[serde(rename = "36")]
    Reduced36,
}

impl Default for DeckType {
    fn default() -> Self {
        DeckType::Full52
    }
}

/// The toggleable rule variants, fixed at game creation.
///
/// `special_effects` and `nomenclature` are the same dial under two names:
/// older snapshots carry `nomenclature`, newer front ends send
/// `specialEffects`. Either one turns the trump face-card effects on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantConfig {
    pub deck_type: DeckType,
    pub special_effects: bool,
    pub nomenclature: bool,
    pub medals_count: bool,
    #[serde(alias = "accumulateJobs")]
    pub accumulate_unclaimed_jobs: bool,
    pub allow_swap: bool,
    pub orden_nachalniku: bool,
    pub mice_variant: bool,
    pub northern_style: bool,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            deck_type: DeckType::Full52,
            special_effects: true,
            nomenclature: false,
            medals_count: false,
            accumulate_unclaimed_jobs: false,
            allow_swap: false,
            orden_nachalniku: false,
            mice_variant: false,
            northern_style: false,
        }
    }
}

impl VariantConfig {
    pub const fn is_reduced_deck(&self) -> bool {
        matches!(self.deck_type, DeckType::Reduced36)
    }

    /// Drunkard / informant / party-official rules active?
    pub const fn face_effects(&self) -> bool {
        self.special_effects || self.nomenclature
    }

    /// Stack-based vulnerability; only meaningful with the reduced deck.
    pub const fn orden_enabled(&self) -> bool {
        self.orden_nachalniku && self.is_reduced_deck()
    }

    /// Global-highest-card seizure; northern style forces it.
    pub const fn mice_enabled(&self) -> bool {
        self.mice_variant || self.northern_style
    }

    /// Unclaimed job rewards only exist in full-deck mode, and northern
    /// style plays without job rewards altogether.
    pub const fn carries_unclaimed_rewards(&self) -> bool {
        !self.is_reduced_deck() && !self.northern_style
    }
}

#[cfg(test)]
mod tests {
    use super::{DeckType, VariantConfig};

    #[test]
    fn orden_requires_reduced_deck() {
        let mut variants = VariantConfig {
            orden_nachalniku: true,
            ..VariantConfig::default()
        };
        assert!(!variants.orden_enabled());
        variants.deck_type = DeckType::Reduced36;
        assert!(variants.orden_enabled());
    }

    #[test]
    fn either_flag_enables_face_effects() {
        let variants = VariantConfig {
            special_effects: false,
            nomenclature: true,
            ..VariantConfig::default()
        };
        assert!(variants.face_effects());
    }

    #[test]
    fn northern_style_forces_mice() {
        let variants = VariantConfig {
            northern_style: true,
            ..VariantConfig::default()
        };
        assert!(variants.mice_enabled());
        assert!(!variants.carries_unclaimed_rewards());
    }

    #[test]
    fn deck_type_serializes_as_string() {
        let json = serde_json::to_string(&DeckType::Reduced36).unwrap();
        assert_eq!(json, "\"36\"");
        let config: VariantConfig =
            serde_json::from_str(r#"{"deckType":"36","accumulateJobs":true}"#).unwrap();
        assert_eq!(config.deck_type, DeckType::Reduced36);
        assert!(config.accumulate_unclaimed_jobs);
    }
}
