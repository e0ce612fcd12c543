//! Type matchup helpers for decision making

use crate::types::{Creature, Type};

/// Damage band of an attacking type against a two-slot defender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effectiveness {
    NoEffect,
    Quarter,
    Half,
    Normal,
    Double,
    Quadruple,
}

impl Effectiveness {
    pub const ALL: [Effectiveness; 6] = [
        Effectiveness::NoEffect,
        Effectiveness::Quarter,
        Effectiveness::Half,
        Effectiveness::Normal,
        Effectiveness::Double,
        Effectiveness::Quadruple,
    ];

    /// Band for an exact chart product, `None` if no band matches
    pub fn from_multiplier(product: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.multiplier() == product)
    }

    /// Band for a chart product, falling back to `Normal`
    pub fn classify(product: f32) -> Self {
        Self::from_multiplier(product).unwrap_or(Effectiveness::Normal)
    }

    pub fn multiplier(&self) -> f32 {
        match self {
            Effectiveness::NoEffect => 0.0,
            Effectiveness::Quarter => 0.25,
            Effectiveness::Half => 0.5,
            Effectiveness::Normal => 1.0,
            Effectiveness::Double => 2.0,
            Effectiveness::Quadruple => 4.0,
        }
    }

    /// Human-readable descriptor used to annotate moves
    pub fn descriptor(&self) -> &'static str {
        match self {
            Effectiveness::NoEffect => "no effect",
            Effectiveness::Quarter => "quarter damage",
            Effectiveness::Half => "half damage",
            Effectiveness::Normal => "normal damage",
            Effectiveness::Double => "double damage",
            Effectiveness::Quadruple => "quadruple damage",
        }
    }
}

impl std::fmt::Display for Effectiveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor())
    }
}

/// Effectiveness of `attacking` against a defender typed `(defending_1, defending_2)`
///
/// Single-typed defenders pass `Type::NotSpecified` as the second slot.
pub fn effectiveness(attacking: Type, defending_1: Type, defending_2: Type) -> Effectiveness {
    Effectiveness::classify(attacking.multiplier(defending_1) * attacking.multiplier(defending_2))
}

/// Effectiveness of `attacking` against a creature's current typing
pub fn effectiveness_against(attacking: Type, defender: &Creature) -> Effectiveness {
    effectiveness(attacking, defender.type1, defender.type2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CreatureFields;

    #[test]
    fn test_every_product_has_a_band() {
        for attacking in Type::all() {
            for defending_1 in Type::all() {
                for defending_2 in Type::all() {
                    let product =
                        attacking.multiplier(*defending_1) * attacking.multiplier(*defending_2);
                    assert!(
                        Effectiveness::from_multiplier(product).is_some(),
                        "{attacking} vs {defending_1}/{defending_2} gave {product}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_second_slot_not_specified_matches_single_type() {
        for attacking in Type::all() {
            for defending in Type::all() {
                assert_eq!(
                    effectiveness(*attacking, *defending, Type::NotSpecified),
                    Effectiveness::classify(attacking.multiplier(*defending))
                );
            }
        }
    }

    #[test]
    fn test_not_specified_pairs_are_normal() {
        for t in Type::all() {
            assert_eq!(
                effectiveness(Type::NotSpecified, *t, *t),
                Effectiveness::Normal
            );
            assert_eq!(
                effectiveness(*t, Type::NotSpecified, Type::NotSpecified),
                Effectiveness::Normal
            );
        }
    }

    #[test]
    fn test_bands() {
        assert_eq!(
            effectiveness(Type::Water, Type::Fire, Type::Rock),
            Effectiveness::Quadruple
        );
        assert_eq!(
            effectiveness(Type::Electric, Type::Ground, Type::NotSpecified),
            Effectiveness::NoEffect
        );
        assert_eq!(
            effectiveness(Type::Fire, Type::Water, Type::Dragon),
            Effectiveness::Quarter
        );
        assert_eq!(
            effectiveness(Type::Fire, Type::Water, Type::NotSpecified),
            Effectiveness::Half
        );
        assert_eq!(
            effectiveness(Type::Ice, Type::Dragon, Type::NotSpecified),
            Effectiveness::Double
        );
        assert_eq!(
            effectiveness(Type::Fire, Type::Water, Type::Grass),
            Effectiveness::Normal
        );
        // Immunity dominates a double weakness
        assert_eq!(
            effectiveness(Type::Ground, Type::Flying, Type::Electric),
            Effectiveness::NoEffect
        );
    }

    #[test]
    fn test_classify_fallback() {
        assert_eq!(Effectiveness::classify(3.0), Effectiveness::Normal);
        assert_eq!(Effectiveness::from_multiplier(3.0), None);
        assert_eq!(Effectiveness::Quadruple.to_string(), "quadruple damage");
    }

    #[test]
    fn test_effectiveness_against_creature() {
        let mut fields = CreatureFields::defaults(true);
        fields.type1 = Type::Ground;
        fields.type2 = Type::Fighting;
        let great_tusk = Creature::new("Great Tusk", fields);

        assert_eq!(
            effectiveness_against(Type::Flying, &great_tusk),
            Effectiveness::Double
        );
        assert_eq!(
            effectiveness_against(Type::Electric, &great_tusk),
            Effectiveness::NoEffect
        );
    }
}
