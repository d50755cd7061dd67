use serde::{Deserialize, Serialize};

/// Semantic shoe part categories that a customiser can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShoeComponent {
    Sole,
    Upper,
    Midsole,
    Outsole,
    Laces,
    Logo,
    HeelTab,
    Tongue,
    Eyelets,
    Lining,
    Unknown,
}

impl ShoeComponent {
    /// Convert string identifier to component for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sole" => Some(Self::Sole),
            "upper" => Some(Self::Upper),
            "midsole" => Some(Self::Midsole),
            "outsole" => Some(Self::Outsole),
            "laces" => Some(Self::Laces),
            "logo" => Some(Self::Logo),
            "heel_tab" => Some(Self::HeelTab),
            "tongue" => Some(Self::Tongue),
            "eyelets" => Some(Self::Eyelets),
            "lining" => Some(Self::Lining),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Convert component to string identifier for frontend communication.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sole => "sole",
            Self::Upper => "upper",
            Self::Midsole => "midsole",
            Self::Outsole => "outsole",
            Self::Laces => "laces",
            Self::Logo => "logo",
            Self::HeelTab => "heel_tab",
            Self::Tongue => "tongue",
            Self::Eyelets => "eyelets",
            Self::Lining => "lining",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable name shown in the frontend part list.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sole => "Sole",
            Self::Upper => "Upper",
            Self::Midsole => "Midsole",
            Self::Outsole => "Outsole",
            Self::Laces => "Laces",
            Self::Logo => "Logo",
            Self::HeelTab => "Heel Tab",
            Self::Tongue => "Tongue",
            Self::Eyelets => "Eyelets",
            Self::Lining => "Lining",
            Self::Unknown => "Unknown",
        }
    }
}

/// Ordered mesh-name pattern table mapping substrings to components.
///
/// Classification walks this table top to bottom and the first category
/// with a matching substring wins. Entries overlap ("sole" is a substring
/// of both "midsole" and "outsole" names), so the row order is part of the
/// classification contract and must not be rearranged.
pub const COMPONENT_PATTERNS: &[(ShoeComponent, &[&str])] = &[
    (ShoeComponent::Sole, &["sole", "insole", "bottom", "base"]),
    (
        ShoeComponent::Upper,
        &["upper", "suede", "leather", "body", "main", "normal", "shoe"],
    ),
    (ShoeComponent::Midsole, &["midsole", "mid", "middle"]),
    (ShoeComponent::Outsole, &["outsole", "outer_sole", "tread"]),
    (
        ShoeComponent::Laces,
        &["lace", "laces", "shoelace", "string"],
    ),
    (ShoeComponent::Logo, &["logo", "brand", "badge", "emblem"]),
    (ShoeComponent::HeelTab, &["heel", "heel_tab", "back_tab"]),
    (ShoeComponent::Tongue, &["tongue", "tongue_pad"]),
    (
        ShoeComponent::Eyelets,
        &["eyelets", "holes", "grommets", "metal"],
    ),
    (
        ShoeComponent::Lining,
        &["lining", "satin", "inner", "inside"],
    ),
];

/// All categories a user can select, in frontend display order.
pub const SELECTABLE_COMPONENTS: &[ShoeComponent] = &[
    ShoeComponent::Sole,
    ShoeComponent::Upper,
    ShoeComponent::Midsole,
    ShoeComponent::Outsole,
    ShoeComponent::Laces,
    ShoeComponent::Logo,
    ShoeComponent::HeelTab,
    ShoeComponent::Tongue,
    ShoeComponent::Eyelets,
    ShoeComponent::Lining,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_roundtrip_covers_every_component() {
        for (component, _) in COMPONENT_PATTERNS {
            assert_eq!(ShoeComponent::from_string(component.as_str()), Some(*component));
        }
        assert_eq!(
            ShoeComponent::from_string("unknown"),
            Some(ShoeComponent::Unknown)
        );
        assert_eq!(ShoeComponent::from_string("outrigger"), None);
    }

    #[test]
    fn pattern_table_keeps_authored_order() {
        // The sole row precedes midsole/outsole; the classifier depends on it.
        let order: Vec<ShoeComponent> = COMPONENT_PATTERNS.iter().map(|(c, _)| *c).collect();
        let sole = order.iter().position(|c| *c == ShoeComponent::Sole).unwrap();
        let midsole = order
            .iter()
            .position(|c| *c == ShoeComponent::Midsole)
            .unwrap();
        let outsole = order
            .iter()
            .position(|c| *c == ShoeComponent::Outsole)
            .unwrap();
        assert!(sole < midsole && midsole < outsole);
    }

    #[test]
    fn unknown_has_no_pattern_row() {
        assert!(
            COMPONENT_PATTERNS
                .iter()
                .all(|(c, _)| *c != ShoeComponent::Unknown)
        );
    }
}
