//! Non-volatile status conditions

/// Status conditions shown in the HP line of a tooltip
///
/// Badly poisoned ("TOX") is folded into `Poison`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Burn,
    Poison,
    Paralysis,
    Sleep,
    Freeze,
}

impl Status {
    /// Parse from a tooltip status code ("BRN", "PSN", "TOX", "PAR", "SLP", "FRZ")
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "BRN" => Some(Status::Burn),
            "PSN" | "TOX" => Some(Status::Poison),
            "PAR" => Some(Status::Paralysis),
            "SLP" => Some(Status::Sleep),
            "FRZ" => Some(Status::Freeze),
            _ => None,
        }
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Burn => "Burn",
            Status::Poison => "Poison",
            Status::Paralysis => "Paralysis",
            Status::Sleep => "Sleep",
            Status::Freeze => "Freeze",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_code() {
        assert_eq!(Status::from_code("BRN"), Some(Status::Burn));
        assert_eq!(Status::from_code("psn"), Some(Status::Poison));
        assert_eq!(Status::from_code("TOX"), Some(Status::Poison));
        assert_eq!(Status::from_code(" PAR "), Some(Status::Paralysis));
        assert_eq!(Status::from_code("SLP"), Some(Status::Sleep));
        assert_eq!(Status::from_code("FRZ"), Some(Status::Freeze));
        assert_eq!(Status::from_code("CNF"), None);
        assert_eq!(Status::from_code(""), None);
    }
}
