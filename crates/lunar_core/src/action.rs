/// Every animation the player rig can play. The rig file is validated against
/// this enum at load time, so gameplay code never does string lookups that can
/// silently miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Idle,
    Run,
    Jump,
    Death,
    Victory,
    Flying,
}

impl ActionKind {
    /// All kinds, in rig-file order.
    pub const ALL: &'static [ActionKind] = &[
        ActionKind::Idle,
        ActionKind::Run,
        ActionKind::Jump,
        ActionKind::Death,
        ActionKind::Victory,
        ActionKind::Flying,
    ];

    /// Rig-file key for this action (lowercase, matches exported clip names).
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Death => "death",
            Self::Victory => "victory",
            Self::Flying => "flying",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "idle" => Some(Self::Idle),
            "run" => Some(Self::Run),
            "jump" => Some(Self::Jump),
            "death" => Some(Self::Death),
            "victory" => Some(Self::Victory),
            "flying" => Some(Self::Flying),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_round_trips_every_kind() {
        for &kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert_eq!(ActionKind::from_name("dance"), None);
        assert_eq!(ActionKind::from_name(""), None);
        // Lookup is case-sensitive; rig files are lowercase by contract.
        assert_eq!(ActionKind::from_name("Run"), None);
    }

    #[test]
    fn all_contains_every_variant_once() {
        assert_eq!(ActionKind::ALL.len(), 6);
        let mut seen = std::collections::HashSet::new();
        for &kind in ActionKind::ALL {
            assert!(seen.insert(kind));
        }
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(format!("{}", ActionKind::Victory), "victory");
    }
}
