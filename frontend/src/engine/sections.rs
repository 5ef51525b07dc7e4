use std::fmt;
use std::str::FromStr;

use crate::error::LandingError;

pub const TOTAL_SECTIONS: usize = 7;

/// The fixed, ordered set of full-viewport panels on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Hero,
    Platform,
    Workspace,
    Benefits,
    Apply,
    Rules,
    FinalApply,
}

/// Edge of the viewport a section slides in from. Never the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryDirection {
    Bottom,
    Right,
    Left,
}

impl SectionId {
    pub const ALL: [SectionId; TOTAL_SECTIONS] = [
        SectionId::Hero,
        SectionId::Platform,
        SectionId::Workspace,
        SectionId::Benefits,
        SectionId::Apply,
        SectionId::Rules,
        SectionId::FinalApply,
    ];

    pub fn from_index(index: usize) -> Option<SectionId> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            SectionId::Hero => "hero",
            SectionId::Platform => "platform",
            SectionId::Workspace => "workspace",
            SectionId::Benefits => "benefits",
            SectionId::Apply => "apply",
            SectionId::Rules => "rules",
            SectionId::FinalApply => "final-apply",
        }
    }

    /// Direction the *next* section enters from when leaving this one forward.
    pub fn entry_direction(self) -> EntryDirection {
        match self.index() % 3 {
            0 => EntryDirection::Bottom,
            1 => EntryDirection::Right,
            _ => EntryDirection::Left,
        }
    }

    pub fn particle_container_id(self) -> String {
        format!("particles-{}", self.name())
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SectionId {
    type Err = LandingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|section| section.name() == s)
            .ok_or_else(|| LandingError::UnknownSection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_page_order() {
        for (i, section) in SectionId::ALL.iter().enumerate() {
            assert_eq!(section.index(), i);
            assert_eq!(SectionId::from_index(i), Some(*section));
        }
        assert_eq!(SectionId::from_index(TOTAL_SECTIONS), None);
    }

    #[test]
    fn entry_directions_cycle_every_three() {
        let directions: Vec<_> = SectionId::ALL.iter().map(|s| s.entry_direction()).collect();
        assert_eq!(
            directions,
            vec![
                EntryDirection::Bottom,
                EntryDirection::Right,
                EntryDirection::Left,
                EntryDirection::Bottom,
                EntryDirection::Right,
                EntryDirection::Left,
                EntryDirection::Bottom,
            ]
        );
    }

    #[test]
    fn names_round_trip_and_unknown_names_are_rejected() {
        assert_eq!("final-apply".parse::<SectionId>().unwrap(), SectionId::FinalApply);
        assert_eq!(SectionId::Benefits.particle_container_id(), "particles-benefits");
        match "lobby".parse::<SectionId>() {
            Err(LandingError::UnknownSection(name)) => assert_eq!(name, "lobby"),
            other => panic!("expected unknown section error, got {:?}", other),
        }
    }
}
