// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The identifier of a group. Valid identifiers are `1..=n_choices`.
pub type GroupId = u32;

/// One person and the two groups they would like to join, in order of preference.
///
/// The choices are kept as they were read. They are only checked against the
/// number of groups when the allocation runs.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct PreferenceRecord {
    pub name: String,
    pub first_choice: i64,
    pub second_choice: i64,
}

impl PreferenceRecord {
    pub fn new(name: &str, first_choice: i64, second_choice: i64) -> PreferenceRecord {
        PreferenceRecord {
            name: name.to_string(),
            first_choice,
            second_choice,
        }
    }
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Group {
    pub id: GroupId,
    /// The members, in the order in which they were assigned.
    pub members: Vec<String>,
}

/// The outcome of an allocation: every group from 1 to `n_choices`, including the empty ones.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Grouping {
    // Sorted by id, groups[i].id == i + 1
    groups: Vec<Group>,
}

impl Grouping {
    pub(crate) fn empty(n_choices: u32) -> Grouping {
        Grouping {
            groups: (1..=n_choices)
                .map(|id| Group {
                    id,
                    members: Vec::new(),
                })
                .collect(),
        }
    }

    pub(crate) fn push(&mut self, gid: GroupId, name: &str) {
        self.groups[(gid - 1) as usize].members.push(name.to_string());
    }

    pub(crate) fn occupancy(&self, gid: GroupId) -> usize {
        self.groups[(gid - 1) as usize].members.len()
    }

    /// The members of a group, or `None` if the identifier is not a group of this grouping.
    pub fn get(&self, gid: GroupId) -> Option<&[String]> {
        if gid == 0 {
            return None;
        }
        self.groups
            .get((gid - 1) as usize)
            .map(|g| g.members.as_slice())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// The number of groups (always `n_choices`).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_members(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    /// The size of the largest group.
    pub fn largest_group(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.members.len())
            .max()
            .unwrap_or(0)
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}

/// Why a person ended up in a group.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum PlacementKind {
    FirstChoice,
    SecondChoice,
    /// Both choices were full when this person was processed.
    Random,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Placement {
    pub name: String,
    pub group: GroupId,
    pub kind: PlacementKind,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct PlacementStats {
    pub first_choice: u64,
    pub second_choice: u64,
    pub random: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AllocationResult {
    pub grouping: Grouping,
    /// The placements, in processing order.
    pub placements: Vec<Placement>,
}

impl AllocationResult {
    pub fn stats(&self) -> PlacementStats {
        let mut stats = PlacementStats::default();
        for p in self.placements.iter() {
            match p.kind {
                PlacementKind::FirstChoice => stats.first_choice += 1,
                PlacementKind::SecondChoice => stats.second_choice += 1,
                PlacementKind::Random => stats.random += 1,
            }
        }
        stats
    }
}

/// Errors that prevent the allocation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AllocationErrors {
    /// The number of groups or the capacity of a group is zero.
    InvalidParameters { n_choices: u32, max_per_group: u32 },
    /// A choice does not designate one of the groups.
    InvalidChoice {
        name: String,
        choice: i64,
        n_choices: u32,
    },
    /// There are more people than places in all the groups combined.
    CapacityExceeded { capacity: u64, records: usize },
}

impl Error for AllocationErrors {}

impl Display for AllocationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationErrors::InvalidParameters {
                n_choices,
                max_per_group,
            } => write!(
                f,
                "the number of groups ({}) and the maximum per group ({}) must both be at least 1",
                n_choices, max_per_group
            ),
            AllocationErrors::InvalidChoice {
                name,
                choice,
                n_choices,
            } => write!(
                f,
                "{} chose group {}, which is not between 1 and {}",
                name, choice, n_choices
            ),
            AllocationErrors::CapacityExceeded { capacity, records } => write!(
                f,
                "cannot place {} people in groups with {} places in total",
                records, capacity
            ),
        }
    }
}

// ********* Configuration **********

/// The order in which the records are consumed.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ProcessingOrder {
    /// The last record is placed first, the records are consumed like a stack.
    /// This is the default.
    LastToFirst,
    FirstToLast,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AllocationRules {
    /// The number of groups people can choose between.
    pub n_choices: u32,
    pub max_per_group: u32,
    pub processing_order: ProcessingOrder,
}

impl AllocationRules {
    pub const DEFAULT_RULES: AllocationRules = AllocationRules {
        n_choices: 2,
        max_per_group: 1,
        processing_order: ProcessingOrder::LastToFirst,
    };

    pub fn new(n_choices: u32, max_per_group: u32) -> AllocationRules {
        AllocationRules {
            n_choices,
            max_per_group,
            ..AllocationRules::DEFAULT_RULES
        }
    }

    /// The number of places in all the groups combined.
    pub fn capacity(&self) -> u64 {
        (self.n_choices as u64) * (self.max_per_group as u64)
    }
}
