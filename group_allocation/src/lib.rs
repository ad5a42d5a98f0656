/*!
Assigns people to groups according to their first and second preference.

Every group has the same maximum size. People are processed one after the
other: they join their first choice if it still has room, their second choice
otherwise, and a random group with room left when both choices are full.

The procedure is greedy. The outcome depends on the order of the records: the
same people in a different order may end up in different groups. Shuffle the
records beforehand to spread the advantage of being processed early.

```
use group_allocation::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

let allocator = GroupAllocator::new(&AllocationRules::new(2, 1))?;
let records = vec![
    PreferenceRecord::new("A", 1, 2),
    PreferenceRecord::new("B", 1, 2),
];
let mut rng = StdRng::seed_from_u64(0);
let grouping = allocator.assign(&records, &mut rng)?;
// The last record is processed first.
assert_eq!(grouping.get(1), Some(&["B".to_string()][..]));
assert_eq!(grouping.get(2), Some(&["A".to_string()][..]));
# Ok::<(), AllocationErrors>(())
```
*/
mod config;
use log::{debug, info, warn};
use rand::Rng;

pub use crate::config::*;

pub mod builder;
pub mod manual;

/// Runs the allocation for one set of rules.
///
/// The allocator holds no state between calls: every call starts from empty groups.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GroupAllocator {
    rules: AllocationRules,
}

impl GroupAllocator {
    pub fn new(rules: &AllocationRules) -> Result<GroupAllocator, AllocationErrors> {
        if rules.n_choices == 0 || rules.max_per_group == 0 {
            return Err(AllocationErrors::InvalidParameters {
                n_choices: rules.n_choices,
                max_per_group: rules.max_per_group,
            });
        }
        Ok(GroupAllocator {
            rules: rules.clone(),
        })
    }

    pub fn rules(&self) -> &AllocationRules {
        &self.rules
    }

    /// Assigns every record to a group.
    ///
    /// Arguments:
    /// * `records` the people to place, in the order provided by the source
    /// * `rng` the source of randomness for people whose two choices are full
    pub fn assign<R: Rng + ?Sized>(
        &self,
        records: &[PreferenceRecord],
        rng: &mut R,
    ) -> Result<Grouping, AllocationErrors> {
        self.allocate(records, rng).map(|res| res.grouping)
    }

    /// Same as [`GroupAllocator::assign`], and also returns how each person was placed.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        records: &[PreferenceRecord],
        rng: &mut R,
    ) -> Result<AllocationResult, AllocationErrors> {
        info!(
            "Processing {:?} records, rules: {:?}",
            records.len(),
            self.rules
        );
        let checked = checks(records, &self.rules)?;

        let mut grouping = Grouping::empty(self.rules.n_choices);
        let mut placements: Vec<Placement> = Vec::with_capacity(checked.len());

        let mut ordered: Vec<&CheckedRecord> = checked.iter().collect();
        if self.rules.processing_order == ProcessingOrder::LastToFirst {
            ordered.reverse();
        }

        for rec in ordered {
            let (gid, kind) = self.place(rec, &grouping, rng);
            debug!("allocate: {:?} -> group {} ({:?})", rec.name, gid, kind);
            grouping.push(gid, rec.name);
            placements.push(Placement {
                name: rec.name.to_string(),
                group: gid,
                kind,
            });
        }

        let res = AllocationResult {
            grouping,
            placements,
        };
        let stats = res.stats();
        info!(
            "Placed {} people: {} first choice, {} second choice, {} random",
            res.placements.len(),
            stats.first_choice,
            stats.second_choice,
            stats.random
        );
        for g in res.grouping.iter() {
            info!("Group {}: {} members", g.id, g.members.len());
        }
        Ok(res)
    }

    fn place<R: Rng + ?Sized>(
        &self,
        rec: &CheckedRecord,
        grouping: &Grouping,
        rng: &mut R,
    ) -> (GroupId, PlacementKind) {
        let max = self.rules.max_per_group as usize;
        if grouping.occupancy(rec.first) < max {
            return (rec.first, PlacementKind::FirstChoice);
        }
        if grouping.occupancy(rec.second) < max {
            return (rec.second, PlacementKind::SecondChoice);
        }
        warn!(
            "{:?}: groups {} and {} are full, assigning at random",
            rec.name, rec.first, rec.second
        );
        // Terminates because the total capacity was checked beforehand.
        loop {
            let gid: GroupId = rng.gen_range(1..=self.rules.n_choices);
            if grouping.occupancy(gid) < max {
                return (gid, PlacementKind::Random);
            }
        }
    }
}

// A record whose choices are known to be valid group identifiers.
struct CheckedRecord<'a> {
    name: &'a str,
    first: GroupId,
    second: GroupId,
}

fn checks<'a>(
    records: &'a [PreferenceRecord],
    rules: &AllocationRules,
) -> Result<Vec<CheckedRecord<'a>>, AllocationErrors> {
    let capacity = rules.capacity();
    if (records.len() as u64) > capacity {
        return Err(AllocationErrors::CapacityExceeded {
            capacity,
            records: records.len(),
        });
    }

    let mut res: Vec<CheckedRecord> = Vec::with_capacity(records.len());
    for r in records.iter() {
        let first = check_choice(r, r.first_choice, rules.n_choices)?;
        let second = check_choice(r, r.second_choice, rules.n_choices)?;
        res.push(CheckedRecord {
            name: r.name.as_str(),
            first,
            second,
        });
    }
    debug!("checks: {} records validated", res.len());
    Ok(res)
}

fn check_choice(
    record: &PreferenceRecord,
    choice: i64,
    n_choices: u32,
) -> Result<GroupId, AllocationErrors> {
    if choice >= 1 && choice <= n_choices as i64 {
        Ok(choice as GroupId)
    } else {
        Err(AllocationErrors::InvalidChoice {
            name: record.name.clone(),
            choice,
            n_choices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn names(grouping: &Grouping, gid: GroupId) -> Vec<&str> {
        grouping
            .get(gid)
            .unwrap()
            .iter()
            .map(|s| s.as_str())
            .collect()
    }

    fn records(data: &[(&str, i64, i64)]) -> Vec<PreferenceRecord> {
        data.iter()
            .map(|(n, c1, c2)| PreferenceRecord::new(n, *c1, *c2))
            .collect()
    }

    #[test]
    fn last_record_gets_first_pick() {
        init();
        let allocator = GroupAllocator::new(&AllocationRules::new(2, 1)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let grouping = allocator
            .assign(&records(&[("A", 1, 2), ("B", 1, 2)]), &mut rng)
            .unwrap();
        assert_eq!(names(&grouping, 1), vec!["B"]);
        assert_eq!(names(&grouping, 2), vec!["A"]);
    }

    #[test]
    fn forward_order_reverses_the_outcome() {
        init();
        let rules = AllocationRules {
            processing_order: ProcessingOrder::FirstToLast,
            ..AllocationRules::new(2, 1)
        };
        let allocator = GroupAllocator::new(&rules).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let grouping = allocator
            .assign(&records(&[("A", 1, 2), ("B", 1, 2)]), &mut rng)
            .unwrap();
        assert_eq!(names(&grouping, 1), vec!["A"]);
        assert_eq!(names(&grouping, 2), vec!["B"]);
    }

    #[test]
    fn single_group_takes_everyone() {
        init();
        let allocator = GroupAllocator::new(&AllocationRules::new(1, 5)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let res = allocator
            .allocate(
                &records(&[("a", 1, 1), ("b", 1, 1), ("c", 1, 1), ("d", 1, 1), ("e", 1, 1)]),
                &mut rng,
            )
            .unwrap();
        assert_eq!(res.grouping.len(), 1);
        assert_eq!(names(&res.grouping, 1), vec!["e", "d", "c", "b", "a"]);
        assert_eq!(
            res.stats(),
            PlacementStats {
                first_choice: 5,
                second_choice: 0,
                random: 0
            }
        );
    }

    #[test]
    fn empty_groups_are_present() {
        init();
        let allocator = GroupAllocator::new(&AllocationRules::new(4, 3)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let grouping = allocator
            .assign(&records(&[("a", 2, 3)]), &mut rng)
            .unwrap();
        assert_eq!(grouping.len(), 4);
        assert_eq!(grouping.total_members(), 1);
        assert!(grouping.get(1).unwrap().is_empty());
        assert_eq!(names(&grouping, 2), vec!["a"]);
        assert!(grouping.get(3).unwrap().is_empty());
        assert!(grouping.get(4).unwrap().is_empty());
        assert_eq!(grouping.get(0), None);
        assert_eq!(grouping.get(5), None);
    }

    #[test]
    fn no_records() {
        init();
        let allocator = GroupAllocator::new(&AllocationRules::new(3, 2)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let grouping = allocator.assign(&[], &mut rng).unwrap();
        assert_eq!(grouping.len(), 3);
        assert_eq!(grouping.total_members(), 0);
    }

    #[test]
    fn second_choice_when_first_is_full() {
        init();
        let allocator = GroupAllocator::new(&AllocationRules::new(3, 2)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        // Processed from the end: c and b fill group 1, a goes to group 3.
        let res = allocator
            .allocate(&records(&[("a", 1, 3), ("b", 1, 2), ("c", 1, 2)]), &mut rng)
            .unwrap();
        assert_eq!(names(&res.grouping, 1), vec!["c", "b"]);
        assert!(res.grouping.get(2).unwrap().is_empty());
        assert_eq!(names(&res.grouping, 3), vec!["a"]);
        assert_eq!(res.placements[2].kind, PlacementKind::SecondChoice);
        assert_eq!(res.placements[2].group, 3);
    }

    #[test]
    fn random_fallback_lands_in_the_only_free_group() {
        init();
        let allocator = GroupAllocator::new(&AllocationRules::new(3, 1)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let res = allocator
            .allocate(&records(&[("c", 1, 2), ("b", 2, 1), ("a", 1, 2)]), &mut rng)
            .unwrap();
        assert_eq!(names(&res.grouping, 1), vec!["a"]);
        assert_eq!(names(&res.grouping, 2), vec!["b"]);
        assert_eq!(names(&res.grouping, 3), vec!["c"]);
        assert_eq!(
            res.placements.last().unwrap(),
            &Placement {
                name: "c".to_string(),
                group: 3,
                kind: PlacementKind::Random
            }
        );
        assert_eq!(res.stats().random, 1);
    }

    #[test]
    fn capacity_exceeded() {
        init();
        let allocator = GroupAllocator::new(&AllocationRules::new(2, 1)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let res = allocator.assign(&records(&[("a", 1, 2), ("b", 1, 2), ("c", 2, 1)]), &mut rng);
        assert_eq!(
            res,
            Err(AllocationErrors::CapacityExceeded {
                capacity: 2,
                records: 3
            })
        );
    }

    #[test]
    fn full_capacity_is_accepted() {
        init();
        let allocator = GroupAllocator::new(&AllocationRules::new(2, 2)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let grouping = allocator
            .assign(
                &records(&[("a", 1, 1), ("b", 1, 1), ("c", 1, 1), ("d", 1, 1)]),
                &mut rng,
            )
            .unwrap();
        assert_eq!(grouping.get(1).unwrap().len(), 2);
        assert_eq!(grouping.get(2).unwrap().len(), 2);
    }

    #[test]
    fn invalid_choices() {
        init();
        let allocator = GroupAllocator::new(&AllocationRules::new(3, 2)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let res = allocator.assign(&records(&[("a", 1, 2), ("b", 4, 1)]), &mut rng);
        assert_eq!(
            res,
            Err(AllocationErrors::InvalidChoice {
                name: "b".to_string(),
                choice: 4,
                n_choices: 3
            })
        );
        // The second choice is checked even if it would never be used.
        let res = allocator.assign(&records(&[("a", 1, 0)]), &mut rng);
        assert!(matches!(
            res,
            Err(AllocationErrors::InvalidChoice { choice: 0, .. })
        ));
        let res = allocator.assign(&records(&[("a", -1, 2)]), &mut rng);
        assert!(matches!(
            res,
            Err(AllocationErrors::InvalidChoice { choice: -1, .. })
        ));
    }

    #[test]
    fn invalid_parameters() {
        assert!(GroupAllocator::new(&AllocationRules::new(0, 3)).is_err());
        assert!(GroupAllocator::new(&AllocationRules::new(3, 0)).is_err());
    }

    // A larger, oversubscribed population: capacity holds, nobody is lost and
    // the preferences are honoured whenever there was room.
    #[test]
    fn invariants_on_crowded_input() {
        init();
        let n_choices = 5;
        let max_per_group = 4;
        let mut data: Vec<PreferenceRecord> = Vec::new();
        for i in 0..20 {
            let c1 = (i % 2) + 1;
            let c2 = (i % 3) + 1;
            data.push(PreferenceRecord::new(&format!("p{}", i), c1, c2));
        }
        let data = data.as_slice();

        let allocator =
            GroupAllocator::new(&AllocationRules::new(n_choices, max_per_group)).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let res = allocator.allocate(data, &mut rng).unwrap();

        for g in res.grouping.iter() {
            assert!(g.members.len() <= max_per_group as usize);
        }

        let mut input_names: Vec<String> = data.iter().map(|r| r.name.clone()).collect();
        let mut output_names: Vec<String> = res
            .grouping
            .iter()
            .flat_map(|g| g.members.iter().cloned())
            .collect();
        input_names.sort();
        output_names.sort();
        assert_eq!(input_names, output_names);

        // Replay the placements to check the preference rules.
        let mut occupancy = vec![0usize; n_choices as usize + 1];
        for p in res.placements.iter() {
            let rec = data.iter().find(|r| r.name == p.name).unwrap();
            let c1 = rec.first_choice as usize;
            let c2 = rec.second_choice as usize;
            let expected = if occupancy[c1] < max_per_group as usize {
                Some((c1, PlacementKind::FirstChoice))
            } else if occupancy[c2] < max_per_group as usize {
                Some((c2, PlacementKind::SecondChoice))
            } else {
                None
            };
            match expected {
                Some((gid, kind)) => {
                    assert_eq!(p.group as usize, gid);
                    assert_eq!(p.kind, kind);
                }
                None => assert_eq!(p.kind, PlacementKind::Random),
            }
            occupancy[p.group as usize] += 1;
        }
        assert!(res.stats().random > 0);
    }

    #[test]
    fn same_seed_same_grouping() {
        init();
        let data: Vec<PreferenceRecord> = (0..12)
            .map(|i| PreferenceRecord::new(&format!("p{}", i), 1, 2))
            .collect();
        let allocator = GroupAllocator::new(&AllocationRules::new(4, 3)).unwrap();
        let g1 = allocator
            .assign(&data, &mut StdRng::seed_from_u64(2022))
            .unwrap();
        let g2 = allocator
            .assign(&data, &mut StdRng::seed_from_u64(2022))
            .unwrap();
        assert_eq!(g1, g2);
    }

    #[test]
    fn duplicate_names_are_placed_independently() {
        init();
        let allocator = GroupAllocator::new(&AllocationRules::new(2, 1)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let grouping = allocator
            .assign(&records(&[("x", 2, 1), ("x", 2, 1)]), &mut rng)
            .unwrap();
        assert_eq!(names(&grouping, 1), vec!["x"]);
        assert_eq!(names(&grouping, 2), vec!["x"]);
    }
}
