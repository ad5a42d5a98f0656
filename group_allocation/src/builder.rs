pub use crate::config::*;
use crate::GroupAllocator;

use rand::Rng;

/// A builder for adding records one at a time.
///
/// ```
/// pub use group_allocation::builder::Builder;
/// pub use group_allocation::AllocationRules;
/// # use group_allocation::AllocationErrors;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut builder = Builder::new(&AllocationRules::new(3, 2))?;
///
/// builder.add_record("Anna", 1, 2)?;
/// builder.add_record("Bob", 3, 1)?;
///
/// let grouping = builder.assign(&mut StdRng::seed_from_u64(3))?;
/// assert_eq!(grouping.get(3), Some(&["Bob".to_string()][..]));
///
/// # Ok::<(), AllocationErrors>(())
/// ```
pub struct Builder {
    pub(crate) _allocator: GroupAllocator,
    pub(crate) _records: Vec<PreferenceRecord>,
}

impl Builder {
    pub fn new(rules: &AllocationRules) -> Result<Builder, AllocationErrors> {
        Ok(Builder {
            _allocator: GroupAllocator::new(rules)?,
            _records: Vec::new(),
        })
    }

    /// Adds a person with their first and second choice.
    ///
    /// The choices are checked right away, so that the error points to the
    /// record being added.
    pub fn add_record(
        &mut self,
        name: &str,
        first_choice: i64,
        second_choice: i64,
    ) -> Result<(), AllocationErrors> {
        let n_choices = self._allocator.rules().n_choices;
        for choice in [first_choice, second_choice] {
            if choice < 1 || choice > n_choices as i64 {
                return Err(AllocationErrors::InvalidChoice {
                    name: name.to_string(),
                    choice,
                    n_choices,
                });
            }
        }
        self.add_record_2(&PreferenceRecord::new(name, first_choice, second_choice))
    }

    pub fn add_record_2(&mut self, record: &PreferenceRecord) -> Result<(), AllocationErrors> {
        self._records.push(record.clone());
        Ok(())
    }

    pub fn records(&self) -> &[PreferenceRecord] {
        &self._records
    }

    pub fn assign<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Grouping, AllocationErrors> {
        self._allocator.assign(&self._records, rng)
    }

    pub fn allocate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<AllocationResult, AllocationErrors> {
        self._allocator.allocate(&self._records, rng)
    }
}
