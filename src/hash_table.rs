use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::capacity;
use crate::error::Error;

/// One position of the slot array.
///
/// `Tombstone` marks a slot whose value was removed. It must stay distinct
/// from `Empty`: an empty slot ends a probe sequence, a tombstone does not.
#[derive(Clone)]
enum Slot<T> {
    Empty,
    Tombstone,
    Occupied { hash: u64, value: T },
}

/// Outcome of a probe walk for a mutating lookup.
enum Probe {
    /// A live slot whose value matched the predicate.
    Found(usize),
    /// No live match; the value belongs at this index.
    Vacant(usize),
    /// Every slot holds a live value.
    Saturated,
}

#[inline(always)]
fn hashtag(hash: u64) -> u8 {
    (hash >> 56) as u8
}

fn allocate_slots<T>(capacity: usize) -> Result<Vec<Slot<T>>, Error> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| Error::AllocationFailure { slots: capacity })?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots)
}

/// Debug statistics for hash table analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live values in the table
    pub populated: usize,
    /// Number of slots in the slot array
    pub capacity: usize,
    /// Number of tombstoned slots
    pub tombstones: usize,
    /// Number of never-used (or reclaimed) slots
    pub empty: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest distance from a value's home slot
    pub max_probe: usize,
    /// Mean distance from a value's home slot
    pub mean_probe: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} empty, {} tombstoned",
            self.empty, self.tombstones
        );
        println!(
            "Probe length: max {}, mean {:.02}",
            self.max_probe, self.mean_probe
        );
    }
}

/// An open-addressing hash table using linear probing and tombstone deletion.
///
/// `HashTable<T>` stores values of type `T` in a power-of-two slot array. Like
/// the lower-level tables of other hash crates, it does not hash anything
/// itself: every operation takes the value's hash along with an equality
/// predicate. [`HashMap`](crate::HashMap) and [`HashSet`](crate::HashSet)
/// build keyed containers on top of it.
///
/// Each slot remembers the full hash of its value, which lets the table grow
/// without access to a hasher and lets probing skip mismatches without
/// calling the predicate.
///
/// The table grows to twice its capacity before an insert would take the
/// load factor to 85%. Growth rehashes live values only, so it is also the
/// point where tombstones are reclaimed.
///
/// ## Example
///
/// ```rust
/// use probe_hash::hash_table::Entry;
/// use probe_hash::hash_table::HashTable;
/// use probe_hash::fnv::fnv1a;
///
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     name: &'static str,
///     age: u32,
/// }
///
/// let mut table = HashTable::with_capacity(8)?;
/// let hash = fnv1a(b"alice");
///
/// match table.try_entry(hash, |p: &Person| p.name == "alice")? {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             name: "alice",
///             age: 31,
///         });
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(hash, |p| p.name == "alice").map(|p| p.age), Some(31));
/// # Ok::<(), probe_hash::Error>(())
/// ```
#[derive(Clone)]
pub struct HashTable<T> {
    slots: Vec<Slot<T>>,
    populated: usize,
    tombstones: usize,
    mask: usize,
}

impl<T> Debug for HashTable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field(
                "slots",
                &self
                    .slots
                    .chunks(16)
                    .map(|chunk| {
                        chunk
                            .iter()
                            .map(|slot| match slot {
                                Slot::Empty => "..".to_string(),
                                Slot::Tombstone => "xx".to_string(),
                                Slot::Occupied { hash, .. } => format!("{:02x}", hashtag(*hash)),
                            })
                            .collect::<Vec<String>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<T> HashTable<T> {
    /// Creates an empty table with room for at least `min_capacity` slots.
    ///
    /// The capacity is rounded up to the next power of two, and is never
    /// smaller than 2.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgument::ZeroCapacity`](crate::InvalidArgument::ZeroCapacity)
    ///   if `min_capacity` is zero.
    /// - [`Error::TypeOverflow`] if the rounded capacity does not fit in
    ///   `usize`.
    /// - [`Error::AllocationFailure`] if the slot array cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100)?;
    /// assert_eq!(table.capacity(), 128);
    /// assert!(HashTable::<String>::with_capacity(0).is_err());
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn with_capacity(min_capacity: usize) -> Result<Self, Error> {
        let capacity = capacity::round_up_pow2(min_capacity)?;
        let slots = allocate_slots(capacity)?;
        tracing::trace!(min_capacity, capacity, "created hash table");

        Ok(Self {
            slots,
            populated: 0,
            tombstones: 0,
            mask: capacity - 1,
        })
    }

    /// Returns the number of live values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no live values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots in the table.
    ///
    /// This is always a power of two, and always strictly greater than
    /// [`len`](Self::len).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of slots holding a tombstone.
    ///
    /// Tombstones are left behind by removals and are reclaimed either by a
    /// later insert landing on them or by the next expansion.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Values are yielded in slot order, which depends on their hashes and
    /// insertion history.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(4)?;
    /// table.insert(1, 10, |&v| v == 10)?;
    /// table.insert(2, 20, |&v| v == 20)?;
    ///
    /// let mut values: Vec<i32> = table.iter().copied().collect();
    /// values.sort();
    /// assert_eq!(values, [10, 20]);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            table: self,
            index: 0,
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// After the iterator is dropped, the table holds neither values nor
    /// tombstones, even if the iterator was not run to completion. Capacity is
    /// unchanged.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            table: self,
            index: 0,
        }
    }

    /// Removes all values from the table, keeping its capacity.
    ///
    /// Tombstones are cleared as well.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.populated = 0;
        self.tombstones = 0;
    }

    #[inline(always)]
    fn home_index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Walks the probe sequence for `hash`, stopping at a live match or at an
    /// empty slot. Tombstones are stepped over.
    #[inline]
    fn find_index(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }

        let mut index = self.home_index(hash);
        for _ in 0..self.slots.len() {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied { hash: stored, value } => {
                    if *stored == hash && eq(value) {
                        return Some(index);
                    }
                }
            }
            index = (index + 1) & self.mask;
        }

        None
    }

    /// Walks the probe sequence for `hash` on behalf of an insert.
    ///
    /// The first tombstone seen is remembered as the insertion point, but the
    /// walk continues past it so a live duplicate further along is updated
    /// rather than shadowed.
    #[inline]
    fn probe(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Probe {
        let mut index = self.home_index(hash);
        let mut first_tombstone = None;

        for _ in 0..self.slots.len() {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(index);
                }
                Slot::Occupied { hash: stored, value } => {
                    if *stored == hash && eq(value) {
                        return Probe::Found(index);
                    }
                }
            }
            index = (index + 1) & self.mask;
        }

        match first_tombstone {
            Some(index) => Probe::Vacant(index),
            None => Probe::Saturated,
        }
    }

    /// Finds a value in the table by hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(4)?;
    /// table.insert(42, 42u64, |&v| v == 42)?;
    ///
    /// assert_eq!(table.find(42, |&v| v == 42), Some(&42));
    /// assert_eq!(table.find(99, |&v| v == 99), None);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    #[inline]
    pub fn find(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&T> {
        let index = self.find_index(hash, eq)?;
        match &self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Finds a value in the table by hash and equality predicate, returning a
    /// mutable reference.
    ///
    /// The caller must not change the value in a way that changes its hash or
    /// its answer to `eq`.
    #[inline]
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&mut T> {
        let index = self.find_index(hash, eq)?;
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if a live value matches `hash` and `eq`.
    #[inline]
    pub fn contains(&self, hash: u64, eq: impl Fn(&T) -> bool) -> bool {
        self.find_index(hash, eq).is_some()
    }

    /// Removes and returns a value from the table.
    ///
    /// The slot it occupied becomes a tombstone.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(4)?;
    /// table.insert(42, 42u64, |&v| v == 42)?;
    ///
    /// assert_eq!(table.remove(42, |&v| v == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.tombstones(), 1);
    /// assert_eq!(table.remove(42, |&v| v == 42), None);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<T> {
        let index = self.find_index(hash, eq)?;
        self.take_slot(index)
    }

    fn take_slot(&mut self, index: usize) -> Option<T> {
        match core::mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.populated -= 1;
                self.tombstones += 1;
                Some(value)
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    /// Gets an entry for the given hash and equality predicate, growing the
    /// table first if one more value would reach the load-factor threshold.
    ///
    /// # Errors
    ///
    /// - [`Error::AllocationFailure`] if growing was required and the new
    ///   slot array could not be allocated. The table is unchanged.
    /// - [`Error::CapacityExhausted`] if growing was required but the doubled
    ///   capacity does not fit in `usize`, or if the table has no room left
    ///   for a new value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::Entry;
    /// # use probe_hash::hash_table::HashTable;
    /// # use probe_hash::fnv::fnv1a;
    /// #
    /// let mut table = HashTable::with_capacity(4)?;
    /// let hash = fnv1a(b"hello");
    ///
    /// match table.try_entry(hash, |s: &String| s == "hello")? {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated".to_string();
    ///     }
    /// }
    ///
    /// let value = table
    ///     .try_entry(hash, |s: &String| s == "hello")?
    ///     .or_insert_with(|| unreachable!());
    /// assert_eq!(value, "hello");
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn try_entry(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Result<Entry<'_, T>, Error> {
        self.reserve_one()?;

        match self.probe(hash, eq) {
            Probe::Found(index) => Ok(Entry::Occupied(OccupiedEntry { table: self, index })),
            Probe::Vacant(index) => Ok(Entry::Vacant(VacantEntry {
                table: self,
                index,
                hash,
            })),
            Probe::Saturated => Err(self.exhausted()),
        }
    }

    /// Inserts `value`, replacing and returning a live value matching `eq`.
    ///
    /// # Errors
    ///
    /// See [`try_entry`](Self::try_entry).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(4)?;
    /// assert_eq!(table.insert(7, (7, "a"), |&(k, _)| k == 7)?, None);
    /// assert_eq!(table.insert(7, (7, "b"), |&(k, _)| k == 7)?, Some((7, "a")));
    /// assert_eq!(table.len(), 1);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn insert(&mut self, hash: u64, value: T, eq: impl Fn(&T) -> bool) -> Result<Option<T>, Error> {
        match self.try_entry(hash, eq)? {
            Entry::Occupied(mut entry) => Ok(Some(entry.insert(value))),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(None)
            }
        }
    }

    /// Grows the table until `additional` more values can be inserted without
    /// triggering another expansion.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeOverflow`] if the required capacity does not fit in
    ///   `usize`.
    /// - [`Error::AllocationFailure`] if the new slot array could not be
    ///   allocated. The table is unchanged.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        if additional == 0 {
            return Ok(());
        }

        let last = self
            .populated
            .checked_add(additional - 1)
            .ok_or(Error::TypeOverflow {
                requested: usize::MAX,
            })?;

        let mut target = self.capacity();
        while capacity::expansion_due(last, target) {
            target = capacity::doubled(target).ok_or(Error::TypeOverflow {
                requested: self.populated.saturating_add(additional),
            })?;
        }

        if target != self.capacity() {
            tracing::trace!(additional, from = self.capacity(), to = target, "reserving");
            self.resize(target)?;
        }

        Ok(())
    }

    /// Makes sure one more value can be placed without breaking
    /// `len < capacity`, growing first if the load-factor gate trips.
    #[inline]
    fn reserve_one(&mut self) -> Result<(), Error> {
        if capacity::expansion_due(self.populated, self.capacity()) {
            self.grow()?;
        }

        if self.populated + 1 >= self.capacity() {
            return Err(self.exhausted());
        }

        Ok(())
    }

    #[cold]
    fn exhausted(&self) -> Error {
        tracing::warn!(
            capacity = self.capacity(),
            populated = self.populated,
            "refusing insert into saturated table"
        );
        Error::CapacityExhausted {
            capacity: self.capacity(),
        }
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self) -> Result<(), Error> {
        match capacity::doubled(self.capacity()) {
            Some(capacity) => self.resize(capacity),
            None => {
                tracing::warn!(
                    capacity = self.capacity(),
                    "cannot double capacity without overflowing"
                );
                Err(Error::CapacityExhausted {
                    capacity: self.capacity(),
                })
            }
        }
    }

    /// Moves every live value into a fresh slot array of `capacity` slots.
    ///
    /// Tombstones are not carried over. Values are known to be unique, so
    /// each one goes to the first empty slot of its new probe sequence.
    fn resize(&mut self, capacity: usize) -> Result<(), Error> {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(capacity > self.populated);

        let new_slots = allocate_slots(capacity)?;
        let old_slots = core::mem::replace(&mut self.slots, new_slots);
        let old_capacity = old_slots.len();
        let tombstones_dropped = self.tombstones;

        self.mask = capacity - 1;
        self.tombstones = 0;

        for slot in old_slots {
            if let Slot::Occupied { hash, value } = slot {
                let mut index = self.home_index(hash);
                while !matches!(self.slots[index], Slot::Empty) {
                    index = (index + 1) & self.mask;
                }
                self.slots[index] = Slot::Occupied { hash, value };
            }
        }

        tracing::debug!(
            from = old_capacity,
            to = capacity,
            live = self.populated,
            tombstones_dropped,
            "expanded hash table"
        );

        Ok(())
    }

    /// Returns a histogram of probe lengths for the current table state.
    ///
    /// Index `d` counts the live values stored `d` slots after their home
    /// slot. The vector is as long as the longest probe plus one, and empty
    /// for an empty table.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();

        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { hash, .. } = slot {
                let distance = index.wrapping_sub(self.home_index(*hash)) & self.mask;
                if hist.len() <= distance {
                    hist.resize(distance + 1, 0);
                }
                hist[distance] += 1;
            }
        }

        hist
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let hist = self.probe_histogram();
        let total_probe: usize = hist.iter().enumerate().map(|(d, &n)| d * n).sum();

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            tombstones: self.tombstones,
            empty: self.capacity() - self.populated - self.tombstones,
            load_factor: self.populated as f64 / self.capacity() as f64,
            max_probe: hist.len().saturating_sub(1),
            mean_probe: if self.populated == 0 {
                0.0
            } else {
                total_probe as f64 / self.populated as f64
            },
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`try_entry`] method on [`HashTable`].
///
/// [`try_entry`]: HashTable::try_entry
pub enum Entry<'a, T> {
    /// No live value matched; a slot has been chosen for insertion.
    Vacant(VacantEntry<'a, T>),
    /// A live value matched.
    Occupied(OccupiedEntry<'a, T>),
}

impl<'a, T> Entry<'a, T> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    ///
    /// `default` is not called for an occupied entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry's value. Vacant entries are left
    /// vacant and `None` is returned.
    pub fn and_modify(self, f: impl FnOnce(&mut T)) -> Option<&'a mut T> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }
}

/// A view into a vacant entry in the hash table.
///
/// The slot was chosen when the entry was created: either the first
/// tombstone on the probe sequence or the empty slot that ended it.
pub struct VacantEntry<'a, T> {
    table: &'a mut HashTable<T>,
    index: usize,
    hash: u64,
}

impl<'a, T> VacantEntry<'a, T> {
    /// Inserts a value into the vacant entry and returns a mutable reference
    /// to it.
    pub fn insert(self, value: T) -> &'a mut T {
        let VacantEntry { table, index, hash } = self;
        match table.slots[index] {
            Slot::Tombstone => table.tombstones -= 1,
            Slot::Empty => {}
            Slot::Occupied { .. } => debug_assert!(false, "vacant entry points at a live slot"),
        }

        table.populated += 1;
        debug_assert!(table.populated < table.slots.len());

        table.slots[index] = Slot::Occupied { hash, value };
        match &mut table.slots[index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("slot was just filled"),
        }
    }
}

/// A view into an occupied entry in the hash table.
pub struct OccupiedEntry<'a, T> {
    table: &'a mut HashTable<T>,
    index: usize,
}

impl<'a, T> OccupiedEntry<'a, T> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &T {
        match &self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry points at a live slot"),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut T {
        match &mut self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry points at a live slot"),
        }
    }

    /// Converts the entry into a mutable reference to the value with the
    /// lifetime of the entry.
    pub fn into_mut(self) -> &'a mut T {
        let OccupiedEntry { table, index } = self;
        match &mut table.slots[index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry points at a live slot"),
        }
    }

    /// Replaces the value in the entry, returning the old value.
    pub fn insert(&mut self, value: T) -> T {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the table, leaving a tombstone, and returns the
    /// value.
    pub fn remove(self) -> T {
        match self.table.take_slot(self.index) {
            Some(value) => value,
            None => unreachable!("occupied entry points at a live slot"),
        }
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`]. It walks
/// the slot array once, front to back, skipping empty and tombstoned slots.
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, T> {
    table: &'a HashTable<T>,
    index: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        while let Some(slot) = self.table.slots.get(self.index) {
            self.index += 1;
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            index: self.index,
            remaining: self.remaining,
        }
    }
}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, T> {
    table: &'a mut HashTable<T>,
    index: usize,
}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        for _ in &mut *self {}
        self.table.clear();
    }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.table.populated == 0 {
            return None;
        }

        while let Some(slot) = self.table.slots.get_mut(self.index) {
            self.index += 1;
            match core::mem::replace(slot, Slot::Empty) {
                Slot::Occupied { value, .. } => {
                    self.table.populated -= 1;
                    return Some(value);
                }
                Slot::Tombstone => self.table.tombstones -= 1,
                Slot::Empty => {}
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}

impl<'a, T> IntoIterator for &'a HashTable<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
