use alloc::borrow::ToOwned;
use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::iter::FusedIterator;

use crate::error::Error;
use crate::error::InvalidArgument;
use crate::fnv::FnvBuildHasher;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::key::Key;
use crate::key::make_hash;

#[inline(always)]
fn equivalent<T, Q>(value: &Q) -> impl Fn(&T) -> bool
where
    T: Borrow<Q>,
    Q: Eq + ?Sized,
{
    move |stored| {
        let stored: &Q = stored.borrow();
        stored == value
    }
}

/// A hash set built on the linear-probing [`HashTable`].
///
/// `HashSet<T, S>` stores unique [`Key`]s and hashes them with `S`,
/// [`FnvBuildHasher`] by default.
///
/// # Performance Characteristics
///
/// - **Memory**: one discriminant and a u64 hash per slot, plus the size of
///   `T`.
#[derive(Clone)]
pub struct HashSet<T, S = FnvBuildHasher> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Key,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Key,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> HashSet<T, FnvBuildHasher>
where
    T: Key,
{
    /// Creates an empty set with room for at least `min_capacity` slots,
    /// hashing with FNV-1a.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let set: HashSet<&str> = HashSet::with_capacity(10)?;
    /// assert_eq!(set.capacity(), 16);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn with_capacity(min_capacity: usize) -> Result<Self, Error> {
        Self::with_capacity_and_hasher(min_capacity, FnvBuildHasher::default())
    }
}

impl<T, S> HashSet<T, S>
where
    T: Key,
    S: BuildHasher,
{
    /// Creates an empty set with room for at least `min_capacity` slots and
    /// the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_capacity_and_hasher(100, RandomState::new())?;
    /// assert_eq!(set.capacity(), 128);
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn with_capacity_and_hasher(min_capacity: usize, hash_builder: S) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_capacity(min_capacity)?,
            hash_builder,
        })
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Reserves capacity for at least `additional` more values.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.reserve(additional)
    }

    /// Adds a value to the set.
    ///
    /// Returns `Ok(true)` if the value was added and `Ok(false)` if an equal
    /// value was already present, in which case the set is unchanged and
    /// `value` is dropped.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgument::EmptyKey`] for zero-length strings and byte
    ///   strings.
    /// - Any error from [`HashTable::try_entry`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::with_capacity(4)?;
    /// assert_eq!(set.insert("a")?, true);
    /// assert_eq!(set.insert("a")?, false);
    /// assert!(set.insert("").is_err());
    /// assert_eq!(set.len(), 1);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn insert(&mut self, value: T) -> Result<bool, Error> {
        if value.is_empty_key() {
            return Err(InvalidArgument::EmptyKey.into());
        }

        let hash = make_hash(&self.hash_builder, &value);
        match self.table.try_entry(hash, equivalent(&value))? {
            TableEntry::Occupied(_) => Ok(false),
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                Ok(true)
            }
        }
    }

    /// Adds an owned copy of `value` if no equal value is present.
    ///
    /// The copy is made only when the value is actually inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<String> = HashSet::with_capacity(4)?;
    /// assert!(set.insert_copied("tag")?);
    /// assert!(!set.insert_copied("tag")?);
    /// assert!(set.contains("tag"));
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn insert_copied<Q>(&mut self, value: &Q) -> Result<bool, Error>
    where
        T: Borrow<Q>,
        Q: Key + ToOwned<Owned = T> + ?Sized,
    {
        if value.is_empty_key() {
            return Err(InvalidArgument::EmptyKey.into());
        }

        let hash = make_hash(&self.hash_builder, value);
        match self.table.try_entry(hash, equivalent(value))? {
            TableEntry::Occupied(_) => Ok(false),
            TableEntry::Vacant(entry) => {
                entry.insert(value.to_owned());
                Ok(true)
            }
        }
    }

    /// Returns `true` if the set contains a value equal to `value`.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Key + ?Sized,
    {
        let hash = make_hash(&self.hash_builder, value);
        self.table.contains(hash, equivalent(value))
    }

    /// Returns a reference to the stored value equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Key + ?Sized,
    {
        let hash = make_hash(&self.hash_builder, value);
        self.table.find(hash, equivalent(value))
    }

    /// Removes a value from the set. Returns whether it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::with_capacity(4)?;
    /// set.insert(2u32)?;
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Key + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<String> = HashSet::with_capacity(4)?;
    /// set.insert("owned".to_string())?;
    /// assert_eq!(set.take("owned"), Some("owned".to_string()));
    /// assert_eq!(set.take("owned"), None);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Key + ?Sized,
    {
        let hash = make_hash(&self.hash_builder, value);
        self.table.remove(hash, equivalent(value))
    }

    /// Returns `true` if `self` has no values in common with `other`.
    pub fn is_disjoint(&self, other: &HashSet<T, S>) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().all(|v| !large.contains(v))
    }

    /// Returns `true` if every value of `self` is also in `other`.
    pub fn is_subset(&self, other: &HashSet<T, S>) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if every value of `other` is also in `self`.
    pub fn is_superset(&self, other: &HashSet<T, S>) -> bool {
        other.is_subset(self)
    }
}

impl<T, S> HashSet<T, S> {
    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes every value, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the values of the set, in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes and yields every value. The set is empty once the iterator is
    /// dropped.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns a histogram of probe lengths. See
    /// [`HashTable::probe_histogram`].
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        self.table.probe_histogram()
    }

    /// Returns utilization statistics. See [`HashTable::debug_stats`].
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A draining iterator over the values of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            Self {
                k1: OsRng.try_next_u64().unwrap_or(0),
                k2: OsRng.try_next_u64().unwrap_or(0),
            }
        }
    }

    fn sip_set<T: Key>(min_capacity: usize) -> HashSet<T, SipHashBuilder> {
        HashSet::with_capacity_and_hasher(min_capacity, SipHashBuilder::default()).unwrap()
    }

    #[test]
    fn test_with_capacity() {
        let set: HashSet<i32> = HashSet::with_capacity(5).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 8);

        assert_eq!(
            HashSet::<i32>::with_capacity(0).unwrap_err(),
            Error::InvalidArgument(InvalidArgument::ZeroCapacity)
        );
    }

    #[test]
    fn test_insert_and_contains() {
        let mut set = sip_set(4);

        assert!(set.insert(1).unwrap());
        assert!(set.insert(2).unwrap());
        assert!(!set.insert(1).unwrap());

        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(set.contains(&2));
        assert!(!set.contains(&3));
    }

    #[test]
    fn test_duplicate_keeps_first_value() {
        let mut set: HashSet<String> = HashSet::with_capacity(4).unwrap();
        let first = String::from("dup");
        let ptr = first.as_ptr();
        assert!(set.insert(first).unwrap());
        assert!(!set.insert(String::from("dup")).unwrap());

        assert_eq!(set.get("dup").map(|s| s.as_ptr()), Some(ptr));
    }

    #[test]
    fn test_insert_copied() {
        let mut set: HashSet<Vec<u8>> = HashSet::with_capacity(4).unwrap();
        assert!(set.insert_copied(&b"abc"[..]).unwrap());
        assert!(!set.insert_copied(&b"abc"[..]).unwrap());
        assert!(set.contains(&b"abc"[..]));
        assert_eq!(
            set.insert_copied(&b""[..]).unwrap_err(),
            Error::InvalidArgument(InvalidArgument::EmptyKey)
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_and_take() {
        let mut set = sip_set(4);
        set.insert("a".to_string()).unwrap();
        set.insert("b".to_string()).unwrap();

        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        assert_eq!(set.take("b"), Some("b".to_string()));
        assert_eq!(set.take("b"), None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_reinsert_cycles() {
        let mut set: HashSet<u64> = HashSet::with_capacity(8).unwrap();
        for round in 0..50u64 {
            for k in 0..5 {
                assert!(set.insert(round * 10 + k).unwrap());
            }
            for k in 0..5 {
                assert!(set.remove(&(round * 10 + k)));
            }
            assert!(set.len() < set.capacity());
        }
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 8);
    }

    #[test]
    fn test_equality() {
        let mut a = sip_set(4);
        let mut b = sip_set(64);
        for k in 0..10 {
            a.insert(k).unwrap();
        }
        for k in (0..10).rev() {
            b.insert(k).unwrap();
        }
        assert_eq!(a, b);

        b.remove(&3);
        assert_ne!(a, b);
        b.insert(30).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_subset_superset_disjoint() {
        let mut small: HashSet<u32> = HashSet::with_capacity(4).unwrap();
        let mut large: HashSet<u32> = HashSet::with_capacity(4).unwrap();
        let mut other: HashSet<u32> = HashSet::with_capacity(4).unwrap();
        for k in 0..3 {
            small.insert(k).unwrap();
        }
        for k in 0..6 {
            large.insert(k).unwrap();
        }
        for k in 10..12 {
            other.insert(k).unwrap();
        }

        assert!(small.is_subset(&large));
        assert!(!large.is_subset(&small));
        assert!(large.is_superset(&small));
        assert!(small.is_disjoint(&other));
        assert!(!small.is_disjoint(&large));
    }

    #[test]
    fn test_iter_and_drain() {
        let mut set = sip_set(2);
        for k in 0..25u32 {
            set.insert(k).unwrap();
        }

        let mut values: Vec<u32> = set.iter().copied().collect();
        values.sort();
        assert_eq!(values, (0..25).collect::<Vec<_>>());
        assert_eq!((&set).into_iter().len(), 25);

        let mut drained: Vec<u32> = set.drain().collect();
        drained.sort();
        assert_eq!(drained, values);
        assert!(set.is_empty());
        assert_eq!(set.iter().next(), None);
    }

    #[test]
    fn test_clear_and_reserve() {
        let mut set: HashSet<u16> = HashSet::with_capacity(2).unwrap();
        set.reserve(50).unwrap();
        let capacity = set.capacity();
        for k in 0..50 {
            set.insert(k).unwrap();
        }
        assert_eq!(set.capacity(), capacity);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), capacity);
        assert!(!set.contains(&1));
    }

    #[test]
    fn test_debug_and_clone() {
        let mut set: HashSet<&str> = HashSet::with_capacity(4).unwrap();
        set.insert("x").unwrap();

        let cloned = set.clone();
        set.insert("y").unwrap();
        assert_eq!(cloned.len(), 1);
        assert_eq!(format!("{:?}", cloned), r#"{"x"}"#);
    }

    #[test]
    fn test_char_and_tuple_members() {
        let mut chars: HashSet<char> = HashSet::with_capacity(4).unwrap();
        for c in "hello".chars() {
            chars.insert(c).unwrap();
        }
        assert_eq!(chars.len(), 4);

        let mut pairs: HashSet<(u8, &str)> = HashSet::with_capacity(4).unwrap();
        pairs.insert((1, "a")).unwrap();
        assert!(pairs.contains(&(1, "a")));
        assert!(!pairs.contains(&(1, "b")));
        assert!(pairs.insert((2, "")).is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_large_workload() {
        let mut set = sip_set(2);
        let keys: Vec<u64> = (0..50000u64).map(|k| k.wrapping_mul(0x9e3779b97f4a7c15)).collect();
        for &k in &keys {
            assert!(set.insert(k).unwrap());
        }
        for &k in keys.iter().step_by(3) {
            assert!(set.remove(&k));
        }
        for (i, k) in keys.iter().enumerate() {
            assert_eq!(set.contains(k), i % 3 != 0);
        }

        let stats = set.debug_stats();
        assert_eq!(stats.populated, set.len());
        assert!(stats.load_factor < 0.85);
    }

    #[test]
    fn test_byte_string_members() {
        let mut set: HashSet<Vec<u8>> = HashSet::with_capacity(4).unwrap();
        set.insert(vec![1, 2, 3]).unwrap();
        set.insert(b"text".to_vec()).unwrap();

        assert!(set.contains(&[1u8, 2, 3][..]));
        assert!(set.contains("text".as_bytes()));
        assert!(!set.contains(&[1u8, 2][..]));
    }
}
