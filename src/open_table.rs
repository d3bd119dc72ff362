//! [`OpenTable`] is a dynamically resizing open-addressing hash table.

use super::Equivalent;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash, Hasher};
use std::iter::FusedIterator;
use std::mem::replace;

/// The ascending sequence of table capacities.
///
/// Every entry is prime, so the double-hashing step is always coprime with the table
/// length and a probe sequence visits every slot before repeating. Adjacent entries
/// roughly double, keeping the number of rebuilds logarithmic in the number of
/// insertions. The sequence is process-wide immutable configuration shared by every
/// table instance.
const CAPACITIES: &[usize] = &[
    17, 37, 79, 163, 331, 673, 1_361, 2_729, 5_471, 10_949, 21_911, 43_853, 87_719, 175_447,
    350_899, 701_819, 1_403_641, 2_807_303, 5_614_657, 11_229_331, 22_458_671, 44_917_381,
    89_834_777, 179_669_557,
];

/// Secondary hash modulus at the smallest capacity, where the sequence has no previous
/// prime to derive the probe step from.
const SMALLEST_SECONDARY: usize = 13;

/// Load factor at which an insertion grows the table.
const GROW_THRESHOLD: f32 = 0.5;

/// Load factor below which a removal shrinks the table.
const SHRINK_THRESHOLD: f32 = 0.125;

/// Tombstone density at which the table is rebuilt at the same capacity to reclaim
/// deleted slots.
const PURGE_THRESHOLD: f32 = 0.2;

/// Open-addressing hash table with prime-number capacities and double hashing.
///
/// [`OpenTable`] stores its entries in a single slot array whose length is drawn from
/// a fixed ascending sequence of primes. Collisions are resolved by probing: the home
/// slot is the key hash modulo the capacity, and each subsequent slot is reached by a
/// key-dependent step derived from the previous prime in the sequence. Since the step
/// is non-zero and smaller than the prime capacity, a probe sequence visits every slot
/// of the table before repeating, bounding every operation to at most `capacity`
/// probes.
///
/// ## The key features of [`OpenTable`]
///
/// * Automatic resizing: the load factor is kept in `[0.125, 0.5)` by growing on
///   insertion and shrinking on removal, saturating at both ends of the capacity
///   sequence.
/// * Bounded tombstones: removals leave tombstones so probe sequences stay intact, and
///   the table is compacted in place whenever tombstones reach a fifth of the
///   capacity.
/// * One rebuild path: growth, shrinkage, and compaction are all the same operation,
///   reinserting every live entry into a fresh slot array.
/// * Borrowed-key lookups: any `Q: Equivalent<K> + Hash` can be used to search the
///   table, e.g. `&str` against `String` keys.
///
/// [`OpenTable`] is a single-threaded container: mutation goes through `&mut self`,
/// and sharing it across threads requires external mutual exclusion.
///
/// ## Examples
///
/// ```
/// use primetable::OpenTable;
///
/// let mut table: OpenTable<String, u32> = OpenTable::new();
///
/// assert_eq!(table.insert("one".to_string(), 1), None);
/// assert_eq!(table.insert("one".to_string(), 10), Some(1));
/// assert_eq!(table.get("one"), Some(&10));
/// assert_eq!(table.remove("one"), Some(10));
/// assert!(table.is_empty());
/// ```
pub struct OpenTable<K, V, H = RandomState>
where
    H: BuildHasher,
{
    slots: Box<[Slot<K, V>]>,
    capacity_index: usize,
    len: usize,
    tombstones: usize,
    build_hasher: H,
}

/// A single slot of the table.
///
/// Probing stops at [`Slot::Empty`] and continues through [`Slot::Deleted`], so a
/// removal must never turn an occupied slot back into an empty one: it would hide
/// every live key placed further along a probe sequence passing through it.
#[derive(Clone)]
enum Slot<K, V> {
    /// Never used, or reclaimed by a rebuild; terminates probe sequences.
    Empty,
    /// A live entry.
    Occupied(K, V),
    /// A tombstone: deleted but not yet reclaimed.
    Deleted,
}

/// An iterator over the entries of an [`OpenTable`].
pub struct Iter<'t, K, V> {
    slots: std::slice::Iter<'t, Slot<K, V>>,
    remaining: usize,
}

/// An iterator over the keys of an [`OpenTable`].
pub struct Keys<'t, K, V> {
    inner: Iter<'t, K, V>,
}

/// An owning iterator over the entries of an [`OpenTable`].
pub struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Slot<K, V>>,
    remaining: usize,
}

impl<K, V> OpenTable<K, V, RandomState>
where
    K: Eq + Hash,
{
    /// Creates an empty [`OpenTable`] at the smallest capacity in the sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// assert_eq!(table.capacity(), 17);
    /// assert_eq!(table.len(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty [`OpenTable`] able to hold `capacity` entries without growing.
    ///
    /// The chosen table length is the smallest prime in the capacity sequence that
    /// keeps `capacity` live entries under the growth threshold, saturating at the
    /// largest prime.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let table: OpenTable<u64, u32> = OpenTable::with_capacity(1000);
    ///
    /// assert_eq!(table.capacity(), 2729);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, H> OpenTable<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    /// Creates an empty [`OpenTable`] with the given [`BuildHasher`].
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let table: OpenTable<u64, u32, RandomState> = OpenTable::with_hasher(RandomState::new());
    /// ```
    #[inline]
    pub fn with_hasher(build_hasher: H) -> Self {
        Self {
            slots: Self::new_slots(CAPACITIES[0]),
            capacity_index: 0,
            len: 0,
            tombstones: 0,
            build_hasher,
        }
    }

    /// Creates an empty [`OpenTable`] with the specified capacity and [`BuildHasher`].
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let table: OpenTable<u64, u32, RandomState> =
    ///     OpenTable::with_capacity_and_hasher(100, RandomState::new());
    ///
    /// assert_eq!(table.capacity(), 331);
    /// ```
    #[inline]
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: H) -> Self {
        let capacity_index = CAPACITIES
            .iter()
            .position(|&prime| capacity <= (prime - 1) / 2)
            .unwrap_or(CAPACITIES.len() - 1);
        Self {
            slots: Self::new_slots(CAPACITIES[capacity_index]),
            capacity_index,
            len: 0,
            tombstones: 0,
            build_hasher,
        }
    }

    /// Inserts a key-value pair, returning the value it replaced.
    ///
    /// If another entry would push the load factor to `0.5`, the table grows to the
    /// next capacity in the sequence before the entry is placed; at the largest
    /// capacity the table simply tolerates a higher load factor. The entry goes into
    /// the first tombstone encountered on its probe sequence, if any, otherwise into
    /// the terminating empty slot.
    ///
    /// # Panics
    ///
    /// Panics if the key is absent and every slot is occupied, which requires the
    /// capacity sequence to be saturated with roughly 180 million live entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let mut table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// assert_eq!(table.insert(1, 0), None);
    /// assert_eq!(table.insert(1, 1), Some(0));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if (self.len + 1) as f32 / self.capacity() as f32 >= GROW_THRESHOLD {
            self.rebuild(self.capacity_index + 1);
        }

        let hash = self.hash(&key);
        let capacity = self.capacity();
        let step = Self::probe_step(hash, self.capacity_index);
        let mut index = Self::home_slot(hash, capacity);
        let mut reusable = None;
        let mut empty = None;
        for _ in 0..capacity {
            match &mut self.slots[index] {
                Slot::Occupied(existing, current) if *existing == key => {
                    return Some(replace(current, value));
                }
                Slot::Occupied(..) => (),
                Slot::Deleted => {
                    if reusable.is_none() {
                        reusable = Some(index);
                    }
                }
                Slot::Empty => {
                    empty = Some(index);
                    break;
                }
            }
            index = (index + step) % capacity;
        }

        let index = if let Some(index) = reusable {
            self.tombstones -= 1;
            index
        } else if let Some(index) = empty {
            index
        } else {
            // The probe visited every slot without a match or a free one.
            unreachable!("the table is full and the capacity sequence is saturated");
        };
        self.slots[index] = Slot::Occupied(key, value);
        self.len += 1;
        None
    }

    /// Inserts or removes a key depending on the payload.
    ///
    /// A put with an empty payload removes the key: `put(key, None)` is equivalent to
    /// [`remove`](Self::remove), and `put(key, Some(value))` to
    /// [`insert`](Self::insert). The previous value, if any, is returned either way.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let mut table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// assert_eq!(table.put(1, Some(0)), None);
    /// assert_eq!(table.put(1, None), Some(0));
    /// assert!(!table.contains(&1));
    /// ```
    #[inline]
    pub fn put(&mut self, key: K, value: Option<V>) -> Option<V> {
        match value {
            Some(value) => self.insert(key, value),
            None => self.remove(&key),
        }
    }

    /// Returns a reference to the value associated with the key.
    ///
    /// The probe stops at the first empty slot, skips tombstones, and gives up after
    /// `capacity` steps, so lookups terminate even under pathological key
    /// distributions.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let mut table: OpenTable<String, u32> = OpenTable::new();
    ///
    /// table.insert("one".to_string(), 1);
    /// assert_eq!(table.get("one"), Some(&1));
    /// assert_eq!(table.get("two"), None);
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let index = self.search(key)?;
        match &self.slots[index] {
            Slot::Occupied(_, value) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let mut table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// table.insert(1, 1);
    /// if let Some(value) = table.get_mut(&1) {
    ///     *value += 1;
    /// }
    /// assert_eq!(table.get(&1), Some(&2));
    /// ```
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let index = self.search(key)?;
        match &mut self.slots[index] {
            Slot::Occupied(_, value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if the table contains the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let mut table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// assert!(!table.contains(&1));
    /// table.insert(1, 0);
    /// assert!(table.contains(&1));
    /// ```
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.search(key).is_some()
    }

    /// Removes the key from the table, returning its value.
    ///
    /// Removing an absent key is a no-op returning `None`. A removal leaves a
    /// tombstone in place of the entry, then evaluates two independent triggers: the
    /// table shrinks to the previous capacity if the load factor fell below `0.125`
    /// (a no-op at the smallest capacity), and it is rebuilt at the same capacity if
    /// tombstones reached a fifth of all slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let mut table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// table.insert(1, 0);
    /// assert_eq!(table.remove(&1), Some(0));
    /// assert_eq!(table.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let index = self.search(key)?;
        let Slot::Occupied(_, value) = replace(&mut self.slots[index], Slot::Deleted) else {
            // `search` only returns occupied slots.
            unreachable!();
        };
        self.len -= 1;
        self.tombstones += 1;

        if self.load_factor() < SHRINK_THRESHOLD {
            self.rebuild(self.capacity_index.wrapping_sub(1));
        }
        if self.tombstones as f32 / self.capacity() as f32 >= PURGE_THRESHOLD {
            self.rebuild(self.capacity_index);
        }
        Some(value)
    }

    /// Removes every entry and resets the table to the smallest capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let mut table: OpenTable<u64, u32> = OpenTable::with_capacity(1000);
    ///
    /// table.insert(1, 0);
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 17);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.slots = Self::new_slots(CAPACITIES[0]);
        self.capacity_index = 0;
        self.len = 0;
        self.tombstones = 0;
    }

    /// Returns the number of live entries in the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let mut table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// table.insert(1, 0);
    /// assert_eq!(table.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// assert!(table.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity of the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// assert_eq!(table.capacity(), 17);
    /// ```
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the current load factor: live entries divided by capacity.
    ///
    /// Outside of the extremes of the capacity sequence, the load factor stays in
    /// `[0.125, 0.5)` after every completed operation.
    #[inline]
    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.capacity() as f32
    }

    /// Returns the number of tombstoned slots: deleted but not yet reclaimed.
    ///
    /// Stays below a fifth of the capacity after every completed removal.
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns an iterator over the entries of the table.
    ///
    /// Entries are yielded in slot order, which depends on hashing and placement
    /// history; no key order is guaranteed. The shared borrow freezes the table for
    /// the lifetime of the iterator, so it observes a snapshot of the table state at
    /// call time.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let mut table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// table.insert(1, 10);
    /// table.insert(2, 20);
    /// assert_eq!(table.iter().count(), 2);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys of the table, in unspecified order.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let mut table: OpenTable<u64, u32> = OpenTable::new();
    ///
    /// table.insert(1, 10);
    /// assert_eq!(table.keys().copied().collect::<Vec<_>>(), vec![1]);
    /// ```
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns the hash value of the given key.
    #[inline]
    fn hash<Q>(&self, key: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        let mut hasher = self.build_hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Returns the home slot of a hash value: the first slot of its probe sequence.
    #[inline]
    fn home_slot(hash: u64, capacity: usize) -> usize {
        (hash % capacity as u64) as usize
    }

    /// Returns the probe step for a hash value at the given capacity index.
    ///
    /// The step is derived from the previous prime in the capacity sequence, or a
    /// fixed smaller prime at the smallest capacity, and lies in `1..=secondary`.
    /// It is therefore never zero and always smaller than the prime capacity, so
    /// consecutive probes cycle through the whole table.
    #[inline]
    fn probe_step(hash: u64, capacity_index: usize) -> usize {
        let secondary = if capacity_index == 0 {
            SMALLEST_SECONDARY
        } else {
            CAPACITIES[capacity_index - 1]
        };
        secondary - (hash % secondary as u64) as usize
    }

    /// Probes for the key and returns the index of its occupied slot.
    fn search<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let hash = self.hash(key);
        let capacity = self.capacity();
        let step = Self::probe_step(hash, self.capacity_index);
        let mut index = Self::home_slot(hash, capacity);
        for _ in 0..capacity {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied(existing, _) if key.equivalent(existing) => return Some(index),
                _ => (),
            }
            index = (index + step) % capacity;
        }
        None
    }

    /// Rebuilds the table at the target capacity index.
    ///
    /// The one operation behind growth, shrinkage, and tombstone compaction: a fresh
    /// slot array is allocated and every live entry is reinserted in slot order, so
    /// the result is always tombstone-free. An out-of-range target is a silent no-op,
    /// which is what clamps resizing at both ends of the capacity sequence.
    fn rebuild(&mut self, target_index: usize) {
        let Some(&capacity) = CAPACITIES.get(target_index) else {
            return;
        };

        let old_slots = replace(&mut self.slots, Self::new_slots(capacity));
        self.capacity_index = target_index;
        self.tombstones = 0;
        for slot in old_slots.into_vec() {
            if let Slot::Occupied(key, value) = slot {
                self.place(key, value);
            }
        }
    }

    /// Places an entry into a freshly rebuilt table.
    ///
    /// The slot array holds no tombstones and at least one empty slot, so the plain
    /// probe-to-empty walk terminates; duplicate keys cannot occur since every entry
    /// comes from the table being rebuilt.
    fn place(&mut self, key: K, value: V) {
        let hash = self.hash(&key);
        let capacity = self.capacity();
        let step = Self::probe_step(hash, self.capacity_index);
        let mut index = Self::home_slot(hash, capacity);
        while let Slot::Occupied(..) = self.slots[index] {
            index = (index + step) % capacity;
        }
        self.slots[index] = Slot::Occupied(key, value);
    }

    /// Allocates a slot array of the given length with every slot empty.
    fn new_slots(capacity: usize) -> Box<[Slot<K, V>]> {
        (0..capacity).map(|_| Slot::Empty).collect()
    }
}

impl<K, V, H> Clone for OpenTable<K, V, H>
where
    K: Clone + Eq + Hash,
    V: Clone,
    H: BuildHasher + Clone,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            capacity_index: self.capacity_index,
            len: self.len,
            tombstones: self.tombstones,
            build_hasher: self.build_hasher.clone(),
        }
    }
}

impl<K, V, H> Debug for OpenTable<K, V, H>
where
    K: Debug + Eq + Hash,
    V: Debug,
    H: BuildHasher,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, H> Default for OpenTable<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher + Default,
{
    /// Creates an empty [`OpenTable`] at the smallest capacity in the sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::OpenTable;
    ///
    /// let table: OpenTable<u64, u32> = OpenTable::default();
    ///
    /// assert_eq!(table.capacity(), 17);
    /// ```
    #[inline]
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<K, V, H> Extend<(K, V)> for OpenTable<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for OpenTable<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher + Default,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut table = Self::with_capacity_and_hasher(iter.size_hint().0, H::default());
        table.extend(iter);
        table
    }
}

impl<'t, K, V, H> IntoIterator for &'t OpenTable<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    type IntoIter = Iter<'t, K, V>;
    type Item = (&'t K, &'t V);

    #[inline]
    fn into_iter(self) -> Iter<'t, K, V> {
        self.iter()
    }
}

impl<K, V, H> IntoIterator for OpenTable<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    #[inline]
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            slots: self.slots.into_vec().into_iter(),
            remaining: self.len,
        }
    }
}

impl<'t, K, V> Iterator for Iter<'t, K, V> {
    type Item = (&'t K, &'t V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(key, value) = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'t, K, V> Iterator for Keys<'t, K, V> {
    type Item = &'t K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(key, value) = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
