//! # IDs
//!
//! Process-unique IDs namespaced by a marker type, via `LocalID<T>`. These
//! identify transient objects (in-flight strokes) for the lifetime of one
//! process and are never serialized; durable identity uses `uuid::Uuid`.
//!
//! `LocalID<T>::next()` (or the `Default` impl) hands out the next ID for
//! `T`'s namespace. IDs start at 1 and only ever grow.

// Next available ID per namespace. Allocation is rare and one-at-a-time, so a
// plain mutex'd map is plenty.
static ID_SERVER: parking_lot::Mutex<std::collections::BTreeMap<std::any::TypeId, u64>> =
    parking_lot::const_mutex(std::collections::BTreeMap::new());

/// An ID unique within this execution of the program. IDs of different
/// namespaces may share a numeric value and are distinct types on purpose.
pub struct LocalID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    // Namespace marker.
    _phantom: std::marker::PhantomData<T>,
}
impl<T: std::any::Any> LocalID<T> {
    /// Allocate the next ID in `T`'s namespace.
    #[must_use]
    pub fn next() -> Self {
        let mut server = ID_SERVER.lock();
        let counter = server.entry(std::any::TypeId::of::<T>()).or_insert(0);
        *counter += 1;
        Self {
            // Counter starts above zero and only increments.
            id: std::num::NonZeroU64::new(*counter).unwrap(),
            _phantom: std::marker::PhantomData,
        }
    }
    /// The raw numeric value. Only meaningful within `T`'s namespace.
    #[must_use]
    pub fn id(self) -> u64 {
        self.id.get()
    }
}
impl<T: std::any::Any> Default for LocalID<T> {
    fn default() -> Self {
        Self::next()
    }
}
impl<T: std::any::Any> Clone for LocalID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for LocalID<T> {}
impl<T: std::any::Any> PartialEq for LocalID<T> {
    fn eq(&self, other: &Self) -> bool {
        // Namespaces already agree at compile time.
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for LocalID<T> {}
impl<T: std::any::Any> std::hash::Hash for LocalID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl<T: std::any::Any> std::fmt::Display for LocalID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rsplit of a non-empty str always yields at least one element.
        write!(
            f,
            "{}#{}",
            std::any::type_name::<T>().rsplit("::").next().unwrap(),
            self.id
        )
    }
}
impl<T: std::any::Any> std::fmt::Debug for LocalID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::LocalID;

    #[test]
    fn sequential_ids_unique() {
        // Local namespace so other tests can't interfere.
        struct Namespace;
        type TestID = LocalID<Namespace>;

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..1024 {
            assert!(seen.insert(TestID::next().id()), "duplicate id");
        }
    }

    #[test]
    fn namespaces_are_independent() {
        struct A;
        struct B;
        // Both counters start from 1 regardless of interleaving.
        let a = LocalID::<A>::next();
        let b = LocalID::<B>::next();
        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 1);
    }
}
