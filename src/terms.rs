pub use fixed_map::Key;
pub use fixed_map::Key as Term;
use fixed_map::Map as FixedMap;

use crate::membership::Shape;

/// The membership function shapes of one linguistic variable, keyed by its
/// term enum.
#[derive(Default)]
pub struct Terms<K: Term>(pub(crate) FixedMap<K, Shape>);

impl<K: Term> Terms<K> {
    pub fn new() -> Self {
        Self(FixedMap::new())
    }

    pub fn insert(&mut self, key: K, shape: Shape) {
        self.0.insert(key, shape);
    }
}
