//! Definition and repetition level computation (Dremel record shredding).
//!
//! The type an accessor returns mirrors the optional and repeated steps of
//! the column path: `Option<T>` is an optional step, `Vec<T>` a repeated one
//! and a [`PhysicalValue`] the leaf. Required groups add no wrapper. Walking
//! a value of that type yields the level entries for one record.

use crate::value::PhysicalValue;
use crate::Repetition;

/// A (definition level, repetition level) pair
pub type LevelPair = (u16, u16);

/// Per-column value and level buffers for one page-set.
///
/// Definition levels are only kept when the column has optional or repeated
/// steps, repetition levels only when it has repeated steps.
#[derive(Debug, Clone)]
pub struct LevelBuffer<V> {
    max_def_level: u16,
    max_rep_level: u16,
    def_levels: Vec<u16>,
    rep_levels: Vec<u16>,
    values: Vec<V>,
    num_levels: usize,
}

impl<V> LevelBuffer<V> {
    pub fn new(max_def_level: u16, max_rep_level: u16) -> Self {
        Self {
            max_def_level,
            max_rep_level,
            def_levels: Vec::new(),
            rep_levels: Vec::new(),
            values: Vec::new(),
            num_levels: 0,
        }
    }

    /// Buffer sized for the path encoded by `T`
    pub fn for_type<T: Shred<Leaf = V>>() -> Self {
        let steps = T::nullable_steps();
        let max_rep = steps.iter().filter(|r| **r == Repetition::Repeated).count();
        Self::new(steps.len() as u16, max_rep as u16)
    }

    fn push_levels(&mut self, def: u16, rep: u16) {
        if self.max_def_level > 0 {
            self.def_levels.push(def);
        }
        if self.max_rep_level > 0 {
            self.rep_levels.push(rep);
        }
        self.num_levels += 1;
    }

    /// Records a present leaf value
    pub fn push_value(&mut self, value: V, def: u16, rep: u16) {
        self.push_levels(def, rep);
        self.values.push(value);
    }

    /// Records an entry that ends above the leaf: no value is buffered
    pub fn push_null(&mut self, def: u16, rep: u16) {
        self.push_levels(def, rep);
    }

    pub fn max_def_level(&self) -> u16 {
        self.max_def_level
    }

    pub fn max_rep_level(&self) -> u16 {
        self.max_rep_level
    }

    pub fn def_levels(&self) -> &[u16] {
        &self.def_levels
    }

    pub fn rep_levels(&self) -> &[u16] {
        &self.rep_levels
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Number of level entries, one per record unless a repeated step fans out
    pub fn num_levels(&self) -> usize {
        self.num_levels
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    /// Level entries as pairs. Columns without definition levels report the
    /// (implicit) maximum.
    pub fn level_pairs(&self) -> Vec<LevelPair> {
        (0..self.num_levels)
            .map(|i| {
                let def = self.def_levels.get(i).copied().unwrap_or(self.max_def_level);
                let rep = self.rep_levels.get(i).copied().unwrap_or(0);
                (def, rep)
            })
            .collect()
    }

    /// Level entries as seen from an enclosing group with the given maximum
    /// levels: entries that only repeat below the group are dropped and
    /// definition levels are capped at the group's.
    ///
    /// Two leaves under the same group describe the same group instances
    /// exactly when their projections are equal.
    pub fn group_levels(&self, group_def: u16, group_rep: u16) -> Vec<LevelPair> {
        self.level_pairs()
            .into_iter()
            .filter(|(_, rep)| *rep <= group_rep)
            .map(|(def, rep)| (def.min(group_def), rep))
            .collect()
    }

    /// Hands over the buffers, leaving nothing behind
    pub fn into_parts(self) -> (Vec<u16>, Vec<u16>, Vec<V>, usize) {
        (self.rep_levels, self.def_levels, self.values, self.num_levels)
    }
}

/// A value tree that can be shredded into level entries.
pub trait Shred: Sized {
    type Leaf: PhysicalValue;

    /// Kinds of the optional and repeated steps, outermost first
    fn nullable_steps() -> Vec<Repetition>;

    /// Emits the entries for this value.
    ///
    /// `def` counts the optional and repeated steps entered so far, `rep` is
    /// the repetition level the next entry carries and `depth` the number of
    /// repeated steps entered so far.
    fn shred(self, out: &mut LevelBuffer<Self::Leaf>, def: u16, rep: u16, depth: u16);
}

macro_rules! impl_leaf {
    ($($ty:ty),*) => {
        $(
            impl Shred for $ty {
                type Leaf = $ty;

                fn nullable_steps() -> Vec<Repetition> {
                    Vec::new()
                }

                fn shred(self, out: &mut LevelBuffer<$ty>, def: u16, rep: u16, _depth: u16) {
                    out.push_value(self, def, rep);
                }
            }
        )*
    };
}

impl_leaf!(i32, i64, u32, u64, f32, f64, bool, String);

impl<T: Shred> Shred for Option<T> {
    type Leaf = T::Leaf;

    fn nullable_steps() -> Vec<Repetition> {
        let mut steps = vec![Repetition::Optional];
        steps.extend(T::nullable_steps());
        steps
    }

    fn shred(self, out: &mut LevelBuffer<T::Leaf>, def: u16, rep: u16, depth: u16) {
        match self {
            Some(inner) => inner.shred(out, def + 1, rep, depth),
            None => out.push_null(def, rep),
        }
    }
}

impl<T: Shred> Shred for Vec<T> {
    type Leaf = T::Leaf;

    fn nullable_steps() -> Vec<Repetition> {
        let mut steps = vec![Repetition::Repeated];
        steps.extend(T::nullable_steps());
        steps
    }

    fn shred(self, out: &mut LevelBuffer<T::Leaf>, def: u16, rep: u16, depth: u16) {
        if self.is_empty() {
            out.push_null(def, rep);
            return;
        }
        let depth = depth + 1;
        for (i, item) in self.into_iter().enumerate() {
            let item_rep = if i == 0 { rep } else { depth };
            item.shred(out, def + 1, item_rep, depth);
        }
    }
}

/// Computes the level entries and present values one record contributes.
pub fn compute_levels<T: Shred>(value: T) -> (Vec<LevelPair>, Vec<T::Leaf>) {
    let mut buffer = LevelBuffer::for_type::<T>();
    value.shred(&mut buffer, 0, 0, 0);
    let pairs = buffer.level_pairs();
    let (_, _, values, _) = buffer.into_parts();
    (pairs, values)
}
