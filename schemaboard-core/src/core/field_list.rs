//! Ordered, id-keyed field collection for the table being edited.
//!
//! [`FieldListStore`] is the only place the field order changes. Every
//! mutation is synchronous, never fails, and treats out-of-range or unknown
//! arguments as a no-op. Each one returns `true` when the order or membership
//! actually changed.

use crate::{Field, Result, SchemaboardError};
use std::collections::{BTreeMap, HashMap};

/// Prefix used for the placeholder name of newly inserted fields.
pub const DEFAULT_NEW_FIELD_PREFIX: &str = "new item";

/// Row index → edited field attributes, as produced by the form layer.
pub type EditedRows = BTreeMap<usize, Field>;

/// Owns the ordered field sequence of one table.
#[derive(Debug, Clone)]
pub struct FieldListStore {
    fields: Vec<Field>,
    positions: HashMap<String, usize>,
    new_field_prefix: String,
    dirty: bool,
}

impl Default for FieldListStore {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            positions: HashMap::new(),
            new_field_prefix: DEFAULT_NEW_FIELD_PREFIX.to_string(),
            dirty: false,
        }
    }
}

impl FieldListStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `fields` in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaboardError::InvalidTable`] if two fields share an id.
    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        let mut store = Self::new();
        store.replace(fields)?;
        Ok(store)
    }

    /// Sets the placeholder-name prefix for [`insert_after`](Self::insert_after).
    #[must_use]
    pub fn with_new_field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.new_field_prefix = prefix.into();
        self
    }

    /// Replaces the whole sequence, e.g. when the editor switches tables.
    ///
    /// On error the store is left untouched. A successful replace clears the
    /// dirty flag.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaboardError::InvalidTable`] if two fields share an id.
    pub fn replace(&mut self, fields: Vec<Field>) -> Result<()> {
        let positions = index_by_id(&fields)?;
        self.fields = fields;
        self.positions = positions;
        self.dirty = false;
        Ok(())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the current position of `id`.
    pub fn index(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.index(id).map(|i| &self.fields[i])
    }

    /// Field ids in display order.
    pub fn ids(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.id.as_str()).collect()
    }

    /// The current fields keyed by row index, the shape a form starts from.
    pub fn rows(&self) -> EditedRows {
        self.fields.iter().cloned().enumerate().collect()
    }

    /// Whether anything changed since the last load or commit.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Records an edit made outside the store (a form value changed).
    pub fn mark_changed(&mut self) {
        self.dirty = true;
    }

    /// Inserts a new placeholder field right after position `index` and
    /// returns its id.
    ///
    /// A negative `index` inserts at the front; an index past the end appends.
    pub fn insert_after(&mut self, index: isize) -> String {
        let at = match usize::try_from(index) {
            Ok(i) => (i + 1).min(self.fields.len()),
            Err(_) => 0,
        };
        let name = format!("{}{}", self.new_field_prefix, self.fields.len());
        let field = Field::new(name);
        let id = field.id.clone();
        self.fields.insert(at, field);
        self.changed();
        log::debug!("inserted field {id} at {at}");
        id
    }

    /// Removes the field with `id`; unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(at) = self.index(id) else {
            return false;
        };
        self.fields.remove(at);
        self.changed();
        true
    }

    /// Swaps the field at `index` with the one above it.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.fields.len() {
            return false;
        }
        self.swap(index, index - 1);
        true
    }

    /// Swaps the field at `index` with the one below it.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.fields.len().saturating_sub(1) {
            return false;
        }
        self.swap(index, index + 1);
        true
    }

    /// Moves `source_id` so it sits immediately after `target_id`.
    ///
    /// When the target is the source's immediate predecessor the two are
    /// swapped in place instead of spliced, so a renderer never sees the
    /// source at two positions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schemaboard_core::{Field, FieldListStore};
    ///
    /// let fields = ["a", "b", "c"]
    ///     .iter()
    ///     .map(|id| Field { id: id.to_string(), ..Field::default() })
    ///     .collect();
    /// let mut store = FieldListStore::from_fields(fields).unwrap();
    ///
    /// store.move_to("c", "a");
    /// assert_eq!(store.ids(), vec!["a", "c", "b"]);
    ///
    /// // "a" is right before "c": dropping "c" on it swaps the pair.
    /// store.move_to("c", "a");
    /// assert_eq!(store.ids(), vec!["c", "a", "b"]);
    /// ```
    pub fn move_to(&mut self, source_id: &str, target_id: &str) -> bool {
        if source_id == target_id {
            return false;
        }
        let (Some(from), Some(target)) = (self.index(source_id), self.index(target_id)) else {
            return false;
        };

        if target + 1 == from {
            self.swap(from, target);
            return true;
        }

        let moved = self.fields.remove(from);
        // Removing `from` shifts everything behind it one slot forward.
        let target = if target > from { target - 1 } else { target };
        self.fields.insert(target + 1, moved);
        self.changed();
        true
    }

    /// Moves `source_id` to position 0 (drop onto the container itself).
    pub fn move_to_front(&mut self, source_id: &str) -> bool {
        match self.index(source_id) {
            Some(0) | None => false,
            Some(from) => {
                let moved = self.fields.remove(from);
                self.fields.insert(0, moved);
                self.changed();
                true
            }
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.fields.swap(a, b);
        self.positions.insert(self.fields[a].id.clone(), a);
        self.positions.insert(self.fields[b].id.clone(), b);
        self.dirty = true;
    }

    fn changed(&mut self) {
        self.positions = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        self.dirty = true;
    }
}

fn index_by_id(fields: &[Field]) -> Result<HashMap<String, usize>> {
    let mut positions = HashMap::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        if positions.insert(field.id.clone(), i).is_some() {
            return Err(SchemaboardError::InvalidTable(format!(
                "Duplicate field id '{}'",
                field.id
            )));
        }
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn field(id: &str, name: &str, ty: &str) -> Field {
        Field {
            id: id.to_string(),
            name: name.to_string(),
            field_type: ty.to_string(),
            ..Field::default()
        }
    }

    fn store_of(ids: &[&str]) -> FieldListStore {
        FieldListStore::from_fields(ids.iter().map(|id| field(id, id, "int")).collect()).unwrap()
    }

    fn assert_index_consistent(store: &FieldListStore) {
        for (i, f) in store.fields().iter().enumerate() {
            assert_eq!(store.index(&f.id), Some(i), "stale index for {}", f.id);
        }
    }

    #[test]
    fn test_from_fields_rejects_duplicate_ids() {
        let result =
            FieldListStore::from_fields(vec![field("a", "x", "int"), field("a", "y", "int")]);
        assert!(matches!(result, Err(SchemaboardError::InvalidTable(_))));
    }

    #[test]
    fn test_insert_after_then_move_up() {
        let mut store = FieldListStore::from_fields(vec![field("a", "id", "int")]).unwrap();
        let new_id = store.insert_after(0);

        assert_ne!(new_id, "a");
        assert_eq!(store.index(&new_id), Some(1));
        assert_eq!(store.get(&new_id).unwrap().name, "new item1");
        assert_eq!(store.get(&new_id).unwrap().field_type, "");

        assert!(store.move_up(1));
        assert_eq!(store.ids(), vec![new_id.as_str(), "a"]);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_insert_after_minus_one_on_empty_list() {
        let mut store = FieldListStore::new();
        let id = store.insert_after(-1);
        assert_eq!(store.ids(), vec![id.as_str()]);
        assert_eq!(store.fields()[0].name, "new item0");
    }

    #[test]
    fn test_insert_after_minus_one_goes_first() {
        let mut store = store_of(&["a", "b"]);
        let id = store.insert_after(-1);
        assert_eq!(store.ids(), vec![id.as_str(), "a", "b"]);
    }

    #[test]
    fn test_insert_after_past_end_appends() {
        let mut store = store_of(&["a"]);
        let id = store.insert_after(10);
        assert_eq!(store.ids(), vec!["a", id.as_str()]);
    }

    #[test]
    fn test_insert_uses_configured_prefix() {
        let mut store = FieldListStore::new().with_new_field_prefix("column_");
        let id = store.insert_after(-1);
        assert_eq!(store.get(&id).unwrap().name, "column_0");
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = store_of(&["a", "b"]);
        assert!(!store.remove("zzz"));
        assert_eq!(store.ids(), vec!["a", "b"]);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_remove_last_field_leaves_empty_list() {
        let mut store = store_of(&["a"]);
        assert!(store.remove("a"));
        assert!(store.is_empty());
        assert_eq!(store.index("a"), None);
    }

    #[test]
    fn test_move_up_and_down_boundaries_are_noops() {
        let mut store = store_of(&["a", "b", "c"]);
        assert!(!store.move_up(0));
        assert!(!store.move_down(2));
        assert!(!store.move_down(7));
        assert!(!store.move_up(7));
        assert_eq!(store.ids(), vec!["a", "b", "c"]);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_moves_at_extreme_indexes_are_noops() {
        let mut store = store_of(&["a", "b"]);
        assert!(!store.move_down(usize::MAX));
        assert!(!store.move_up(usize::MAX));
        let mut empty = FieldListStore::new();
        assert!(!empty.move_down(0));
        assert!(!empty.move_down(usize::MAX));
        assert!(!empty.move_up(usize::MAX));
        assert_eq!(store.ids(), vec!["a", "b"]);
        assert!(!store.is_dirty() && !empty.is_dirty());
    }

    #[test]
    fn test_insert_after_extreme_indexes() {
        let mut store = store_of(&["a"]);
        let last = store.insert_after(isize::MAX);
        let first = store.insert_after(isize::MIN);
        assert_eq!(store.ids(), vec![first.as_str(), "a", last.as_str()]);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_move_down_swaps_with_next() {
        let mut store = store_of(&["a", "b", "c"]);
        assert!(store.move_down(0));
        assert_eq!(store.ids(), vec!["b", "a", "c"]);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_move_to_self_is_noop() {
        let mut store = store_of(&["a", "b", "c"]);
        assert!(!store.move_to("b", "b"));
        assert_eq!(store.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_to_unknown_ids_is_noop() {
        let mut store = store_of(&["a", "b"]);
        assert!(!store.move_to("a", "nope"));
        assert!(!store.move_to("nope", "a"));
        assert_eq!(store.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_move_to_forward_places_after_target() {
        let mut store = store_of(&["a", "b", "c", "d"]);
        assert!(store.move_to("a", "c"));
        assert_eq!(store.ids(), vec!["b", "c", "a", "d"]);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_move_to_backward_places_after_target() {
        let mut store = store_of(&["a", "b", "c", "d"]);
        assert!(store.move_to("d", "a"));
        assert_eq!(store.ids(), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_move_to_last_target_appends() {
        let mut store = store_of(&["a", "b", "c"]);
        assert!(store.move_to("a", "c"));
        assert_eq!(store.ids(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_to_predecessor_swaps() {
        let mut store = store_of(&["a", "b", "c"]);
        assert!(store.move_to("c", "b"));
        assert_eq!(store.ids(), vec!["a", "c", "b"]);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_predecessor_swap_matches_splice_into_target_slot() {
        for source in 1..5 {
            let ids = ["a", "b", "c", "d", "e"];
            let mut store = store_of(&ids);
            let target = source - 1;
            store.move_to(ids[source], ids[target]);

            let mut spliced: Vec<&str> = ids.to_vec();
            let moved = spliced.remove(source);
            spliced.insert(target, moved);

            assert_eq!(store.ids(), spliced);
        }
    }

    #[test]
    fn test_move_to_front() {
        let mut store = store_of(&["a", "b", "c"]);
        assert!(store.move_to_front("c"));
        assert_eq!(store.ids(), vec!["c", "a", "b"]);
        assert!(!store.move_to_front("c"));
        assert!(!store.move_to_front("missing"));
        assert_index_consistent(&store);
    }

    #[test]
    fn test_replace_clears_dirty_and_keeps_old_on_error() {
        let mut store = store_of(&["a", "b"]);
        store.move_down(0);
        assert!(store.is_dirty());

        let bad = vec![field("x", "x", "int"), field("x", "y", "int")];
        assert!(store.replace(bad).is_err());
        assert_eq!(store.ids(), vec!["b", "a"]);

        store.replace(vec![field("z", "z", "int")]).unwrap();
        assert_eq!(store.ids(), vec!["z"]);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_rows_are_indexed_in_order() {
        let store = store_of(&["a", "b"]);
        let rows = store.rows();
        assert_eq!(rows[&0].id, "a");
        assert_eq!(rows[&1].id, "b");
    }

    fn pick(store: &FieldListStore, rng: &mut StdRng) -> Option<String> {
        let len = store.len();
        (len > 0).then(|| store.fields()[rng.random_range(0..len)].id.clone())
    }

    #[test]
    fn test_random_operations_preserve_id_set_delta() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut store = store_of(&["a", "b", "c", "d", "e"]);
        let mut expected: HashSet<String> = store.ids().iter().map(|s| s.to_string()).collect();

        for _ in 0..2_000 {
            let len = store.len();
            match rng.random_range(0..7) {
                0 => {
                    let at = rng.random_range(-1..len as i64 + 1) as isize;
                    expected.insert(store.insert_after(at));
                }
                1 => {
                    if let Some(id) = pick(&store, &mut rng) {
                        store.remove(&id);
                        expected.remove(&id);
                    }
                }
                2 => {
                    store.move_up(rng.random_range(0..len + 1));
                }
                3 => {
                    store.move_down(rng.random_range(0..len + 1));
                }
                4 | 5 => {
                    if let (Some(s), Some(t)) = (pick(&store, &mut rng), pick(&store, &mut rng)) {
                        store.move_to(&s, &t);
                    }
                }
                _ => {
                    if let Some(id) = pick(&store, &mut rng) {
                        store.move_to_front(&id);
                    }
                }
            }

            let actual: HashSet<String> = store.ids().iter().map(|s| s.to_string()).collect();
            assert_eq!(actual.len(), store.len(), "duplicate id introduced");
            assert_eq!(actual, expected);
            assert_index_consistent(&store);
        }
    }
}
