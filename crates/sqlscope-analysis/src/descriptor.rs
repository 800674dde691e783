//! Tuple and slot descriptors
//!
//! The descriptor table is the single owner of every tuple and slot created
//! while analyzing one query, across all of its nested blocks. Descriptors are
//! never removed.

use indexmap::IndexMap;
use sqlscope_ast::{IdGenerator, SlotId, TupleId};
use sqlscope_catalog::{Column, Table};
use std::sync::Arc;

/// One row source
#[derive(Debug, Clone, PartialEq)]
pub struct TupleDescriptor {
    id: TupleId,
    table: Option<Arc<Table>>,
    slots: Vec<SlotId>,
    aliases: Vec<String>,
    explicit_alias: bool,
}

impl TupleDescriptor {
    pub fn id(&self) -> TupleId {
        self.id
    }

    /// The table this tuple reads, `None` for synthetic tuples
    pub fn table(&self) -> Option<&Arc<Table>> {
        self.table.as_ref()
    }

    /// Slots in creation order
    pub fn slots(&self) -> &[SlotId] {
        &self.slots
    }

    /// Legal aliases; the first one is the unique alias
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn has_explicit_alias(&self) -> bool {
        self.explicit_alias
    }
}

/// One column value within a tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    id: SlotId,
    parent: TupleId,
    column: Option<Column>,
    nullable: bool,
    multi_ref: bool,
}

impl SlotDescriptor {
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Tuple owning this slot
    pub fn parent(&self) -> TupleId {
        self.parent
    }

    pub fn column(&self) -> Option<&Column> {
        self.column.as_ref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Requested more than once as a virtual column
    pub fn is_multi_ref(&self) -> bool {
        self.multi_ref
    }

    /// Bind the slot to a column. The first binding is kept.
    pub(crate) fn set_column(&mut self, column: Column) {
        if self.column.is_none() {
            self.column = Some(column);
        }
    }

    pub(crate) fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    pub(crate) fn set_multi_ref(&mut self, multi_ref: bool) {
        self.multi_ref = multi_ref;
    }
}

/// Owner of all tuple and slot descriptors of an analysis tree
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    tuples: IndexMap<TupleId, TupleDescriptor>,
    slots: IndexMap<SlotId, SlotDescriptor>,
    tuple_ids: IdGenerator<TupleId>,
    slot_ids: IdGenerator<SlotId>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tuple with a fresh identity
    pub fn create_tuple(
        &mut self,
        table: Option<Arc<Table>>,
        aliases: Vec<String>,
        explicit_alias: bool,
    ) -> &TupleDescriptor {
        let id = self.tuple_ids.next_id();
        let desc = TupleDescriptor {
            id,
            table,
            slots: Vec::new(),
            aliases,
            explicit_alias,
        };
        self.tuples.entry(id).or_insert(desc)
    }

    /// Allocate a slot and append it to `tuple`'s slot list
    ///
    /// # Panics
    ///
    /// Panics if `tuple` was never issued by this table.
    pub fn add_slot(&mut self, tuple: TupleId) -> &mut SlotDescriptor {
        let Some(parent) = self.tuples.get_mut(&tuple) else {
            panic!("tuple {tuple} was never issued by this descriptor table");
        };
        let id = self.slot_ids.next_id();
        parent.slots.push(id);
        self.slots.entry(id).or_insert(SlotDescriptor {
            id,
            parent: tuple,
            column: None,
            nullable: false,
            multi_ref: false,
        })
    }

    pub fn tuple(&self, id: TupleId) -> Option<&TupleDescriptor> {
        self.tuples.get(&id)
    }

    pub fn slot(&self, id: SlotId) -> Option<&SlotDescriptor> {
        self.slots.get(&id)
    }

    pub(crate) fn slot_mut(&mut self, id: SlotId) -> Option<&mut SlotDescriptor> {
        self.slots.get_mut(&id)
    }

    /// Tuples in creation order
    pub fn tuples(&self) -> impl Iterator<Item = &TupleDescriptor> {
        self.tuples.values()
    }

    pub fn tuple_count(&self) -> usize {
        self.tuples.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlscope_catalog::ColumnType;

    #[test]
    fn test_identities_are_unique_and_increasing() {
        let mut table = DescriptorTable::new();
        let a = table.create_tuple(None, vec!["a".into()], true).id();
        let b = table.create_tuple(None, vec!["b".into()], true).id();
        assert!(a < b);

        let s1 = table.add_slot(a).id();
        let s2 = table.add_slot(b).id();
        let s3 = table.add_slot(a).id();
        assert!(s1 < s2 && s2 < s3);

        assert_eq!(table.tuple(a).unwrap().slots(), &[s1, s3]);
        assert_eq!(table.slot(s2).unwrap().parent(), b);
        assert_eq!(table.tuple_count(), 2);
        assert_eq!(table.slot_count(), 3);
    }

    #[test]
    fn test_column_binding_is_kept() {
        let mut table = DescriptorTable::new();
        let t = table.create_tuple(None, Vec::new(), false).id();
        let slot = table.add_slot(t);
        slot.set_column(Column::new("x", ColumnType::Int));
        slot.set_column(Column::new("y", ColumnType::Int));
        assert_eq!(slot.column().map(|c| c.name.as_str()), Some("x"));
    }

    #[test]
    fn test_unknown_lookups_return_none() {
        let table = DescriptorTable::new();
        assert!(table.tuple(TupleId::new(0)).is_none());
        assert!(table.slot(SlotId::new(0)).is_none());
    }

    #[test]
    #[should_panic(expected = "never issued")]
    fn test_add_slot_to_unknown_tuple_panics() {
        let mut table = DescriptorTable::new();
        table.add_slot(TupleId::new(42));
    }
}
