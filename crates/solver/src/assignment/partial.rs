use crate::{
    Item,
    ItemSet,
    Value,
};
use bounded::{
    BoundedArray,
    BoundedStack,
};

/// The ternary value of every item together with the order of assignments.
#[derive(Debug, Default, Clone)]
pub struct PartialAssignment {
    values: BoundedArray<Item, Value>,
    assigned: BoundedStack<Item>,
}

impl PartialAssignment {
    /// Creates a partial assignment with every item free.
    pub fn new(len_items: usize) -> Self {
        Self {
            values: BoundedArray::with_len(len_items, |_| Value::Free),
            assigned: BoundedStack::with_capacity(len_items),
        }
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns the number of assigned items.
    pub fn len_assigned(&self) -> usize {
        self.assigned.len()
    }

    /// Returns `true` if no item is free.
    pub fn is_complete(&self) -> bool {
        self.len_assigned() == self.len()
    }

    /// Returns the value of the item.
    ///
    /// # Panics
    ///
    /// If the item is out of bounds.
    pub fn get(&self, item: Item) -> Value {
        *self
            .values
            .get(item)
            .expect("encountered unexpected invalid item")
    }

    /// Returns the assigned items in assignment order.
    pub fn assigned(&self) -> &[Item] {
        self.assigned.as_slice()
    }

    /// Returns an iterator over all items and their values.
    pub fn iter(&self) -> impl Iterator<Item = (Item, Value)> + '_ {
        self.values.enumerate().map(|(item, &value)| (item, value))
    }

    /// Returns an iterator over all items with the given value.
    pub fn items_with(&self, value: Value) -> impl Iterator<Item = Item> + '_ {
        self.iter()
            .filter(move |&(_, current)| current == value)
            .map(|(item, _)| item)
    }

    /// Returns the set of items assigned to [`Value::In`].
    pub fn included(&self) -> ItemSet {
        let mut itemset = ItemSet::with_len(self.len());
        for &item in self.assigned() {
            if self.get(item) == Value::In {
                itemset
                    .set(item, true)
                    .expect("encountered unexpected invalid item");
            }
        }
        itemset
    }

    /// Assigns a free item.
    ///
    /// # Panics
    ///
    /// - If the item is out of bounds.
    /// - If the item is not free or the new value is [`Value::Free`].
    pub fn assign(&mut self, item: Item, value: Value) {
        assert!(!value.is_free(), "tried to assign the free value to {}", item);
        let old_value = self
            .values
            .replace(item, value)
            .expect("encountered unexpected invalid item");
        assert!(old_value.is_free(), "tried to reassign item {}", item);
        self.assigned.push(item);
    }

    /// Reverts the most recent assignment which must be the given item.
    ///
    /// # Panics
    ///
    /// If the item is not the most recently assigned one.
    pub fn unassign(&mut self, item: Item) {
        let popped = self.assigned.pop();
        assert_eq!(popped, Some(item), "encountered out of order unassignment");
        self.values[item] = Value::Free;
    }
}
