use crate::item::{Attribute, CanonicalItem, Enchantment};
use indexmap::IndexMap;
use indexmap::map::Entry;

/// Collapses duplicate declarations of the same item within one bucket.
///
/// Items sharing `(item_type, name)` are folded into the first of them, whose
/// enchantment and attribute ranges are widened slot by slot to cover every
/// duplicate. Slots are matched by position; slots missing on either side keep
/// the first item's values. Output follows first-occurrence order.
pub fn merge(items: &[CanonicalItem]) -> Vec<CanonicalItem> {
    let mut partitions: IndexMap<(&str, Option<&str>), CanonicalItem> = IndexMap::new();
    for item in items {
        match partitions.entry((item.item_type.as_str(), item.name.as_deref())) {
            Entry::Occupied(mut base) => {
                let base = base.get_mut();
                widen_slots(&mut base.enchantments, &item.enchantments);
                widen_slots(&mut base.attributes, &item.attributes);
            }
            Entry::Vacant(slot) => {
                slot.insert(item.clone());
            }
        }
    }
    partitions.into_values().collect()
}

trait RangeSlot {
    fn widen(&mut self, other: &Self);
}

impl RangeSlot for Enchantment {
    fn widen(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

impl RangeSlot for Attribute {
    fn widen(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

fn widen_slots<T: RangeSlot>(base: &mut [T], other: &[T]) {
    for (slot, observed) in base.iter_mut().zip(other) {
        slot.widen(observed);
    }
}
