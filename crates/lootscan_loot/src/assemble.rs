use crate::item::{CanonicalItem, DropCondition, strip_namespace};
use crate::loot::function::{ItemPatch, Modifier, ModifierKind};
use serde_json::{Map, Value};
use tracing::debug;
use valence_ident::Ident;

/// Builds the canonical item for a terminal `item` entry.
///
/// Modifiers are applied by kind precedence (see
/// [`DECODERS`](crate::loot::function::DECODERS)), keeping source order among
/// modifiers of the same kind. Records that match no decoder are skipped.
pub fn assemble_item(
    name: &Ident<String>,
    functions: &[Value],
    condition: DropCondition,
) -> CanonicalItem {
    let mut modifiers: Vec<Modifier<'_>> = functions
        .iter()
        .filter_map(|record| match Modifier::parse(record) {
            Ok(modifier) => Some(modifier),
            Err(error) => {
                debug!(item = %name, %error, "Skipping item modifier");
                None
            }
        })
        .collect();
    modifiers.sort_by_key(|modifier| modifier.kind);

    let mut builder = ItemBuilder::new(name.as_str());
    for modifier in &modifiers {
        match modifier.decode() {
            Ok(patch) => builder.apply(modifier.kind, patch),
            Err(error) => debug!(item = %name, %error, "Skipping item modifier"),
        }
    }
    builder.finish(condition)
}

struct ItemBuilder {
    item: CanonicalItem,
    lore_from_nbt: bool,
}

impl ItemBuilder {
    /// `item_type` keeps its namespace until [`ItemBuilder::finish`].
    fn new(item_type: &str) -> Self {
        Self {
            item: CanonicalItem::new(item_type),
            lore_from_nbt: false,
        }
    }

    fn apply(&mut self, kind: ModifierKind, patch: ItemPatch) {
        let item = &mut self.item;
        if let Some(item_type) = patch.item_type {
            item.item_type = item_type;
        }
        if let Some(name) = patch.name {
            item.name = Some(name);
        }
        if let Some(lore) = patch.lore {
            // lore from an NBT tag wins over set_lore
            if !(kind == ModifierKind::SetLore && self.lore_from_nbt) {
                item.lore = Some(lore);
                self.lore_from_nbt |= kind == ModifierKind::SetNbt;
            }
        }
        if patch.unbreakable {
            item.unbreakable = Some(true);
        }
        item.enchantments.extend(patch.enchantments);
        item.attributes.extend(patch.attributes);
        if patch.enchant_with_level.is_some() {
            item.enchant_with_level = patch.enchant_with_level;
        }
        if let Some(nbt) = patch.raw_nbt {
            item.raw_nbt.get_or_insert_with(Map::new).extend(nbt);
        }
        if let Some(components) = patch.raw_components {
            item.raw_components.get_or_insert_with(Map::new).extend(components);
        }
    }

    fn finish(self, condition: DropCondition) -> CanonicalItem {
        let mut item = self.item;
        item.item_type = strip_namespace(&item.item_type).to_owned();
        item.with_condition(condition)
    }
}
