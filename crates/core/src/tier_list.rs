//! Tier-list structure and drag-and-drop edits.
//!
//! A tier list is persisted as opaque JSON in `party_shared_lists.content`.
//! This module gives that JSON a typed shape so the server can apply moves
//! atomically instead of trusting whole-document overwrites. Unknown item
//! fields are carried through untouched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Tier names created for a new list.
pub const DEFAULT_TIERS: &[&str] = &["S", "A", "B", "C", "D"];

pub const MAX_TIERS: usize = 20;
pub const MAX_ITEMS: usize = 500;

/// A single ranked entry. Only `id` is interpreted by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierItem {
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub items: Vec<TierItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierList {
    pub tiers: Vec<Tier>,
}

/// One drag-and-drop step: take the item at `from_index` of `from_tier` and
/// drop it at `to_index` of `to_tier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TierMove {
    pub from_tier: usize,
    pub from_index: usize,
    pub to_tier: usize,
    pub to_index: usize,
}

impl TierList {
    pub fn with_default_tiers() -> Self {
        Self {
            tiers: DEFAULT_TIERS
                .iter()
                .map(|name| Tier {
                    name: (*name).to_string(),
                    color: None,
                    items: Vec::new(),
                })
                .collect(),
        }
    }

    /// Parse and validate stored JSON content.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CoreError> {
        let list: TierList = serde_json::from_value(value.clone())
            .map_err(|e| CoreError::Validation(format!("invalid tier list content: {e}")))?;
        list.validate()?;
        Ok(list)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, CoreError> {
        serde_json::to_value(self)
            .map_err(|e| CoreError::Internal(format!("tier list serialization failed: {e}")))
    }

    /// Structural checks: tier and item caps, unique item ids.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.tiers.len() > MAX_TIERS {
            return Err(CoreError::Validation(format!(
                "a tier list may have at most {MAX_TIERS} tiers"
            )));
        }
        if self.item_count() > MAX_ITEMS {
            return Err(CoreError::Validation(format!(
                "a tier list may hold at most {MAX_ITEMS} items"
            )));
        }
        let mut seen = HashSet::new();
        for item in self.tiers.iter().flat_map(|t| t.items.iter()) {
            if !seen.insert(item.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "duplicate tier list item id '{}'",
                    item.id
                )));
            }
        }
        Ok(())
    }

    pub fn item_count(&self) -> usize {
        self.tiers.iter().map(|t| t.items.len()).sum()
    }

    /// Apply a drag-and-drop move.
    ///
    /// The destination index is clamped to the end of the target tier, so
    /// dropping past the last item appends.
    pub fn move_item(&mut self, mv: TierMove) -> Result<(), CoreError> {
        let tier_count = self.tiers.len();
        if mv.from_tier >= tier_count || mv.to_tier >= tier_count {
            return Err(CoreError::Validation(format!(
                "tier index out of range (list has {tier_count} tiers)"
            )));
        }
        let source = &mut self.tiers[mv.from_tier].items;
        if mv.from_index >= source.len() {
            return Err(CoreError::Validation(format!(
                "item index {} out of range for tier {}",
                mv.from_index, mv.from_tier
            )));
        }
        let item = source.remove(mv.from_index);
        let target = &mut self.tiers[mv.to_tier].items;
        let at = mv.to_index.min(target.len());
        target.insert(at, item);
        Ok(())
    }

    /// Append an item to a tier, rejecting duplicate ids.
    pub fn add_item(&mut self, tier: usize, item: TierItem) -> Result<(), CoreError> {
        if self.position_of(&item.id).is_some() {
            return Err(CoreError::Conflict(format!(
                "item '{}' is already ranked",
                item.id
            )));
        }
        if self.item_count() >= MAX_ITEMS {
            return Err(CoreError::Validation(format!(
                "a tier list may hold at most {MAX_ITEMS} items"
            )));
        }
        let tier_count = self.tiers.len();
        let target = self.tiers.get_mut(tier).ok_or_else(|| {
            CoreError::Validation(format!(
                "tier index out of range (list has {tier_count} tiers)"
            ))
        })?;
        target.items.push(item);
        Ok(())
    }

    /// Remove an item by id, returning it.
    pub fn remove_item(&mut self, id: &str) -> Result<TierItem, CoreError> {
        let (tier, index) = self.position_of(id).ok_or_else(|| {
            CoreError::Validation(format!("item '{id}' is not in this tier list"))
        })?;
        Ok(self.tiers[tier].items.remove(index))
    }

    /// `(tier index, item index)` of an item.
    pub fn position_of(&self, id: &str) -> Option<(usize, usize)> {
        self.tiers.iter().enumerate().find_map(|(t, tier)| {
            tier.items
                .iter()
                .position(|item| item.id == id)
                .map(|i| (t, i))
        })
    }
}
