//! The in-memory guest roster built during form entry.
//!
//! Head counts drive the roster: raising a count appends empty slots
//! for that category, lowering it drops the most recently added slots
//! first. Slots that survive a count change keep their identity and
//! everything typed into them.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use super::category::GuestCategory;
use super::dietary::DietaryProfile;

/// Head counts per guest category. At least one adult at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub adults: u32,
    pub children05: u32,
    pub children610: u32,
}

impl Default for CategoryCounts {
    fn default() -> Self {
        Self {
            adults: 1,
            children05: 0,
            children610: 0,
        }
    }
}

impl CategoryCounts {
    pub fn new(adults: u32, children05: u32, children610: u32) -> Self {
        Self {
            adults,
            children05,
            children610,
        }
    }

    pub fn get(&self, category: GuestCategory) -> u32 {
        match category {
            GuestCategory::Adult => self.adults,
            GuestCategory::Child05 => self.children05,
            GuestCategory::Child610 => self.children610,
        }
    }

    fn get_mut(&mut self, category: GuestCategory) -> &mut u32 {
        match category {
            GuestCategory::Adult => &mut self.adults,
            GuestCategory::Child05 => &mut self.children05,
            GuestCategory::Child610 => &mut self.children610,
        }
    }

    /// Minimum allowed value for a category during form entry.
    fn floor(category: GuestCategory) -> u32 {
        match category {
            GuestCategory::Adult => 1,
            _ => 0,
        }
    }

    pub fn increment(&mut self, category: GuestCategory) {
        *self.get_mut(category) += 1;
    }

    /// Decrement one category, respecting the form-entry floor.
    /// Returns false (unchanged) when already at the floor.
    pub fn decrement(&mut self, category: GuestCategory) -> bool {
        let value = self.get_mut(category);
        if *value <= Self::floor(category) {
            return false;
        }
        *value -= 1;
        true
    }

    /// Decrement without the form floor, stopping at zero. Used when
    /// restoring stored counts after an embedded guest is removed;
    /// stored records may already be inconsistent and must never go
    /// negative.
    pub fn saturating_decrement(&mut self, category: GuestCategory) {
        let value = self.get_mut(category);
        *value = value.saturating_sub(1);
    }

    pub fn total(&self) -> usize {
        (self.adults + self.children05 + self.children610) as usize
    }
}

/// One not-yet-submitted guest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestSlot {
    /// Opaque identity, stable for the lifetime of the roster.
    pub id: Uuid,
    pub name: String,
    /// Fixed at creation; a slot never changes category.
    pub category: GuestCategory,
    pub dietary: DietaryProfile,
}

impl GuestSlot {
    pub fn empty(category: GuestCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            category,
            dietary: DietaryProfile::default(),
        }
    }
}

/// Ordered guest slots, grouped by category in fixed category order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    slots: Vec<GuestSlot>,
}

impl Roster {
    pub fn slots(&self) -> &[GuestSlot] {
        &self.slots
    }

    /// Mutable access to the slots for name and dietary edits. Slots
    /// are only created and destroyed through [`Roster::reconcile`].
    pub fn slots_mut(&mut self) -> &mut [GuestSlot] {
        &mut self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn count_for(&self, category: GuestCategory) -> usize {
        self.slots.iter().filter(|s| s.category == category).count()
    }

    /// Rebuild the roster for the new counts.
    ///
    /// Existing slots are partitioned by category, keeping each
    /// partition's relative order. Per category, the first `count`
    /// slots survive intact; shrinking truncates from the tail,
    /// growing appends fresh empty slots. Categories are concatenated
    /// in fixed order, so after reconciliation the roster length
    /// always equals `counts.total()`.
    pub fn reconcile(&mut self, counts: &CategoryCounts) {
        let previous = std::mem::take(&mut self.slots);

        let mut pools: [VecDeque<GuestSlot>; 3] = Default::default();
        for slot in previous {
            pools[slot.category.index()].push_back(slot);
        }

        self.slots.reserve(counts.total());
        for category in GuestCategory::ALL {
            let pool = &mut pools[category.index()];
            for _ in 0..counts.get(category) {
                let slot = pool
                    .pop_front()
                    .unwrap_or_else(|| GuestSlot::empty(category));
                self.slots.push(slot);
            }
            // Whatever is left in the pool is the truncated tail.
        }
    }

    /// Force-sync the first slot's name to the main guest name. The
    /// sync is one-directional; editing the first slot afterwards does
    /// not touch the main guest field.
    pub fn set_main_guest_name(&mut self, name: &str) {
        if let Some(first) = self.slots.first_mut() {
            if first.category == GuestCategory::Adult {
                first.name = name.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with(counts: &CategoryCounts) -> Roster {
        let mut roster = Roster::default();
        roster.reconcile(counts);
        roster
    }

    fn name_slots(roster: &mut Roster) {
        for (i, slot) in roster.slots_mut().iter_mut().enumerate() {
            slot.name = format!("guest-{}", i);
        }
    }

    #[test]
    fn test_counts_default_is_one_adult() {
        let counts = CategoryCounts::default();
        assert_eq!(counts, CategoryCounts::new(1, 0, 0));
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn test_counts_floors() {
        let mut counts = CategoryCounts::default();
        assert!(!counts.decrement(GuestCategory::Adult));
        assert_eq!(counts.adults, 1);
        assert!(!counts.decrement(GuestCategory::Child05));

        counts.increment(GuestCategory::Adult);
        assert!(counts.decrement(GuestCategory::Adult));
        assert_eq!(counts.adults, 1);
    }

    #[test]
    fn test_saturating_decrement_reaches_zero() {
        let mut counts = CategoryCounts::new(1, 0, 0);
        counts.saturating_decrement(GuestCategory::Adult);
        assert_eq!(counts.adults, 0);
        counts.saturating_decrement(GuestCategory::Adult);
        assert_eq!(counts.adults, 0);
        counts.saturating_decrement(GuestCategory::Child610);
        assert_eq!(counts.children610, 0);
    }

    #[test]
    fn test_reconcile_builds_fixed_category_order() {
        let roster = roster_with(&CategoryCounts::new(2, 1, 1));
        let categories: Vec<GuestCategory> =
            roster.slots().iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![
                GuestCategory::Adult,
                GuestCategory::Adult,
                GuestCategory::Child05,
                GuestCategory::Child610,
            ]
        );
        assert_eq!(roster.len(), 4);
    }

    #[test]
    fn test_reconcile_growth_preserves_existing_and_appends_empty() {
        let mut roster = roster_with(&CategoryCounts::new(2, 0, 0));
        name_slots(&mut roster);
        let original_ids: Vec<_> = roster.slots().iter().map(|s| s.id).collect();

        roster.reconcile(&CategoryCounts::new(3, 1, 0));

        assert_eq!(roster.len(), 4);
        assert_eq!(roster.slots()[0].name, "guest-0");
        assert_eq!(roster.slots()[1].name, "guest-1");
        assert_eq!(roster.slots()[0].id, original_ids[0]);
        assert_eq!(roster.slots()[1].id, original_ids[1]);
        // Appended slots are blank.
        assert_eq!(roster.slots()[2].name, "");
        assert!(!roster.slots()[2].dietary.has_dietary_needs());
        assert_eq!(roster.slots()[3].category, GuestCategory::Child05);
    }

    #[test]
    fn test_reconcile_truncates_from_the_tail() {
        let mut roster = roster_with(&CategoryCounts::new(3, 2, 0));
        name_slots(&mut roster);

        roster.reconcile(&CategoryCounts::new(2, 1, 0));

        let names: Vec<&str> = roster.slots().iter().map(|s| s.name.as_str()).collect();
        // First two adults and the first child survive, names intact.
        assert_eq!(names, vec!["guest-0", "guest-1", "guest-3"]);
    }

    #[test]
    fn test_reconcile_round_trip_keeps_surviving_data() {
        let mut roster = roster_with(&CategoryCounts::new(2, 1, 0));
        name_slots(&mut roster);
        let before = roster.slots().to_vec();

        // Up then immediately back down.
        roster.reconcile(&CategoryCounts::new(3, 2, 1));
        roster.reconcile(&CategoryCounts::new(2, 1, 0));

        assert_eq!(roster.slots(), &before[..]);
    }

    #[test]
    fn test_reconcile_length_matches_total() {
        let counts = CategoryCounts::new(4, 2, 3);
        let mut roster = roster_with(&counts);
        assert_eq!(roster.len(), counts.total());
        for category in GuestCategory::ALL {
            assert_eq!(roster.count_for(category), counts.get(category) as usize);
        }

        let smaller = CategoryCounts::new(1, 0, 1);
        roster.reconcile(&smaller);
        assert_eq!(roster.len(), smaller.total());
    }

    #[test]
    fn test_main_guest_name_sync() {
        let mut roster = roster_with(&CategoryCounts::new(2, 0, 0));
        roster.set_main_guest_name("Dimitri");
        assert_eq!(roster.slots()[0].name, "Dimitri");
        assert_eq!(roster.slots()[1].name, "");

        // One-directional: a later edit to the slot stands until the
        // main guest field changes again.
        roster.slots_mut()[0].name = "Someone Else".to_string();
        roster.set_main_guest_name("Trizah");
        assert_eq!(roster.slots()[0].name, "Trizah");
    }

    #[test]
    fn test_main_guest_name_sync_on_empty_roster() {
        let mut roster = Roster::default();
        roster.set_main_guest_name("Dimitri");
        assert!(roster.is_empty());
    }
}
