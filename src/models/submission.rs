use serde::{Deserialize, Serialize};

use super::category::GuestCategory;
use super::roster::{CategoryCounts, Roster};
use crate::error::RsvpError;

/// One guest as embedded in a stored family record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGuest {
    pub name: String,
    #[serde(rename = "type")]
    pub category: GuestCategory,
    pub has_infos: bool,
    /// Rendered detail string: `"Int: ... | All: ..."`.
    pub details: String,
}

/// A complete family submission, ready to be written to the store.
///
/// Immutable once written, except for the targeted embedded-guest
/// removal in [`crate::admin::remove_view`]. The store assigns the id
/// and timestamp at insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub main_guest: String,
    pub counts: CategoryCounts,
    pub notes: String,
    pub guests: Vec<FamilyGuest>,
    pub total_people: usize,
}

impl SubmissionRecord {
    /// Encode the in-memory roster into the storage record.
    ///
    /// Fails with [`RsvpError::Validation`] when the main guest name
    /// or any slot name is blank, and when the roster does not agree
    /// with the declared counts — every stored family record must
    /// satisfy `counts.total() == guests.len()`.
    pub fn encode(
        roster: &Roster,
        counts: &CategoryCounts,
        notes: &str,
        main_guest: &str,
    ) -> Result<Self, RsvpError> {
        if main_guest.trim().is_empty() {
            return Err(RsvpError::Validation(
                "main guest name is required".to_string(),
            ));
        }
        if roster.slots().iter().any(|s| s.name.trim().is_empty()) {
            return Err(RsvpError::Validation(
                "every guest needs a name".to_string(),
            ));
        }
        if counts.adults < 1 {
            return Err(RsvpError::Validation(
                "at least one adult is required".to_string(),
            ));
        }
        for category in GuestCategory::ALL {
            if roster.count_for(category) != counts.get(category) as usize {
                return Err(RsvpError::Validation(format!(
                    "guest list does not match the declared counts for {}",
                    category
                )));
            }
        }

        let guests: Vec<FamilyGuest> = roster
            .slots()
            .iter()
            .map(|slot| FamilyGuest {
                name: slot.name.clone(),
                category: slot.category,
                has_infos: slot.dietary.has_dietary_needs(),
                details: slot.dietary.details_text(),
            })
            .collect();

        Ok(Self {
            main_guest: main_guest.to_string(),
            counts: *counts,
            notes: notes.to_string(),
            total_people: guests.len(),
            guests,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, DietaryDraft};

    fn filled_roster(counts: &CategoryCounts) -> Roster {
        let mut roster = Roster::default();
        roster.reconcile(counts);
        for (i, slot) in roster.slots_mut().iter_mut().enumerate() {
            slot.name = format!("guest-{}", i);
        }
        roster
    }

    #[test]
    fn test_encode_blank_main_guest_fails() {
        let counts = CategoryCounts::default();
        let roster = filled_roster(&counts);
        let err = SubmissionRecord::encode(&roster, &counts, "", "   ").unwrap_err();
        assert!(matches!(err, RsvpError::Validation(_)));
    }

    #[test]
    fn test_encode_blank_guest_name_fails() {
        let counts = CategoryCounts::new(2, 0, 0);
        let mut roster = filled_roster(&counts);
        roster.slots_mut()[1].name = "  ".to_string();

        let err = SubmissionRecord::encode(&roster, &counts, "", "Dimitri").unwrap_err();
        assert!(matches!(err, RsvpError::Validation(_)));
    }

    #[test]
    fn test_encode_counts_mismatch_fails() {
        let counts = CategoryCounts::new(2, 0, 0);
        let roster = filled_roster(&counts);
        let wrong = CategoryCounts::new(2, 1, 0);

        let err = SubmissionRecord::encode(&roster, &wrong, "", "Dimitri").unwrap_err();
        assert!(matches!(err, RsvpError::Validation(_)));
    }

    #[test]
    fn test_encode_builds_guests_in_roster_order() {
        let counts = CategoryCounts::new(1, 1, 0);
        let mut roster = filled_roster(&counts);

        let mut draft = DietaryDraft::open(&roster.slots()[1]);
        draft.toggle(Condition::Lactose);
        draft.commit(&mut roster.slots_mut()[1]);

        let record =
            SubmissionRecord::encode(&roster, &counts, "note for the kitchen", "Dimitri")
                .unwrap();

        assert_eq!(record.total_people, 2);
        assert_eq!(record.guests.len(), 2);
        assert_eq!(record.notes, "note for the kitchen");
        assert_eq!(record.counts, counts);

        let adult = &record.guests[0];
        assert_eq!(adult.category, GuestCategory::Adult);
        assert!(!adult.has_infos);
        assert_eq!(adult.details, "Int:  | All: ");

        let child = &record.guests[1];
        assert_eq!(child.category, GuestCategory::Child05);
        assert!(child.has_infos);
        assert_eq!(child.details, "Int: Lattosio | All: ");
    }

    #[test]
    fn test_wire_field_names() {
        let guest = FamilyGuest {
            name: "Anna".to_string(),
            category: GuestCategory::Child610,
            has_infos: true,
            details: "Int: Glutine | All: ".to_string(),
        };
        let json = serde_json::to_value(&guest).unwrap();
        assert_eq!(json["type"], "child_6_10");
        assert_eq!(json["hasInfos"], true);
        assert_eq!(json["details"], "Int: Glutine | All: ");

        let record = SubmissionRecord {
            main_guest: "Anna".to_string(),
            counts: CategoryCounts::default(),
            notes: String::new(),
            guests: vec![guest],
            total_people: 1,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mainGuest"], "Anna");
        assert_eq!(json["totalPeople"], 1);
        assert_eq!(json["counts"]["adults"], 1);
        assert_eq!(json["counts"]["children05"], 0);
    }
}
