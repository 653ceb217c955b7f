//! The uniform read model over both storage generations.
//!
//! Legacy rows and embedded family guests flatten into [`GuestView`],
//! tagged with where each view came from. Views are never mutated in
//! place; the whole collection is re-derived on every fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use super::category::GuestCategory;
use super::roster::CategoryCounts;
use super::submission::FamilyGuest;

/// Name shown for a family guest whose stored name is blank.
pub const GUEST_PLACEHOLDER: &str = "Ospite";

/// A raw row from the legacy single-guest collection.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub intolerances: String,
    pub allergies: String,
    pub notes: String,
    /// Early legacy rows predate categories entirely.
    pub category: Option<GuestCategory>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A raw row from the family collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyRecord {
    pub id: String,
    pub main_guest: String,
    pub counts: CategoryCounts,
    pub notes: String,
    pub guests: Vec<FamilyGuest>,
    pub total_people: usize,
    pub created_at: Option<DateTime<Utc>>,
}

/// Which storage shape a view came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestOrigin {
    Legacy,
    Family,
}

/// One guest as shown to the operator, independent of storage shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestView {
    /// The raw record id for legacy views; `parentId_index` for
    /// family views.
    pub id: String,
    pub first_name: String,
    /// Family submissions never carry a separate last name.
    pub last_name: String,
    pub intolerances: String,
    pub allergies: String,
    /// Family views inherit the parent record's note.
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_guest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<GuestCategory>,
    pub created_at: Option<DateTime<Utc>>,
    pub origin: GuestOrigin,
}

impl GuestView {
    pub fn from_legacy(record: &LegacyRecord) -> Self {
        Self {
            id: record.id.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            intolerances: record.intolerances.clone(),
            allergies: record.allergies.clone(),
            notes: record.notes.clone(),
            main_guest: None,
            category: record.category,
            created_at: record.created_at,
            origin: GuestOrigin::Legacy,
        }
    }

    /// Flatten one family record into one view per embedded guest.
    pub fn flatten_family(record: &FamilyRecord) -> Vec<Self> {
        record
            .guests
            .iter()
            .enumerate()
            .map(|(index, guest)| {
                let (intolerances, allergies) = split_details(&guest.details);
                let first_name = if guest.name.trim().is_empty() {
                    GUEST_PLACEHOLDER.to_string()
                } else {
                    guest.name.clone()
                };
                Self {
                    id: format!("{}_{}", record.id, index),
                    first_name,
                    last_name: String::new(),
                    intolerances,
                    allergies,
                    notes: record.notes.clone(),
                    main_guest: Some(record.main_guest.clone()),
                    category: Some(guest.category),
                    created_at: record.created_at,
                    origin: GuestOrigin::Family,
                }
            })
            .collect()
    }

    /// Full display name; family views have no last name.
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Split a stored detail string into its intolerance and allergy
/// halves: split on `|`, strip the leading `Int:` / `All:` label,
/// trim. A missing half yields an empty string.
pub fn split_details(details: &str) -> (String, String) {
    let mut parts = details.splitn(2, '|');
    let intolerances = parts.next().map(|p| strip_label(p, "Int:")).unwrap_or_default();
    let allergies = parts.next().map(|p| strip_label(p, "All:")).unwrap_or_default();
    (intolerances, allergies)
}

fn strip_label(part: &str, label: &str) -> String {
    let part = part.trim();
    part.strip_prefix(label).unwrap_or(part).trim().to_string()
}

/// Merge both collections into one view list, newest first. Records
/// without a timestamp sort as timestamp 0, i.e. last; the sort is
/// stable, so same-record guests keep their embedded order.
pub fn merge_views(legacy: &[LegacyRecord], family: &[FamilyRecord]) -> Vec<GuestView> {
    let mut views: Vec<GuestView> = legacy.iter().map(GuestView::from_legacy).collect();
    for record in family {
        views.extend(GuestView::flatten_family(record));
    }
    views.sort_by_key(|v| Reverse(v.created_at.map(|t| t.timestamp()).unwrap_or(0)));
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn legacy(id: &str, ts: Option<i64>) -> LegacyRecord {
        LegacyRecord {
            id: id.to_string(),
            first_name: "Maria".to_string(),
            last_name: "Rossi".to_string(),
            intolerances: "Lattosio".to_string(),
            allergies: String::new(),
            notes: "tavolo vicino alla finestra".to_string(),
            category: None,
            created_at: ts.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
        }
    }

    fn family(id: &str, ts: Option<i64>, guests: Vec<FamilyGuest>) -> FamilyRecord {
        FamilyRecord {
            id: id.to_string(),
            main_guest: "Dimitri".to_string(),
            counts: CategoryCounts::new(guests.len() as u32, 0, 0),
            notes: "shared family note".to_string(),
            total_people: guests.len(),
            guests,
            created_at: ts.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
        }
    }

    fn guest(name: &str, details: &str) -> FamilyGuest {
        FamilyGuest {
            name: name.to_string(),
            category: GuestCategory::Adult,
            has_infos: !details.is_empty(),
            details: details.to_string(),
        }
    }

    #[test]
    fn test_split_details() {
        assert_eq!(
            split_details("Int: Lattosio, Kiwi | All: Arachidi"),
            ("Lattosio, Kiwi".to_string(), "Arachidi".to_string())
        );
        assert_eq!(split_details("Int:  | All: "), (String::new(), String::new()));
        // Missing allergy half.
        assert_eq!(
            split_details("Int: Glutine"),
            ("Glutine".to_string(), String::new())
        );
        assert_eq!(split_details(""), (String::new(), String::new()));
    }

    #[test]
    fn test_detail_string_round_trip() {
        use crate::models::{Condition, DietaryProfile};

        let mut profile = DietaryProfile::default();
        profile.conditions.insert(Condition::Gluten);
        profile.conditions.insert(Condition::Eggs);
        profile.custom_intolerances.push("Kiwi".to_string());
        profile.custom_allergies.push("Sesamo".to_string());

        let (intolerances, allergies) = split_details(&profile.details_text());
        assert_eq!(intolerances, "Glutine, Kiwi");
        assert_eq!(allergies, "Uova, Sesamo");
    }

    #[test]
    fn test_split_details_spec_example() {
        let (intolerances, allergies) =
            split_details("Int: Lactose, Peanut-free-note | All: ");
        assert_eq!(intolerances, "Lactose, Peanut-free-note");
        assert_eq!(allergies, "");
    }

    #[test]
    fn test_flatten_family_builds_composite_ids() {
        let record = family(
            "fam1",
            Some(100),
            vec![
                guest("Dimitri", "Int: Lattosio | All: "),
                guest("", "Int:  | All: Pesce"),
            ],
        );
        let views = GuestView::flatten_family(&record);

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, "fam1_0");
        assert_eq!(views[1].id, "fam1_1");
        assert_eq!(views[0].first_name, "Dimitri");
        assert_eq!(views[0].last_name, "");
        assert_eq!(views[0].intolerances, "Lattosio");
        assert_eq!(views[0].allergies, "");
        // Blank embedded name falls back to the placeholder.
        assert_eq!(views[1].first_name, GUEST_PLACEHOLDER);
        assert_eq!(views[1].allergies, "Pesce");
        // Notes are inherited from the parent record.
        assert_eq!(views[0].notes, "shared family note");
        assert_eq!(views[1].notes, views[0].notes);
        assert_eq!(views[0].origin, GuestOrigin::Family);
        assert_eq!(views[0].main_guest.as_deref(), Some("Dimitri"));
    }

    #[test]
    fn test_from_legacy_copies_fields() {
        let record = legacy("abc", Some(50));
        let view = GuestView::from_legacy(&record);
        assert_eq!(view.id, "abc");
        assert_eq!(view.first_name, "Maria");
        assert_eq!(view.last_name, "Rossi");
        assert_eq!(view.display_name(), "Maria Rossi");
        assert_eq!(view.category, None);
        assert_eq!(view.origin, GuestOrigin::Legacy);
    }

    #[test]
    fn test_merge_orders_newest_first_missing_timestamps_last() {
        let legacy_records = vec![legacy("old", Some(100)), legacy("undated", None)];
        let family_records = vec![family(
            "fam1",
            Some(200),
            vec![guest("A", ""), guest("B", "")],
        )];

        let views = merge_views(&legacy_records, &family_records);
        let ids: Vec<&str> = views.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["fam1_0", "fam1_1", "old", "undated"]);
    }

    #[test]
    fn test_merge_totals() {
        let legacy_records = vec![legacy("a", Some(1)), legacy("b", Some(2))];
        let family_records = vec![
            family("f1", Some(3), vec![guest("x", ""), guest("y", "")]),
            family("f2", None, vec![guest("z", "")]),
        ];
        let views = merge_views(&legacy_records, &family_records);
        assert_eq!(views.len(), 2 + 2 + 1);
    }

    #[test]
    fn test_merge_empty_guest_array_contributes_nothing() {
        let family_records = vec![family("empty", Some(10), Vec::new())];
        let views = merge_views(&[], &family_records);
        assert!(views.is_empty());
    }
}
