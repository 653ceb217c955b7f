use serde::Serialize;
use std::fmt;

use crate::models::{GuestCategory, GuestView};

/// Tokens equal to this (case-insensitively) are not statistics; the
/// stored strings use it as an explicit "no conditions" marker.
pub const NONE_SENTINEL: &str = "Nessuna";

/// One counted condition label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub label: String,
    pub count: usize,
}

/// Summary statistics over the merged guest views.
#[derive(Debug, Default, Serialize)]
pub struct GuestStats {
    pub total: usize,
    pub adults: usize,
    pub children05: usize,
    pub children610: usize,
    /// Intolerance labels with occurrence counts, first-seen order.
    pub intolerances: Vec<FrequencyEntry>,
    /// Allergy labels with occurrence counts, first-seen order.
    pub allergies: Vec<FrequencyEntry>,
}

impl GuestStats {
    /// Reduce the merged views. A view without a category counts as
    /// an adult.
    pub fn aggregate(views: &[GuestView]) -> Self {
        let mut stats = GuestStats {
            total: views.len(),
            ..GuestStats::default()
        };

        for view in views {
            match view.category.unwrap_or(GuestCategory::Adult) {
                GuestCategory::Adult => stats.adults += 1,
                GuestCategory::Child05 => stats.children05 += 1,
                GuestCategory::Child610 => stats.children610 += 1,
            }
            tally(&mut stats.intolerances, &view.intolerances);
            tally(&mut stats.allergies, &view.allergies);
        }

        stats
    }
}

/// Count comma-separated tokens: trim each, drop empties and the
/// "none" sentinel, key by the exact first-seen spelling.
fn tally(entries: &mut Vec<FrequencyEntry>, raw: &str) {
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() || token.eq_ignore_ascii_case(NONE_SENTINEL) {
            continue;
        }
        match entries.iter_mut().find(|e| e.label == token) {
            Some(entry) => entry.count += 1,
            None => entries.push(FrequencyEntry {
                label: token.to_string(),
                count: 1,
            }),
        }
    }
}

impl fmt::Display for GuestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Guests: {}", self.total)?;
        writeln!(f, "- Adults: {}", self.adults)?;
        writeln!(f, "- Children (0-5 years): {}", self.children05)?;
        writeln!(f, "- Children (6-10 years): {}", self.children610)?;

        if !self.intolerances.is_empty() {
            writeln!(f, "\nIntolerances Detail:")?;
            for entry in &self.intolerances {
                writeln!(f, "- {}: {}", entry.label, entry.count)?;
            }
        }
        if !self.allergies.is_empty() {
            writeln!(f, "\nAllergies Detail:")?;
            for entry in &self.allergies {
                writeln!(f, "- {}: {}", entry.label, entry.count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GuestOrigin;

    fn view(category: Option<GuestCategory>, intolerances: &str, allergies: &str) -> GuestView {
        GuestView {
            id: "v".to_string(),
            first_name: "Guest".to_string(),
            last_name: String::new(),
            intolerances: intolerances.to_string(),
            allergies: allergies.to_string(),
            notes: String::new(),
            main_guest: None,
            category,
            created_at: None,
            origin: GuestOrigin::Legacy,
        }
    }

    #[test]
    fn test_missing_category_counts_as_adult() {
        let views = vec![
            view(None, "", ""),
            view(Some(GuestCategory::Adult), "", ""),
            view(Some(GuestCategory::Child05), "", ""),
            view(Some(GuestCategory::Child610), "", ""),
        ];
        let stats = GuestStats::aggregate(&views);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.adults, 2);
        assert_eq!(stats.children05, 1);
        assert_eq!(stats.children610, 1);
    }

    #[test]
    fn test_frequency_counts_first_seen_spelling() {
        let views = vec![
            view(None, "Lattosio, Glutine", ""),
            view(None, "Lattosio", "Arachidi"),
            view(None, "lattosio", ""),
        ];
        let stats = GuestStats::aggregate(&views);

        // Exact-token keys: the lowercase variant is its own entry,
        // and the first-seen spelling leads.
        assert_eq!(
            stats.intolerances,
            vec![
                FrequencyEntry { label: "Lattosio".to_string(), count: 2 },
                FrequencyEntry { label: "Glutine".to_string(), count: 1 },
                FrequencyEntry { label: "lattosio".to_string(), count: 1 },
            ]
        );
        assert_eq!(
            stats.allergies,
            vec![FrequencyEntry { label: "Arachidi".to_string(), count: 1 }]
        );
    }

    #[test]
    fn test_none_sentinel_and_blanks_are_dropped() {
        let views = vec![view(None, "Nessuna, , NESSUNA", "nessuna")];
        let stats = GuestStats::aggregate(&views);
        assert!(stats.intolerances.is_empty());
        assert!(stats.allergies.is_empty());
    }

    #[test]
    fn test_display_summary() {
        let views = vec![view(Some(GuestCategory::Adult), "Lattosio", "")];
        let rendered = format!("{}", GuestStats::aggregate(&views));
        assert!(rendered.contains("Total Guests: 1"));
        assert!(rendered.contains("- Adults: 1"));
        assert!(rendered.contains("Intolerances Detail:"));
        assert!(rendered.contains("- Lattosio: 1"));
        assert!(!rendered.contains("Allergies Detail:"));
    }
}
