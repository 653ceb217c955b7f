//! Dietary conditions for a single guest.
//!
//! A guest carries a fixed set of condition flags plus two free-text
//! lists for anything the fixed set does not cover. Edits go through
//! [`DietaryDraft`], a scratch buffer that only touches the live guest
//! slot on commit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::roster::GuestSlot;

/// The fixed condition flag set.
///
/// `OtherIntolerance` and `OtherAllergy` are carried for completeness
/// but never rendered into the detail string; free-text entries are the
/// export path for anything outside the fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    Lactose,
    Gluten,
    Sulfites,
    Histamine,
    TreeNuts,
    Peanuts,
    Eggs,
    Fish,
    Shellfish,
    OtherIntolerance,
    OtherAllergy,
}

impl Condition {
    /// Intolerances rendered into the detail string, in render order.
    pub const INTOLERANCES: [Condition; 4] = [
        Condition::Lactose,
        Condition::Gluten,
        Condition::Sulfites,
        Condition::Histamine,
    ];

    /// Allergies rendered into the detail string, in render order.
    pub const ALLERGIES: [Condition; 5] = [
        Condition::TreeNuts,
        Condition::Peanuts,
        Condition::Eggs,
        Condition::Fish,
        Condition::Shellfish,
    ];

    /// The label written into stored detail strings.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Lactose => "Lattosio",
            Condition::Gluten => "Glutine",
            Condition::Sulfites => "Solfiti",
            Condition::Histamine => "Istamina",
            Condition::TreeNuts => "Frutta a guscio",
            Condition::Peanuts => "Arachidi",
            Condition::Eggs => "Uova",
            Condition::Fish => "Pesce",
            Condition::Shellfish => "Crostacei",
            Condition::OtherIntolerance => "Altro (intolleranza)",
            Condition::OtherAllergy => "Altro (allergia)",
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "lactose" => Ok(Condition::Lactose),
            "gluten" => Ok(Condition::Gluten),
            "sulfites" => Ok(Condition::Sulfites),
            "histamine" => Ok(Condition::Histamine),
            "tree_nuts" | "treenuts" => Ok(Condition::TreeNuts),
            "peanuts" => Ok(Condition::Peanuts),
            "eggs" => Ok(Condition::Eggs),
            "fish" => Ok(Condition::Fish),
            "shellfish" => Ok(Condition::Shellfish),
            "other_intolerance" => Ok(Condition::OtherIntolerance),
            "other_allergy" => Ok(Condition::OtherAllergy),
            _ => Err(format!(
                "Invalid condition '{}'. Valid options: lactose, gluten, sulfites, histamine, \
                 tree-nuts, peanuts, eggs, fish, shellfish, other-intolerance, other-allergy",
                s
            )),
        }
    }
}

/// Which free-text list a custom entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomBucket {
    Intolerance,
    Allergy,
}

/// Dietary information carried by one guest slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietaryProfile {
    /// Active condition flags.
    #[serde(default)]
    pub conditions: BTreeSet<Condition>,
    /// Free-text intolerances, in entry order. Duplicates allowed.
    #[serde(default)]
    pub custom_intolerances: Vec<String>,
    /// Free-text allergies, in entry order. Duplicates allowed.
    #[serde(default)]
    pub custom_allergies: Vec<String>,
}

impl DietaryProfile {
    /// True when any flag is set or either free-text list is non-empty.
    pub fn has_dietary_needs(&self) -> bool {
        !self.conditions.is_empty()
            || !self.custom_intolerances.is_empty()
            || !self.custom_allergies.is_empty()
    }

    /// Render the stored detail string: `"Int: ... | All: ..."`.
    ///
    /// Flag labels come first in fixed render order, then the free-text
    /// entries. The two `Other*` flags never appear here.
    pub fn details_text(&self) -> String {
        let mut intolerances: Vec<&str> = Condition::INTOLERANCES
            .iter()
            .filter(|c| self.conditions.contains(*c))
            .map(|c| c.label())
            .collect();
        intolerances.extend(self.custom_intolerances.iter().map(String::as_str));

        let mut allergies: Vec<&str> = Condition::ALLERGIES
            .iter()
            .filter(|c| self.conditions.contains(*c))
            .map(|c| c.label())
            .collect();
        allergies.extend(self.custom_allergies.iter().map(String::as_str));

        format!(
            "Int: {} | All: {}",
            intolerances.join(", "),
            allergies.join(", ")
        )
    }
}

/// Scratch buffer for editing one guest's dietary profile.
///
/// The live slot is untouched until [`DietaryDraft::commit`]; dropping
/// the draft discards every change.
#[derive(Debug, Clone)]
pub struct DietaryDraft {
    profile: DietaryProfile,
}

impl DietaryDraft {
    /// Copy the slot's current profile into an isolated draft.
    pub fn open(slot: &GuestSlot) -> Self {
        Self {
            profile: slot.dietary.clone(),
        }
    }

    /// Flip one condition flag.
    pub fn toggle(&mut self, condition: Condition) {
        if !self.profile.conditions.remove(&condition) {
            self.profile.conditions.insert(condition);
        }
    }

    /// Append a trimmed free-text entry. Blank input is a no-op;
    /// duplicates are allowed.
    pub fn add_custom(&mut self, bucket: CustomBucket, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match bucket {
            CustomBucket::Intolerance => self.profile.custom_intolerances.push(text.to_string()),
            CustomBucket::Allergy => self.profile.custom_allergies.push(text.to_string()),
        }
    }

    /// Remove the free-text entry at `index`. Returns false if the
    /// index is out of range.
    pub fn remove_custom(&mut self, bucket: CustomBucket, index: usize) -> bool {
        let list = match bucket {
            CustomBucket::Intolerance => &mut self.profile.custom_intolerances,
            CustomBucket::Allergy => &mut self.profile.custom_allergies,
        };
        if index < list.len() {
            list.remove(index);
            true
        } else {
            false
        }
    }

    /// Overwrite the slot's profile with the draft, atomically.
    pub fn commit(self, slot: &mut GuestSlot) {
        slot.dietary = self.profile;
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
