use clap::Args;
use std::collections::BTreeMap;
use std::str::FromStr;

use partecipa::db::RsvpRepository;
use partecipa::models::{
    CategoryCounts, Condition, CustomBucket, DietaryDraft, Roster, SubmissionRecord,
};

/// Register a new family RSVP.
///
/// Guest slots are laid out in fixed order: adults first, then
/// children 0-5, then children 6-10. The main guest fills the first
/// adult slot; `--guest` names fill the remaining slots in order.
#[derive(Args)]
pub struct SubmitCommand {
    /// Name of the main guest (fills the first adult slot)
    #[arg(long)]
    main_guest: String,

    /// Number of adults (at least 1)
    #[arg(long, default_value_t = 1)]
    adults: u32,

    /// Number of children aged 0-5
    #[arg(long = "children-0-5", default_value_t = 0)]
    children05: u32,

    /// Number of children aged 6-10
    #[arg(long = "children-6-10", default_value_t = 0)]
    children610: u32,

    /// Name for the next unnamed slot (repeat once per extra guest)
    #[arg(long = "guest", value_name = "NAME")]
    guests: Vec<String>,

    /// Toggle a condition flag for a slot: INDEX:CONDITION
    /// (e.g. 0:lactose, 2:tree-nuts)
    #[arg(long = "condition", value_name = "INDEX:CONDITION")]
    conditions: Vec<String>,

    /// Add a free-text intolerance for a slot: INDEX:TEXT
    #[arg(long = "intolerance", value_name = "INDEX:TEXT")]
    intolerances: Vec<String>,

    /// Add a free-text allergy for a slot: INDEX:TEXT
    #[arg(long = "allergy", value_name = "INDEX:TEXT")]
    allergies: Vec<String>,

    /// Free-form note for the whole reservation
    #[arg(long, default_value = "")]
    notes: String,
}

enum DietaryEdit {
    Toggle(Condition),
    Custom(CustomBucket, String),
}

impl SubmitCommand {
    pub async fn run(&self, repo: &RsvpRepository) -> Result<(), Box<dyn std::error::Error>> {
        if self.adults < 1 {
            return Err("At least one adult is required".into());
        }
        let counts = CategoryCounts::new(self.adults, self.children05, self.children610);

        let mut roster = Roster::default();
        roster.reconcile(&counts);
        roster.set_main_guest_name(&self.main_guest);

        // Fill the remaining slots with the provided guest names.
        let open_slots = roster.len() - 1;
        if self.guests.len() > open_slots {
            return Err(format!(
                "Got {} --guest name(s) but only {} slot(s) besides the main guest",
                self.guests.len(),
                open_slots
            )
            .into());
        }
        for (slot, name) in roster.slots_mut().iter_mut().skip(1).zip(&self.guests) {
            slot.name = name.trim().to_string();
        }

        // Group dietary edits per slot so each slot gets one draft.
        let mut edits: BTreeMap<usize, Vec<DietaryEdit>> = BTreeMap::new();
        for raw in &self.conditions {
            let (index, value) = parse_indexed(raw)?;
            let condition = Condition::from_str(value)?;
            edits.entry(index).or_default().push(DietaryEdit::Toggle(condition));
        }
        for raw in &self.intolerances {
            let (index, value) = parse_indexed(raw)?;
            edits
                .entry(index)
                .or_default()
                .push(DietaryEdit::Custom(CustomBucket::Intolerance, value.to_string()));
        }
        for raw in &self.allergies {
            let (index, value) = parse_indexed(raw)?;
            edits
                .entry(index)
                .or_default()
                .push(DietaryEdit::Custom(CustomBucket::Allergy, value.to_string()));
        }

        for (index, slot_edits) in edits {
            if index >= roster.len() {
                return Err(format!(
                    "No guest slot at index {} (the roster has {} slot(s))",
                    index,
                    roster.len()
                )
                .into());
            }
            let mut draft = DietaryDraft::open(&roster.slots()[index]);
            for edit in slot_edits {
                match edit {
                    DietaryEdit::Toggle(condition) => draft.toggle(condition),
                    DietaryEdit::Custom(bucket, text) => draft.add_custom(bucket, &text),
                }
            }
            draft.commit(&mut roster.slots_mut()[index]);
        }

        let record =
            SubmissionRecord::encode(&roster, &counts, &self.notes, &self.main_guest)?;
        let id = repo.insert_family(&record).await?;

        println!(
            "Registered RSVP {} for {} ({} guest(s))",
            id, record.main_guest, record.total_people
        );
        for (i, guest) in record.guests.iter().enumerate() {
            let marker = if guest.has_infos { " [dietary]" } else { "" };
            println!(
                "  {}. {} ({}){}",
                i,
                guest.name,
                guest.category.label(),
                marker
            );
        }
        Ok(())
    }
}

/// Parse an `INDEX:VALUE` argument.
fn parse_indexed(raw: &str) -> Result<(usize, &str), String> {
    let Some((index, value)) = raw.split_once(':') else {
        return Err(format!("Expected INDEX:VALUE, got '{}'", raw));
    };
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("Invalid slot index in '{}'", raw))?;
    Ok((index, value))
}
