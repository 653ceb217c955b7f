//! Operator-side operations over the store: the merged guest view,
//! targeted removal, and summary statistics.

mod locks;
mod remove;
mod stats;

pub use locks::{LockRegistry, RecordGuard};
pub use remove::{remove_view, RemovalOutcome};
pub use stats::{FrequencyEntry, GuestStats, NONE_SENTINEL};

use crate::db::RsvpRepository;
use crate::error::RsvpError;
use crate::models::{merge_views, GuestView};

/// Fetch both collections in parallel and merge them into the uniform
/// view list, newest first. Re-derived on every call; the dataset is
/// guest-list sized and never cached.
pub async fn fetch_views(repo: &RsvpRepository) -> Result<Vec<GuestView>, RsvpError> {
    let (legacy, family) = futures::try_join!(repo.list_legacy(), repo.list_family())?;
    Ok(merge_views(&legacy, &family))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::{CategoryCounts, GuestOrigin, Roster, SubmissionRecord};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_views_merges_both_collections() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(temp_dir.path().join("test.db")).await.unwrap();
        let repo = RsvpRepository::new(pool.clone());

        sqlx::query(
            "INSERT INTO rsvps (id, first_name, last_name, intolerances, allergies, notes) \
             VALUES ('l1', 'Maria', 'Rossi', '', '', '')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let counts = CategoryCounts::new(2, 0, 0);
        let mut roster = Roster::default();
        roster.reconcile(&counts);
        roster.slots_mut()[0].name = "Dimitri".to_string();
        roster.slots_mut()[1].name = "Trizah".to_string();
        let record = SubmissionRecord::encode(&roster, &counts, "", "Dimitri").unwrap();
        repo.insert_family(&record).await.unwrap();

        let views = fetch_views(&repo).await.unwrap();
        assert_eq!(views.len(), 3);
        // The family record has a timestamp, the legacy row does not,
        // so the family guests come first.
        assert_eq!(views[0].origin, GuestOrigin::Family);
        assert_eq!(views[0].first_name, "Dimitri");
        assert_eq!(views[2].origin, GuestOrigin::Legacy);
    }
}
