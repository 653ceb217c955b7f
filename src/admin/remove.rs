use crate::admin::locks::LockRegistry;
use crate::db::RsvpRepository;
use crate::error::RsvpError;

/// What a successful removal did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// A legacy record was deleted outright.
    LegacyDeleted,
    /// One embedded guest was removed; the parent record remains.
    GuestRemoved { remaining: usize },
    /// The removed guest was the last one; the parent record is gone.
    RecordDeleted,
}

/// Remove the guest behind one view id.
///
/// A plain id targets a legacy record. A composite `parentId_index`
/// id removes the embedded guest at that index, decrements the
/// matching category count (floored at zero against pre-existing
/// inconsistency) and writes the record back, or deletes it when no
/// guests remain. The whole read-modify-write runs under the
/// per-record lock; a concurrent removal on the same record is
/// rejected with [`RsvpError::Busy`].
pub async fn remove_view(
    repo: &RsvpRepository,
    locks: &LockRegistry,
    view_id: &str,
) -> Result<RemovalOutcome, RsvpError> {
    let Some((parent_id, index)) = view_id.split_once('_') else {
        if repo.delete_legacy(view_id).await? {
            return Ok(RemovalOutcome::LegacyDeleted);
        }
        return Err(RsvpError::NotFound(view_id.to_string()));
    };

    let index: usize = index
        .parse()
        .map_err(|_| RsvpError::NotFound(view_id.to_string()))?;

    let _guard = locks
        .try_acquire(parent_id)
        .ok_or_else(|| RsvpError::Busy(parent_id.to_string()))?;

    let record = repo
        .get_family(parent_id)
        .await?
        .ok_or_else(|| RsvpError::NotFound(parent_id.to_string()))?;

    if index >= record.guests.len() {
        return Err(RsvpError::IndexOutOfRange {
            record: parent_id.to_string(),
            index,
        });
    }

    let mut guests = record.guests;
    let removed = guests.remove(index);
    let mut counts = record.counts;
    counts.saturating_decrement(removed.category);

    if guests.is_empty() {
        if !repo.delete_family(parent_id).await? {
            return Err(RsvpError::NotFound(parent_id.to_string()));
        }
        Ok(RemovalOutcome::RecordDeleted)
    } else {
        let remaining = guests.len();
        if !repo
            .update_family(parent_id, &guests, &counts, remaining)
            .await?
        {
            return Err(RsvpError::NotFound(parent_id.to_string()));
        }
        Ok(RemovalOutcome::GuestRemoved { remaining })
    }
}
