mod category;
mod dietary;
mod roster;
mod submission;
mod view;

pub use category::GuestCategory;
pub use dietary::{Condition, CustomBucket, DietaryDraft, DietaryProfile};
pub use roster::{CategoryCounts, GuestSlot, Roster};
pub use submission::{FamilyGuest, SubmissionRecord};
pub use view::{
    merge_views, split_details, FamilyRecord, GuestOrigin, GuestView, LegacyRecord,
    GUEST_PLACEHOLDER,
};
