pub mod invite_store;
pub mod profile_store;

pub use invite_store::{InviteLedger, InviteStore};
pub use profile_store::{ProfileRepository, ProfileStore};
