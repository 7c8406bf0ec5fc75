pub mod booking_store;
pub mod clock;
pub mod spot_directory;
pub mod user_directory;

pub use booking_store::{AdmitOutcome, BookingStore};
pub use clock::Clock;
pub use spot_directory::{SpotDirectory, SpotRef, SpotSummary};
pub use user_directory::UserDirectory;
