pub mod clock;
pub mod spot_directory;
pub mod user_directory;

pub use clock::FixedClock;
pub use spot_directory::SpotDirectory;
pub use user_directory::UserDirectory;
