pub mod booking_store;
pub mod spot_directory;
pub mod user_directory;

// パブリックに型を再エクスポート
pub use booking_store::BookingStore as PostgresBookingStore;
pub use spot_directory::SpotDirectory as PostgresSpotDirectory;
pub use user_directory::UserDirectory as PostgresUserDirectory;
