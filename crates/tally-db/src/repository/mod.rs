//! Repository implementations for database entities.

pub mod closing;
pub mod settings;

pub use closing::ClosingRepository;
pub use settings::SettingsRepository;
