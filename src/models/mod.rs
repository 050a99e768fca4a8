pub mod baseline;
pub mod entry;
pub mod patient;
pub mod summary;

pub use baseline::BaselineProfile;
pub use entry::{RawReading, RecoveryEntry, SymptomTags};
pub use patient::{Patient, SurgeryType};
pub use summary::{Trend, WindowSummary};
