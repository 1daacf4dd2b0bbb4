pub mod audit_event;
pub mod feedback;
pub mod inventory;
pub mod medicine;
pub mod pharmacy;
pub mod prescription;
pub mod status;
pub mod user;

pub use audit_event::AuditEvent;
pub use feedback::{Feedback, FeedbackDetail, FeedbackStatus};
pub use inventory::{InventoryEntry, StockListing, StockSheetRow, StockStatus};
pub use medicine::{Medicine, MedicineName};
pub use pharmacy::Pharmacy;
pub use prescription::{Prescription, PrescriptionDetail, PrescriptionStatus};
pub use status::AccountStatus;
pub use user::{Role, User, UserWithPharmacy};
