pub mod audit_record;
pub mod course;
pub mod material;
pub mod module;
pub mod quiz;
pub mod subject;
pub mod user;

pub use audit_record::{AuditRecord, AuditRecordView, NewAuditRecord};
pub use course::Course;
pub use material::LearningMaterial;
pub use module::Module;
pub use quiz::Quiz;
pub use subject::Subject;
pub use user::{Role, User};
