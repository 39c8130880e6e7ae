pub mod common;
pub mod copy_fields;
pub mod delete_fields;

pub use common::SyncOptions;
pub use copy_fields::CopyFields;
pub use delete_fields::DeleteFields;
