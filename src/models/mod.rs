//! Data models for SpecEqui

pub mod analytics;
pub mod enums;
pub mod equipment;
pub mod filter;
pub mod manufacturer;
pub mod pagination;
pub mod tag;
pub mod upload;
pub mod user;

// Re-export commonly used types
pub use enums::{EquipmentStatus, SortKey};
pub use equipment::{Equipment, EquipmentDetail};
pub use filter::EquipmentFilter;
pub use manufacturer::Manufacturer;
pub use pagination::PageInfo;
pub use tag::Tag;
pub use user::{User, UserClaims};
