pub mod hash;
pub mod image_type;
pub mod jwt;
pub mod payload;
