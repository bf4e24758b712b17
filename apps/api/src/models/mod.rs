pub mod profile;
pub mod review;
