pub mod molecules;
pub mod scale;
