pub mod color_season;
pub mod occasion;
