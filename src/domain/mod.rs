pub mod bar;
pub mod series;

pub use bar::*;
pub use series::*;
