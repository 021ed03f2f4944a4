pub mod deck;
pub mod history;
pub mod roll;
pub mod upload;
pub mod util;
