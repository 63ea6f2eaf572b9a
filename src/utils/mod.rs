pub mod direction;
pub mod logging;
pub mod url;
