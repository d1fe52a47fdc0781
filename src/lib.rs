pub mod consts;
pub mod form;
pub mod models;
pub mod utils;
