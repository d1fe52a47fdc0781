pub mod image_input;
pub mod input_validation;
