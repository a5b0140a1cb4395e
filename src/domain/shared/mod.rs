pub mod input_error;

pub use input_error::InputError;
