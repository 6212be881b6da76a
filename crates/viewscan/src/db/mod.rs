pub mod distinct;
pub mod index;
pub mod key;
pub mod range;
pub mod response;
pub mod view;
pub mod walk;
