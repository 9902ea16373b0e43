pub mod archive;
pub mod extensions;
pub mod guess;
pub mod text;
