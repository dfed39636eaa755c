pub mod audio;
pub mod podcast;
pub mod project;
pub mod synthesis;
pub mod voice;
