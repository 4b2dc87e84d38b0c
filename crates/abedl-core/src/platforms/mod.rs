//! Built-in platform downloaders

pub mod cbn;
pub mod keysforkids;
pub mod youtube;

pub use cbn::CbnDownloader;
pub use keysforkids::KeysForKidsDownloader;
pub use youtube::YouTubeDownloader;
