//! HTML parsers for keysforkids.org

pub mod devotional;

pub use devotional::{
    DevotionalMetadata, devotional_filename, extract_metadata, find_audio_url,
    find_devotional_link, parse_long_date,
};
