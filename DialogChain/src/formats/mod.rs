//! File format modules
//!
//! - `lsx`: the LSX element tree used by dialog saves
//! - `loca`: localization `contentList` XML

pub mod loca;
pub mod lsx;
