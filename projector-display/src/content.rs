//! Content values and the rasterizer boundary
//!
//! Turning a verse or stanza into pixels is done by an external rasterizer;
//! targets only hand it the content, the style and the size to render at.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::frame::{Frame, Size};
use crate::settings::StyleSettings;

/// Background-only content with an optional caption
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveText {
    pub caption: String,
}

/// A Bible verse (possibly several joined verses)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub primary_text: String,
    pub primary_caption: String,
    /// Parallel translations shown under the primary text
    pub secondary_text: Option<String>,
    pub secondary_caption: Option<String>,
}

/// One stanza of a song
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stanza {
    pub title: String,
    pub number: u32,
    pub lines: Vec<String>,
    pub is_last: bool,
}

/// One announcement slide
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnounceSlide {
    pub text: String,
}

/// A video to play in the foreground
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub file_path: PathBuf,
    pub name: String,
}

/// Content handed to the rasterizer
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    Passive(&'a PassiveText),
    Bible(&'a Verse),
    Song(&'a Stanza),
    Announcement(&'a AnnounceSlide),
}

impl Content<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Content::Passive(_) => "passive",
            Content::Bible(_) => "bible",
            Content::Song(_) => "song",
            Content::Announcement(_) => "announcement",
        }
    }
}

/// Produces the text overlay image for a piece of content
///
/// Implementations must be stateless per call: the same rasterizer is shared
/// by every target.
pub trait ContentRasterizer {
    fn rasterize(&self, content: Content<'_>, style: &StyleSettings, size: Size) -> Result<Frame, RenderError>;
}

/// Rasterizer that produces transparent overlays
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankRasterizer;

impl ContentRasterizer for BlankRasterizer {
    fn rasterize(&self, _content: Content<'_>, _style: &StyleSettings, size: Size) -> Result<Frame, RenderError> {
        Ok(Frame::empty(size))
    }
}
