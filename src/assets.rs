//! Asset registry
//!
//! The game draws flat-coloured shapes instead of atlas bitmaps, so each atlas
//! frame is registered as a colour plus a display size. Audio clips map to
//! procedural sound effects in [`crate::audio`].

use std::collections::BTreeMap;

use glam::Vec2;

use crate::consts::*;
use crate::error::{GameError, GameResult};
use crate::sim::BrickColor;

/// A named atlas frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    pub color: [f32; 4],
    /// Unscaled display size in world pixels
    pub size: Vec2,
}

/// Audio clips the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AudioClip {
    Music,
    Repair,
    Death,
}

impl AudioClip {
    pub const ALL: [AudioClip; 3] = [AudioClip::Music, AudioClip::Repair, AudioClip::Death];

    pub fn name(&self) -> &'static str {
        match self {
            AudioClip::Music => "music",
            AudioClip::Repair => "repair",
            AudioClip::Death => "death",
        }
    }
}

/// Frame names for the non-brick sprites
pub mod frames {
    pub const BALL: &str = "ball1";
    pub const HERO: &str = "ball2";
    pub const PADDLE: &str = "paddle1";
    /// Highlight for the cell under repair
    pub const REPAIR_TARGET: &str = "yellow2";
    pub const DECOY: &str = "silver2";
}

/// Every frame in the breakout atlas with its stand-in colour and size
const ATLAS: [(&str, [f32; 4], [f32; 2]); 11] = [
    ("blue1", [0.25, 0.55, 0.95, 1.0], [CELL_WIDTH, CELL_HEIGHT]),
    ("red1", [0.92, 0.3, 0.3, 1.0], [CELL_WIDTH, CELL_HEIGHT]),
    ("green1", [0.35, 0.85, 0.4, 1.0], [CELL_WIDTH, CELL_HEIGHT]),
    ("yellow1", [0.98, 0.85, 0.3, 1.0], [CELL_WIDTH, CELL_HEIGHT]),
    ("silver1", [0.75, 0.78, 0.82, 1.0], [CELL_WIDTH, CELL_HEIGHT]),
    ("purple1", [0.68, 0.4, 0.9, 1.0], [CELL_WIDTH, CELL_HEIGHT]),
    ("ball1", [1.0, 1.0, 1.0, 1.0], [BALL_RADIUS * 2.0, BALL_RADIUS * 2.0]),
    ("ball2", [1.0, 0.6, 0.2, 1.0], [BALL_RADIUS * 2.0, BALL_RADIUS * 2.0]),
    ("paddle1", [0.3, 0.75, 0.95, 1.0], [PADDLE_WIDTH, PADDLE_HEIGHT]),
    ("yellow2", [1.0, 0.95, 0.45, 1.0], [CELL_WIDTH, CELL_HEIGHT]),
    ("silver2", [0.85, 0.87, 0.9, 1.0], [BALL_RADIUS * 2.0, BALL_RADIUS * 2.0]),
];

/// Loaded frames and clips, filled by the Preloader scene
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    frames: BTreeMap<String, SpriteFrame>,
    clips: Vec<AudioClip>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the whole breakout atlas and all audio clips
    pub fn load_all(&mut self) {
        for (name, color, [w, h]) in ATLAS {
            self.register_frame(
                name,
                SpriteFrame {
                    color,
                    size: Vec2::new(w, h),
                },
            );
        }
        for clip in AudioClip::ALL {
            self.register_clip(clip);
        }
        log::debug!(
            "Registered {} frames and {} clips",
            self.frames.len(),
            self.clips.len()
        );
    }

    pub fn register_frame(&mut self, name: &str, frame: SpriteFrame) {
        self.frames.insert(name.to_string(), frame);
    }

    pub fn register_clip(&mut self, clip: AudioClip) {
        if !self.clips.contains(&clip) {
            self.clips.push(clip);
        }
    }

    /// Look up a frame by atlas name
    pub fn frame(&self, name: &str) -> GameResult<&SpriteFrame> {
        self.frames.get(name).ok_or_else(|| GameError::MissingAsset {
            name: name.to_string(),
        })
    }

    pub fn brick_frame(&self, color: BrickColor) -> GameResult<&SpriteFrame> {
        self.frame(color.frame())
    }

    pub fn has_clip(&self, clip: AudioClip) -> bool {
        self.clips.contains(&clip)
    }

    /// True once every frame and clip the Game scene uses is present
    pub fn is_complete(&self) -> bool {
        ATLAS.iter().all(|(name, _, _)| self.frames.contains_key(*name))
            && AudioClip::ALL.iter().all(|c| self.has_clip(*c))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}
