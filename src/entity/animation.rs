//! Animation clips and frame advancement.
//!
//! Clips are tiny (one or two frames for the clips that drive gameplay) and
//! shared by every species. The frame index doubles as the simulation clock
//! for strikes and bites, so changing a clip's frame count or rate changes
//! attack and feeding cadence.

use serde::{Deserialize, Serialize};

use crate::entity::components::Animation;

/// Frame index on which an attack lands or a bite is taken.
pub const ACTION_FRAME: u8 = 1;

/// Clip identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationKind {
    #[default]
    Idle,
    Walk,
    Run,
    Attack,
    Eat,
    DeathDying,
}

/// Static playback data for one clip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationClip {
    pub frames: u8,
    pub fps: f32,
    pub looping: bool,
}

impl AnimationClip {
    /// Seconds each frame is shown.
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.fps
    }
}

impl AnimationKind {
    /// Playback data for this clip.
    pub fn clip(self) -> AnimationClip {
        match self {
            AnimationKind::Idle => AnimationClip { frames: 2, fps: 1.0, looping: true },
            AnimationKind::Walk => AnimationClip { frames: 4, fps: 8.0, looping: true },
            AnimationKind::Run => AnimationClip { frames: 4, fps: 12.0, looping: true },
            AnimationKind::Attack => AnimationClip { frames: 2, fps: 6.0, looping: false },
            AnimationKind::Eat => AnimationClip { frames: 2, fps: 2.0, looping: true },
            AnimationKind::DeathDying => AnimationClip { frames: 1, fps: 1.0, looping: false },
        }
    }
}

/// Advance playback by `dt`, returns true if the frame changed.
///
/// At most one frame is advanced per call; leftover time carries over in
/// `timer`. Non-looping clips stop on their last frame with `playing`
/// cleared.
pub fn advance(anim: &mut Animation, dt: f32) -> bool {
    if !anim.playing {
        return false;
    }

    let clip = anim.kind.clip();
    if clip.frames == 0 {
        return false;
    }

    anim.timer += dt;
    let frame_duration = clip.frame_duration();
    if anim.timer < frame_duration {
        return false;
    }
    anim.timer -= frame_duration;

    let next_frame = anim.frame + 1;
    if next_frame >= clip.frames {
        if clip.looping {
            anim.frame = 0;
        } else {
            anim.frame = clip.frames - 1;
            anim.playing = false;
        }
    } else {
        anim.frame = next_frame;
    }
    true
}
