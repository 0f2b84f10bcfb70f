//! Segment-versus-rectangle visibility checks.

use glam::Vec2;
use horde_core::Rect;

/// Reports whether the segment `start`-`end` clears every obstacle.
///
/// Each obstacle rectangle is grown by `radius` on all sides before testing,
/// which lets callers ask whether a body of that radius could pass along the
/// segment. The test is symmetric in `start` and `end`.
pub fn has_line_of_sight<I>(start: Vec2, end: Vec2, obstacles: I, radius: f32) -> bool
where
    I: IntoIterator<Item = Rect>,
{
    !obstacles
        .into_iter()
        .any(|rect| rect.padded(radius).intersects_segment(start, end))
}
