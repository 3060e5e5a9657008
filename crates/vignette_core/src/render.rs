//! Fixed render geometry for segment video clips.

use serde::{Deserialize, Serialize};

/// Parameters for rendering one segment clip.
///
/// Defaults produce the fixed-aspect portrait output every segment shares:
/// 1080×1920 at 30 fps, H.264/AAC, with a continuous slow zoom over the
/// clip duration.
///
/// # Examples
///
/// ```
/// use vignette_core::RenderSpec;
///
/// let spec = RenderSpec::default();
/// assert_eq!((spec.width, spec.height, spec.fps), (1080, 1920, 30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSpec {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Output frame rate
    pub fps: u32,
    /// Zoom increment applied per frame
    pub zoom_step: f64,
    /// Zoom ceiling
    pub zoom_max: f64,
    /// Number of frames the zoom effect spans
    pub zoom_frames: u32,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30,
            zoom_step: 0.0015,
            zoom_max: 1.5,
            zoom_frames: 60,
        }
    }
}

impl RenderSpec {
    /// The ffmpeg `zoompan` filter expression for this spec.
    pub fn zoompan_filter(&self) -> String {
        format!(
            "zoompan=z='min(zoom+{},{})':d={}:x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)'",
            self.zoom_step, self.zoom_max, self.zoom_frames
        )
    }

    /// The ffmpeg `scale` filter expression for this spec.
    pub fn scale_filter(&self) -> String {
        format!("scale={}:{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_match_portrait_zoom() {
        let spec = RenderSpec::default();
        assert_eq!(
            spec.zoompan_filter(),
            "zoompan=z='min(zoom+0.0015,1.5)':d=60:x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)'"
        );
        assert_eq!(spec.scale_filter(), "scale=1080:1920");
    }
}
