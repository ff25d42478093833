//! Image display collaborator
//!
//! The simulation hands every bridged sensor frame to an [`ImageDisplay`].
//! Window management lives outside the crate; [`LogDisplay`] is the headless
//! sink that reports frame statistics through the log.

use thiserror::Error;

use crate::capture::{ChannelOrder, FrameBuffer, RowOrder};

/// Display errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The display refused a frame
    #[error("Display rejected frame for '{window}': {reason}")]
    Rejected {
        /// Window the frame was meant for
        window: String,
        /// Why it was refused
        reason: String,
    },
}

/// Consumer of sensor frames
pub trait ImageDisplay {
    /// Row and channel order frames must arrive in
    fn expected_layout(&self) -> (RowOrder, ChannelOrder) {
        (RowOrder::TopDown, ChannelOrder::Bgr)
    }

    /// Present `frame` in the window called `window`
    fn show_image(&mut self, window: &str, frame: &FrameBuffer) -> Result<(), DisplayError>;
}

/// Headless display that logs frame statistics
#[derive(Debug, Clone)]
pub struct LogDisplay {
    frames_shown: u64,
    log_every: u64,
}

impl Default for LogDisplay {
    fn default() -> Self {
        Self::new(30)
    }
}

impl LogDisplay {
    /// Log at info level once every `log_every` frames, debug otherwise
    pub fn new(log_every: u64) -> Self {
        Self {
            frames_shown: 0,
            log_every: log_every.max(1),
        }
    }

    /// Frames accepted so far
    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }
}

impl ImageDisplay for LogDisplay {
    fn show_image(&mut self, window: &str, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let (rows, channels) = self.expected_layout();
        let layout = frame.layout();
        if layout.row_order != rows || layout.channel_order != channels {
            return Err(DisplayError::Rejected {
                window: window.to_string(),
                reason: format!("expected {:?}/{:?}, got {:?}/{:?}",
                                rows, channels, layout.row_order, layout.channel_order),
            });
        }

        let [r, g, b] = frame.mean_rgb();
        if self.frames_shown % self.log_every == 0 {
            log::info!("[{}] frame {} ({}) mean RGB ({:.1}, {:.1}, {:.1})",
                       window, self.frames_shown, frame.extent(), r, g, b);
        } else {
            log::debug!("[{}] frame {} mean RGB ({:.1}, {:.1}, {:.1})",
                        window, self.frames_shown, r, g, b);
        }
        self.frames_shown += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::BufferLayout;
    use crate::render::Extent;

    #[test]
    fn test_accepts_consumer_layout_and_counts() {
        let mut display = LogDisplay::new(2);
        let frame = FrameBuffer::new(BufferLayout::new(Extent::new(4, 4), RowOrder::TopDown, ChannelOrder::Bgr));

        for _ in 0..3 {
            display.show_image("Sensor feed", &frame).unwrap();
        }
        assert_eq!(display.frames_shown(), 3);
    }

    #[test]
    fn test_rejects_unbridged_frames() {
        let mut display = LogDisplay::default();
        let raw = FrameBuffer::new(BufferLayout::new(Extent::new(4, 4), RowOrder::BottomUp, ChannelOrder::Bgr));

        assert!(matches!(
            display.show_image("Sensor feed", &raw),
            Err(DisplayError::Rejected { .. })
        ));
        assert_eq!(display.frames_shown(), 0);
    }
}
