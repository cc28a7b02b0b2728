//! Display capability
//!
//! The player never draws anything itself. A front end implements
//! [`DisplaySurface`] to switch between the image and video surfaces and the
//! loading, content and error containers.

use crate::types::StatusText;

pub trait DisplaySurface: Send {
    /// Make the image surface visible with the given source
    fn show_image(&mut self, url: &str);

    /// Make the video surface visible with the given source
    fn show_video(&mut self, url: &str);

    /// Update the name and position labels
    fn set_status(&mut self, status: &StatusText);

    /// Show the loading container and hide the others
    fn show_loading(&mut self);

    /// Hide the loading container and show the media
    fn show_content(&mut self);

    /// Show the error container with a message
    fn show_error(&mut self, message: &str);
}
