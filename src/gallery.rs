//! Modal viewer over a post's gallery.
//!
//! The viewer owns the image list of exactly one post. Loading another post's
//! images always closes it, so an index can never outlive the list it points
//! into.

use serde::Serialize;

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(tag = "state", content = "index", rename_all = "lowercase")]
pub enum ViewerState {
    #[default]
    Closed,
    Open(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct GalleryViewer {
    images: Vec<String>,
    state: ViewerState,
}

impl GalleryViewer {
    pub fn new(images: Vec<String>) -> Self {
        GalleryViewer {
            images,
            state: ViewerState::Closed,
        }
    }

    /// Replaces the image list. The viewer is closed whatever its state.
    pub fn load(&mut self, images: Vec<String>) {
        self.images = images;
        self.state = ViewerState::Closed;
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    /// Out-of-range indices, including any index into an empty gallery, leave
    /// the viewer as it was.
    pub fn open_at(&mut self, index: usize) {
        if index < self.images.len() {
            self.state = ViewerState::Open(index);
        } else {
            tracing::debug!(index, len = self.images.len(), "ignoring open outside gallery");
        }
    }

    /// Moves one image in `direction`, wrapping at both ends. No-op when closed.
    pub fn step(&mut self, direction: Direction) {
        let ViewerState::Open(index) = self.state else {
            return;
        };

        let len = self.images.len();
        let next = match direction {
            Direction::Next => (index + 1) % len,
            Direction::Previous => (index + len - 1) % len,
        };
        self.state = ViewerState::Open(next);
    }

    pub fn close(&mut self) {
        self.state = ViewerState::Closed;
    }

    pub fn current(&self) -> Option<&str> {
        match self.state {
            ViewerState::Open(index) => self.images.get(index).map(String::as_str),
            ViewerState::Closed => None,
        }
    }
}
