use crate::content::Project;
use std::rc::Rc;
use yew::Reducible;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaSource {
    Video(String),
    Image(String),
    None,
}

impl MediaSource {
    /// A video wins whenever its URL survives trimming; the image is the fallback.
    pub fn for_project(project: &Project) -> Self {
        if let Some(video) = project.playable_video() {
            Self::Video(video.to_string())
        } else if let Some(image) = project.image() {
            Self::Image(image.to_string())
        } else {
            Self::None
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaState {
    NoMedia,
    ImageDisplay,
    VideoLoading,
    VideoPlaying,
    VideoPaused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaEvent {
    /// The element decoded its first frame (`loadeddata`).
    FirstFrame,
    /// The user pressed the play/pause control. Carries the element's `paused` flag.
    Toggle { element_paused: bool },
    /// The element started playing on its own.
    Played,
    /// The element paused on its own.
    Paused,
    /// The component switched to another source.
    Reset(MediaState),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaCommand {
    Play,
    Pause,
}

impl MediaState {
    pub fn initial(source: &MediaSource) -> Self {
        match source {
            MediaSource::Video(_) => Self::VideoLoading,
            MediaSource::Image(_) => Self::ImageDisplay,
            MediaSource::None => Self::NoMedia,
        }
    }

    pub fn is_loaded(self) -> bool {
        matches!(self, Self::VideoPlaying | Self::VideoPaused)
    }

    /// The control shows "pause" until the video is known to be paused,
    /// since the element autoplays.
    pub fn shows_pause(self) -> bool {
        matches!(self, Self::VideoLoading | Self::VideoPlaying)
    }

    pub fn apply(self, event: MediaEvent) -> (Self, Option<MediaCommand>) {
        use MediaEvent::*;
        use MediaState::*;

        match (self, event) {
            (_, Reset(state)) => (state, None),
            (NoMedia | ImageDisplay, _) => (self, None),

            (VideoLoading, FirstFrame) => (VideoPlaying, Some(MediaCommand::Play)),
            (VideoLoading, Toggle { element_paused }) => (VideoLoading, Some(command_for(element_paused))),
            (VideoLoading, Played | Paused) => (VideoLoading, None),

            (VideoPlaying | VideoPaused, FirstFrame) => (self, None),
            (VideoPlaying | VideoPaused, Toggle { element_paused: true }) => {
                (VideoPlaying, Some(MediaCommand::Play))
            }
            (VideoPlaying | VideoPaused, Toggle { element_paused: false }) => {
                (VideoPaused, Some(MediaCommand::Pause))
            }
            (VideoPlaying | VideoPaused, Played) => (VideoPlaying, None),
            (VideoPlaying | VideoPaused, Paused) => (VideoPaused, None),
        }
    }
}

/// Element-driven transitions go through Yew's reducer so they always see the
/// latest state, even when several media events land between renders.
impl Reducible for MediaState {
    type Action = MediaEvent;

    fn reduce(self: Rc<Self>, action: MediaEvent) -> Rc<Self> {
        let (next, _) = (*self).apply(action);
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

fn command_for(element_paused: bool) -> MediaCommand {
    if element_paused {
        MediaCommand::Play
    } else {
        MediaCommand::Pause
    }
}
