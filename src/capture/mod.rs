pub(crate) mod camera;
pub(crate) mod sequencer;
pub(crate) mod timer;
