pub mod action;
pub mod input;
pub mod rig;
pub mod time;
pub mod tween;
