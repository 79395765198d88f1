//! Session orchestration: the controller and the navigation seam it drives.

pub mod navigation;
pub mod session;
