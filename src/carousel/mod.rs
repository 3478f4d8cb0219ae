pub mod controller;
pub mod session;

pub use controller::{CarouselController, CarouselSettings, CarouselState, Direction};
pub use session::{CarouselCommand, CarouselHandle, CarouselSession};
