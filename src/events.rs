mod pause;
mod pointer;
mod resize;

pub use pause::wire_pause_button;
pub use pointer::wire_pointer_handlers;
pub use resize::wire_resize;
