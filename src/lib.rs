pub use bevy;
pub use moba_camera;
pub use touch_input;

pub mod prelude {
    pub use moba_camera::prelude::*;
}
