pub mod config;
pub mod constants;
pub mod detector;
pub mod driver;
pub mod error;
pub mod gesture;
pub mod orbit;
pub mod render_data;
pub mod scene;
pub mod signals;
pub mod state;

pub use config::*;
pub use constants::*;
pub use detector::*;
pub use driver::*;
pub use error::*;
pub use gesture::*;
pub use orbit::*;
pub use scene::*;
pub use signals::*;
pub use state::*;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
