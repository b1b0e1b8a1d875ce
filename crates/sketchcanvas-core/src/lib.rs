//! SketchCanvas Core Library
//!
//! Platform-agnostic element model, geometry and interaction logic for the
//! sketch canvas. All element geometry lives in percentage space (0–100 per axis).

pub mod config;
pub mod coords;
pub mod elements;
pub mod input;
pub mod interaction;
pub mod shortcuts;
pub mod snap;
pub mod stabilizer;
pub mod store;
pub mod tools;

pub use config::{CanvasConfig, ConfigError};
pub use coords::{NormalizedPoint, to_normalized, to_pixel_point, to_pixel_x, to_pixel_y};
pub use elements::{ElementId, ElementStyle, HexColor, LineStyle, SketchElement};
pub use hit_test::{ResizeHandle, hit_test, hit_test_resize_handle};
pub use input::{Key, KeyInput, Modifiers, PointerInput};
pub use interaction::{CanvasEvent, InteractionController, Mode};
pub use shortcuts::{ShortcutAction, ShortcutRegistry};
pub use stabilizer::LineStabilizer;
pub use store::{ElementStore, StoreError, StoreSnapshot};
pub use tools::{Brush, Tool};
