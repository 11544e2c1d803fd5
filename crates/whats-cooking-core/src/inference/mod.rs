//! ML inference engine using Candle.
//!
//! Provides the YOLOv8 classification network, image preprocessing,
//! safetensors weight loading, and the load-once model provider.

mod device;
mod loader;
mod preprocess;
mod provider;
mod utils;
mod yolo_cls;

pub use device::get_device;
pub use loader::{load_safetensors, var_builder_from_bytes};
pub use preprocess::preprocess;
pub use provider::ModelProvider;
pub use utils::top1;
pub use yolo_cls::{YoloClassifier, YoloV8Cls, HEAD_CHANNELS};
