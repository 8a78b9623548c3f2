mod gpu;
mod overlay;
mod shader;
pub mod uniforms;

pub use gpu::Renderer;
pub use overlay::Overlay;
