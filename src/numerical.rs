pub mod assembly;
pub mod stencil;
