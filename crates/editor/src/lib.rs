// Library crate: the editing core, exposed for the headless runner, the wasm
// binding and integration tests. Rendering stays behind `backend::RenderBackend`.

pub mod backend;
pub mod command;
pub mod fixtures;
pub mod mesh;
pub mod state;
