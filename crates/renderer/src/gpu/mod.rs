//! wgpu backing for the frame plan.
//!
//! - `context` owns instance/device/surface wiring and reconfigures the
//!   swapchain when it goes stale.
//! - `texture` uploads the decoded sand image and its sampler.
//! - `pipeline` builds the WGSL pipeline with its parameter and texture
//!   bind groups.
//! - `state` glues them together as the `FrameTarget` the window drives.

mod context;
mod pipeline;
mod state;
mod texture;

pub(crate) use state::GpuState;
