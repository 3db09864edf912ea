use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage, ShaderType,
};

use crate::error::MorphoError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Registers the shared morph module at construction time. Consuming
/// shaders use `#import morpho::morph::{MorphParams, displace}` to pull the
/// displacement kernel into their own vertex or compute stage.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: source and file path used in diagnostics.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Modules registered in dependency order.
const MODULES: &[ModuleDef] = &[ModuleDef {
    source: include_str!("../../assets/shaders/modules/morph.wgsl"),
    file_path: "modules/morph.wgsl",
}];

/// Compute shader that displaces a point buffer on the GPU.
pub const DISPLACE_POINTS_WGSL: &str =
    include_str!("../../assets/shaders/compute/displace_points.wgsl");

impl std::fmt::Debug for ShaderComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderComposer").finish_non_exhaustive()
    }
}

impl ShaderComposer {
    /// Composer with the shared modules registered.
    ///
    /// # Errors
    ///
    /// Returns [`MorphoError::KernelPatch`] if a shared module fails to
    /// parse.
    pub fn new() -> Result<Self, MorphoError> {
        let mut composer = Composer::default();
        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    MorphoError::KernelPatch(format!(
                        "failed to register shader module '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`MorphoError::KernelPatch`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, MorphoError> {
        let naga_module = self
            .compose_naga(source, file_path)
            .map_err(|e| {
                MorphoError::KernelPatch(format!("failed to compose shader '{file_path}': {e}"))
            })?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a
    /// wgpu shader module. Useful for testing shader composition without a
    /// GPU device.
    ///
    /// # Errors
    ///
    /// Returns the composer error unchanged.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<naga_oil::compose::ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}
