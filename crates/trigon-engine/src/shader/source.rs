use std::path::Path;

use anyhow::{anyhow, Result};

/// Reads a shader source file from `dir`/`file_name`.
///
/// Read failures are logged and an empty source is substituted; the empty
/// module then fails validation in [`create_module`], where the caller gets
/// a reportable error.
pub fn load_source(dir: &Path, file_name: &str) -> String {
    let path = dir.join(file_name);
    match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            log::error!("failed to load shader source {}: {err}", path.display());
            String::new()
        }
    }
}

/// Compiles a WGSL module, surfacing validation errors as `Err`.
pub fn create_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    if let Some(err) = pollster::block_on(error_scope.pop()) {
        return Err(anyhow!("shader `{label}` failed to compile: {err}"));
    }

    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir()
    }

    #[test]
    fn missing_file_yields_empty_source() {
        let source = load_source(&scratch_dir(), "does-not-exist.wgsl");
        assert_eq!(source, "");
    }

    #[test]
    fn existing_file_yields_exact_contents() {
        let name = format!("trigon-shader-test-{}.wgsl", std::process::id());
        let path = scratch_dir().join(&name);
        let contents = "@fragment fn fs_main() {}\n";
        std::fs::write(&path, contents).unwrap();

        let source = load_source(&scratch_dir(), &name);
        let _ = std::fs::remove_file(&path);

        assert_eq!(source, contents);
    }
}
