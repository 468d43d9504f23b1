use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShaderError;

use super::link::{link, LinkedProgram};

/// Paths of a vertex + fragment source pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Joins both file names onto `dir`.
    pub fn in_dir(dir: &Path, vertex: &str, fragment: &str) -> Self {
        Self::new(dir.join(vertex), dir.join(fragment))
    }

    /// Reads, compiles and links both stages.
    pub fn load(&self) -> Result<LinkedProgram, ShaderError> {
        let vertex = read(&self.vertex)?;
        let fragment = read(&self.fragment)?;
        log::debug!(
            "linking {} + {}",
            self.vertex.display(),
            self.fragment.display()
        );
        link((&self.vertex, &vertex), (&self.fragment, &fragment))
    }
}

fn read(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("orbit-shader-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let src = ShaderSource::new("/nonexistent/a.wgsl", "/nonexistent/b.wgsl");
        let err = src.load().unwrap_err();
        assert!(matches!(err, ShaderError::Read { ref path, .. } if path.ends_with("a.wgsl")));
    }

    #[test]
    fn loads_a_pair_from_disk() {
        let dir = temp_dir("load");
        fs::write(
            dir.join("v.wgsl"),
            "@group(0) @binding(0) var<uniform> mvp: mat4x4<f32>;\n\
             @vertex fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {\n\
                 return mvp * vec4<f32>(p, 1.0);\n\
             }\n",
        )
        .unwrap();
        fs::write(
            dir.join("f.wgsl"),
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0, 0.0, 0.0, 1.0); }\n",
        )
        .unwrap();

        let linked = ShaderSource::in_dir(&dir, "v.wgsl", "f.wgsl").load().unwrap();
        assert_eq!(linked.attributes().len(), 1);

        fs::remove_dir_all(dir).ok();
    }
}
