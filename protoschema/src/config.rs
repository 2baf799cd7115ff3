//! Configuration for standalone schema generation.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::descriptor::{decode_file_descriptor_set, FileDescriptorSet, GeneratedFile};
use crate::generator::generate;
use crate::options::Options;
use crate::protoc;
use crate::Error;

/// Configuration for generating JSON Schema files from `.proto` sources.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Conversion policy.
    pub(crate) options: Options,

    /// Output directory for generated files.
    pub(crate) out_dir: Option<PathBuf>,

    /// Path to the protoc executable.
    pub(crate) protoc_path: Option<PathBuf>,

    /// Additional arguments for protoc.
    pub(crate) protoc_args: Vec<String>,

    /// Skip running protoc, use pre-existing FileDescriptorSet.
    pub(crate) skip_protoc: bool,

    /// Path to read/write FileDescriptorSet.
    pub(crate) file_descriptor_set_path: Option<PathBuf>,
}

impl Config {
    /// Create a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all conversion options at once.
    pub fn options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    /// Let every generated node accept `null`.
    pub fn allow_null_values(&mut self, enabled: bool) -> &mut Self {
        self.options.allow_null_values(enabled);
        self
    }

    /// Forbid properties not declared on a message.
    pub fn disallow_additional_properties(&mut self, enabled: bool) -> &mut Self {
        self.options.disallow_additional_properties(enabled);
        self
    }

    /// Accept only numbers for 64-bit integer fields.
    pub fn disallow_bigints_as_strings(&mut self, enabled: bool) -> &mut Self {
        self.options.disallow_bigints_as_strings(enabled);
        self
    }

    /// Set the output directory for generated schema files.
    pub fn out_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set path to the protoc executable.
    pub fn protoc_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.protoc_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add an argument to pass to protoc.
    pub fn protoc_arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.protoc_args.push(arg.into());
        self
    }

    /// Skip running protoc; use an existing FileDescriptorSet instead.
    pub fn skip_protoc_run(&mut self) -> &mut Self {
        self.skip_protoc = true;
        self
    }

    /// Path to write/read the FileDescriptorSet.
    pub fn file_descriptor_set_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.file_descriptor_set_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Generate schemas for `.proto` files.
    ///
    /// Returns the paths of the files written.
    pub fn compile_protos(
        &self,
        protos: &[impl AsRef<Path>],
        includes: &[impl AsRef<Path>],
    ) -> Result<Vec<PathBuf>, Error> {
        let fds = if self.skip_protoc {
            let path = self
                .file_descriptor_set_path
                .as_ref()
                .ok_or(Error::MissingDescriptorPath)?;
            let bytes = std::fs::read(path)?;
            decode_file_descriptor_set(&bytes)?
        } else {
            let protoc_path = self
                .protoc_path
                .clone()
                .map(Ok)
                .unwrap_or_else(protoc::find_protoc)?;
            protoc::invoke_protoc(
                &protoc_path,
                protos,
                includes,
                &self.protoc_args,
                self.file_descriptor_set_path.as_deref(),
            )?
        };

        let files: Vec<String> = protos
            .iter()
            .map(|proto| protoc::unit_name(proto.as_ref(), includes))
            .collect();
        self.compile_fds(fds, &files)
    }

    /// Generate schemas for the units named in `files` from an existing
    /// FileDescriptorSet.
    ///
    /// Returns the paths of the files written.
    pub fn compile_fds(
        &self,
        fds: FileDescriptorSet,
        files: &[String],
    ) -> Result<Vec<PathBuf>, Error> {
        let out_dir = self
            .out_dir
            .clone()
            .or_else(|| std::env::var_os("OUT_DIR").map(Into::into))
            .ok_or(Error::MissingOutDir)?;

        let generated = generate(&fds.file, files, self.options)?;
        write_files(&out_dir, &generated)
    }
}

/// Write generated documents under `out_dir`, creating it if needed.
fn write_files(out_dir: &Path, generated: &[GeneratedFile]) -> Result<Vec<PathBuf>, Error> {
    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(generated.len());
    for file in generated {
        let path = out_dir.join(file.name());
        std::fs::write(&path, file.content())?;
        info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
