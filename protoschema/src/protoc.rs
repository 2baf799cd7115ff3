//! Protoc invocation utilities.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::descriptor::{decode_file_descriptor_set, FileDescriptorSet};
use crate::Error;

/// Find the protoc executable.
pub fn find_protoc() -> Result<PathBuf, Error> {
    // Check PROTOC environment variable first
    if let Ok(path) = std::env::var("PROTOC") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
    }

    which::which("protoc").map_err(|_| Error::ProtocNotFound)
}

/// Invoke protoc to build a FileDescriptorSet covering `protos` and
/// everything they import.
///
/// The encoded set is kept at `descriptor_out` when given, otherwise it is
/// written to a temporary directory and discarded.
pub fn invoke_protoc(
    protoc: &Path,
    protos: &[impl AsRef<Path>],
    includes: &[impl AsRef<Path>],
    extra_args: &[String],
    descriptor_out: Option<&Path>,
) -> Result<FileDescriptorSet, Error> {
    let tempdir = tempfile::tempdir()?;
    let descriptor_path = match descriptor_out {
        Some(path) => path.to_path_buf(),
        None => tempdir.path().join("descriptor.bin"),
    };

    let mut cmd = Command::new(protoc);
    for include in includes {
        cmd.arg("-I").arg(include.as_ref());
    }
    cmd.arg("--descriptor_set_out").arg(&descriptor_path);
    // Imports are needed to resolve cross-file references.
    cmd.arg("--include_imports");
    cmd.args(extra_args);
    for proto in protos {
        cmd.arg(proto.as_ref());
    }

    debug!("running {:?}", cmd);
    let output = cmd.output()?;

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = if stdout.is_empty() {
            stderr.into_owned()
        } else if stderr.is_empty() {
            stdout.into_owned()
        } else {
            format!("{}\n{}", stdout, stderr)
        };
        return Err(Error::ProtocFailed(combined));
    }

    let descriptor_bytes = std::fs::read(&descriptor_path)?;
    decode_file_descriptor_set(&descriptor_bytes)
}

/// The name protoc gives `proto`: its path relative to the first include
/// directory containing it, with `/` separators.
pub fn unit_name(proto: &Path, includes: &[impl AsRef<Path>]) -> String {
    let relative = includes
        .iter()
        .find_map(|include| proto.strip_prefix(include.as_ref()).ok())
        .unwrap_or(proto);

    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
