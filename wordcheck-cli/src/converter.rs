//! Legacy `.doc` → `.docx` conversion through a headless LibreOffice.
//!
//! Conversion is best effort: when no `soffice` binary can be found only
//! `.doc` input is affected, everything else keeps working.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Characters of converter stdout/stderr kept in error messages
const OUTPUT_TAIL_CHARS: usize = 300;

const PATH_NAMES: &[&str] = &["soffice", "soffice.exe", "libreoffice", "libreoffice.exe"];

const WINDOWS_INSTALL_PATHS: &[&str] = &[
    r"C:\Program Files\LibreOffice\program\soffice.exe",
    r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
];

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("LibreOffice (soffice) not found: install LibreOffice, add soffice to PATH, or pass --soffice-path")]
    NotFound,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("LibreOffice conversion failed (exit code {code:?}): stdout={stdout}, stderr={stderr}")]
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("conversion finished but no .docx was produced in {0}")]
    NoOutput(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Temporary working directory, removed on drop
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn create() -> io::Result<Self> {
        let path = std::env::temp_dir().join(format!("wordcheck-{}", Uuid::new_v4()));
        fs::create_dir_all(&path)?;
        Ok(Self(path))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

pub struct SofficeConverter {
    program: PathBuf,
}

impl SofficeConverter {
    /// Use an explicit binary if given, otherwise search PATH and the
    /// common Windows install locations
    pub fn locate(explicit: Option<&str>) -> Result<Self, ConversionError> {
        let program = match explicit {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return Err(ConversionError::NotFound);
                }
                path
            }
            None => Self::find_program().ok_or(ConversionError::NotFound)?,
        };
        debug!(program = %program.display(), "using LibreOffice");
        Ok(Self { program })
    }

    fn find_program() -> Option<PathBuf> {
        let on_path = std::env::var_os("PATH").and_then(|paths| {
            std::env::split_paths(&paths)
                .flat_map(|dir| PATH_NAMES.iter().map(move |name| dir.join(name)))
                .find(|candidate| candidate.is_file())
        });
        on_path.or_else(|| {
            WINDOWS_INSTALL_PATHS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Convert `.doc` bytes and return the `.docx` bytes
    pub fn convert_bytes(&self, doc_bytes: &[u8]) -> Result<Vec<u8>, ConversionError> {
        let scratch = ScratchDir::create()?;
        let input = scratch.0.join("input.doc");
        fs::write(&input, doc_bytes)?;

        let output = Command::new(&self.program)
            .args(["--headless", "--nologo", "--nolockcheck", "--convert-to", "docx", "--outdir"])
            .arg(&scratch.0)
            .arg(&input)
            .output()
            .map_err(|source| ConversionError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConversionError::Failed {
                code: output.status.code(),
                stdout: tail(&String::from_utf8_lossy(&output.stdout), OUTPUT_TAIL_CHARS),
                stderr: tail(&String::from_utf8_lossy(&output.stderr), OUTPUT_TAIL_CHARS),
            });
        }

        let produced = find_docx(&scratch.0, "input.docx")?;
        let bytes = fs::read(&produced)?;
        info!(bytes = bytes.len(), "converted .doc to .docx");
        Ok(bytes)
    }

    /// Convert a `.doc` file on disk
    pub fn convert_file(&self, input: &Path) -> Result<Vec<u8>, ConversionError> {
        let bytes = fs::read(input)?;
        self.convert_bytes(&bytes)
    }
}

/// The expected output file, or else any `.docx` in the directory
fn find_docx(dir: &Path, expected: &str) -> Result<PathBuf, ConversionError> {
    let expected = dir.join(expected);
    if expected.exists() {
        return Ok(expected);
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_docx = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
        if is_docx {
            return Ok(path);
        }
    }
    Err(ConversionError::NoOutput(dir.to_path_buf()))
}

/// Last `n` characters of `s`
fn tail(s: &str, n: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(n)).collect()
}
