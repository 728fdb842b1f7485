//! Job types.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::naming::{derive_output_path, NamingResult, OutputTemplate};

/// One input file and the output it will be written to.
///
/// Built right before the file is processed and dropped right after;
/// nothing about a job is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftJob {
    /// Source file, used for both FFmpeg input bindings.
    pub input: PathBuf,
    /// Derived output path.
    pub output: PathBuf,
    /// Offset tag used in the name, if the template has one.
    pub tag: Option<String>,
    /// Numeric suffix used in the name.
    pub suffix: u32,
}

impl ShiftJob {
    /// Plan a job by deriving its output name.
    ///
    /// The tag is only carried into the job when the template uses it.
    pub fn plan(
        input: &Path,
        tag: Option<&str>,
        suffix: u32,
        template: &OutputTemplate,
    ) -> NamingResult<Self> {
        let output = derive_output_path(input, tag, suffix, template)?;
        let tag = tag
            .filter(|_| template.uses(crate::naming::TemplateField::Tag))
            .map(str::to_string);

        Ok(Self {
            input: input.to_path_buf(),
            output,
            tag,
            suffix,
        })
    }

    /// Short display name (output file name).
    pub fn name(&self) -> String {
        self.output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output.display().to_string())
    }
}
