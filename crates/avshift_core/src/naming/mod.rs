//! Output file naming.
//!
//! Every output name is a pure function of the input path, the offset
//! text, a numeric suffix and a template:
//!
//! ```text
//! clip.mp4 + "+0.5" + 4821 + "{basename}_{tag}_{suffix}.{ext}"
//!     -> clip_p0d5_4821.mp4
//! ```
//!
//! Nothing here touches the filesystem. Whether the derived path is
//! already taken is left to FFmpeg (`-n` refuses, `-y` overwrites).

mod offset;
mod suffix;
mod template;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use offset::{sanitize_offset, Offset};
pub use suffix::{
    CounterSuffix, RandomSuffix, SuffixGenerator, SuffixStrategy, SUFFIX_MAX, SUFFIX_MIN,
};
pub use template::{NameParts, OutputTemplate, TemplateField};

/// Errors from offset parsing and name derivation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NamingError {
    #[error("'{0}' is not a finite number of seconds")]
    InvalidOffset(String),

    #[error("Invalid output template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("Template uses {field} but no value was supplied")]
    MissingField { field: TemplateField },

    #[error("Input has no file extension: {0}")]
    MissingExtension(PathBuf),
}

/// Result type for naming operations.
pub type NamingResult<T> = Result<T, NamingError>;

/// Split an input path into its directory, basename and extension.
///
/// The basename is the file name minus its final extension; the extension
/// is whatever follows the final `.`. Dotfiles and names without a dot
/// have no usable extension.
pub fn split_name(input: &Path) -> NamingResult<(PathBuf, String, String)> {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| NamingError::MissingExtension(input.to_path_buf()))?;

    let dot = match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => idx,
        _ => return Err(NamingError::MissingExtension(input.to_path_buf())),
    };

    let dir = input.parent().map(Path::to_path_buf).unwrap_or_default();
    let basename = file_name[..dot].to_string();
    let extension = file_name[dot + 1..].to_string();

    Ok((dir, basename, extension))
}

/// Derive the output path for one input.
///
/// The output lands next to the input. `tag` is `None` for templates that
/// do not use `{tag}` (the single-file `{basename}_out_{suffix}.{ext}` form).
pub fn derive_output_path(
    input: &Path,
    tag: Option<&str>,
    suffix: u32,
    template: &OutputTemplate,
) -> NamingResult<PathBuf> {
    let (dir, basename, extension) = split_name(input)?;

    let parts = NameParts {
        basename: &basename,
        tag,
        suffix,
        extension: &extension,
        index: None,
    };

    Ok(dir.join(template.render(&parts)?))
}
