use crate::engine::config::ArtifactPaths;
use crate::engine::error::GraphError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

const STRUCTURE_PLACEHOLDER: &str = "{structure}";
const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Files produced by external analysis tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Contacts,
    Dssp,
}

impl ArtifactKind {
    pub const fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Contacts => "contact report",
            ArtifactKind::Dssp => "DSSP output",
        }
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Contacts => ".tsv",
            ArtifactKind::Dssp => ".dssp",
        }
    }

    /// File name a tool run writes for a structure called `stem`.
    pub fn output_name(&self, stem: &str) -> String {
        match self {
            ArtifactKind::Contacts => format!("{}_contacts.tsv", stem),
            ArtifactKind::Dssp => format!("{}.dssp", stem),
        }
    }
}

/// A blocking invocation of an external program.
///
/// The argument template may contain `{structure}` and `{output}`, which are replaced by
/// the input structure path and the output path of each run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    name: String,
    program: PathBuf,
    args_template: Vec<String>,
}

impl ExternalTool {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>, args_template: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args_template,
        }
    }

    /// `get_static_contacts.py --structure <pdb> --output <tsv> --itypes all` from a
    /// GetContacts installation directory.
    pub fn contacts(install_dir: &Path) -> Self {
        Self::new(
            "get_static_contacts",
            install_dir.join("get_static_contacts.py"),
            ["--structure", STRUCTURE_PLACEHOLDER, "--output", OUTPUT_PLACEHOLDER, "--itypes", "all"]
                .map(String::from)
                .to_vec(),
        )
    }

    /// `mkdssp <pdb> <output>`.
    pub fn dssp(program: &Path) -> Self {
        Self::new(
            "mkdssp",
            program,
            vec![STRUCTURE_PLACEHOLDER.to_string(), OUTPUT_PLACEHOLDER.to_string()],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args_for(&self, structure: &Path, output: &Path) -> Vec<String> {
        let structure = structure.display().to_string();
        let output = output.display().to_string();
        self.args_template
            .iter()
            .map(|arg| {
                arg.replace(STRUCTURE_PLACEHOLDER, &structure)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }

    /// Runs the tool to completion. There is no timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ToolFailed`] if the program cannot be started or exits
    /// unsuccessfully, and [`GraphError::MissingArtifact`] if it succeeds without
    /// writing `output`.
    pub fn run(&self, kind: ArtifactKind, structure: &Path, output: &Path) -> Result<(), GraphError> {
        let args = self.args_for(structure, output);
        info!(tool = %self.name, "Running {} for {}.", self.program.display(), structure.display());
        debug!(?args, "Tool arguments.");

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| GraphError::ToolFailed {
                tool: self.name.clone(),
                reason: e.to_string(),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(GraphError::ToolFailed {
                tool: self.name.clone(),
                reason: format!("{}: {}", result.status, stderr.trim()),
            });
        }
        if !output.is_file() {
            return Err(GraphError::MissingArtifact {
                kind: kind.name(),
                path: output.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Looks for a file in `dir` whose name contains `stem` and ends with `extension`.
///
/// When several match, the lexicographically first is returned.
pub fn find_cached(dir: &Path, stem: &str, extension: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut matches: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.contains(stem) && n.ends_with(extension))
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}

/// Locates tool artifacts: an explicit file first, then a cached file, then a tool run.
pub struct ArtifactResolver<'a> {
    paths: &'a ArtifactPaths,
}

impl<'a> ArtifactResolver<'a> {
    pub fn new(paths: &'a ArtifactPaths) -> Self {
        Self { paths }
    }

    fn cache_dir(&self, kind: ArtifactKind) -> Option<&Path> {
        match kind {
            ArtifactKind::Contacts => self.paths.contacts_dir.as_deref(),
            ArtifactKind::Dssp => self.paths.dssp_dir.as_deref(),
        }
    }

    fn tool(&self, kind: ArtifactKind) -> Option<ExternalTool> {
        match kind {
            ArtifactKind::Contacts => self.paths.contacts_tool.as_deref().map(ExternalTool::contacts),
            ArtifactKind::Dssp => self.paths.dssp_tool.as_deref().map(ExternalTool::dssp),
        }
    }

    /// Resolves the artifact of `kind` for a structure.
    ///
    /// # Arguments
    ///
    /// * `explicit` - A file named by the caller; a relative name that does not exist is
    ///   also looked up inside the cache directory.
    /// * `stem` - The structure's name, used to match cached files and name new output.
    /// * `structure` - The coordinate file handed to the tool when nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingArtifact`] when no file exists and no tool can
    /// produce one, or the tool's error when a run fails.
    pub fn resolve(
        &self,
        kind: ArtifactKind,
        explicit: Option<&Path>,
        stem: Option<&str>,
        structure: Option<&Path>,
    ) -> Result<PathBuf, GraphError> {
        let cache_dir = self.cache_dir(kind);

        if let Some(path) = explicit {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            if let Some(candidate) = cache_dir.map(|dir| dir.join(path)).filter(|p| p.is_file()) {
                return Ok(candidate);
            }
            return Err(GraphError::MissingArtifact {
                kind: kind.name(),
                path: path.to_path_buf(),
            });
        }

        if let (Some(dir), Some(stem)) = (cache_dir, stem) {
            if let Some(found) = find_cached(dir, stem, kind.extension()) {
                info!("Found cached {}: {}", kind.name(), found.display());
                return Ok(found);
            }
        }

        match (self.tool(kind), stem, structure) {
            (Some(tool), Some(stem), Some(structure)) => {
                let out_dir = cache_dir
                    .or_else(|| structure.parent())
                    .unwrap_or_else(|| Path::new("."));
                let output = out_dir.join(kind.output_name(stem));
                tool.run(kind, structure, &output)?;
                Ok(output)
            }
            _ => Err(GraphError::MissingArtifact {
                kind: kind.name(),
                path: cache_dir
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(stem.unwrap_or_default())),
            }),
        }
    }
}
