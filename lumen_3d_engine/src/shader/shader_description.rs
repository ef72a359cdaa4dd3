/// Shader description format
///
/// A shader asset is plain shading-language text annotated with `@` tags:
///
/// ```text
/// @include "common.nsh"
/// @sampler diffuseMap "diffuse"
/// @predefined uCamPos "nya camera position" : local
/// @uniform uColor "tint" = 1,0,0,1
/// @all
/// varying vec2 tc;
/// @vertex
/// void main() { ... }
/// @fragment
/// void main() { ... }
/// ```
///
/// Block tags (`@all`, `@vertex`, `@fragment`) capture text verbatim up to
/// the next `@`. Declaration tags read their arguments up to the end of the
/// line. Includes resolve relative to the including file and merge into the
/// same description.

use glam::Vec4;
use crate::error::{Error, Result};
use crate::resource::ResourceProvider;
use crate::{engine_error, engine_warn};

/// Number of engine-supplied predefined values
pub const PREDEFINED_COUNT: usize = 8;

/// Nested `@include` limit (guards include cycles)
const MAX_INCLUDE_DEPTH: usize = 16;

// ===== DECLARATION TYPES =====

/// Engine-supplied shader inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedKind {
    CameraPosition,
    CameraRotation,
    BonesPosition,
    BonesRotation,
    Viewport,
    ModelPosition,
    ModelRotation,
    ModelScale,
}

impl PredefinedKind {
    pub const ALL: [PredefinedKind; PREDEFINED_COUNT] = [
        PredefinedKind::CameraPosition,
        PredefinedKind::CameraRotation,
        PredefinedKind::BonesPosition,
        PredefinedKind::BonesRotation,
        PredefinedKind::Viewport,
        PredefinedKind::ModelPosition,
        PredefinedKind::ModelRotation,
        PredefinedKind::ModelScale,
    ];

    /// Semantic string used in `@predefined` declarations
    pub fn semantics(&self) -> &'static str {
        match self {
            PredefinedKind::CameraPosition => "nya camera position",
            PredefinedKind::CameraRotation => "nya camera rotation",
            PredefinedKind::BonesPosition => "nya bones pos",
            PredefinedKind::BonesRotation => "nya bones rot",
            PredefinedKind::Viewport => "nya viewport",
            PredefinedKind::ModelPosition => "nya model pos",
            PredefinedKind::ModelRotation => "nya model rot",
            PredefinedKind::ModelScale => "nya model scale",
        }
    }

    pub fn from_semantics(semantics: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.semantics() == semantics)
    }

    /// Position in the predefined table
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Coordinate space conversion applied before upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformTag {
    /// World space, uploaded as is
    #[default]
    None,
    /// World point to model space
    Local,
    /// World direction to model space (rotation only)
    LocalRot,
}

impl TransformTag {
    /// Recognize a tag inside the text following `:`
    fn from_suffix(text: &str) -> Self {
        if text.contains("local_rot") {
            TransformTag::LocalRot
        } else if text.contains("local") {
            TransformTag::Local
        } else {
            TransformTag::None
        }
    }
}

/// `@sampler <name> "semantics"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerDecl {
    pub semantics: String,
    /// Sampler variable name in the program
    pub name: String,
    /// Texture unit, assigned in first-seen order
    pub slot: u32,
}

/// `@predefined <name> "semantics" [: transform]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredefinedDecl {
    pub name: String,
    pub transform: TransformTag,
}

/// `@uniform <name> "semantics" [: transform] [= a,b,c,d]`
#[derive(Debug, Clone, PartialEq)]
pub struct UniformDecl {
    pub semantics: String,
    pub name: String,
    pub transform: TransformTag,
    pub default_value: Vec4,
}

/// Merged result of parsing a shader and its includes
#[derive(Debug, Clone, Default)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
    pub samplers: Vec<SamplerDecl>,
    pub predefines: [Option<PredefinedDecl>; PREDEFINED_COUNT],
    pub uniforms: Vec<UniformDecl>,
}

impl ShaderSource {
    pub fn sampler_slot(&self, semantics: &str) -> Option<u32> {
        self.samplers.iter().find(|s| s.semantics == semantics).map(|s| s.slot)
    }

    pub fn uniform_idx(&self, semantics: &str) -> Option<usize> {
        self.uniforms.iter().position(|u| u.semantics == semantics)
    }

    pub fn predefined(&self, kind: PredefinedKind) -> Option<&PredefinedDecl> {
        self.predefines[kind.index()].as_ref()
    }
}

// ===== PARSER =====

/// Parse a root shader description
///
/// Fails on empty data, on any include that cannot be read or parsed, and
/// when the merged vertex or fragment stage is empty.
pub fn parse_shader(data: &[u8], path: &str, provider: &dyn ResourceProvider) -> Result<ShaderSource> {
    let mut source = ShaderSource::default();
    DescriptionParser { provider, source: &mut source }.parse(data, path, 0)?;

    if source.vertex.trim().is_empty() {
        engine_error!("lumen3d::ShaderParser", "Empty vertex shader in '{}'", path);
        return Err(Error::InvalidFormat(format!("empty vertex shader in '{}'", path)));
    }
    if source.fragment.trim().is_empty() {
        engine_error!("lumen3d::ShaderParser", "Empty fragment shader in '{}'", path);
        return Err(Error::InvalidFormat(format!("empty fragment shader in '{}'", path)));
    }

    Ok(source)
}

#[derive(Clone, Copy)]
enum Stage {
    All,
    Vertex,
    Fragment,
}

struct DescriptionParser<'a> {
    provider: &'a dyn ResourceProvider,
    source: &'a mut ShaderSource,
}

impl DescriptionParser<'_> {
    fn parse(&mut self, data: &[u8], path: &str, depth: usize) -> Result<()> {
        if data.is_empty() {
            return Err(Error::InvalidFormat(format!("empty shader data in '{}'", path)));
        }

        let mut i = 0;
        while i + 1 < data.len() {
            if data[i] != b'@' {
                i += 1;
                continue;
            }
            i += 1;

            let rest = &data[i..];
            i = if rest.starts_with(b"include") {
                self.include(data, i + 7, path, depth)?
            } else if rest.starts_with(b"all") {
                self.block(data, i + 3, Stage::All)
            } else if rest.starts_with(b"vertex") {
                self.block(data, i + 6, Stage::Vertex)
            } else if rest.starts_with(b"fragment") {
                self.block(data, i + 8, Stage::Fragment)
            } else if rest.starts_with(b"sampler") {
                self.sampler(data, i + 7)
            } else if rest.starts_with(b"predefined") {
                self.declaration(data, i + 10, true)
            } else if rest.starts_with(b"uniform") {
                self.declaration(data, i + 7, false)
            } else {
                let tag_end = i + rest.iter().take_while(|b| b.is_ascii_alphanumeric() || **b == b'_').count();
                engine_warn!("lumen3d::ShaderParser",
                    "Unsupported shader tag '@{}' in '{}'", String::from_utf8_lossy(&data[i..tag_end]), path);
                i
            };
        }

        Ok(())
    }

    /// Append text up to the next `@`; returns the position of that `@`
    fn block(&mut self, data: &[u8], begin: usize, stage: Stage) -> usize {
        let end = data[begin..].iter().position(|&b| b == b'@').map_or(data.len(), |p| begin + p);
        let text = String::from_utf8_lossy(&data[begin..end]);

        match stage {
            Stage::All => {
                self.source.vertex.push_str(&text);
                self.source.fragment.push_str(&text);
            }
            Stage::Vertex => self.source.vertex.push_str(&text),
            Stage::Fragment => self.source.fragment.push_str(&text),
        }
        end
    }

    fn include(&mut self, data: &[u8], begin: usize, path: &str, depth: usize) -> Result<usize> {
        let eol = line_end(data, begin);
        let Some((relative, _)) = quoted(data, begin, eol) else {
            engine_warn!("lumen3d::ShaderParser", "Malformed @include in '{}'", path);
            return Ok(eol);
        };

        let include_path = format!("{}{}", directory_of(path), relative);
        if depth + 1 >= MAX_INCLUDE_DEPTH {
            engine_error!("lumen3d::ShaderParser", "Include depth exceeded at '{}'", include_path);
            return Err(Error::InvalidFormat(format!("include depth exceeded at '{}'", include_path)));
        }

        let included = self.provider.read(&include_path).map_err(|e| {
            engine_error!("lumen3d::ShaderParser",
                "Unable to load shader include '{}' from '{}': {}", include_path, path, e);
            e
        })?;

        self.parse(&included, &include_path, depth + 1).map_err(|e| {
            engine_error!("lumen3d::ShaderParser", "Unable to parse shader include '{}': {}", include_path, e);
            e
        })?;

        Ok(eol)
    }

    fn sampler(&mut self, data: &[u8], begin: usize) -> usize {
        let eol = line_end(data, begin);
        let (name, after_name) = engine_name(data, begin, eol);
        let Some((semantics, _)) = quoted(data, after_name, eol) else {
            return eol;
        };

        // First declaration keeps its slot so slots stay contiguous
        if self.source.sampler_slot(&semantics).is_none() {
            let slot = self.source.samplers.len() as u32;
            self.source.samplers.push(SamplerDecl { semantics, name, slot });
        }
        eol
    }

    fn declaration(&mut self, data: &[u8], begin: usize, predefined: bool) -> usize {
        let eol = line_end(data, begin);
        let (name, after_name) = engine_name(data, begin, eol);
        let Some((semantics, after_semantics)) = quoted(data, after_name, eol) else {
            return eol;
        };

        let (transform, default_value) = suffix(data, after_semantics, eol);

        if predefined {
            // Unknown semantics are dropped; a repeated kind replaces the earlier one
            if let Some(kind) = PredefinedKind::from_semantics(&semantics) {
                self.source.predefines[kind.index()] = Some(PredefinedDecl { name, transform });
            }
        } else if self.source.uniform_idx(&semantics).is_none() {
            self.source.uniforms.push(UniformDecl { semantics, name, transform, default_value });
        }
        eol
    }
}

// ===== SCANNING HELPERS =====

fn line_end(data: &[u8], from: usize) -> usize {
    data[from.min(data.len())..]
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .map_or(data.len(), |p| from + p)
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Engine-facing name: skip blanks, read up to a blank or a quote
fn engine_name(data: &[u8], from: usize, eol: usize) -> (String, usize) {
    let mut i = from;
    while i < eol && is_blank(data[i]) {
        i += 1;
    }
    let begin = i;
    while i < eol && !is_blank(data[i]) && data[i] != b'"' {
        i += 1;
    }
    (String::from_utf8_lossy(&data[begin..i]).into_owned(), i)
}

/// First `"..."` on the line; returns the content and the position after
/// the closing quote
fn quoted(data: &[u8], from: usize, eol: usize) -> Option<(String, usize)> {
    let line = &data[from.min(eol)..eol];
    let open = line.iter().position(|&b| b == b'"')?;
    let close = line[open + 1..].iter().position(|&b| b == b'"')? + open + 1;
    let text = String::from_utf8_lossy(&line[open + 1..close]).into_owned();
    Some((text, from + close + 1))
}

/// Optional `: transform` and `= a,b,c,d` after the semantics
fn suffix(data: &[u8], from: usize, eol: usize) -> (TransformTag, Vec4) {
    let mut values = [0.0f32; 4];
    let mut transform_begin = None;

    let mut i = from;
    while i < eol {
        match data[i] {
            b':' => {
                transform_begin = Some(i + 1);
                i += 1;
            }
            b'=' => i = default_values(data, i + 1, eol, &mut values),
            _ => i += 1,
        }
    }

    let transform = transform_begin.map_or(TransformTag::None, |begin| {
        TransformTag::from_suffix(&String::from_utf8_lossy(&data[begin..eol]))
    });

    (transform, Vec4::from_array(values))
}

/// Up to four numbers separated by blanks or commas
///
/// Stops at the end of the line, at `:`, or at the first token that is not
/// a number; components not reached keep their previous value.
fn default_values(data: &[u8], from: usize, eol: usize, values: &mut [f32; 4]) -> usize {
    let mut i = from;
    for value in values.iter_mut() {
        while i < eol && (is_blank(data[i]) || data[i] == b',') {
            i += 1;
        }
        if i >= eol || data[i] == b':' {
            break;
        }

        let begin = i;
        while i < eol && matches!(data[i], b'0'..=b'9' | b'.' | b'-' | b'+' | b'e' | b'E') {
            i += 1;
        }
        match float_prefix(&data[begin..i]) {
            Some(v) => *value = v,
            None => break,
        }
    }
    i
}

/// Longest leading run of `token` that reads as a float (`1.5.2` -> 1.5, `1e` -> 1)
fn float_prefix(token: &[u8]) -> Option<f32> {
    (1..=token.len())
        .rev()
        .find_map(|len| std::str::from_utf8(&token[..len]).ok()?.parse::<f32>().ok())
}

/// Directory part of a resource path, including the trailing separator
fn directory_of(path: &str) -> &str {
    match path.rfind('/').or_else(|| path.rfind('\\')) {
        Some(p) => &path[..=p],
        None => "",
    }
}

#[cfg(test)]
#[path = "shader_description_tests.rs"]
mod tests;
