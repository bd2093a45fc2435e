//! JSON configuration loading.
//!
//! The document is a map from shader name to its entry description:
//!
//! ```json
//! {
//!     "water_ps": {
//!         "files": ["water_ps.fxc", "common.h"],
//!         "static": [{"name": "REFLECT", "minVal": 0, "maxVal": 1}],
//!         "dynamic": [{"name": "FOG", "minVal": 0, "maxVal": 2}],
//!         "skip": "$REFLECT == 0 && $FOG == 2",
//!         "version": "ps_3_0",
//!         "centroid": 1
//!     }
//! }
//! ```
//!
//! The first file is the shader source; the rest are includes owned by the
//! caller's file cache. Shader names are processed in sorted order so a
//! given document always produces the same entry set.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use scombo_error::{ComboError, Result};
use scombo_expr::parse;

use crate::define::Define;
use crate::entry::{CfgEntry, EntryInfo};
use crate::generator::ComboGenerator;

#[derive(Debug, Deserialize)]
struct DefineConfig {
    name: String,
    #[serde(rename = "minVal")]
    min_val: i32,
    #[serde(rename = "maxVal")]
    max_val: i32,
}

#[derive(Debug, Deserialize)]
struct ShaderConfig {
    files: Vec<String>,
    #[serde(default, rename = "static")]
    static_defines: Vec<DefineConfig>,
    #[serde(default, rename = "dynamic")]
    dynamic_defines: Vec<DefineConfig>,
    #[serde(default)]
    skip: String,
    version: String,
    #[serde(default)]
    centroid: i32,
}

/// Load and validate every entry in the configuration file at `path`.
pub(crate) fn load_entries(path: &Path) -> Result<Vec<CfgEntry>> {
    let text = fs::read_to_string(path).map_err(|source| ComboError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    let shaders: BTreeMap<String, ShaderConfig> =
        serde_json::from_str(&text).map_err(|source| ComboError::ConfigJson {
            path: path.to_path_buf(),
            source,
        })?;
    build_entries(shaders)
}

/// Load and validate every entry in an in-memory configuration document.
pub(crate) fn parse_entries(json: &str) -> Result<Vec<CfgEntry>> {
    let shaders: BTreeMap<String, ShaderConfig> = serde_json::from_str(json)?;
    build_entries(shaders)
}

fn build_entries(shaders: BTreeMap<String, ShaderConfig>) -> Result<Vec<CfgEntry>> {
    let mut entries = Vec::with_capacity(shaders.len());
    for (name, shader) in shaders {
        entries.push(build_entry(name, shader)?);
    }
    Ok(entries)
}

fn build_entry(name: String, shader: ShaderConfig) -> Result<CfgEntry> {
    let Some(shader_file) = shader.files.first() else {
        return Err(ComboError::Config {
            shader: name,
            detail: "no source files listed".into(),
        });
    };

    let mut generator = ComboGenerator::default();
    // Dynamic defines first: they take the low-order, fastest-cycling
    // slots.
    add_defines(&name, &mut generator, &shader.dynamic_defines, false)?;
    add_defines(&name, &mut generator, &shader.static_defines, true)?;

    let skip = parse(&shader.skip, &generator);
    debug!(
        shader = %name,
        skip = %skip.display(&generator),
        "parsed skip expression"
    );

    let info = EntryInfo {
        shader_file_name: shader_file.clone(),
        shader_version: shader.version,
        centroid_mask: shader.centroid,
        num_combos: generator.num_combos(),
        num_static_combos: generator.num_combos_matching(true),
        num_dynamic_combos: generator.num_combos_matching(false),
        command_start: 0,
        command_end: 0,
        name,
    };
    Ok(CfgEntry::new(generator, skip, info))
}

fn add_defines(
    shader: &str,
    generator: &mut ComboGenerator,
    configs: &[DefineConfig],
    is_static: bool,
) -> Result<()> {
    for config in configs {
        if config.min_val > config.max_val {
            return Err(ComboError::Config {
                shader: shader.to_owned(),
                detail: format!(
                    "define {} has empty range {}..={}",
                    config.name, config.min_val, config.max_val
                ),
            });
        }
        generator.add_define(Define::new(
            config.name.clone(),
            config.min_val,
            config.max_val,
            is_static,
        ));
    }
    Ok(())
}
