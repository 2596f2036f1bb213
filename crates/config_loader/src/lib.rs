//! # Config Loader
//!
//! 运行配置加载：读取 TOML / JSON 文件，反序列化为 `RunBlueprint`，
//! 再做一次完整校验。引擎只接收校验过的配置。
//!
//! 格式由扩展名决定（`.toml` / `.json`，大小写不敏感）。
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("attitude.toml")).unwrap();
//! println!("alpha: {}", blueprint.engine.filter.alpha);
//! ```

mod parser;
mod validator;

pub use contracts::RunBlueprint;
pub use parser::ConfigFormat;
pub use validator::validate_engine;

use contracts::ContractError;
use std::path::Path;

/// 配置加载入口（无状态）
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从文件加载并校验
    ///
    /// 读取失败与解析失败都归为 `ConfigParse`，消息前缀为文件路径；
    /// 校验失败保持 `ConfigValidation`，字段路径已足够定位。
    pub fn load_from_path(path: &Path) -> Result<RunBlueprint, ContractError> {
        let format = format_of(path)?;

        let content = std::fs::read_to_string(path).map_err(|e| ContractError::ConfigParse {
            message: format!("failed to read {}", path.display()),
            source: Some(Box::new(e)),
        })?;

        let blueprint = parser::parse(&content, format).map_err(|e| match e {
            ContractError::ConfigParse { message, source } => ContractError::ConfigParse {
                message: format!("{}: {message}", path.display()),
                source,
            },
            other => other,
        })?;

        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// 从字符串加载并校验
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<RunBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// 序列化为 TOML（`attitude info` 与配置模板生成使用）
    pub fn to_toml(blueprint: &RunBlueprint) -> Result<String, ContractError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// 序列化为 JSON
    pub fn to_json(blueprint: &RunBlueprint) -> Result<String, ContractError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

fn format_of(path: &Path) -> Result<ConfigFormat, ContractError> {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return Err(ContractError::config_parse(format!(
            "{}: cannot determine config format without a .toml or .json extension",
            path.display()
        )));
    };

    ConfigFormat::from_extension(ext).ok_or_else(|| {
        ContractError::config_parse(format!(
            "{}: unsupported config format: .{ext}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_TOML: &str = r#"
[engine.filter]
alpha = 0.96

[engine.scheduler]
period_s = 0.02
min_sleep_s = 0.001
max_ticks = 50

[source]
kind = "synthetic"
gyro = [4.0, -2.0, 1.0]

[[renderers]]
name = "log_renderer"
renderer_type = "log"
"#;

    fn temp_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_str_toml() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.engine.filter.alpha, 0.96);
        assert_eq!(bp.renderers.len(), 1);
        assert_eq!(bp.source.name(), "synthetic");
    }

    #[test]
    fn test_round_trip_toml_and_json() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();

        let toml = ConfigLoader::to_toml(&bp).unwrap();
        let from_toml = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.engine, from_toml.engine);
        assert_eq!(bp.source, from_toml.source);

        let json = ConfigLoader::to_json(&bp).unwrap();
        let from_json = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(bp.engine, from_json.engine);
        assert_eq!(bp.renderers[0].name, from_json.renderers[0].name);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = "[engine.filter]\nalpha = 2.0\n\n[source]\nkind = \"synthetic\"\n";
        let err = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
        assert!(err.to_string().contains("alpha"));
    }

    #[test]
    fn test_load_from_path() {
        let file = temp_config(".toml", MINIMAL_TOML);
        let bp = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(bp.engine.scheduler.max_ticks, Some(50));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let file = temp_config(".toml", "[source\n");
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
        assert!(
            err.to_string().contains(&file.path().display().to_string()),
            "got: {err}"
        );
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let err = ConfigLoader::load_from_path(Path::new("/nonexistent/attitude.toml")).unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { source: Some(_), .. }));
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_load_from_path_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }
}
