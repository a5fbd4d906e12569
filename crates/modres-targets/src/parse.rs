//! TOML loading and validation for platform definitions.
//!
//! Platform sets are stored as `platforms.toml` files:
//!
//! ```toml
//! [[platform]]
//! name = "browser"
//!
//! [[platform]]
//! name = "webkit"
//! parent = "browser"
//! ```

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, TargetError};
use crate::platform::PlatformSet;

/// Load a platform set from a TOML file.
pub fn load_platforms_toml(path: &Path) -> Result<PlatformSet> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_platforms_toml(&content)
}

/// Parse and validate a platform set from a TOML string.
pub fn parse_platforms_toml(toml_str: &str) -> Result<PlatformSet> {
    let set: PlatformSet = toml::from_str(toml_str)?;
    validate_platforms(&set)?;
    Ok(set)
}

/// Check names are usable as directory names and unique, and that every
/// parent is defined and reachable without cycles.
pub fn validate_platforms(set: &PlatformSet) -> Result<()> {
    let mut seen = HashSet::new();
    for def in &set.platforms {
        if def.name.is_empty()
            || def
                .name
                .chars()
                .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        {
            return Err(TargetError::Validation {
                detail: format!("invalid platform name '{}'", def.name),
            });
        }
        if !seen.insert(def.name.as_str()) {
            return Err(TargetError::Validation {
                detail: format!("platform '{}' defined twice", def.name),
            });
        }
    }
    for def in &set.platforms {
        set.chain_for(&def.name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[platform]]
name = "browser"
description = "Any browser engine"

[[platform]]
name = "webkit"
parent = "browser"
"#;

    #[test]
    fn parse_sample() {
        let set = parse_platforms_toml(SAMPLE).unwrap();
        assert_eq!(set.platforms.len(), 2);
        assert_eq!(set.get("webkit").unwrap().parent.as_deref(), Some("browser"));
        assert_eq!(
            set.get("browser").unwrap().description.as_deref(),
            Some("Any browser engine")
        );
    }

    #[test]
    fn empty_document_is_empty_set() {
        let set = parse_platforms_toml("").unwrap();
        assert!(set.platforms.is_empty());
    }

    #[test]
    fn duplicate_names_rejected() {
        let toml = "[[platform]]\nname = \"a\"\n[[platform]]\nname = \"a\"\n";
        assert!(matches!(
            parse_platforms_toml(toml),
            Err(TargetError::Validation { .. })
        ));
    }

    #[test]
    fn path_separators_rejected() {
        let toml = "[[platform]]\nname = \"../etc\"\n";
        assert!(matches!(
            parse_platforms_toml(toml),
            Err(TargetError::Validation { .. })
        ));
    }

    #[test]
    fn dangling_parent_rejected() {
        let toml = "[[platform]]\nname = \"a\"\nparent = \"b\"\n";
        assert!(matches!(
            parse_platforms_toml(toml),
            Err(TargetError::UnknownPlatform { .. })
        ));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(matches!(
            parse_platforms_toml("[[platform]\n"),
            Err(TargetError::Toml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platforms.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let set = load_platforms_toml(&path).unwrap();
        assert_eq!(set.chain_for("webkit").unwrap().platforms().len(), 2);

        let missing = load_platforms_toml(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(TargetError::NotFound { .. })));
    }
}
